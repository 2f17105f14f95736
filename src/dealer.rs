use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::player::{SEAT_COUNT, Seat, check_seat};

/// Tracks which seat deals the next round.
///
/// The dealer advances only when a round is successfully appended; editing a
/// past round never moves it.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct DealerRotation {
    current: Seat,
}

impl DealerRotation {
    pub fn new(initial: Seat) -> Result<Self, ValidationError> {
        check_seat(initial)?;
        Ok(Self { current: initial })
    }

    pub fn current(&self) -> Seat {
        self.current
    }

    /// Moves the deal one seat clockwise and returns the new dealer.
    pub fn advance(&mut self) -> Seat {
        self.current = (self.current + 1) % SEAT_COUNT;
        self.current
    }
}

impl Default for DealerRotation {
    fn default() -> Self {
        Self { current: 0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotation_wraps_around_the_table() {
        let mut dealer = DealerRotation::new(2).unwrap();
        assert_eq!(dealer.advance(), 3);
        assert_eq!(dealer.advance(), 0);
        assert_eq!(dealer.advance(), 1);
        assert_eq!(dealer.current(), 1);
    }

    #[test]
    fn initial_seat_is_validated() {
        assert!(DealerRotation::new(4).is_err());
        assert_eq!(DealerRotation::default().current(), 0);
    }
}
