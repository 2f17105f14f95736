use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Zero-based seat index around the table.
pub type Seat = usize;

pub const SEAT_COUNT: usize = 4;
pub const PENALTY_STEP: i32 = 101;
pub const FINISH_BONUS: i32 = 101;
pub const HAND_FINISH_BONUS: i32 = 202;
pub const HAND_FINISH_CHARGE: i32 = 202;
pub const MIN_POINTS: i32 = -999;
pub const MAX_POINTS: i32 = 999;
pub const MIN_NAME_LEN: usize = 1;
pub const MAX_NAME_LEN: usize = 20;

/// How the four seats compete: as two fixed partnerships or individually.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum GameMode {
    Team,
    Individual,
}

impl GameMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Team => "team",
            GameMode::Individual => "individual",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "team" => Some(GameMode::Team),
            "individual" => Some(GameMode::Individual),
            _ => None,
        }
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One of the two partnerships in team mode. Seats 0 and 2 form team A,
/// seats 1 and 3 form team B.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Team {
    A,
    B,
}

impl Team {
    #[inline]
    pub fn seats(self) -> [Seat; 2] {
        match self {
            Team::A => [0, 2],
            Team::B => [1, 3],
        }
    }

    #[inline]
    pub fn index(self) -> usize {
        match self {
            Team::A => 0,
            Team::B => 1,
        }
    }

    #[inline]
    pub fn other(self) -> Team {
        match self {
            Team::A => Team::B,
            Team::B => Team::A,
        }
    }
}

/// Seat directly across the table, i.e. the partner in team mode.
#[inline]
pub fn teammate(seat: Seat) -> Seat {
    (seat + 2) % SEAT_COUNT
}

#[inline]
pub fn team_of(seat: Seat) -> Team {
    if seat % 2 == 0 { Team::A } else { Team::B }
}

#[inline]
pub fn check_seat(seat: Seat) -> Result<(), ValidationError> {
    if seat < SEAT_COUNT {
        Ok(())
    } else {
        Err(ValidationError::SeatIndex(seat))
    }
}

/// Display identity for one seat, fixed for the duration of a game.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Player {
    name: String,
}

impl Player {
    pub fn new(name: &str) -> Result<Self, ValidationError> {
        let name = validate_name(name)?;
        Ok(Self { name })
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Trims the input and checks the 1-20 character window and the allowed
/// alphabet (alphanumerics plus space, `-`, `_` and `.`).
pub fn validate_name(name: &str) -> Result<String, ValidationError> {
    let trimmed = name.trim();
    let len = trimmed.chars().count();
    if !(MIN_NAME_LEN..=MAX_NAME_LEN).contains(&len) {
        return Err(ValidationError::NameLength(len));
    }
    if !trimmed
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, ' ' | '-' | '_' | '.'))
    {
        return Err(ValidationError::NameCharset);
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn teammate_pairs_opposite_seats() {
        assert_eq!(teammate(0), 2);
        assert_eq!(teammate(1), 3);
        assert_eq!(teammate(2), 0);
        assert_eq!(teammate(3), 1);
    }

    #[test]
    fn team_membership_by_parity() {
        assert_eq!(team_of(0), Team::A);
        assert_eq!(team_of(1), Team::B);
        assert_eq!(team_of(2), Team::A);
        assert_eq!(team_of(3), Team::B);
        assert_eq!(Team::A.seats(), [0, 2]);
        assert_eq!(Team::B.seats(), [1, 3]);
    }

    #[test]
    fn name_validation() {
        assert_eq!(validate_name("  Ayşe  ").unwrap(), "Ayşe");
        assert!(validate_name("").is_err());
        assert!(validate_name("   ").is_err());
        assert!(validate_name(&"x".repeat(21)).is_err());
        assert!(validate_name("ok name_2.v-1").is_ok());
        assert!(matches!(
            validate_name("no!bang"),
            Err(ValidationError::NameCharset)
        ));
    }

    #[test]
    fn mode_round_trips_through_text() {
        for mode in [GameMode::Team, GameMode::Individual] {
            assert_eq!(GameMode::parse(mode.as_str()), Some(mode));
        }
        assert_eq!(GameMode::parse("duo"), None);
    }
}
