use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::ledger::RoundRecord;
use crate::player::{
    GameMode, MAX_POINTS, MIN_POINTS, PENALTY_STEP, SEAT_COUNT, Seat, check_seat, teammate,
};
use crate::rules;

/// Raw inputs collected for one seat before the round is settled.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct SeatEntry {
    pub points: i32,
    pub penalty: i32,
    pub team_penalty: i32,
    pub okey1: bool,
    pub okey2: bool,
    pub finished: bool,
    pub hand_finished: bool,
}

/// A single field change requested against a [`RoundEntry`].
///
/// All cross-seat side effects (clearing a rival okey holder, zeroing a
/// teammate's points on finish) happen atomically inside [`RoundEntry::apply`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum EntryUpdate {
    SetPoints(Seat, i32),
    AddPenalty(Seat),
    RemovePenalty(Seat),
    AddTeamPenalty(Seat),
    RemoveTeamPenalty(Seat),
    ToggleOkey1(Seat),
    ToggleOkey2(Seat),
    ToggleFinished(Seat),
    ToggleHandFinished(Seat),
}

impl EntryUpdate {
    pub fn seat(&self) -> Seat {
        match *self {
            EntryUpdate::SetPoints(seat, _)
            | EntryUpdate::AddPenalty(seat)
            | EntryUpdate::RemovePenalty(seat)
            | EntryUpdate::AddTeamPenalty(seat)
            | EntryUpdate::RemoveTeamPenalty(seat)
            | EntryUpdate::ToggleOkey1(seat)
            | EntryUpdate::ToggleOkey2(seat)
            | EntryUpdate::ToggleFinished(seat)
            | EntryUpdate::ToggleHandFinished(seat) => seat,
        }
    }
}

/// Input buffer for one round. Collects and validates the raw per-seat
/// values; the derived totals are computed by [`rules::settle`] when the
/// entry is converted into a record.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RoundEntry {
    round: u32,
    mode: GameMode,
    seats: [SeatEntry; SEAT_COUNT],
}

impl RoundEntry {
    pub fn new(round: u32, mode: GameMode) -> Self {
        Self {
            round,
            mode,
            seats: [SeatEntry::default(); SEAT_COUNT],
        }
    }

    /// Rebuilds an entry from a stored record so a past round can be edited
    /// with the same field semantics as fresh input.
    pub fn from_record(record: &RoundRecord, mode: GameMode) -> Self {
        let seats = std::array::from_fn(|seat| {
            let stored = &record.seats[seat];
            SeatEntry {
                points: stored.points,
                penalty: stored.penalty,
                team_penalty: stored.team_penalty,
                okey1: stored.okey1,
                okey2: stored.okey2,
                finished: stored.finished,
                hand_finished: stored.hand_finished,
            }
        });
        Self {
            round: record.round,
            mode,
            seats,
        }
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn seats(&self) -> &[SeatEntry; SEAT_COUNT] {
        &self.seats
    }

    /// True while the seat's point input is blocked because the teammate
    /// holds the finish for this round (team mode only).
    pub fn points_locked(&self, seat: Seat) -> bool {
        self.mode == GameMode::Team && self.seats[teammate(seat)].finished
    }

    pub fn hand_finisher(&self) -> Option<Seat> {
        self.seats.iter().position(|s| s.hand_finished)
    }

    pub fn finisher(&self) -> Option<Seat> {
        self.seats.iter().position(|s| s.finished)
    }

    pub fn apply(&mut self, update: EntryUpdate) -> Result<(), ValidationError> {
        check_seat(update.seat())?;
        match update {
            EntryUpdate::SetPoints(seat, points) => {
                if !(MIN_POINTS..=MAX_POINTS).contains(&points) {
                    return Err(ValidationError::PointsRange(points));
                }
                if self.points_locked(seat) {
                    return Err(ValidationError::PointsLocked(seat));
                }
                self.seats[seat].points = points;
            }
            EntryUpdate::AddPenalty(seat) => {
                self.seats[seat].penalty += PENALTY_STEP;
            }
            EntryUpdate::RemovePenalty(seat) => {
                self.seats[seat].penalty = (self.seats[seat].penalty - PENALTY_STEP).max(0);
            }
            EntryUpdate::AddTeamPenalty(seat) => {
                self.check_team_mode()?;
                self.seats[seat].team_penalty += PENALTY_STEP;
            }
            EntryUpdate::RemoveTeamPenalty(seat) => {
                self.check_team_mode()?;
                self.seats[seat].team_penalty =
                    (self.seats[seat].team_penalty - PENALTY_STEP).max(0);
            }
            EntryUpdate::ToggleOkey1(seat) => {
                let holding = !self.seats[seat].okey1;
                for entry in &mut self.seats {
                    entry.okey1 = false;
                }
                self.seats[seat].okey1 = holding;
            }
            EntryUpdate::ToggleOkey2(seat) => {
                let holding = !self.seats[seat].okey2;
                for entry in &mut self.seats {
                    entry.okey2 = false;
                }
                self.seats[seat].okey2 = holding;
            }
            EntryUpdate::ToggleFinished(seat) => {
                if self.hand_finisher().is_some() {
                    return Err(ValidationError::HandFinishActive);
                }
                let finishing = !self.seats[seat].finished;
                for entry in &mut self.seats {
                    entry.finished = false;
                }
                if finishing {
                    self.seats[seat].finished = true;
                    if self.mode == GameMode::Team {
                        // The partner cannot score in a round their teammate
                        // closed; penalties stay untouched.
                        self.seats[teammate(seat)].points = 0;
                    }
                }
            }
            EntryUpdate::ToggleHandFinished(seat) => {
                let finishing = !self.seats[seat].hand_finished;
                for entry in &mut self.seats {
                    entry.finished = false;
                    entry.hand_finished = false;
                }
                self.seats[seat].hand_finished = finishing;
            }
        }
        Ok(())
    }

    /// Settles the collected inputs into a storable record.
    pub fn into_record(self) -> Result<RoundRecord, ValidationError> {
        rules::settle(self.round, self.seats, self.mode)
    }

    fn check_team_mode(&self) -> Result<(), ValidationError> {
        if self.mode == GameMode::Team {
            Ok(())
        } else {
            Err(ValidationError::TeamPenaltyMode)
        }
    }
}
