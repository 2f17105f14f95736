use serde::{Deserialize, Serialize};

use crate::error::{ScoreError, ValidationError};
use crate::player::{GameMode, Player, SEAT_COUNT, Seat, Team, teammate, validate_name};

/// Settled values for one seat in one round.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct SeatScore {
    pub points: i32,
    pub penalty: i32,
    pub team_penalty: i32,
    pub okey1: bool,
    pub okey2: bool,
    pub finished: bool,
    pub hand_finished: bool,
    pub total: i32,
}

/// One completed round. Created by settlement, stored by the ledger, and
/// replaced whole when edited.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct RoundRecord {
    pub round: u32,
    pub seats: [SeatScore; SEAT_COUNT],
}

/// Ordered log of settled rounds for one game, plus the fixed table setup.
///
/// Round numbers are always exactly `1..=N` in storage order. Every
/// successful mutation bumps `revision`, which outcome computation uses to
/// detect staleness after later edits.
#[derive(Clone, Debug)]
pub struct GameLedger {
    mode: GameMode,
    players: [Player; SEAT_COUNT],
    team_names: Option<[String; 2]>,
    rounds: Vec<RoundRecord>,
    revision: u64,
}

impl GameLedger {
    pub fn new(
        mode: GameMode,
        players: [Player; SEAT_COUNT],
        team_names: Option<[String; 2]>,
    ) -> Result<Self, ValidationError> {
        let team_names = match (mode, team_names) {
            (GameMode::Team, Some([a, b])) => {
                Some([validate_name(&a)?, validate_name(&b)?])
            }
            (GameMode::Team, None) => return Err(ValidationError::TeamNamesRequired),
            (GameMode::Individual, _) => None,
        };
        Ok(Self {
            mode,
            players,
            team_names,
            rounds: Vec::new(),
            revision: 0,
        })
    }

    /// Rebuilds a ledger from previously stored rounds, re-checking the
    /// gap-free numbering invariant.
    pub fn from_rounds(
        mode: GameMode,
        players: [Player; SEAT_COUNT],
        team_names: Option<[String; 2]>,
        rounds: Vec<RoundRecord>,
    ) -> Result<Self, ScoreError> {
        let mut ledger = Self::new(mode, players, team_names)?;
        for record in rounds {
            ledger.append_round(record)?;
        }
        Ok(ledger)
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn players(&self) -> &[Player; SEAT_COUNT] {
        &self.players
    }

    pub fn player_name(&self, seat: Seat) -> &str {
        self.players[seat].name()
    }

    pub fn team_name(&self, team: Team) -> Option<&str> {
        self.team_names
            .as_ref()
            .map(|names| names[team.index()].as_str())
    }

    pub fn team_names(&self) -> Option<&[String; 2]> {
        self.team_names.as_ref()
    }

    pub fn rounds(&self) -> &[RoundRecord] {
        &self.rounds
    }

    pub fn round(&self, number: u32) -> Option<&RoundRecord> {
        // Numbering is dense, so the record for round N sits at index N-1.
        number
            .checked_sub(1)
            .and_then(|idx| self.rounds.get(idx as usize))
    }

    pub fn round_count(&self) -> u32 {
        self.rounds.len() as u32
    }

    pub fn next_round(&self) -> u32 {
        self.round_count() + 1
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Appends the next round. The record must carry exactly the next round
    /// number; anything else fails without touching the ledger.
    pub fn append_round(&mut self, record: RoundRecord) -> Result<(), ScoreError> {
        let expected = self.next_round();
        if record.round != expected {
            return Err(ScoreError::Sequence {
                expected,
                got: record.round,
            });
        }
        self.rounds.push(record);
        self.revision += 1;
        Ok(())
    }

    /// Replaces a stored round in place. Ordering and all other rounds are
    /// untouched; the dealer never moves because of an edit.
    pub fn replace_round(&mut self, number: u32, record: RoundRecord) -> Result<(), ScoreError> {
        if record.round != number {
            return Err(ScoreError::Sequence {
                expected: number,
                got: record.round,
            });
        }
        let idx = number
            .checked_sub(1)
            .map(|idx| idx as usize)
            .filter(|idx| *idx < self.rounds.len())
            .ok_or(ScoreError::RoundNotFound(number))?;
        self.rounds[idx] = record;
        self.revision += 1;
        Ok(())
    }

    /// Plain sum of the seat's stored round totals.
    pub fn raw_total(&self, seat: Seat) -> i32 {
        self.rounds.iter().map(|r| r.seats[seat].total).sum()
    }

    /// Competitive total for the seat. In team mode each partner absorbs half
    /// of the pair's combined team penalty per round, regardless of which
    /// partner it was logged against; the odd 101 remainder of an odd pair
    /// sum lands on the lower-indexed seat. The redistribution shifts
    /// attribution only, never the pair's combined total.
    pub fn player_total(&self, seat: Seat) -> i32 {
        let raw = self.raw_total(seat);
        if self.mode == GameMode::Individual {
            return raw;
        }
        let mate = teammate(seat);
        let shift: i32 = self
            .rounds
            .iter()
            .map(|r| {
                let own = r.seats[seat].team_penalty;
                let pair = own + r.seats[mate].team_penalty;
                pair_share(pair, seat < mate) - own
            })
            .sum();
        raw + shift
    }

    /// Combined total of both partners. Team mode only; callers in individual
    /// mode should rank by [`GameLedger::player_total`] instead.
    pub fn team_total(&self, team: Team) -> i32 {
        team.seats()
            .into_iter()
            .map(|seat| self.player_total(seat))
            .sum()
    }
}

/// One partner's share of a pair quantity split half-and-half, with the odd
/// remainder assigned to the lower-indexed seat.
pub(crate) fn pair_share(pair: i32, is_lower_seat: bool) -> i32 {
    let half = pair / 2;
    if is_lower_seat { half + pair % 2 } else { half }
}
