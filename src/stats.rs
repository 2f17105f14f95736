//! Aggregate statistics derived from a finished (or in-progress) ledger.
//!
//! The bundle mirrors what the recordkeeping collaborator accepts on finish.

use serde::{Deserialize, Serialize};

use crate::ledger::{GameLedger, pair_share};
use crate::player::{GameMode, PENALTY_STEP, SEAT_COUNT, Seat, Team, teammate};

/// Per-seat event counts summed across all rounds.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct PlayerStatistics {
    /// Okey holdings; a seat holding both flags in one round counts 2.
    pub okeys: u32,
    /// Normal finishes (finished without a hand finish).
    pub finishes: u32,
    pub hand_finishes: u32,
    /// Individual penalties in units of 101.
    pub penalty_units: u32,
    /// Team penalties in units of 101, attributed half-and-half across the
    /// partnership like the totals.
    pub team_penalty_units: u32,
}

/// One row of the statistics bundle.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct PlayerSummary {
    pub name: String,
    pub total: i32,
    pub stats: PlayerStatistics,
}

/// Game-wide statistics reported to the recordkeeping collaborator.
///
/// `lowest_round_score` starts at 0 and moves only on a strictly lower
/// per-seat round total, so a game of purely positive rounds reports 0;
/// `highest_round_score` mirrors that with strictly greater. Downstream
/// consumers rely on this exact sentinel behavior.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct GameStatistics {
    pub players: Vec<PlayerSummary>,
    pub total_okeys: u32,
    pub total_penalties: u32,
    pub total_finished_hands: u32,
    pub highest_round_score: i32,
    pub lowest_round_score: i32,
    pub team1_total_score: i32,
    pub team2_total_score: i32,
}

/// Event counts for one seat across all stored rounds.
pub fn player_statistics(ledger: &GameLedger, seat: Seat) -> PlayerStatistics {
    let mut stats = PlayerStatistics::default();
    let mate = teammate(seat);
    for record in ledger.rounds() {
        let score = &record.seats[seat];
        stats.okeys += score.okey1 as u32 + score.okey2 as u32;
        if score.finished && !score.hand_finished {
            stats.finishes += 1;
        }
        if score.hand_finished {
            stats.hand_finishes += 1;
        }
        stats.penalty_units += (score.penalty / PENALTY_STEP) as u32;
        if ledger.mode() == GameMode::Team {
            let pair_units =
                (score.team_penalty + record.seats[mate].team_penalty) / PENALTY_STEP;
            stats.team_penalty_units += pair_share(pair_units, seat < mate) as u32;
        } else {
            stats.team_penalty_units += (score.team_penalty / PENALTY_STEP) as u32;
        }
    }
    stats
}

/// Builds the full bundle for the recordkeeping report.
pub fn game_statistics(ledger: &GameLedger) -> GameStatistics {
    let mut players = Vec::with_capacity(SEAT_COUNT);
    let mut total_okeys = 0;
    let mut total_penalties = 0;
    let mut total_finished_hands = 0;
    for seat in 0..SEAT_COUNT {
        let stats = player_statistics(ledger, seat);
        total_okeys += stats.okeys;
        total_penalties += stats.penalty_units + stats.team_penalty_units;
        total_finished_hands += stats.finishes + stats.hand_finishes;
        players.push(PlayerSummary {
            name: ledger.player_name(seat).to_string(),
            total: ledger.player_total(seat),
            stats,
        });
    }

    let mut highest_round_score = 0;
    let mut lowest_round_score = 0;
    for record in ledger.rounds() {
        for score in &record.seats {
            if score.total > highest_round_score {
                highest_round_score = score.total;
            }
            if score.total < lowest_round_score {
                lowest_round_score = score.total;
            }
        }
    }

    let (team1_total_score, team2_total_score) = match ledger.mode() {
        GameMode::Team => (ledger.team_total(Team::A), ledger.team_total(Team::B)),
        GameMode::Individual => (0, 0),
    };

    GameStatistics {
        players,
        total_okeys,
        total_penalties,
        total_finished_hands,
        highest_round_score,
        lowest_round_score,
        team1_total_score,
        team2_total_score,
    }
}
