use serde::{Deserialize, Serialize};

use crate::ledger::GameLedger;
use crate::player::{GameMode, SEAT_COUNT, Seat, Team};
use crate::stats::{GameStatistics, game_statistics};

/// How the game ended. Lower totals win throughout.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum Verdict {
    TeamVictory { team: Team },
    Tie,
    IndividualVictory { seat: Seat },
}

impl Verdict {
    /// Wire label used by the recordkeeping collaborator.
    pub fn kind(&self) -> &'static str {
        match self {
            Verdict::TeamVictory { team: Team::A } => "team1",
            Verdict::TeamVictory { team: Team::B } => "team2",
            Verdict::Tie => "tie",
            Verdict::IndividualVictory { .. } => "individual",
        }
    }
}

/// Final total for one partnership.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct TeamScore {
    pub name: String,
    pub total: i32,
}

/// One row of the individual-mode ranking. Ranks are 1-based and distinct;
/// equal totals keep their original seat order.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Ranking {
    pub rank: u32,
    pub seat: Seat,
    pub name: String,
    pub total: i32,
}

/// Terminal result of a game, computed once from a completed ledger.
///
/// The outcome remembers the ledger revision it was derived from; if the
/// ledger is edited afterwards the outcome goes stale and must be resolved
/// again before it can be trusted.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct GameOutcome {
    pub verdict: Verdict,
    /// Winning team or player name; absent on a tie.
    pub winner_name: Option<String>,
    /// Both partnerships' final totals, team mode only.
    pub team_scores: Option<[TeamScore; 2]>,
    /// Full ascending ranking, individual mode only.
    pub rankings: Vec<Ranking>,
    pub statistics: GameStatistics,
    revision: u64,
}

impl GameOutcome {
    pub fn resolve(ledger: &GameLedger) -> Self {
        let statistics = game_statistics(ledger);
        match ledger.mode() {
            GameMode::Team => Self::resolve_teams(ledger, statistics),
            GameMode::Individual => Self::resolve_individuals(ledger, statistics),
        }
    }

    /// False once the ledger changed after this outcome was computed.
    pub fn is_current(&self, ledger: &GameLedger) -> bool {
        self.revision == ledger.revision()
    }

    fn resolve_teams(ledger: &GameLedger, statistics: GameStatistics) -> Self {
        let totals = [ledger.team_total(Team::A), ledger.team_total(Team::B)];
        let names = [
            ledger.team_name(Team::A).unwrap_or("Team 1").to_string(),
            ledger.team_name(Team::B).unwrap_or("Team 2").to_string(),
        ];
        let (verdict, winner_name) = if totals[0] < totals[1] {
            (Verdict::TeamVictory { team: Team::A }, Some(names[0].clone()))
        } else if totals[1] < totals[0] {
            (Verdict::TeamVictory { team: Team::B }, Some(names[1].clone()))
        } else {
            (Verdict::Tie, None)
        };
        let [name_a, name_b] = names;
        Self {
            verdict,
            winner_name,
            team_scores: Some([
                TeamScore {
                    name: name_a,
                    total: totals[0],
                },
                TeamScore {
                    name: name_b,
                    total: totals[1],
                },
            ]),
            rankings: Vec::new(),
            statistics,
            revision: ledger.revision(),
        }
    }

    fn resolve_individuals(ledger: &GameLedger, statistics: GameStatistics) -> Self {
        let mut order: Vec<Seat> = (0..SEAT_COUNT).collect();
        // Stable sort keeps seat order among equal totals.
        order.sort_by_key(|&seat| ledger.player_total(seat));
        let rankings: Vec<Ranking> = order
            .into_iter()
            .enumerate()
            .map(|(idx, seat)| Ranking {
                rank: idx as u32 + 1,
                seat,
                name: ledger.player_name(seat).to_string(),
                total: ledger.player_total(seat),
            })
            .collect();
        let winner = &rankings[0];
        Self {
            verdict: Verdict::IndividualVictory { seat: winner.seat },
            winner_name: Some(winner.name.clone()),
            team_scores: None,
            rankings,
            statistics,
            revision: ledger.revision(),
        }
    }
}
