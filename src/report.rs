//! Boundary contracts for the external collaborators.
//!
//! The scoring engine only ever talks to these traits. Calls are
//! best-effort: the session logs failures and keeps playing, and the locally
//! displayed outcome never depends on a report landing.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::player::GameMode;
use crate::stats::GameStatistics;

/// Opaque identifier issued by the recordkeeping collaborator.
pub type GameId = String;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("collaborator rejected the request: {0}")]
    Rejected(String),
    #[error("collaborator unavailable: {0}")]
    Unavailable(String),
}

/// Summary posted exactly once per game when it finishes.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct GameReport {
    /// Winning team or player name; absent on a tie.
    pub winner_name: Option<String>,
    /// Wire label for the outcome kind (`team1`, `team2`, `individual`,
    /// `tie`).
    pub winner_kind: String,
    pub total_rounds: u32,
    pub statistics: GameStatistics,
}

/// Remote service that archives finished games.
pub trait Recordkeeper {
    fn create_game(
        &mut self,
        mode: GameMode,
        team_names: Option<&[String; 2]>,
    ) -> Result<GameId, ReportError>;

    /// Finishing an id that was already finished must be a no-op success, so
    /// the session can safely retry after a restart.
    fn finish_game(&mut self, id: &GameId, report: &GameReport) -> Result<(), ReportError>;
}

/// What the recordkeeping collaborator knows about one game.
#[derive(Clone, Debug)]
pub struct RecordedGame {
    pub mode: GameMode,
    pub team_names: Option<[String; 2]>,
    pub report: Option<GameReport>,
}

/// In-process recordkeeper used by tests and the offline CLI default.
#[derive(Debug, Default)]
pub struct MemoryRecordkeeper {
    next_id: u64,
    games: HashMap<GameId, RecordedGame>,
}

impl MemoryRecordkeeper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn game(&self, id: &str) -> Option<&RecordedGame> {
        self.games.get(id)
    }

    pub fn created_count(&self) -> usize {
        self.games.len()
    }
}

impl Recordkeeper for MemoryRecordkeeper {
    fn create_game(
        &mut self,
        mode: GameMode,
        team_names: Option<&[String; 2]>,
    ) -> Result<GameId, ReportError> {
        self.next_id += 1;
        let id = format!("game-{}", self.next_id);
        self.games.insert(
            id.clone(),
            RecordedGame {
                mode,
                team_names: team_names.cloned(),
                report: None,
            },
        );
        Ok(id)
    }

    fn finish_game(&mut self, id: &GameId, report: &GameReport) -> Result<(), ReportError> {
        let game = self
            .games
            .get_mut(id)
            .ok_or_else(|| ReportError::Rejected(format!("unknown game id {id}")))?;
        if game.report.is_none() {
            game.report = Some(report.clone());
        }
        Ok(())
    }
}

/// Recordkeeper that is never reachable. Exercises the non-fatal error path.
#[derive(Debug, Default)]
pub struct OfflineRecordkeeper;

impl Recordkeeper for OfflineRecordkeeper {
    fn create_game(
        &mut self,
        _mode: GameMode,
        _team_names: Option<&[String; 2]>,
    ) -> Result<GameId, ReportError> {
        Err(ReportError::Unavailable("recordkeeping is offline".into()))
    }

    fn finish_game(&mut self, _id: &GameId, _report: &GameReport) -> Result<(), ReportError> {
        Err(ReportError::Unavailable("recordkeeping is offline".into()))
    }
}

/// Branding metadata for the venue hosting the table. Display only; scoring
/// never reads it.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct VenueBranding {
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub logo_url: Option<String>,
    pub primary_color: String,
    pub secondary_color: String,
    #[serde(default)]
    pub welcome_message: Option<String>,
    pub is_active: bool,
}

/// Lookup service for venue branding.
pub trait VenueDirectory {
    fn lookup(&self, slug: &str) -> Result<Option<VenueBranding>, ReportError>;
}

/// Directory backed by a fixed list, e.g. one loaded from a JSON file.
#[derive(Debug, Default)]
pub struct MemoryVenueDirectory {
    venues: Vec<VenueBranding>,
}

impl MemoryVenueDirectory {
    pub fn new(venues: Vec<VenueBranding>) -> Self {
        Self { venues }
    }
}

impl VenueDirectory for MemoryVenueDirectory {
    fn lookup(&self, slug: &str) -> Result<Option<VenueBranding>, ReportError> {
        Ok(self
            .venues
            .iter()
            .find(|venue| venue.slug == slug && venue.is_active)
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inactive_venues_are_invisible() {
        let directory = MemoryVenueDirectory::new(vec![
            VenueBranding {
                name: "Çay Evi".to_string(),
                slug: "cay-evi".to_string(),
                logo_url: None,
                primary_color: "#1d4ed8".to_string(),
                secondary_color: "#7c3aed".to_string(),
                welcome_message: Some("Hoş geldiniz".to_string()),
                is_active: false,
            },
            VenueBranding {
                name: "Kıraathane".to_string(),
                slug: "kiraathane".to_string(),
                logo_url: None,
                primary_color: "#111827".to_string(),
                secondary_color: "#f59e0b".to_string(),
                welcome_message: None,
                is_active: true,
            },
        ]);
        assert!(directory.lookup("cay-evi").unwrap().is_none());
        assert_eq!(
            directory.lookup("kiraathane").unwrap().unwrap().name,
            "Kıraathane"
        );
        assert!(directory.lookup("missing").unwrap().is_none());
    }
}
