//! Scorekeeping engine for the four-player 101 Okey tile game.
//!
//! The crate turns raw per-round inputs (points, penalties, okey holdings
//! and finish events) into a consistent, editable ledger of round totals,
//! running totals and a final outcome, for both partnership and individual
//! play. Persistence, recordkeeping and venue branding are external
//! collaborators reached only through the traits in [`store`] and
//! [`report`].

pub mod dealer;
pub mod entry;
pub mod error;
pub mod ledger;
pub mod player;
pub mod render;
pub mod report;
pub mod resolution;
pub mod rules;
pub mod session;
pub mod snapshot;
pub mod stats;
pub mod store;
pub mod transport;

pub use crate::dealer::DealerRotation;
pub use crate::entry::{EntryUpdate, RoundEntry, SeatEntry};
pub use crate::error::{ScoreError, ValidationError};
pub use crate::ledger::{GameLedger, RoundRecord, SeatScore};
pub use crate::player::{GameMode, Player, SEAT_COUNT, Seat, Team, team_of, teammate};
pub use crate::report::{
    GameId, GameReport, MemoryRecordkeeper, MemoryVenueDirectory, OfflineRecordkeeper,
    Recordkeeper, ReportError, VenueBranding, VenueDirectory,
};
pub use crate::resolution::{GameOutcome, Ranking, TeamScore, Verdict};
pub use crate::session::{GameSession, SessionConfig, SessionPhase};
pub use crate::snapshot::SessionSnapshot;
pub use crate::stats::{GameStatistics, PlayerStatistics, PlayerSummary};
pub use crate::store::{FileStore, MemoryStore, SnapshotStore, StoreError};
pub use crate::transport::RoundSubmission;
