use thiserror::Error;

use crate::player::Seat;

/// Errors that can occur when manipulating a game's scoring state.
#[derive(Debug, Error)]
pub enum ScoreError {
    #[error("expected round {expected}, received round {got}")]
    Sequence { expected: u32, got: u32 },
    #[error("round {0} does not exist")]
    RoundNotFound(u32),
    #[error("operation not allowed while the session is {0}")]
    Phase(&'static str),
    #[error("invalid input: {0}")]
    Validation(#[from] ValidationError),
}

/// Details of invalid round inputs or configuration values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("seat index {0} is out of range")]
    SeatIndex(Seat),
    #[error("points {0} are outside the allowed range")]
    PointsRange(i32),
    #[error("player name must be between 1 and 20 characters, got {0}")]
    NameLength(usize),
    #[error("player name contains unsupported characters")]
    NameCharset,
    #[error("penalties must be non-negative multiples of 101")]
    PenaltyGranularity,
    #[error("team penalties are only available in team mode")]
    TeamPenaltyMode,
    #[error("team names are required in team mode")]
    TeamNamesRequired,
    #[error("points are locked while the teammate holds the finish")]
    PointsLocked(Seat),
    #[error("normal finish is unavailable while a hand finish is active")]
    HandFinishActive,
    #[error("{0} may be held by at most one seat")]
    DuplicateFlag(&'static str),
    #[error("finished and hand-finished are mutually exclusive")]
    ConflictingFinish,
    #[error("missing field {0}")]
    MissingField(String),
    #[error("malformed value {value:?} for field {field}")]
    MalformedField { field: String, value: String },
}
