use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ledger::RoundRecord;
use crate::player::{GameMode, SEAT_COUNT, Seat};

/// Complete serializable state of an in-progress session.
///
/// This is everything needed to put a table back where it was after a
/// process restart: the setup, every settled round, the dealer seat and the
/// external recordkeeping id (when one was issued).
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub mode: GameMode,
    pub players: [String; SEAT_COUNT],
    pub team_names: Option<[String; 2]>,
    pub rounds: Vec<RoundRecord>,
    pub dealer: Seat,
    pub external_id: Option<String>,
    pub saved_at: DateTime<Utc>,
}

impl SessionSnapshot {
    pub fn encode(&self) -> Result<Vec<u8>, bincode::error::EncodeError> {
        bincode::serde::encode_to_vec(self, bincode::config::standard())
    }

    /// Undecodable bytes yield `None`; a corrupted snapshot is treated the
    /// same as no snapshot at all.
    pub fn decode(bytes: &[u8]) -> Option<Self> {
        bincode::serde::decode_from_slice(bytes, bincode::config::standard())
            .ok()
            .map(|(snapshot, _)| snapshot)
    }

    pub fn is_stale(&self, now: DateTime<Utc>, retention: chrono::Duration) -> bool {
        now.signed_duration_since(self.saved_at) > retention
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> SessionSnapshot {
        SessionSnapshot {
            mode: GameMode::Individual,
            players: ["A", "B", "C", "D"].map(String::from),
            team_names: None,
            rounds: Vec::new(),
            dealer: 1,
            external_id: Some("game-7".to_string()),
            saved_at: Utc::now(),
        }
    }

    #[test]
    fn encode_decode_round_trip() {
        let original = snapshot();
        let bytes = original.encode().unwrap();
        let restored = SessionSnapshot::decode(&bytes).unwrap();
        assert_eq!(restored, original);
    }

    #[test]
    fn garbage_bytes_decode_as_none() {
        assert!(SessionSnapshot::decode(b"not a snapshot").is_none());
        assert!(SessionSnapshot::decode(&[]).is_none());
    }

    #[test]
    fn staleness_window() {
        let mut snap = snapshot();
        let retention = chrono::Duration::days(7);
        assert!(!snap.is_stale(Utc::now(), retention));
        snap.saved_at = Utc::now() - chrono::Duration::days(8);
        assert!(snap.is_stale(Utc::now(), retention));
    }
}
