use chrono::Utc;
use tracing::{debug, info, warn};

use crate::dealer::DealerRotation;
use crate::entry::RoundEntry;
use crate::error::ScoreError;
use crate::ledger::GameLedger;
use crate::player::{GameMode, Player, SEAT_COUNT, Seat};
use crate::report::{GameId, GameReport, Recordkeeper};
use crate::resolution::GameOutcome;
use crate::snapshot::SessionSnapshot;
use crate::store::SnapshotStore;
use crate::transport::RoundSubmission;

/// Lifecycle position of a session. Configuration happens before a session
/// exists, inside [`SessionConfig`].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum SessionPhase {
    InProgress,
    Finished,
}

/// Collects everything needed to start a game: mode, names, seats, the
/// initial dealer and the external collaborators.
pub struct SessionConfig {
    mode: GameMode,
    player_names: [String; SEAT_COUNT],
    team_names: Option<[String; 2]>,
    initial_dealer: Seat,
    recordkeeper: Option<Box<dyn Recordkeeper>>,
    store: Option<Box<dyn SnapshotStore>>,
}

impl SessionConfig {
    pub fn new(mode: GameMode, player_names: [impl Into<String>; SEAT_COUNT]) -> Self {
        Self {
            mode,
            player_names: player_names.map(Into::into),
            team_names: None,
            initial_dealer: 0,
            recordkeeper: None,
            store: None,
        }
    }

    pub fn with_team_names(
        mut self,
        team1: impl Into<String>,
        team2: impl Into<String>,
    ) -> Self {
        self.team_names = Some([team1.into(), team2.into()]);
        self
    }

    pub fn with_initial_dealer(mut self, seat: Seat) -> Self {
        self.initial_dealer = seat;
        self
    }

    pub fn with_recordkeeper(mut self, recordkeeper: impl Recordkeeper + 'static) -> Self {
        self.recordkeeper = Some(Box::new(recordkeeper));
        self
    }

    pub fn with_store(mut self, store: impl SnapshotStore + 'static) -> Self {
        self.store = Some(Box::new(store));
        self
    }

    /// Validates the configuration and opens the game.
    ///
    /// Registering the game with the recordkeeping collaborator is
    /// best-effort: a failure is logged and play continues without an
    /// external id.
    pub fn start(self) -> Result<GameSession, ScoreError> {
        let players = [
            Player::new(&self.player_names[0])?,
            Player::new(&self.player_names[1])?,
            Player::new(&self.player_names[2])?,
            Player::new(&self.player_names[3])?,
        ];
        let dealer = DealerRotation::new(self.initial_dealer)?;
        let ledger = GameLedger::new(self.mode, players, self.team_names)?;

        let mut recordkeeper = self.recordkeeper;
        let external_id = match recordkeeper.as_mut() {
            Some(rk) => match rk.create_game(ledger.mode(), ledger.team_names()) {
                Ok(id) => Some(id),
                Err(err) => {
                    warn!(error = %err, "recordkeeping registration failed; playing unrecorded");
                    None
                }
            },
            None => None,
        };

        info!(mode = %ledger.mode(), dealer = dealer.current(), "game started");
        let mut session = GameSession {
            ledger,
            dealer,
            phase: SessionPhase::InProgress,
            outcome: None,
            external_id,
            recordkeeper,
            store: self.store,
        };
        session.persist();
        Ok(session)
    }
}

/// Orchestrates one game from start through rounds to the final outcome.
///
/// All scoring runs synchronously on the caller's thread; only the
/// collaborator calls at the edges are best-effort.
pub struct GameSession {
    ledger: GameLedger,
    dealer: DealerRotation,
    phase: SessionPhase,
    outcome: Option<GameOutcome>,
    external_id: Option<GameId>,
    recordkeeper: Option<Box<dyn Recordkeeper>>,
    store: Option<Box<dyn SnapshotStore>>,
}

impl GameSession {
    /// Resumes the session cached in `store`, if a fresh one exists.
    ///
    /// Anything that fails to decode or validate is treated as no cached
    /// session at all.
    pub fn restore(store: impl SnapshotStore + 'static) -> Option<GameSession> {
        let store: Box<dyn SnapshotStore> = Box::new(store);
        let snapshot = store.load()?;
        Self::from_snapshot(snapshot, store)
    }

    fn from_snapshot(
        snapshot: SessionSnapshot,
        store: Box<dyn SnapshotStore>,
    ) -> Option<GameSession> {
        let mut players = Vec::with_capacity(SEAT_COUNT);
        for name in &snapshot.players {
            match Player::new(name) {
                Ok(player) => players.push(player),
                Err(err) => {
                    warn!(error = %err, "cached session has an invalid player; starting fresh");
                    return None;
                }
            }
        }
        let players: [Player; SEAT_COUNT] = players.try_into().ok()?;
        let dealer = match DealerRotation::new(snapshot.dealer) {
            Ok(dealer) => dealer,
            Err(err) => {
                warn!(error = %err, "cached session has an invalid dealer; starting fresh");
                return None;
            }
        };
        let ledger = match GameLedger::from_rounds(
            snapshot.mode,
            players,
            snapshot.team_names,
            snapshot.rounds,
        ) {
            Ok(ledger) => ledger,
            Err(err) => {
                warn!(error = %err, "cached session failed validation; starting fresh");
                return None;
            }
        };
        info!(rounds = ledger.round_count(), "resumed cached session");
        Some(GameSession {
            ledger,
            dealer,
            phase: SessionPhase::InProgress,
            outcome: None,
            external_id: snapshot.external_id,
            recordkeeper: None,
            store: Some(store),
        })
    }

    /// Attaches a recordkeeper after a restore, so the finish report can
    /// still reach the collaborator.
    pub fn attach_recordkeeper(&mut self, recordkeeper: impl Recordkeeper + 'static) {
        self.recordkeeper = Some(Box::new(recordkeeper));
    }

    pub fn ledger(&self) -> &GameLedger {
        &self.ledger
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn dealer(&self) -> Seat {
        self.dealer.current()
    }

    pub fn external_id(&self) -> Option<&str> {
        self.external_id.as_deref()
    }

    pub fn outcome(&self) -> Option<&GameOutcome> {
        self.outcome.as_ref()
    }

    /// Current standings without side effects.
    pub fn player_totals(&self) -> [i32; SEAT_COUNT] {
        std::array::from_fn(|seat| self.ledger.player_total(seat))
    }

    /// Fresh input buffer for the next round.
    pub fn begin_round(&self) -> Result<RoundEntry, ScoreError> {
        self.check_in_progress()?;
        Ok(RoundEntry::new(self.ledger.next_round(), self.ledger.mode()))
    }

    /// Input buffer pre-filled from a stored round, for editing.
    pub fn edit_round(&self, round: u32) -> Result<RoundEntry, ScoreError> {
        self.check_in_progress()?;
        let record = self
            .ledger
            .round(round)
            .ok_or(ScoreError::RoundNotFound(round))?;
        Ok(RoundEntry::from_record(record, self.ledger.mode()))
    }

    /// Settles and appends the round, advances the dealer and refreshes the
    /// cached snapshot.
    pub fn submit_round(&mut self, entry: RoundEntry) -> Result<(), ScoreError> {
        self.check_in_progress()?;
        let record = entry.into_record()?;
        let round = record.round;
        self.ledger.append_round(record)?;
        let dealer = self.dealer.advance();
        debug!(round, dealer, "round recorded");
        self.persist();
        Ok(())
    }

    /// Settles and replaces an already stored round. The dealer does not
    /// move on edits.
    pub fn amend_round(&mut self, entry: RoundEntry) -> Result<(), ScoreError> {
        self.check_in_progress()?;
        let record = entry.into_record()?;
        let round = record.round;
        self.ledger.replace_round(round, record)?;
        debug!(round, "round amended");
        self.persist();
        Ok(())
    }

    /// Flat named-value payload for a stored round, as handed between the
    /// round-entry step and the session view.
    pub fn round_submission(&self, round: u32) -> Result<RoundSubmission, ScoreError> {
        let record = self
            .ledger
            .round(round)
            .ok_or(ScoreError::RoundNotFound(round))?;
        Ok(RoundSubmission {
            mode: self.ledger.mode(),
            players: std::array::from_fn(|seat| self.ledger.player_name(seat).to_string()),
            team_names: self.ledger.team_names().cloned(),
            round,
            dealer: self.dealer.current(),
            totals: std::array::from_fn(|seat| record.seats[seat].total),
        })
    }

    /// Resolves the outcome, reports it best-effort and seals the session.
    ///
    /// Calling `finish` again returns the already computed outcome; the
    /// collaborator treats a duplicate finish as a no-op anyway.
    pub fn finish(&mut self) -> &GameOutcome {
        if self.outcome.is_none() {
            let outcome = GameOutcome::resolve(&self.ledger);
            self.report_finish(&outcome);
            if let Some(store) = self.store.as_mut() {
                store.clear();
            }
            self.phase = SessionPhase::Finished;
            info!(winner = ?outcome.winner_name, kind = outcome.verdict.kind(), "game finished");
            self.outcome = Some(outcome);
        }
        self.outcome
            .get_or_insert_with(|| GameOutcome::resolve(&self.ledger))
    }

    /// Discards all local state, clearing the cached snapshot. The caller
    /// builds a fresh [`SessionConfig`] for the next game.
    pub fn abandon(mut self) {
        if let Some(store) = self.store.as_mut() {
            store.clear();
        }
        info!("local game state discarded");
    }

    fn check_in_progress(&self) -> Result<(), ScoreError> {
        match self.phase {
            SessionPhase::InProgress => Ok(()),
            SessionPhase::Finished => Err(ScoreError::Phase("finished")),
        }
    }

    fn report_finish(&mut self, outcome: &GameOutcome) {
        let Some(recordkeeper) = self.recordkeeper.as_mut() else {
            return;
        };
        let Some(id) = self.external_id.as_ref() else {
            debug!("no external game id; skipping the finish report");
            return;
        };
        let report = GameReport {
            winner_name: outcome.winner_name.clone(),
            winner_kind: outcome.verdict.kind().to_string(),
            total_rounds: self.ledger.round_count(),
            statistics: outcome.statistics.clone(),
        };
        if let Err(err) = recordkeeper.finish_game(id, &report) {
            warn!(error = %err, "failed to report the finished game");
        }
    }

    fn persist(&mut self) {
        let Some(store) = self.store.as_mut() else {
            return;
        };
        let snapshot = SessionSnapshot {
            mode: self.ledger.mode(),
            players: std::array::from_fn(|seat| self.ledger.player_name(seat).to_string()),
            team_names: self.ledger.team_names().cloned(),
            rounds: self.ledger.rounds().to_vec(),
            dealer: self.dealer.current(),
            external_id: self.external_id.clone(),
            saved_at: Utc::now(),
        };
        if let Err(err) = store.save(&snapshot) {
            warn!(error = %err, "failed to cache the session snapshot");
        }
    }
}
