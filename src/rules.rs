//! Settlement rules for one round.
//!
//! A seat's base total is `points + penalty + team_penalty`. A normal finish
//! is worth a flat -101 to the finisher. A finish straight from the hand is a
//! bigger, table-wide event: the finisher books -202 and every opposing seat
//! is charged 202 points plus a 202 penalty (total 404), replacing whatever
//! was entered for the round. The event is deliberately not zero-sum.

use crate::entry::SeatEntry;
use crate::error::ValidationError;
use crate::ledger::{RoundRecord, SeatScore};
use crate::player::{
    FINISH_BONUS, GameMode, HAND_FINISH_BONUS, HAND_FINISH_CHARGE, MAX_POINTS, MIN_POINTS,
    PENALTY_STEP, SEAT_COUNT, teammate,
};

/// Computes every seat's total for a round and returns the storable record.
///
/// Settlement is pure and deterministic; re-running it on an edited round
/// re-applies the full redistribution, including re-zeroing a teammate's
/// points when a finish flag changed.
pub fn settle(
    round: u32,
    entries: [SeatEntry; SEAT_COUNT],
    mode: GameMode,
) -> Result<RoundRecord, ValidationError> {
    validate(&entries, mode)?;

    let mut seats: [SeatScore; SEAT_COUNT] = std::array::from_fn(|seat| {
        let entry = &entries[seat];
        SeatScore {
            points: entry.points,
            penalty: entry.penalty,
            team_penalty: entry.team_penalty,
            okey1: entry.okey1,
            okey2: entry.okey2,
            finished: entry.finished,
            hand_finished: entry.hand_finished,
            total: 0,
        }
    });

    if let Some(finisher) = entries.iter().position(|e| e.hand_finished) {
        settle_hand_finish(&mut seats, finisher, mode);
    } else {
        if mode == GameMode::Team {
            if let Some(finisher) = entries.iter().position(|e| e.finished) {
                seats[teammate(finisher)].points = 0;
            }
        }
        for seat in &mut seats {
            seat.total = seat.points + seat.penalty + seat.team_penalty;
            if seat.finished {
                seat.total -= FINISH_BONUS;
            }
        }
    }

    Ok(RoundRecord { round, seats })
}

/// Overrides all four seats when one of them went out from the hand. Prior
/// point and penalty entries for the round are replaced, not adjusted.
fn settle_hand_finish(seats: &mut [SeatScore; SEAT_COUNT], finisher: usize, mode: GameMode) {
    for seat in 0..SEAT_COUNT {
        let score = &mut seats[seat];
        if seat == finisher {
            score.points = -HAND_FINISH_BONUS;
            score.total = -HAND_FINISH_BONUS;
        } else if mode == GameMode::Team && seat == teammate(finisher) {
            score.points = 0;
            score.total = 0;
        } else {
            score.points = HAND_FINISH_CHARGE;
            score.penalty = HAND_FINISH_CHARGE;
            score.total = HAND_FINISH_CHARGE * 2;
        }
    }
}

fn validate(entries: &[SeatEntry; SEAT_COUNT], mode: GameMode) -> Result<(), ValidationError> {
    for entry in entries {
        if !(MIN_POINTS..=MAX_POINTS).contains(&entry.points) {
            return Err(ValidationError::PointsRange(entry.points));
        }
        if entry.penalty < 0 || entry.penalty % PENALTY_STEP != 0 {
            return Err(ValidationError::PenaltyGranularity);
        }
        if entry.team_penalty < 0 || entry.team_penalty % PENALTY_STEP != 0 {
            return Err(ValidationError::PenaltyGranularity);
        }
        if mode == GameMode::Individual && entry.team_penalty != 0 {
            return Err(ValidationError::TeamPenaltyMode);
        }
    }

    if entries.iter().filter(|e| e.okey1).count() > 1 {
        return Err(ValidationError::DuplicateFlag("okey 1"));
    }
    if entries.iter().filter(|e| e.okey2).count() > 1 {
        return Err(ValidationError::DuplicateFlag("okey 2"));
    }
    if entries.iter().filter(|e| e.finished).count() > 1 {
        return Err(ValidationError::DuplicateFlag("the finish"));
    }
    if entries.iter().filter(|e| e.hand_finished).count() > 1 {
        return Err(ValidationError::DuplicateFlag("the hand finish"));
    }
    if entries.iter().any(|e| e.finished) && entries.iter().any(|e| e.hand_finished) {
        return Err(ValidationError::ConflictingFinish);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries() -> [SeatEntry; SEAT_COUNT] {
        [SeatEntry::default(); SEAT_COUNT]
    }

    #[test]
    fn base_total_sums_points_and_penalties() {
        let mut raw = entries();
        raw[0].points = 35;
        raw[0].penalty = 101;
        raw[1].points = -12;
        let record = settle(1, raw, GameMode::Individual).unwrap();
        assert_eq!(record.seats[0].total, 136);
        assert_eq!(record.seats[1].total, -12);
        assert_eq!(record.seats[2].total, 0);
    }

    #[test]
    fn normal_finish_is_worth_minus_101() {
        let mut raw = entries();
        raw[2].points = -30;
        raw[2].finished = true;
        let record = settle(1, raw, GameMode::Individual).unwrap();
        assert_eq!(record.seats[2].total, -131);
    }

    #[test]
    fn settle_rezeroes_teammate_on_edit() {
        // Direct record edits can carry stale teammate points; settlement is
        // the single authority for the redistribution.
        let mut raw = entries();
        raw[0].finished = true;
        raw[2].points = 88;
        let record = settle(3, raw, GameMode::Team).unwrap();
        assert_eq!(record.seats[2].points, 0);
        assert_eq!(record.seats[2].total, 0);
    }

    #[test]
    fn duplicate_flags_are_rejected() {
        let mut raw = entries();
        raw[0].okey1 = true;
        raw[1].okey1 = true;
        assert!(matches!(
            settle(1, raw, GameMode::Individual),
            Err(ValidationError::DuplicateFlag("okey 1"))
        ));

        let mut raw = entries();
        raw[0].finished = true;
        raw[1].hand_finished = true;
        assert!(matches!(
            settle(1, raw, GameMode::Individual),
            Err(ValidationError::ConflictingFinish)
        ));
    }

    #[test]
    fn ragged_penalties_are_rejected() {
        let mut raw = entries();
        raw[3].penalty = 100;
        assert!(matches!(
            settle(1, raw, GameMode::Individual),
            Err(ValidationError::PenaltyGranularity)
        ));
        let mut raw = entries();
        raw[3].team_penalty = 101;
        assert!(matches!(
            settle(1, raw, GameMode::Individual),
            Err(ValidationError::TeamPenaltyMode)
        ));
    }
}
