use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

use okey101::{
    EntryUpdate, GameLedger, GameMode, GameOutcome, Player, RoundEntry, SEAT_COUNT, ScoreError,
    Team, Verdict,
};

fn entry_with(
    round: u32,
    mode: GameMode,
    build: impl FnOnce(&mut RoundEntry),
) -> RoundEntry {
    let mut entry = RoundEntry::new(round, mode);
    build(&mut entry);
    entry
}

fn ledger(mode: GameMode) -> GameLedger {
    let players = ["Ali", "Veli", "Ayşe", "Fatma"].map(|n| Player::new(n).unwrap());
    let team_names = match mode {
        GameMode::Team => Some(["Doğu".to_string(), "Batı".to_string()]),
        GameMode::Individual => None,
    };
    GameLedger::new(mode, players, team_names).unwrap()
}

fn submit(ledger: &mut GameLedger, build: impl FnOnce(&mut RoundEntry)) {
    let entry = entry_with(ledger.next_round(), ledger.mode(), build);
    ledger.append_round(entry.into_record().unwrap()).unwrap();
}

#[test]
fn total_formula_holds_without_hand_finish() -> Result<(), ScoreError> {
    let mut rng = StdRng::seed_from_u64(0x101);
    for _ in 0..200 {
        let mode = if rng.gen_bool(0.5) {
            GameMode::Team
        } else {
            GameMode::Individual
        };
        let finisher = rng.gen_bool(0.6).then(|| rng.gen_range(0..SEAT_COUNT));
        let entry = entry_with(1, mode, |e| {
            for seat in 0..SEAT_COUNT {
                e.apply(EntryUpdate::SetPoints(seat, rng.gen_range(-200..=200)))
                    .unwrap();
                for _ in 0..rng.gen_range(0..3) {
                    e.apply(EntryUpdate::AddPenalty(seat)).unwrap();
                }
                if mode == GameMode::Team && rng.gen_bool(0.3) {
                    e.apply(EntryUpdate::AddTeamPenalty(seat)).unwrap();
                }
            }
            if let Some(seat) = finisher {
                e.apply(EntryUpdate::ToggleFinished(seat)).unwrap();
            }
        });
        let record = entry.into_record()?;
        for (seat, score) in record.seats.iter().enumerate() {
            let mut expected = score.points + score.penalty + score.team_penalty;
            if score.finished {
                expected -= 101;
            }
            assert_eq!(score.total, expected, "seat {seat} in mode {mode}");
        }
        if let Some(seat) = finisher {
            assert!(record.seats[seat].finished);
        }
    }
    Ok(())
}

#[test]
fn hand_finish_overrides_everything_in_team_mode() -> Result<(), ScoreError> {
    // Seats 0 and 2 are partners; seat 1 goes out from the hand.
    let entry = entry_with(1, GameMode::Team, |e| {
        for seat in 0..SEAT_COUNT {
            e.apply(EntryUpdate::SetPoints(seat, 77)).unwrap();
        }
        e.apply(EntryUpdate::AddPenalty(0)).unwrap();
        e.apply(EntryUpdate::ToggleHandFinished(1)).unwrap();
    });
    let record = entry.into_record()?;
    assert_eq!(record.seats[1].total, -202);
    assert_eq!(record.seats[1].points, -202);
    assert_eq!(record.seats[3].total, 0);
    assert_eq!(record.seats[3].points, 0);
    for opponent in [0, 2] {
        assert_eq!(record.seats[opponent].points, 202);
        assert_eq!(record.seats[opponent].penalty, 202);
        assert_eq!(record.seats[opponent].total, 404);
    }
    let team_a: i32 = [0, 2].iter().map(|&s| record.seats[s].total).sum();
    let team_b: i32 = [1, 3].iter().map(|&s| record.seats[s].total).sum();
    assert_eq!(team_a, 808);
    assert_eq!(team_b, -202);
    Ok(())
}

#[test]
fn hand_finish_charges_all_three_opponents_individually() -> Result<(), ScoreError> {
    let mut rng = StdRng::seed_from_u64(0xE1);
    for finisher in 0..SEAT_COUNT {
        let entry = entry_with(1, GameMode::Individual, |e| {
            for seat in 0..SEAT_COUNT {
                e.apply(EntryUpdate::SetPoints(seat, rng.gen_range(-300..=300)))
                    .unwrap();
            }
            e.apply(EntryUpdate::ToggleHandFinished(finisher)).unwrap();
        });
        let record = entry.into_record()?;
        for seat in 0..SEAT_COUNT {
            if seat == finisher {
                assert_eq!(record.seats[seat].total, -202);
            } else {
                assert_eq!(record.seats[seat].total, 404);
            }
        }
    }
    Ok(())
}

#[test]
fn normal_finish_zeroes_the_partner_but_not_opponents() -> Result<(), ScoreError> {
    let entry = entry_with(1, GameMode::Team, |e| {
        e.apply(EntryUpdate::SetPoints(2, 44)).unwrap();
        e.apply(EntryUpdate::SetPoints(1, 30)).unwrap();
        e.apply(EntryUpdate::SetPoints(3, -5)).unwrap();
        e.apply(EntryUpdate::ToggleFinished(0)).unwrap();
    });
    let record = entry.into_record()?;
    assert_eq!(record.seats[0].total, -101);
    assert_eq!(record.seats[2].total, 0, "partner points are zeroed");
    assert_eq!(record.seats[1].total, 30);
    assert_eq!(record.seats[3].total, -5);
    Ok(())
}

#[test]
fn four_round_individual_scenario_ranks_the_finisher_first() {
    let mut game = ledger(GameMode::Individual);
    submit(&mut game, |e| {
        for (seat, points) in [10, 20, 30, 40].into_iter().enumerate() {
            e.apply(EntryUpdate::SetPoints(seat, points)).unwrap();
        }
    });
    submit(&mut game, |_| {});
    submit(&mut game, |e| {
        for seat in 1..SEAT_COUNT {
            e.apply(EntryUpdate::SetPoints(seat, 50)).unwrap();
        }
        e.apply(EntryUpdate::ToggleFinished(0)).unwrap();
    });
    submit(&mut game, |_| {});

    assert_eq!(game.player_total(0), -91);
    let outcome = GameOutcome::resolve(&game);
    assert_eq!(outcome.verdict, Verdict::IndividualVictory { seat: 0 });
    assert_eq!(outcome.rankings[0].seat, 0);
    assert_eq!(outcome.rankings[0].rank, 1);
    assert_eq!(outcome.rankings[0].total, -91);
    assert_eq!(outcome.winner_name.as_deref(), Some("Ali"));
}

#[test]
fn equal_totals_rank_in_seat_order_with_distinct_ranks() {
    let mut game = ledger(GameMode::Individual);
    submit(&mut game, |e| {
        e.apply(EntryUpdate::SetPoints(0, 25)).unwrap();
        e.apply(EntryUpdate::SetPoints(1, 10)).unwrap();
        e.apply(EntryUpdate::SetPoints(2, 25)).unwrap();
        e.apply(EntryUpdate::SetPoints(3, 10)).unwrap();
    });
    let outcome = GameOutcome::resolve(&game);
    let order: Vec<_> = outcome.rankings.iter().map(|r| (r.rank, r.seat)).collect();
    assert_eq!(order, vec![(1, 1), (2, 3), (3, 0), (4, 2)]);
}

#[test]
fn symmetric_team_game_is_a_tie() {
    let mut game = ledger(GameMode::Team);
    submit(&mut game, |e| {
        for seat in 0..SEAT_COUNT {
            e.apply(EntryUpdate::SetPoints(seat, 10)).unwrap();
        }
    });
    submit(&mut game, |e| {
        e.apply(EntryUpdate::SetPoints(0, 35)).unwrap();
        e.apply(EntryUpdate::SetPoints(1, 15)).unwrap();
        e.apply(EntryUpdate::SetPoints(2, -15)).unwrap();
        e.apply(EntryUpdate::SetPoints(3, 5)).unwrap();
    });
    assert_eq!(game.team_total(Team::A), game.team_total(Team::B));
    let outcome = GameOutcome::resolve(&game);
    assert_eq!(outcome.verdict, Verdict::Tie);
    assert_eq!(outcome.winner_name, None);
}

#[test]
fn flag_exclusivity_survives_a_toggle_storm() {
    let mut rng = StdRng::seed_from_u64(0x70661e);
    for trial in 0..50 {
        let mode = if trial % 2 == 0 {
            GameMode::Team
        } else {
            GameMode::Individual
        };
        let mut entry = RoundEntry::new(1, mode);
        for _ in 0..200 {
            let seat = rng.gen_range(0..SEAT_COUNT);
            let update = match rng.gen_range(0..6) {
                0 => EntryUpdate::ToggleOkey1(seat),
                1 => EntryUpdate::ToggleOkey2(seat),
                2 => EntryUpdate::ToggleFinished(seat),
                3 => EntryUpdate::ToggleHandFinished(seat),
                4 => EntryUpdate::SetPoints(seat, rng.gen_range(-999..=999)),
                _ => EntryUpdate::AddPenalty(seat),
            };
            // Rejected toggles must leave the flags untouched.
            let _ = entry.apply(update);

            let seats = entry.seats();
            assert!(seats.iter().filter(|s| s.okey1).count() <= 1);
            assert!(seats.iter().filter(|s| s.okey2).count() <= 1);
            assert!(seats.iter().filter(|s| s.finished).count() <= 1);
            assert!(seats.iter().filter(|s| s.hand_finished).count() <= 1);
            assert!(
                !(seats.iter().any(|s| s.finished) && seats.iter().any(|s| s.hand_finished)),
                "finish kinds may never coexist"
            );
        }
        // Whatever the storm left behind still settles cleanly.
        entry.into_record().unwrap();
    }
}

#[test]
fn editing_a_flag_reruns_the_redistribution() -> Result<(), ScoreError> {
    let mut game = ledger(GameMode::Team);
    submit(&mut game, |e| {
        for seat in 0..SEAT_COUNT {
            e.apply(EntryUpdate::SetPoints(seat, 60)).unwrap();
        }
    });

    // Re-open round 1 and hand-finish seat 2; all four totals are replaced.
    let stored = game.round(1).unwrap();
    let mut edit = RoundEntry::from_record(stored, GameMode::Team);
    edit.apply(EntryUpdate::ToggleHandFinished(2)).unwrap();
    game.replace_round(1, edit.into_record()?)?;

    let record = game.round(1).unwrap();
    assert_eq!(record.seats[2].total, -202);
    assert_eq!(record.seats[0].total, 0);
    assert_eq!(record.seats[1].total, 404);
    assert_eq!(record.seats[3].total, 404);
    Ok(())
}
