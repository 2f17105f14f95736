use std::fmt::Write;

use crate::entry::RoundEntry;
use crate::ledger::GameLedger;
use crate::player::{GameMode, SEAT_COUNT, Seat, Team, team_of};
use crate::resolution::{GameOutcome, Verdict};

/// Renders the running totals, one line per seat, with the dealer marked.
pub fn render_standings(ledger: &GameLedger, dealer: Seat) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Standings after round {}:", ledger.round_count());
    for seat in 0..SEAT_COUNT {
        let team = match ledger.mode() {
            GameMode::Team => ledger
                .team_name(team_of(seat))
                .map(|name| format!(" [{name}]"))
                .unwrap_or_default(),
            GameMode::Individual => String::new(),
        };
        let _ = writeln!(
            out,
            "  {}{}{}: {}",
            ledger.player_name(seat),
            team,
            if seat == dealer { " (deals next)" } else { "" },
            ledger.player_total(seat)
        );
    }
    if ledger.mode() == GameMode::Team {
        let _ = writeln!(
            out,
            "  {}: {}  |  {}: {}",
            ledger.team_name(Team::A).unwrap_or("Team 1"),
            ledger.team_total(Team::A),
            ledger.team_name(Team::B).unwrap_or("Team 2"),
            ledger.team_total(Team::B)
        );
    }
    out
}

/// Renders the per-round totals table, one row per stored round.
pub fn render_history(ledger: &GameLedger) -> String {
    let mut out = String::new();
    if ledger.rounds().is_empty() {
        let _ = writeln!(out, "No rounds played yet.");
        return out;
    }
    let mut header = String::from("Round");
    for seat in 0..SEAT_COUNT {
        let _ = write!(header, "  {:>8}", truncate(ledger.player_name(seat), 8));
    }
    let _ = writeln!(out, "{header}");
    for record in ledger.rounds() {
        let _ = write!(out, "{:>5}", record.round);
        for score in &record.seats {
            let mut cell = score.total.to_string();
            if score.hand_finished {
                cell.push('H');
            } else if score.finished {
                cell.push('F');
            }
            if score.okey1 || score.okey2 {
                cell.push('*');
            }
            let _ = write!(out, "  {cell:>8}");
        }
        let _ = writeln!(out);
    }
    out
}

/// Renders the in-progress input buffer for one round.
pub fn render_entry(ledger: &GameLedger, entry: &RoundEntry) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Round {} entry:", entry.round());
    let preview = entry.clone().into_record().ok();
    for seat in 0..SEAT_COUNT {
        let values = &entry.seats()[seat];
        let mut flags = String::new();
        if values.okey1 {
            flags.push_str(" okey1");
        }
        if values.okey2 {
            flags.push_str(" okey2");
        }
        if values.finished {
            flags.push_str(" finished");
        }
        if values.hand_finished {
            flags.push_str(" hand-finish");
        }
        if entry.points_locked(seat) {
            flags.push_str(" (points locked)");
        }
        let total = preview
            .as_ref()
            .map(|record| record.seats[seat].total.to_string())
            .unwrap_or_else(|| "-".to_string());
        let _ = writeln!(
            out,
            "  [{}] {}: points {} | penalty {} | team penalty {} | total {}{}",
            seat,
            ledger.player_name(seat),
            values.points,
            values.penalty,
            values.team_penalty,
            total,
            flags
        );
    }
    out
}

/// One-paragraph description of a final outcome.
pub fn describe_outcome(outcome: &GameOutcome) -> String {
    let mut out = String::new();
    match &outcome.verdict {
        Verdict::Tie => {
            let _ = writeln!(out, "The game ends in a tie.");
        }
        Verdict::TeamVictory { .. } | Verdict::IndividualVictory { .. } => {
            if let Some(winner) = &outcome.winner_name {
                let _ = writeln!(out, "Winner: {winner} (lowest total wins).");
            }
        }
    }
    if let Some([team1, team2]) = &outcome.team_scores {
        let _ = writeln!(
            out,
            "  {}: {}  |  {}: {}",
            team1.name, team1.total, team2.name, team2.total
        );
    }
    for ranking in &outcome.rankings {
        let _ = writeln!(
            out,
            "  {}. {} with {}",
            ranking.rank, ranking.name, ranking.total
        );
    }
    out
}

fn truncate(name: &str, max: usize) -> String {
    name.chars().take(max).collect()
}
