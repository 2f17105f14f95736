use std::error::Error;
use std::process;

use clap::{Parser, ValueEnum};
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing_subscriber::EnvFilter;

use okey101::{
    EntryUpdate, GameMode, GameOutcome, SEAT_COUNT, ScoreError, SessionConfig, Team, Verdict,
};

/// Default base seed for deterministic runs.
const DEFAULT_SEED: u64 = 0x0101_D1CE_5EED_0101;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ModeArg {
    Team,
    Individual,
}

impl From<ModeArg> for GameMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Team => GameMode::Team,
            ModeArg::Individual => GameMode::Individual,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "simulate",
    about = "Play random games through the scoring engine and summarize the outcomes."
)]
struct Args {
    /// Number of games to simulate
    #[arg(short = 'g', long = "games", default_value_t = 100)]
    games: usize,

    /// Base RNG seed (per-game seeds are derived deterministically)
    #[arg(short = 's', long = "seed", default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// Rounds per game
    #[arg(short = 'r', long = "rounds", default_value_t = 9)]
    rounds: u32,

    /// Competition mode
    #[arg(long = "mode", value_enum, default_value_t = ModeArg::Team)]
    mode: ModeArg,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();
    if let Err(err) = run(args) {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    if args.games == 0 {
        return Err("--games must be at least 1".into());
    }
    let mode = GameMode::from(args.mode);

    let mut team_wins = [0usize; 2];
    let mut seat_wins = [0usize; SEAT_COUNT];
    let mut ties = 0usize;
    let mut total_sums = [0i64; SEAT_COUNT];

    for game in 0..args.games {
        let game_seed = args.seed ^ ((game as u64 + 1).wrapping_mul(0x9E37_79B9));
        let mut rng = StdRng::seed_from_u64(game_seed);
        let outcome = play_game(mode, args.rounds, &mut rng)?;
        match outcome.verdict {
            Verdict::TeamVictory { team: Team::A } => team_wins[0] += 1,
            Verdict::TeamVictory { team: Team::B } => team_wins[1] += 1,
            Verdict::IndividualVictory { seat } => seat_wins[seat] += 1,
            Verdict::Tie => ties += 1,
        }
        for (seat, summary) in outcome.statistics.players.iter().enumerate() {
            total_sums[seat] += i64::from(summary.total);
        }
    }

    println!(
        "Simulated {} {}-mode game(s) of {} round(s) each (seed {:#x}).",
        args.games, mode, args.rounds, args.seed
    );
    match mode {
        GameMode::Team => {
            println!(
                "  team 1 wins: {:>5} ({:.1}%)",
                team_wins[0],
                percent(team_wins[0], args.games)
            );
            println!(
                "  team 2 wins: {:>5} ({:.1}%)",
                team_wins[1],
                percent(team_wins[1], args.games)
            );
            println!("  ties:        {:>5} ({:.1}%)", ties, percent(ties, args.games));
        }
        GameMode::Individual => {
            for (seat, wins) in seat_wins.iter().enumerate() {
                println!(
                    "  seat {seat} wins: {:>5} ({:.1}%)",
                    wins,
                    percent(*wins, args.games)
                );
            }
        }
    }
    println!("Average final totals per seat:");
    for (seat, sum) in total_sums.iter().enumerate() {
        println!("  seat {seat}: {:+.1}", *sum as f64 / args.games as f64);
    }
    Ok(())
}

/// Plays one full game with random but rule-shaped inputs: every round gets
/// points for all seats, occasional penalties and okey holdings, and most
/// rounds end with somebody finishing.
fn play_game(mode: GameMode, rounds: u32, rng: &mut StdRng) -> Result<GameOutcome, ScoreError> {
    let mut config = SessionConfig::new(mode, ["North", "East", "South", "West"])
        .with_initial_dealer(rng.gen_range(0..SEAT_COUNT));
    if mode == GameMode::Team {
        config = config.with_team_names("Window", "Door");
    }
    let mut session = config.start()?;

    for _ in 0..rounds {
        let mut entry = session.begin_round()?;
        for seat in 0..SEAT_COUNT {
            entry.apply(EntryUpdate::SetPoints(seat, rng.gen_range(-60..=150)))?;
        }
        if rng.gen_bool(0.2) {
            entry.apply(EntryUpdate::AddPenalty(rng.gen_range(0..SEAT_COUNT)))?;
        }
        if mode == GameMode::Team && rng.gen_bool(0.1) {
            entry.apply(EntryUpdate::AddTeamPenalty(rng.gen_range(0..SEAT_COUNT)))?;
        }
        if rng.gen_bool(0.7) {
            entry.apply(EntryUpdate::ToggleOkey1(rng.gen_range(0..SEAT_COUNT)))?;
        }
        if rng.gen_bool(0.4) {
            entry.apply(EntryUpdate::ToggleOkey2(rng.gen_range(0..SEAT_COUNT)))?;
        }
        // Finishes come last so the teammate lock sees the entered points.
        if rng.gen_bool(0.08) {
            entry.apply(EntryUpdate::ToggleHandFinished(rng.gen_range(0..SEAT_COUNT)))?;
        } else if rng.gen_bool(0.85) {
            entry.apply(EntryUpdate::ToggleFinished(rng.gen_range(0..SEAT_COUNT)))?;
        }
        session.submit_round(entry)?;
    }

    Ok(session.finish().clone())
}

fn percent(count: usize, total: usize) -> f64 {
    count as f64 / total as f64 * 100.0
}
