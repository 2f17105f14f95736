use std::env;
use std::error::Error;
use std::fs;
use std::io::{self, Write};
use std::process;

use tracing_subscriber::EnvFilter;

use okey101::{
    EntryUpdate, FileStore, GameMode, GameSession, MemoryRecordkeeper, MemoryVenueDirectory,
    RoundEntry, Seat, SessionConfig, VenueBranding, VenueDirectory,
    render::{describe_outcome, render_entry, render_history, render_standings},
};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let mut save_path: Option<String> = None;
    let mut export_path: Option<String> = None;
    let mut venue_slug: Option<String> = None;
    let mut venues_file: Option<String> = None;
    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--save" => save_path = Some(required_value(&mut args, "--save")?),
            "--export" => export_path = Some(required_value(&mut args, "--export")?),
            "--venue" => venue_slug = Some(required_value(&mut args, "--venue")?),
            "--venues-file" => venues_file = Some(required_value(&mut args, "--venues-file")?),
            "--help" => {
                print_usage();
                return Ok(());
            }
            other => return Err(format!("unrecognized argument: {other}").into()),
        }
    }

    if let Some(slug) = &venue_slug {
        show_venue_banner(slug, venues_file.as_deref());
    }

    let mut session = match save_path
        .as_ref()
        .and_then(|path| GameSession::restore(FileStore::new(path)))
    {
        Some(session) => {
            println!(
                "Resumed a cached game with {} round(s) played.",
                session.ledger().round_count()
            );
            session
        }
        None => configure_session(save_path.as_deref())?,
    };

    println!("Type 'help' for the list of commands.");
    loop {
        let line = prompt("> ")?;
        let mut words = line.split_whitespace();
        match words.next() {
            None => continue,
            Some("help") => print_commands(),
            Some("round") => {
                let entry = session.begin_round()?;
                if let Some(entry) = fill_entry(&session, entry)? {
                    match session.submit_round(entry) {
                        Ok(()) => println!("{}", render_standings(session.ledger(), session.dealer())),
                        Err(err) => println!("Round rejected: {err}"),
                    }
                }
            }
            Some("edit") => {
                let Some(number) = words.next().and_then(|w| w.parse::<u32>().ok()) else {
                    println!("Usage: edit <round-number>");
                    continue;
                };
                match session.edit_round(number) {
                    Ok(entry) => {
                        if let Some(entry) = fill_entry(&session, entry)? {
                            match session.amend_round(entry) {
                                Ok(()) => println!(
                                    "{}",
                                    render_standings(session.ledger(), session.dealer())
                                ),
                                Err(err) => println!("Edit rejected: {err}"),
                            }
                        }
                    }
                    Err(err) => println!("{err}"),
                }
            }
            Some("standings") => {
                println!("{}", render_standings(session.ledger(), session.dealer()));
            }
            Some("history") => println!("{}", render_history(session.ledger())),
            Some("finish") => {
                let outcome = session.finish().clone();
                println!("{}", describe_outcome(&outcome));
                if let Some(path) = &export_path {
                    match serde_json::to_string_pretty(&outcome) {
                        Ok(json) => {
                            fs::write(path, json)?;
                            println!("Outcome exported to {path}.");
                        }
                        Err(err) => println!("Export failed: {err}"),
                    }
                }
                let answer = prompt("Start a new game? [y/N] ")?;
                if answer.trim().eq_ignore_ascii_case("y") {
                    session.abandon();
                    session = configure_session(save_path.as_deref())?;
                } else {
                    return Ok(());
                }
            }
            Some("quit") => return Ok(()),
            Some(other) => println!("Unknown command: '{other}'. Type 'help'."),
        }
    }
}

fn configure_session(save_path: Option<&str>) -> Result<GameSession, Box<dyn Error>> {
    let mode = loop {
        let answer = prompt("Game mode (team/individual): ")?;
        match GameMode::parse(answer.trim()) {
            Some(mode) => break mode,
            None => println!("Please answer 'team' or 'individual'."),
        }
    };

    let mut names: [String; 4] = std::array::from_fn(|_| String::new());
    for (seat, name) in names.iter_mut().enumerate() {
        *name = prompt(&format!("Name for seat {seat}: "))?.trim().to_string();
    }

    let mut config = SessionConfig::new(mode, names);
    if mode == GameMode::Team {
        let team1 = prompt("Name for team 1 (seats 0 and 2): ")?;
        let team2 = prompt("Name for team 2 (seats 1 and 3): ")?;
        config = config.with_team_names(team1.trim(), team2.trim());
    }
    let dealer = loop {
        let answer = prompt("Initial dealer seat [0]: ")?;
        let trimmed = answer.trim();
        if trimmed.is_empty() {
            break 0;
        }
        match trimmed.parse::<Seat>() {
            Ok(seat) if seat < 4 => break seat,
            _ => println!("Please enter a seat between 0 and 3."),
        }
    };
    config = config
        .with_initial_dealer(dealer)
        .with_recordkeeper(MemoryRecordkeeper::new());
    if let Some(path) = save_path {
        config = config.with_store(FileStore::new(path));
    }
    let session = config.start()?;
    if let Some(id) = session.external_id() {
        println!("Game registered as {id}.");
    }
    Ok(session)
}

/// Drives one round's field entry. Returns `None` when the user cancels.
fn fill_entry(
    session: &GameSession,
    mut entry: RoundEntry,
) -> Result<Option<RoundEntry>, Box<dyn Error>> {
    println!("{}", render_entry(session.ledger(), &entry));
    println!("Fields: p <seat> <points> | c+/c- <seat> | t+/t- <seat> | o1/o2 <seat> | f <seat> | hf <seat>");
    println!("Type 'ok' to save the round, 'cancel' to discard it.");
    loop {
        let line = prompt("round> ")?;
        let mut words = line.split_whitespace();
        let Some(command) = words.next() else { continue };
        if command == "ok" {
            return Ok(Some(entry));
        }
        if command == "cancel" {
            println!("Round discarded.");
            return Ok(None);
        }
        let update = match (command, words.next()) {
            ("p", Some(seat)) => {
                let Some(points) = words.next().and_then(|w| w.parse().ok()) else {
                    println!("Usage: p <seat> <points>");
                    continue;
                };
                parse_seat(seat).map(|seat| EntryUpdate::SetPoints(seat, points))
            }
            ("c+", Some(seat)) => parse_seat(seat).map(EntryUpdate::AddPenalty),
            ("c-", Some(seat)) => parse_seat(seat).map(EntryUpdate::RemovePenalty),
            ("t+", Some(seat)) => parse_seat(seat).map(EntryUpdate::AddTeamPenalty),
            ("t-", Some(seat)) => parse_seat(seat).map(EntryUpdate::RemoveTeamPenalty),
            ("o1", Some(seat)) => parse_seat(seat).map(EntryUpdate::ToggleOkey1),
            ("o2", Some(seat)) => parse_seat(seat).map(EntryUpdate::ToggleOkey2),
            ("f", Some(seat)) => parse_seat(seat).map(EntryUpdate::ToggleFinished),
            ("hf", Some(seat)) => parse_seat(seat).map(EntryUpdate::ToggleHandFinished),
            _ => {
                println!("Unknown field command: '{line}'.");
                continue;
            }
        };
        match update {
            Some(update) => match entry.apply(update) {
                Ok(()) => println!("{}", render_entry(session.ledger(), &entry)),
                Err(err) => println!("Rejected: {err}"),
            },
            None => println!("Seat must be between 0 and 3."),
        }
    }
}

fn show_venue_banner(slug: &str, venues_file: Option<&str>) {
    let Some(path) = venues_file else {
        println!("No venue directory configured; ignoring --venue {slug}.");
        return;
    };
    let venues: Vec<VenueBranding> = match fs::read_to_string(path)
        .map_err(|err| err.to_string())
        .and_then(|text| serde_json::from_str(&text).map_err(|err| err.to_string()))
    {
        Ok(venues) => venues,
        Err(err) => {
            println!("Could not read the venue directory ({err}); continuing without branding.");
            return;
        }
    };
    let directory = MemoryVenueDirectory::new(venues);
    match directory.lookup(slug) {
        Ok(Some(venue)) => {
            println!("=== {} ===", venue.name);
            if let Some(message) = &venue.welcome_message {
                println!("{message}");
            }
        }
        Ok(None) => println!("Venue '{slug}' not found; continuing without branding."),
        Err(err) => println!("Venue lookup failed ({err}); continuing without branding."),
    }
}

fn parse_seat(word: &str) -> Option<Seat> {
    word.parse::<Seat>().ok().filter(|seat| *seat < 4)
}

fn prompt(text: &str) -> Result<String, Box<dyn Error>> {
    print!("{text}");
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input)
}

fn required_value(
    args: &mut impl Iterator<Item = String>,
    flag: &str,
) -> Result<String, Box<dyn Error>> {
    args.next().ok_or_else(|| format!("{flag} requires a value").into())
}

fn print_usage() {
    println!("Usage: scorekeeper [OPTIONS]");
    println!("  --save <path>          Cache the session to a file and resume it on restart");
    println!("  --export <path>        Write the final outcome as JSON when the game finishes");
    println!("  --venue <slug>         Show the venue welcome banner at startup");
    println!("  --venues-file <path>   JSON file holding the venue directory");
    println!("  --help                 Show this help message");
}

fn print_commands() {
    println!("Commands:");
    println!("  round        Enter the next round's scores");
    println!("  edit <n>     Re-open a stored round and amend it");
    println!("  standings    Show running totals");
    println!("  history      Show every stored round");
    println!("  finish       Resolve the outcome and seal the game");
    println!("  quit         Exit without finishing");
}
