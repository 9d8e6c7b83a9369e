// Standalone replay tool for verifying snake duel match logs
//
// Usage:
//   cargo run --bin replay -- <log_file> [options]
//
// Options:
//   --all                  Replay all ticks
//   --ticks <t1,t2>        Replay specific ticks (comma-separated)
//   --validate <t:m,...>   Check snake 1's moves on given ticks
//   --verbose              Show detailed output for each tick
//   --config <path>        Path to Duel.toml (default: Duel.toml)

use std::env;
use std::process;

use snake_duel::config::Config;
use snake_duel::replay::ReplayEngine;
use snake_duel::types::{Direction, SnakeId};

enum Mode {
    All,
    Ticks(String),
    Validate(String),
}

fn print_usage() {
    eprintln!("Snake Duel Replay Tool");
    eprintln!();
    eprintln!("USAGE:");
    eprintln!("  replay <log_file> [OPTIONS]");
    eprintln!();
    eprintln!("OPTIONS:");
    eprintln!("  --all                   Replay all ticks in the log");
    eprintln!("  --ticks <T1,T2,...>     Replay specific ticks (comma-separated)");
    eprintln!("  --validate <T:M,...>    Validate snake 1 moves (format: tick:move,...)");
    eprintln!("  --verbose               Show detailed output for each tick");
    eprintln!("  --config <path>         Path to Duel.toml (default: Duel.toml)");
    eprintln!("  --help                  Show this help message");
    eprintln!();
    eprintln!("EXAMPLES:");
    eprintln!("  replay duel_match.jsonl --all");
    eprintln!("  replay duel_match.jsonl --ticks 5,10,15");
    eprintln!("  replay duel_match.jsonl --validate 5:up|left,10:right");
}

fn parse_ticks(s: &str) -> Result<Vec<u32>, String> {
    s.split(',')
        .map(|t| {
            t.trim()
                .parse::<u32>()
                .map_err(|e| format!("Invalid tick number '{}': {}", t, e))
        })
        .collect()
}

fn parse_expected_moves(s: &str) -> Result<Vec<(u32, Vec<Direction>)>, String> {
    s.split(',')
        .map(|pair| {
            let (tick, moves) = pair
                .trim()
                .split_once(':')
                .ok_or_else(|| format!("Invalid format '{}'. Expected 'tick:move'", pair))?;

            let tick = tick
                .parse::<u32>()
                .map_err(|e| format!("Invalid tick number '{}': {}", tick, e))?;

            // Multiple acceptable moves separated by '|'
            let moves = moves
                .split('|')
                .map(|m| Direction::parse(m).ok_or_else(|| format!("Invalid direction: {}", m)))
                .collect::<Result<Vec<_>, String>>()?;

            Ok((tick, moves))
        })
        .collect()
}

fn fail(message: String) -> ! {
    eprintln!("{}", message);
    process::exit(1);
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let wants_help = args.iter().any(|a| a == "--help");

    if args.len() < 2 || wants_help {
        print_usage();
        process::exit(if wants_help { 0 } else { 1 });
    }

    let log_file = &args[1];
    let mut config_path = "Duel.toml".to_string();
    let mut verbose = false;
    let mut mode = None;

    let mut rest = args[2..].iter();
    while let Some(arg) = rest.next() {
        match arg.as_str() {
            "--all" => mode = Some(Mode::All),
            "--ticks" => match rest.next() {
                Some(value) => mode = Some(Mode::Ticks(value.clone())),
                None => fail("Error: --ticks requires an argument".to_string()),
            },
            "--validate" => match rest.next() {
                Some(value) => mode = Some(Mode::Validate(value.clone())),
                None => fail("Error: --validate requires an argument".to_string()),
            },
            "--config" => match rest.next() {
                Some(value) => config_path = value.clone(),
                None => fail("Error: --config requires an argument".to_string()),
            },
            "--verbose" => verbose = true,
            other => {
                print_usage();
                fail(format!("Error: Unknown option '{}'", other));
            }
        }
    }

    let Some(mode) = mode else {
        print_usage();
        fail("Error: Must specify --all, --ticks, or --validate".to_string());
    };

    let config = Config::from_file(&config_path).unwrap_or_else(|e| {
        eprintln!("Warning: Could not load config from '{}': {}", config_path, e);
        eprintln!("Using default configuration");
        Config::default_hardcoded()
    });

    println!("Loaded configuration from: {}", config_path);
    println!("Replay log file: {}", log_file);
    println!();

    let engine = ReplayEngine::new(config, verbose);

    let entries = engine
        .load_log_file(log_file)
        .unwrap_or_else(|e| fail(format!("Error loading log file: {}", e)));

    println!("Loaded {} log entries\n", entries.len());

    match mode {
        Mode::All => {
            let results = engine
                .replay_all(&entries)
                .unwrap_or_else(|e| fail(format!("Error during replay: {}", e)));
            engine.print_report(&results);
            if results.iter().any(|r| !r.matches) {
                process::exit(2);
            }
        }
        Mode::Ticks(arg) => {
            let ticks =
                parse_ticks(&arg).unwrap_or_else(|e| fail(format!("Error parsing ticks: {}", e)));
            println!("Replaying {} specific tick(s)...\n", ticks.len());
            let results = engine
                .replay_ticks(&entries, &ticks)
                .unwrap_or_else(|e| fail(format!("Error during replay: {}", e)));
            engine.print_report(&results);
        }
        Mode::Validate(arg) => {
            let expected = parse_expected_moves(&arg)
                .unwrap_or_else(|e| fail(format!("Error parsing expected moves: {}", e)));
            println!("Validating {} expected move(s)...\n", expected.len());
            match engine.validate_expected_moves(&entries, SnakeId::One, &expected) {
                Ok(()) => println!("✓ All expected moves validated successfully!"),
                Err(e) => fail(format!("✗ Validation failed: {}", e)),
            }
        }
    }
}
