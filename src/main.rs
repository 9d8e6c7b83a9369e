// Headless snake duel runner
//
// Usage:
//   snake-duel [--config <path>] [--matches <n>] [--seed <n>] [--paced]
//
// Plays one logged showcase match (paced at the configured tick period with
// --paced), then a tournament between the configured controllers.

use log::info;
use std::env;
use std::process;
use std::time::Duration;

use snake_duel::bot;
use snake_duel::config::Config;
use snake_duel::debug_logger::MatchLogger;
use snake_duel::game::{Match, Tournament};

struct Options {
    config_path: Option<String>,
    matches: Option<u32>,
    seed: Option<u64>,
    paced: bool,
}

fn parse_args(args: &[String]) -> Result<Options, String> {
    let mut options = Options {
        config_path: None,
        matches: None,
        seed: None,
        paced: false,
    };

    let mut rest = args.iter();
    while let Some(arg) = rest.next() {
        let mut value = |name: &str| {
            rest.next()
                .cloned()
                .ok_or_else(|| format!("{} requires an argument", name))
        };
        match arg.as_str() {
            "--config" => options.config_path = Some(value("--config")?),
            "--matches" => {
                let v = value("--matches")?;
                options.matches =
                    Some(v.parse().map_err(|e| format!("Invalid match count '{}': {}", v, e))?);
            }
            "--seed" => {
                let v = value("--seed")?;
                options.seed = Some(v.parse().map_err(|e| format!("Invalid seed '{}': {}", v, e))?);
            }
            "--paced" => options.paced = true,
            other => return Err(format!("Unknown option '{}'", other)),
        }
    }

    Ok(options)
}

#[tokio::main]
async fn main() {
    // We default to 'info' level logging. But if the `RUST_LOG` environment variable is set,
    // we keep that value instead.
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }

    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    let options = parse_args(&args).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        eprintln!("Usage: snake-duel [--config <path>] [--matches <n>] [--seed <n>] [--paced]");
        process::exit(1);
    });

    let config = match &options.config_path {
        Some(path) => Config::from_file(path).unwrap_or_else(|e| {
            eprintln!("Error: {}", e);
            process::exit(1);
        }),
        None => Config::load_or_default(),
    };

    let seed = options.seed.unwrap_or(config.tournament.seed);
    let matches = options.matches.unwrap_or(config.tournament.matches);

    info!(
        "Starting snake duel on {}x{}: {:?} vs {:?}",
        config.board.width, config.board.height, config.players.player1, config.players.player2
    );

    let logger = MatchLogger::new(config.debug.enabled, &config.debug.log_file_path);
    let mut showcase = Match::new(
        &config,
        bot::from_kind(config.players.player1, &config),
        bot::from_kind(config.players.player2, &config),
        seed,
    )
    .with_logger(logger);

    let result = if options.paced {
        showcase
            .run_paced(Duration::from_millis(config.timing.tick_period_ms))
            .await
    } else {
        showcase.run()
    };
    info!("Showcase match: {} wins ({:?})", result.winner, result.reason);

    if matches > 0 {
        let board = Tournament::new(config).run(matches, seed);
        println!("{}", board);
    }
}
