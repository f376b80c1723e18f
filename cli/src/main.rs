use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use kingfind_core::{Clock, Game, Session, TurnOutcome, VariantConfig};

use command::Command;

mod command;
mod render;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Variant {
    /// Burn, reuse, 5-card bonus and bonus lines, King card in the deck
    Canonical,
    /// Two skulls on the board, the 5 card finds the King
    Skulls,
}

#[derive(Parser, Debug)]
#[command(version, about = "Find the King on a 5x5 board of hidden cards", long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,

    /// Built-in rule set
    #[arg(long, value_enum, default_value_t = Variant::Canonical)]
    variant: Variant,

    /// TOML file with a full variant configuration, takes precedence over --variant
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print every turn outcome as a JSON line
    #[arg(long)]
    json: bool,
}

/// Wall time since the session started.
struct WallClock {
    origin: web_time::Instant,
}

impl WallClock {
    fn new() -> Self {
        Self {
            origin: web_time::Instant::now(),
        }
    }
}

impl Clock for WallClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

fn init_logging(verbose: &clap_verbosity_flag::Verbosity) {
    use tracing_subscriber::filter::LevelFilter;

    let level = match verbose.log_level_filter() {
        log::LevelFilter::Off => LevelFilter::OFF,
        log::LevelFilter::Error => LevelFilter::ERROR,
        log::LevelFilter::Warn => LevelFilter::WARN,
        log::LevelFilter::Info => LevelFilter::INFO,
        log::LevelFilter::Debug => LevelFilter::DEBUG,
        log::LevelFilter::Trace => LevelFilter::TRACE,
    };

    // also forwards `log` records from the core
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn load_config(args: &Args) -> Result<VariantConfig> {
    if let Some(path) = &args.config {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("could not read {}", path.display()))?;
        let config: VariantConfig =
            toml::from_str(&text).with_context(|| format!("could not parse {}", path.display()))?;
        log::info!("Loaded variant from {}", path.display());
        return Ok(config);
    }

    Ok(match args.variant {
        Variant::Canonical => VariantConfig::canonical(),
        Variant::Skulls => VariantConfig::skulls(),
    })
}

fn random_seed() -> u64 {
    web_time::SystemTime::now()
        .duration_since(web_time::UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as u64)
        .unwrap_or_default()
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.verbose);

    let config = load_config(&args)?;
    let seed = args.seed.unwrap_or_else(random_seed);
    log::debug!("seed: {seed}");

    let game = Game::new(config, seed).context("invalid variant configuration")?;
    let mut session = Session::new(game, WallClock::new());

    run(&mut session, args.json)
}

fn run(session: &mut Session<WallClock>, json: bool) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    println!("{}", render::board(session.game()));
    println!("{}", render::status(&session.game().status()));
    println!("Type `help` for commands.");

    for line in stdin.lock().lines() {
        let line = line.context("could not read stdin")?;
        if line.trim().is_empty() {
            continue;
        }

        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(err) => {
                println!("{err:#}");
                continue;
            }
        };

        for coords in session.poll()? {
            log::debug!("Re-closed {}", render::position(coords));
        }

        match command {
            Command::Open(coords) => {
                let outcome = session.open_cell(coords)?;
                if json {
                    println!("{}", serde_json::to_string(&outcome)?);
                } else {
                    show_outcome(session.game(), &outcome);
                }
                if let Some(summary) = session.game().summary() {
                    println!("{}", render::summary(&summary));
                    break;
                }
            }
            Command::Board => println!("{}", render::board(session.game())),
            Command::Status => println!("{}", render::status(&session.game().status())),
            Command::History => println!("{}", render::history(session.game().history())),
            Command::Predict => println!("{}", render::predictions(session.game().predictions())),
            Command::Help => println!("{}", command::HELP),
            Command::Quit => break,
        }
        stdout.flush()?;
    }

    Ok(())
}

fn show_outcome(game: &Game, outcome: &TurnOutcome) {
    match outcome {
        TurnOutcome::Ignored => println!("Nothing happens."),
        TurnOutcome::NoCardsAvailable => println!("No cards left to play!"),
        TurnOutcome::Played(report) => {
            println!("{}", render::report(report));
            println!("{}", render::board(game));
            println!("{}", render::history(&report.history_tail));
            println!("{}", render::status(&game.status()));
        }
    }
}
