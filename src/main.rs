use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use simplelog::{Config, LevelFilter, WriteLogger};
use std::fs::File;
use std::path::PathBuf;
use std::time::Duration;
use torus_snake::game::{GameConfig, GameEngine};
use torus_snake::modes::HumanMode;
use torus_snake::persistence::{
    DEFAULT_HIGH_SCORE_FILE, HighScoreStore, JsonFileStore, MemoryStore,
};

#[derive(Parser)]
#[command(name = "torus_snake")]
#[command(version, about = "Snake on a wrapping grid, in your terminal")]
struct Cli {
    /// Width and height of the board
    #[arg(long, default_value = "20")]
    grid_size: usize,

    /// Starting delay between moves, in milliseconds
    #[arg(long, default_value = "200")]
    tick_ms: u64,

    /// How much faster the game gets per food eaten, in milliseconds
    #[arg(long, default_value = "2")]
    decrement_ms: u64,

    /// Fastest allowed delay between moves, in milliseconds
    #[arg(long, default_value = "50")]
    min_tick_ms: u64,

    /// Where the high score is kept
    #[arg(long, default_value = DEFAULT_HIGH_SCORE_FILE)]
    high_score_file: PathBuf,

    /// Keep the high score in memory only
    #[arg(long)]
    no_persist: bool,

    /// Log file (the terminal is taken by the game)
    #[arg(long, default_value = "torus_snake.log")]
    log_file: PathBuf,

    /// Log engine decisions at debug level
    #[arg(long)]
    verbose: bool,

    /// Seed for food placement, for reproducible games
    #[arg(long)]
    seed: Option<u64>,
}

impl Cli {
    fn game_config(&self) -> GameConfig {
        GameConfig::new(self.grid_size).with_timing(
            Duration::from_millis(self.tick_ms),
            Duration::from_millis(self.decrement_ms),
            Duration::from_millis(self.min_tick_ms),
        )
    }
}

async fn play<S: HighScoreStore>(cli: &Cli, store: S, high_score: u32) -> Result<()> {
    let config = cli.game_config();
    let engine = match cli.seed {
        Some(seed) => GameEngine::with_seed(config, high_score, seed),
        None => GameEngine::new(config, high_score),
    }
    .context("Invalid game configuration")?;

    let mut human_mode = HumanMode::new(engine, store);
    human_mode.run().await
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging before anything else
    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let log_file = File::create(&cli.log_file)
        .with_context(|| format!("Failed to create log file {:?}", cli.log_file))?;
    WriteLogger::init(level, Config::default(), log_file).context("Failed to initialize logger")?;

    info!("Starting torus_snake on a {0}x{0} grid", cli.grid_size);

    if cli.no_persist {
        play(&cli, MemoryStore::default(), 0).await
    } else {
        let store = JsonFileStore::new(&cli.high_score_file);
        let high_score = store.load_or_default();
        info!("Loaded high score {} from {:?}", high_score, store.path());
        play(&cli, store, high_score).await
    }
}
