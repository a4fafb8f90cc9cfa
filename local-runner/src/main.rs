mod broadcaster;
mod config;
mod input;

use clap::Parser;
use tokio::sync::mpsc;

use snake_arena::{log, logger};
use snake_arena::config::ConfigManager;
use snake_arena::games::SessionRng;
use snake_arena::games::snake::{Arena, ArenaSession};

use broadcaster::LogBroadcaster;
use config::{LocalConfig, CONFIG_FILE_NAME};
use input::spawn_stdin_reader;

#[derive(Parser)]
#[command(name = "snake_arena_local", about = "Local multiplayer snake, steered from stdin")]
struct Args {
    /// YAML settings file; defaults are used when it does not exist.
    #[arg(long, default_value = CONFIG_FILE_NAME)]
    config: String,

    /// Seed of the first round; later rounds add their round index.
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long, default_value_t = 1)]
    rounds: u32,

    #[arg(long)]
    use_log_prefix: bool,

    /// Write the default settings to the config path and exit.
    #[arg(long)]
    write_default_config: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let prefix = if args.use_log_prefix {
        Some("Arena".to_string())
    } else {
        None
    };
    logger::init_logger(prefix);

    let config_manager: ConfigManager<_, LocalConfig, _> = ConfigManager::from_yaml_file(&args.config);

    if args.write_default_config {
        config_manager.set_config(&LocalConfig::default())?;
        log!("Default config written to {}", args.config);
        return Ok(());
    }

    let config = config_manager.get_config()?;
    log!("Using settings from {}", args.config);

    for (agent, keys) in config.arena.agents.iter().zip(&config.controls) {
        log!(
            "{} ({}): up '{}', down '{}', left '{}', right '{}'",
            agent.label,
            agent.color,
            keys.up,
            keys.down,
            keys.left,
            keys.right
        );
    }
    log!("Type keys and press Enter to steer");

    let (input_tx, mut input_rx) = mpsc::unbounded_channel();
    let _input_reader = spawn_stdin_reader(config.controls.clone(), input_tx);

    let base_seed = args.seed.unwrap_or_else(rand::random);

    for round in 1..=args.rounds {
        while input_rx.try_recv().is_ok() {}

        let arena = Arena::new(&config.arena)?;
        let rng = SessionRng::new(base_seed.wrapping_add(u64::from(round - 1)));
        let broadcaster = LogBroadcaster::new(round);

        tokio::select! {
            _ = ArenaSession::run(arena, rng, config.arena.tick_interval(), &mut input_rx, broadcaster) => {}
            result = tokio::signal::ctrl_c() => {
                if let Err(e) = result {
                    log!("Failed to listen for Ctrl+C: {}", e);
                }
                log!("Interrupted, shutting down");
                break;
            }
        }
    }

    Ok(())
}
