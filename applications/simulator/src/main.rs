/// Encore simulator - headless playback engine driver
use clap::{Parser, Subcommand, ValueEnum};
use encore_playback::RepeatMode;
use encore_sim::{parse_track_spec, Session, SimConfig};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "encore-sim")]
#[command(about = "Run the Encore playback engine against a simulated device", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a list of tracks to completion
    Run {
        /// Configuration file path
        #[arg(short, long, env = "ENCORE_SIM_CONFIG")]
        config: Option<PathBuf>,

        /// Track as id:title:artist:seconds (repeatable, first one plays)
        #[arg(short, long = "track")]
        tracks: Vec<String>,

        /// Repeat mode, overrides the config
        #[arg(short, long, value_enum)]
        repeat: Option<RepeatArg>,

        /// Sleep for each tick instead of running flat out
        #[arg(long)]
        realtime: bool,
    },
    /// Print the effective configuration as TOML
    ShowConfig {
        /// Configuration file path
        #[arg(short, long, env = "ENCORE_SIM_CONFIG")]
        config: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum RepeatArg {
    Off,
    All,
    One,
}

impl From<RepeatArg> for RepeatMode {
    fn from(arg: RepeatArg) -> Self {
        match arg {
            RepeatArg::Off => RepeatMode::Off,
            RepeatArg::All => RepeatMode::All,
            RepeatArg::One => RepeatMode::One,
        }
    }
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "encore_playback=info,encore_sim=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            tracks,
            repeat,
            realtime,
        } => {
            run(config, tracks, repeat, realtime)?;
        }
        Commands::ShowConfig { config } => {
            let config = SimConfig::load(config.as_deref())?;
            print!("{}", config.to_toml()?);
        }
    }

    Ok(())
}

fn run(
    config_path: Option<PathBuf>,
    track_specs: Vec<String>,
    repeat: Option<RepeatArg>,
    realtime: bool,
) -> anyhow::Result<()> {
    let mut config = SimConfig::load(config_path.as_deref())?;
    if let Some(repeat) = repeat {
        config.playback.repeat = repeat.into();
    }
    if realtime {
        config.simulation.realtime = true;
    }

    let specs = if track_specs.is_empty() {
        config.simulation.tracks.clone()
    } else {
        track_specs
    };
    let tracks = specs
        .iter()
        .map(|spec| parse_track_spec(spec))
        .collect::<Result<Vec<_>, _>>()?;

    let mut session = Session::new(config)?;
    session.load_tracks(tracks)?;
    let report = session.run();

    tracing::info!(
        "Finished after {} ticks ({:.1}s virtual)",
        report.ticks,
        report.elapsed_seconds
    );
    tracing::info!(
        "Played: {}",
        report
            .played
            .iter()
            .map(|id| id.as_str())
            .collect::<Vec<_>>()
            .join(" -> ")
    );
    if report.errors > 0 {
        tracing::warn!("{} media failure(s) during the session", report.errors);
    }
    if report.truncated {
        tracing::warn!("Session did not settle (repeat one or max_ticks too low?)");
    }

    Ok(())
}
