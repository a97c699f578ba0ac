/// Pocket Player - headless media player driver
use clap::{Parser, Subcommand};
use pocket_player::{commands::HELP, CliConfig, Driver};
use std::io::Write;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "pocket-player")]
#[command(about = "Drive the Pocket Player playback core from a terminal", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive prompt
    Repl,
    /// Run commands from a script file
    Run {
        /// Script path, one command per line
        script: PathBuf,
    },
    /// List the sample media
    Samples,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pocket_player=info,pocket_playback=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = CliConfig::load(cli.config.as_deref())?;
    config.validate()?;

    let mut driver = Driver::new(&config);
    let mut stdout = std::io::stdout();

    match cli.command {
        Commands::Repl => {
            writeln!(stdout, "{HELP}")?;
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            driver.run(stdin, &mut stdout).await?;
        }
        Commands::Run { script } => {
            let script = std::fs::read_to_string(&script)?;
            driver.run_script(&script, &mut stdout)?;
        }
        Commands::Samples => {
            driver.run_script("samples", &mut stdout)?;
        }
    }

    driver.close();
    tracing::info!("Pocket Player stopped");
    Ok(())
}
