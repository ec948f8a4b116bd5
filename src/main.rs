//! rbiam - explore the combined AWS IAM and Kubernetes RBAC access graph
//!
//! Gathers identity facts from the AWS CLI and RBAC facts from the active
//! kubeconfig context, then hands over to an interactive shell.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use rbiam::cli::{self, ConfigSubcommand};
use rbiam::config::ConfigLoader;
use rbiam::export::Exporter;
use rbiam::shell::{Console, Session, StdinLines};
use rbiam::sources::{AwsCliIdentitySource, KubeClusterSource};
use rbiam::{StartupError, synchronize};

/// Interactive explorer for AWS IAM and Kubernetes RBAC
#[derive(Parser, Debug)]
#[command(name = "rbiam")]
#[command(about = "Explore the combined AWS IAM and Kubernetes RBAC access graph", long_about = None)]
struct Args {
    /// Enable debug logging
    #[arg(long, short = 'd')]
    debug: bool,

    /// Configuration file layered over the root config
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory export artifacts are written to
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Kubeconfig context to use instead of the current one
    #[arg(long)]
    context: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

/// Main commands
#[derive(Subcommand, Debug)]
enum Command {
    /// Configuration management
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
    /// Print version information
    Version,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();
    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", err);
            ExitCode::from(err.exit_code())
        }
    }
}

async fn run(args: Args) -> Result<(), StartupError> {
    match args.command {
        Some(Command::Config { subcommand }) => {
            cli::handle_config_command(subcommand, args.config.as_deref())?;
            return Ok(());
        }
        Some(Command::Version) => {
            cli::display_version();
            return Ok(());
        }
        None => {}
    }

    if let Some(log_path) = cli::init_logging(args.debug)? {
        eprintln!(
            "Debug logging enabled. Logs written to: {}",
            log_path.display()
        );
    }

    let mut config = ConfigLoader::load(args.config.as_deref())?;
    if let Some(dir) = args.output_dir {
        config.export.output_dir = dir;
    }
    if let Some(context) = args.context {
        config.cluster.context = Some(context);
    }
    tracing::debug!("Configuration loaded: {:?}", config);

    let identity = AwsCliIdentitySource::load(&config.identity).await?;
    let cluster = KubeClusterSource::new(config.cluster.context.clone());

    let mut console = Console::new(std::io::stdout(), config.shell.color);
    console
        .result(
            "Gathering info from IAM and Kubernetes. This may take a bit, please stand by ...\n",
        )
        .map_err(session_error)?;

    let outcome = synchronize(&identity, &cluster).await?;
    for warning in &outcome.warnings {
        console
            .warning(&format!("{}\n", warning))
            .map_err(session_error)?;
    }

    let mut session = Session::new(
        outcome.graph,
        Box::new(identity),
        Box::new(cluster),
        Exporter::from_config(&config),
        console,
        config.shell.max_suggestions,
    );
    session
        .run(&mut StdinLines::new())
        .await
        .map_err(StartupError::Session)?;

    Ok(())
}

fn session_error(err: std::io::Error) -> StartupError {
    StartupError::Session(err.into())
}
