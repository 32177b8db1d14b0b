use anyhow::Context;
use clap::{Parser, Subcommand};
use gmext_logger as logger;
use gmextpack::{
    commands::{
        config::{self, ConfigAction},
        convert::{self, ConvertArgs},
    },
    mode::Mode,
    GlobalOpts,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "gmextpack")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(
    about = "GameMaker extension packer",
    long_about = "gmextpack converts GameMaker extensions (.yy) into local asset packages (.yymp/.yymps) and back."
)]
struct Cli {
    #[command(flatten)]
    global: GlobalOpts,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert in the direction implied by the input extension
    Convert(ConvertArgs),
    /// Turn an extension descriptor into an asset package
    Explode(ConvertArgs),
    /// Turn an asset package back into an extension descriptor
    Collapse(ConvertArgs),
    /// Configure gmextpack
    #[command(subcommand_required = false, arg_required_else_help = false)]
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| logger::verbosity_filter().into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_writer(std::io::stderr),
        )
        .try_init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Convert(args) => {
            convert::handle_convert(&args, None)
                .with_context(|| format!("Failed to convert {}", args.input.display()))?;
        }
        Commands::Explode(args) => {
            convert::handle_convert(&args, Some(Mode::Explode))
                .with_context(|| format!("Failed to explode {}", args.input.display()))?;
        }
        Commands::Collapse(args) => {
            convert::handle_convert(&args, Some(Mode::Collapse))
                .with_context(|| format!("Failed to collapse {}", args.input.display()))?;
        }
        Commands::Config { action } => {
            config::handle_config(action, &cli.global)?;
        }
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = logger::init_with_verbosity(cli.global.verbosity_level(), cli.global.quiet) {
        eprintln!("Warning: Failed to initialize logger: {}", e);
    }
    init_tracing();

    if let Err(e) = run(cli) {
        logger::error(&format!("{:#}", e));
        std::process::exit(1);
    }
}
