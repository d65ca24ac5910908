mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "fxbuild", about = "Build and release the FixTweet worker bundle")]
#[command(version)]
struct Cli {
    /// Project directory (repository checkout containing wrangler.toml)
    #[arg(long, short = 'C', global = true, default_value = ".")]
    dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Bundle the worker and, when SENTRY_DSN is set, create a Sentry release
    Build {
        /// Print the esbuild invocation and plugins without running anything
        #[arg(long)]
        dry_run: bool,
    },
    /// Print the release name this checkout would be built as
    Release,
    /// Print the compile-time constants injected into the bundle
    Defines {
        /// Emit a JSON object instead of NAME=VALUE lines
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                // arch-lint: allow(no-silent-result-drop) reason="an unset or invalid RUST_LOG falls back to the default info filter"
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Build { dry_run } => commands::build(&cli.dir, dry_run).await?,
        Commands::Release => commands::release(&cli.dir)?,
        Commands::Defines { json } => commands::defines(&cli.dir, json)?,
    }

    Ok(())
}
