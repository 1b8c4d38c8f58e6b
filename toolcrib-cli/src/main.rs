mod apply_font;
mod create_tool;
mod generate_matrix;

use clap::{Parser, Subcommand};
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "toolcrib",
    version,
    about = "Fleet manager for per-tenant tool projects and their central registry."
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Provision the bundled font into tool projects (idempotent).
    ApplyFont(apply_font::ApplyFontArgs),
    /// Scaffold a tool descriptor and reconcile it into the registry.
    CreateTool(create_tool::CreateToolArgs),
    /// Emit the CI build matrix for the affected tools.
    GenerateMatrix(generate_matrix::GenerateMatrixArgs),
}

fn main() -> ExitCode {
    if let Err(e) = real_main() {
        error!("{:?}", e);
        eprintln!("error: {e:#}");
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn real_main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::ApplyFont(args) => apply_font::run(args),
        Command::CreateTool(args) => create_tool::run(args),
        Command::GenerateMatrix(args) => generate_matrix::run(args),
    }
}
