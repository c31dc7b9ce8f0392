// ABOUTME: Entry point for trail: saves and restores named editor tab layouts.
// ABOUTME: Parses CLI args, loads config, resolves the project, and runs one command.

use std::path::PathBuf;

use clap::Parser;

use editortrail::app::{App, Command};
use editortrail::config::Config;
use editortrail::workspace::Workspace;

#[derive(Debug, Parser)]
#[command(name = "trail", version, about = "Save and restore named sets of editor tabs")]
struct Cli {
    /// Storage root (defaults to ~/.editortrail or the config file's root_dir)
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    /// Workspace folder; may repeat, only the first decides the project
    #[arg(long = "workspace", global = true)]
    workspaces: Vec<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let mut config = Config::load()?;
    if let Some(root) = cli.root {
        config.root_dir = Some(root);
    }

    let roots = if cli.workspaces.is_empty() {
        vec![std::env::current_dir()?]
    } else {
        cli.workspaces
    };

    let app = App::new(Workspace::resolve(config, &roots));
    let output = app.run(cli.command).await?;
    if !output.is_empty() {
        println!("{output}");
    }
    Ok(())
}
