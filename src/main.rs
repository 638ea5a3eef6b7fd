//! Kanflow CLI - Move documents through an editorial Kanban workflow

use clap::Parser;
use kanflow::cli::commands;
use kanflow::cli::{Cli, Commands};
use kanflow::errors::to_exit_code;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // -v and -q win over RUST_LOG
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else if cli.quiet {
        EnvFilter::new("warn")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run(cli).await {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(to_exit_code(&e));
        }
    }
}

async fn run(cli: Cli) -> kanflow::Result<()> {
    let cwd = cli.cwd.as_deref();
    match cli.command {
        Some(Commands::Init { force }) => commands::init::run(cwd, force, cli.dry_run).await,
        Some(Commands::Board { json }) => commands::board::run(cwd, json).await,
        Some(Commands::Begin { document }) => commands::begin::run(cwd, &document).await,
        Some(Commands::Move {
            document,
            to,
            index,
            actor,
        }) => commands::move_document::run(cwd, &document, &to, index, &actor).await,
        Some(Commands::Transition { document, to, actor }) => {
            commands::transition::run(cwd, &document, &to, &actor).await
        }
        Some(Commands::Assign { document, user }) => {
            commands::assignees::assign(cwd, &document, &user).await
        }
        Some(Commands::Unassign { document, user }) => {
            commands::assignees::unassign(cwd, &document, &user).await
        }
        Some(Commands::ClearAssignees { document }) => {
            commands::assignees::clear(cwd, &document).await
        }
        Some(Commands::Complete { document }) => commands::complete::run(cwd, &document).await,
        Some(Commands::Doctor { json, fix }) => {
            commands::doctor::run(cwd, json, fix.as_deref(), cli.dry_run).await
        }
        None => {
            println!("Use --help for usage information");
            Ok(())
        }
    }
}
