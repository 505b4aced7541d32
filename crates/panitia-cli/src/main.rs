mod cmd;
mod output;

use clap::{Parser, Subcommand};
use cmd::{admin::AdminSubcommand, member::MemberSubcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "panitia",
    about = "Committee management — roster, divisions, tasks, and activity trails",
    version,
    propagate_version = true
)]
struct Cli {
    /// Data directory holding the backing files
    #[arg(long, global = true, default_value = panitia_core::paths::DATA_DIR)]
    data_dir: PathBuf,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a member account linked to a roster entry
    Register {
        username: String,
        password: String,
        display_name: String,
        roster_id: String,
    },

    /// Administrator command surface
    Admin {
        #[arg(short = 'u', long)]
        username: String,

        #[arg(short = 'p', long)]
        password: String,

        #[command(subcommand)]
        subcommand: AdminSubcommand,
    },

    /// Member command surface
    Member {
        #[arg(short = 'u', long)]
        username: String,

        #[arg(short = 'p', long)]
        password: String,

        #[command(subcommand)]
        subcommand: MemberSubcommand,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Register {
            username,
            password,
            display_name,
            roster_id,
        } => cmd::register::run(
            &cli.data_dir,
            &username,
            &password,
            &display_name,
            &roster_id,
            cli.json,
        ),
        Commands::Admin {
            username,
            password,
            subcommand,
        } => cmd::admin::run(&cli.data_dir, &username, &password, subcommand, cli.json),
        Commands::Member {
            username,
            password,
            subcommand,
        } => cmd::member::run(&cli.data_dir, &username, &password, subcommand, cli.json),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
