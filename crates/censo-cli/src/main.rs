//! Censo CLI - membership census management from the terminal
//!
//! Works offline by default: mutations queue locally and replay against
//! the remote service on the next `censo sync` with connectivity.

mod cli;
mod commands;
mod error;
mod session;

use clap::{CommandFactory, Parser};

use cli::{Cli, Commands};
use commands::add::{run_add, AddArgs};
use commands::auth_cmd::{run_auth_status, run_login, run_logout};
use commands::common::resolve_db_path;
use commands::completions::run_completions;
use commands::delete::run_delete;
use commands::edit::{run_edit, EditArgs};
use commands::export::run_export;
use commands::import::run_import;
use commands::list::run_list;
use commands::stats::run_stats;
use commands::sync::{run_status, run_sync};
use error::CliError;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("censo=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();
    let db_path = resolve_db_path(cli.db_path);

    match cli.command {
        Some(Commands::Add {
            name,
            birth_date,
            national_id,
            gender,
            group,
            status,
        }) => {
            run_add(
                &name,
                AddArgs {
                    birth_date,
                    national_id,
                    gender,
                    group,
                    status,
                },
                &db_path,
            )
            .await?;
        }
        Some(Commands::List {
            status,
            group,
            search,
            json,
        }) => {
            run_list(status, group.as_deref(), search.as_deref(), json, &db_path).await?;
        }
        Some(Commands::Edit {
            id,
            name,
            birth_date,
            national_id,
            gender,
            group,
            status,
        }) => {
            run_edit(
                &id,
                EditArgs {
                    name,
                    birth_date,
                    national_id,
                    gender,
                    group,
                    status,
                },
                &db_path,
            )
            .await?;
        }
        Some(Commands::Delete { id }) => run_delete(&id, &db_path).await?,
        Some(Commands::Sync) => run_sync(&db_path).await?,
        Some(Commands::Status) => run_status(&db_path).await?,
        Some(Commands::Import { file }) => run_import(&file, &db_path).await?,
        Some(Commands::Export { format, output }) => {
            run_export(format, output.as_deref(), &db_path).await?;
        }
        Some(Commands::Stats { json }) => run_stats(json, &db_path).await?,
        Some(Commands::Auth { command }) => match command {
            cli::AuthCommands::Login { email } => run_login(&email, &db_path).await?,
            cli::AuthCommands::Status => run_auth_status(&db_path)?,
            cli::AuthCommands::Logout => run_logout(&db_path)?,
        },
        Some(Commands::Completions { shell, output }) => {
            run_completions(shell, output.as_deref())?;
        }
        None => {
            // Quick capture mode: censo "Ana Morales"
            if cli.member.is_empty() {
                Cli::command().print_help().map_err(CliError::Io)?;
                println!();
            } else {
                run_add(&cli.member, AddArgs::default(), &db_path).await?;
            }
        }
    }

    Ok(())
}
