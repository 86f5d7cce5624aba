use clap::{Parser, Subcommand};

mod db;
mod seed;
mod user;

#[derive(Debug, Parser)]
#[command(name = "leadbook-app", about = "Leadbook CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Db(db::DbCommand),
    User(user::UserCommand),
    Seed(seed::SeedArgs),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        match self.command {
            Commands::Db(command) => db::run(command).await,
            Commands::User(command) => user::run(command).await,
            Commands::Seed(args) => seed::run(args).await,
        }
    }
}

/// Open the database named by `url`, mapping failures to CLI output.
pub(crate) async fn connect(url: &str) -> Result<leadbook_app::database::Db, String> {
    leadbook_app::database::Db::connect(url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))
}
