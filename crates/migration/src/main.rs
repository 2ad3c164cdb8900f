use std::process::ExitCode;

use sea_orm::Database;
use sea_orm_migration::prelude::*;

const DEFAULT_DATABASE_URL: &str = "sqlite:./drug_assist.db?mode=rwc";
const USAGE: &str = "Usage: cargo run -p migration -- [up|down|fresh|status]";

#[tokio::main]
async fn main() -> ExitCode {
    let cmd = std::env::args().nth(1).unwrap_or_else(|| "up".to_string());
    if !matches!(cmd.as_str(), "up" | "down" | "fresh" | "status") {
        eprintln!("{USAGE}");
        return ExitCode::from(2);
    }

    let db_url = std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());
    match run(&cmd, &db_url).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("migration {cmd} failed on {db_url}: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cmd: &str, db_url: &str) -> Result<(), DbErr> {
    let db = Database::connect(db_url).await?;
    match cmd {
        "down" => migration::Migrator::down(&db, None).await,
        "fresh" => migration::Migrator::fresh(&db).await,
        "status" => migration::Migrator::status(&db).await,
        _ => migration::Migrator::up(&db, None).await,
    }
}
