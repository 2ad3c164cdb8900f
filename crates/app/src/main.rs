use chrono::{DateTime, Utc};
use clap::Parser;
use engine::{Engine, MonthCursor, SelectDrugCmd, SessionState, TransitionCmd};
use migration::{Migrator, MigratorTrait};
use serde::Serialize;
use settings::Database;

use crate::{
    cli::{CalendarArgs, Cli, Command, DrugCommand, LinkCommand, StatusChange},
    error::{AppError, Result},
};

mod cli;
mod error;
mod render;
mod settings;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = settings::Settings::new(&cli.config)?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "drug_assist={level},engine={level}",
            level = settings.app.level
        ))
        .with_writer(std::io::stderr)
        .init();

    let timezone = settings.enrollment.timezone()?;
    let db = parse_database(&settings.database).await?;
    if matches!(cli.command, Command::Migrate) {
        tracing::info!("database schema is up to date");
        return Ok(());
    }

    let engine = Engine::builder()
        .database(db)
        .portal_url(settings.enrollment.portal_url.as_str())
        .timezone(timezone)
        .build()
        .await?;

    let user = cli.user.ok_or(AppError::MissingUser)?;
    let mut session = engine.open_session(&user).await?;
    let output = run(&engine, &mut session, cli.command, Utc::now(), cli.json).await;
    engine.close_session(session);

    println!("{}", output?);
    Ok(())
}

async fn run(
    engine: &Engine,
    session: &mut SessionState,
    command: Command,
    now: DateTime<Utc>,
    json: bool,
) -> Result<String> {
    match command {
        Command::Migrate => Ok(String::new()),
        Command::Programs => {
            let views = session.program_views();
            output(json, &views, || render::programs(&views))
        }
        Command::Status(args) => {
            let cmd = match args.change {
                StatusChange::Enroll => TransitionCmd::enroll(args.program, now),
                StatusChange::Ongoing => TransitionCmd::ongoing(args.program, now),
                StatusChange::Completed { date } => {
                    TransitionCmd::completed(args.program, date, now)
                }
                StatusChange::Reject => TransitionCmd::reject(args.program, now),
            };
            let outcome = engine.apply_status(session, cmd).await?;
            output(json, &outcome, || render::outcome(&outcome))
        }
        Command::Cost(args) => {
            let summary = engine.cost_summary(session, &args.program)?;
            output(json, &summary, || render::cost(&summary))
        }
        Command::Calendar(args) => {
            let cursor = month_cursor(engine, &args, now)?;
            let view = engine.schedule(session, &args.program, cursor, now)?;
            output(json, &view, || render::calendar(&view))
        }
        Command::Drug(drug) => match drug.command {
            DrugCommand::Select { drug_id, refill } => {
                let mut cmd = SelectDrugCmd::new(drug_id);
                if let Some(date) = refill {
                    cmd = cmd.refill_date(date);
                }
                let drug = engine.select_drug(session, cmd).await?;
                output(json, &drug, || render::patient_drug(&drug))
            }
            DrugCommand::Refill { date } => {
                let drug = engine.set_refill_date(session, date).await?;
                output(json, &drug, || render::patient_drug(&drug))
            }
            DrugCommand::Remove => {
                let removed = engine.remove_drug(session).await?;
                output(json, &serde_json::json!({ "removed": removed }), || {
                    if removed {
                        "Medication removed.".to_string()
                    } else {
                        "No medication to remove.".to_string()
                    }
                })
            }
        },
        Command::Clinic(link) => {
            let team = match link.command {
                LinkCommand::Select { id } => engine.select_clinic(session, &id).await?,
                LinkCommand::Remove => {
                    engine.remove_clinic(session).await?;
                    session.care_team().clone()
                }
            };
            output(json, &team, || render::care_team(&team))
        }
        Command::Provider(link) => {
            let team = match link.command {
                LinkCommand::Select { id } => engine.select_provider(session, &id).await?,
                LinkCommand::Remove => {
                    engine.remove_provider(session).await?;
                    session.care_team().clone()
                }
            };
            output(json, &team, || render::care_team(&team))
        }
    }
}

fn month_cursor(engine: &Engine, args: &CalendarArgs, now: DateTime<Utc>) -> Result<MonthCursor> {
    match (args.year, args.month) {
        (Some(year), Some(month)) => Ok(MonthCursor::new(year, month)?),
        _ => Ok(MonthCursor::containing(engine.today(now)).shift(args.offset)),
    }
}

fn output<T: Serialize>(json: bool, value: &T, text: impl FnOnce() -> String) -> Result<String> {
    if json {
        Ok(serde_json::to_string_pretty(value)?)
    } else {
        Ok(text())
    }
}

async fn parse_database(config: &Database) -> Result<sea_orm::DatabaseConnection> {
    let url = match config {
        Database::Memory => String::from("sqlite::memory:"),
        Database::Sqlite(path) => format!("sqlite:{}?mode=rwc", path),
    };

    let database = sea_orm::Database::connect(url).await?;
    Migrator::up(&database, None).await?;
    Ok(database)
}
