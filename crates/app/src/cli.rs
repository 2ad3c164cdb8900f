use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

const DEFAULT_CONFIG_PATH: &str = "settings.toml";

#[derive(Parser, Debug)]
#[command(name = "drug_assist")]
#[command(about = "Track enrollment in drug cost-assistance programs")]
pub struct Cli {
    /// Optional config file path (TOML).
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: String,

    /// Patient whose session is opened.
    #[arg(long, global = true, env = "DRUG_ASSIST_USER")]
    pub user: Option<String>,

    /// Print JSON instead of text.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Apply pending schema migrations and exit.
    Migrate,
    /// List the programs assigned to the patient.
    Programs,
    /// Change the enrollment status of a program.
    Status(StatusArgs),
    /// Show savings and out-of-pocket cost for a program.
    Cost(ProgramArgs),
    /// Show the refill and re-enrollment calendar of a program.
    Calendar(CalendarArgs),
    /// Manage the patient's medication.
    Drug(Drug),
    /// Manage the patient's clinic.
    Clinic(Link),
    /// Manage the patient's care provider.
    Provider(Link),
}

#[derive(Args, Debug)]
pub struct ProgramArgs {
    pub program: String,
}

#[derive(Args, Debug)]
pub struct StatusArgs {
    pub program: String,
    #[command(subcommand)]
    pub change: StatusChange,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusChange {
    /// Start the registration on the enrollment portal.
    Enroll,
    Ongoing,
    Completed {
        /// Completion date (YYYY-MM-DD), not after today.
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    Reject,
}

#[derive(Args, Debug)]
pub struct CalendarArgs {
    pub program: String,
    /// Year of the month to show (requires --month).
    #[arg(long, requires = "month")]
    pub year: Option<i32>,
    /// Month to show, 1-12 (requires --year).
    #[arg(long, requires = "year")]
    pub month: Option<u32>,
    /// Months from the current one, negative going back.
    #[arg(long, conflicts_with_all = ["year", "month"], allow_hyphen_values = true, default_value_t = 0)]
    pub offset: i32,
}

#[derive(Args, Debug)]
pub struct Drug {
    #[command(subcommand)]
    pub command: DrugCommand,
}

#[derive(Subcommand, Debug)]
pub enum DrugCommand {
    /// Select the medication, replacing the current one.
    Select {
        drug_id: String,
        /// Next refill date (YYYY-MM-DD).
        #[arg(long)]
        refill: Option<NaiveDate>,
    },
    /// Set the refill date, or clear it when omitted.
    Refill { date: Option<NaiveDate> },
    /// Remove the medication.
    Remove,
}

#[derive(Args, Debug)]
pub struct Link {
    #[command(subcommand)]
    pub command: LinkCommand,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum LinkCommand {
    /// Select by id, replacing the current one.
    Select { id: String },
    /// Remove the current one.
    Remove,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_completed_with_date() {
        let cli = Cli::try_parse_from([
            "drug_assist",
            "--user",
            "alice",
            "status",
            "p1",
            "completed",
            "--date",
            "2026-10-16",
        ])
        .unwrap();
        let Command::Status(args) = cli.command else {
            panic!("expected status");
        };
        assert_eq!(args.program, "p1");
        assert_eq!(
            args.change,
            StatusChange::Completed {
                date: NaiveDate::from_ymd_opt(2026, 10, 16)
            }
        );
        assert_eq!(cli.user.as_deref(), Some("alice"));
    }

    #[test]
    fn calendar_offset_accepts_negative_values() {
        let cli = Cli::try_parse_from(["drug_assist", "calendar", "p1", "--offset", "-3"]).unwrap();
        let Command::Calendar(args) = cli.command else {
            panic!("expected calendar");
        };
        assert_eq!(args.offset, -3);
        assert!(args.year.is_none());
    }

    #[test]
    fn calendar_year_requires_month() {
        assert!(Cli::try_parse_from(["drug_assist", "calendar", "p1", "--year", "2026"]).is_err());
    }

    #[test]
    fn parses_clinic_selection() {
        let cli = Cli::try_parse_from(["drug_assist", "clinic", "select", "c-north"]).unwrap();
        let Command::Clinic(link) = cli.command else {
            panic!("expected clinic");
        };
        assert_eq!(
            link.command,
            LinkCommand::Select {
                id: "c-north".to_string()
            }
        );
    }
}
