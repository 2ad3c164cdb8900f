//! Plain-text output of the command-line surface.

use engine::{
    CareTeam, CostSummary, DayMark, EnrollmentState, MonthView, PatientDrug, ProgramView,
    TransitionOutcome,
};

const WEEKDAYS: [&str; 7] = ["Su", "Mo", "Tu", "We", "Th", "Fr", "Sa"];
const CELL_WIDTH: usize = 4;

pub fn programs(views: &[ProgramView<'_>]) -> String {
    if views.is_empty() {
        return "No programs assigned.".to_string();
    }

    views
        .iter()
        .map(|view| {
            let program = view.program;
            let actions = if view.actions.is_empty() {
                "none".to_string()
            } else {
                view.actions
                    .iter()
                    .map(|a| a.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            };
            format!(
                "{id}  {name} ({sponsor})\n    program: {status} | cap: {cap} | you: {state}\n    actions: {actions}",
                id = program.id,
                name = program.name,
                sponsor = program.sponsor,
                status = program.status,
                cap = program.monetary_cap,
                state = state(view.state),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn state(state: EnrollmentState) -> String {
    match state {
        EnrollmentState::Completed { on } => format!("completed on {on}"),
        other => other.label().to_string(),
    }
}

pub fn outcome(outcome: &TransitionOutcome) -> String {
    let mut out = format!(
        "{}: {} -> {}",
        outcome.enrollment.program_id,
        state(outcome.previous),
        state(outcome.enrollment.status.into()),
    );
    if let Some(url) = &outcome.handoff_url {
        out.push_str(&format!("\nComplete your registration at {url}"));
    }
    out
}

pub fn cost(summary: &CostSummary) -> String {
    format!(
        "Yearly drug cost:   {:>12}\nPotential saving:   {:>12}\nOut of pocket:      {:>12}",
        summary.yearly_drug_cost.to_string(),
        summary.potential_saving.to_string(),
        summary.out_of_pocket.to_string(),
    )
}

pub fn patient_drug(drug: &PatientDrug) -> String {
    let refill = drug
        .refill_date
        .map_or_else(|| "not set".to_string(), |date| date.to_string());
    format!(
        "{}: {} weekly, {} monthly, {} yearly, next refill {refill}",
        drug.drug_id, drug.weekly_price, drug.monthly_price, drug.yearly_price
    )
}

pub fn care_team(team: &CareTeam) -> String {
    format!(
        "clinic: {} | provider: {}",
        team.clinic_id.as_deref().unwrap_or("none"),
        team.provider_id.as_deref().unwrap_or("none"),
    )
}

fn marker(mark: DayMark) -> char {
    match mark {
        DayMark::None => ' ',
        DayMark::Today => '*',
        DayMark::Refill => 'R',
        DayMark::ReEnrollment => 'E',
    }
}

/// Month grid, one row per week starting on Sunday.
pub fn calendar(view: &MonthView) -> String {
    let width = CELL_WIDTH * WEEKDAYS.len();
    let mut lines = vec![format!("{:^width$}", view.label).trim_end().to_string()];
    lines.push(
        WEEKDAYS
            .iter()
            .map(|day| format!("{day:>3} "))
            .collect::<String>()
            .trim_end()
            .to_string(),
    );

    let cells: Vec<String> = (0..view.leading_blanks)
        .map(|_| " ".repeat(CELL_WIDTH))
        .chain(
            view.days
                .iter()
                .map(|day| format!("{:>3}{}", day.day, marker(day.mark))),
        )
        .collect();
    lines.extend(
        cells
            .chunks(WEEKDAYS.len())
            .map(|week| week.concat().trim_end().to_string()),
    );

    lines.push("* today  R refill  E re-enrollment".to_string());
    lines.join("\n")
}
