use chrono::{DateTime, Days, Utc};

use crate::{
    EngineError, ResultEngine,
    calendar::{CalendarMarks, DEFAULT_REFILL_LEAD_DAYS, MonthCursor, MonthView, month_view},
    cost::CostSummary,
    session::SessionState,
    store::Store,
};

use super::Engine;

impl<S: Store> Engine<S> {
    /// Cost panel of `program_id` for the patient's current medication.
    pub fn cost_summary(
        &self,
        session: &SessionState,
        program_id: &str,
    ) -> ResultEngine<CostSummary> {
        let program = session
            .program(program_id)
            .ok_or_else(|| EngineError::KeyNotFound(program_id.to_string()))?;
        Ok(CostSummary::compute(program, session.patient_drug()))
    }

    /// Refill and re-enrollment calendar of `program_id` for the month of
    /// `cursor`.
    ///
    /// A medication without a refill date is shown as due
    /// [`DEFAULT_REFILL_LEAD_DAYS`] after today.
    pub fn schedule(
        &self,
        session: &SessionState,
        program_id: &str,
        cursor: MonthCursor,
        now: DateTime<Utc>,
    ) -> ResultEngine<MonthView> {
        let program = session
            .program(program_id)
            .ok_or_else(|| EngineError::KeyNotFound(program_id.to_string()))?;
        let today = self.today(now);
        let refill = session.patient_drug().and_then(|drug| {
            drug.refill_date
                .or_else(|| today.checked_add_days(Days::new(DEFAULT_REFILL_LEAD_DAYS)))
        });

        let marks = CalendarMarks::new(today)
            .refill(refill)
            .re_enrollment(program.re_enrollment_date);
        Ok(month_view(cursor, &marks))
    }
}
