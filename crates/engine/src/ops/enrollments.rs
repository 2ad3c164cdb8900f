use serde::Serialize;

use crate::{
    EngineError, ResultEngine,
    commands::TransitionCmd,
    enrollments::Enrollment,
    lifecycle::{self, EnrollmentState},
    session::SessionState,
    store::{ProgramFilter, Store},
};

use super::Engine;

/// Result of an accepted status change.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TransitionOutcome {
    /// The record as persisted.
    pub enrollment: Enrollment,
    pub previous: EnrollmentState,
    /// The patient has to complete the registration on the external portal.
    pub requires_external_handoff: bool,
    /// Set when `requires_external_handoff` is.
    pub handoff_url: Option<String>,
}

impl<S: Store> Engine<S> {
    /// Applies a status change to a program of the session.
    ///
    /// The program and its enrollment are re-read from the store before the
    /// request is validated, so a program closed since login refuses a first
    /// action. Exactly one enrollment is written per accepted request; a
    /// refused request writes nothing and leaves `session` untouched.
    pub async fn apply_status(
        &self,
        session: &mut SessionState,
        cmd: TransitionCmd,
    ) -> ResultEngine<TransitionOutcome> {
        let user_id = session.user_id().to_string();
        if session.program(&cmd.program_id).is_none() {
            return Err(EngineError::KeyNotFound(cmd.program_id));
        }

        let program = self
            .store
            .load_programs(&ProgramFilter::ids([cmd.program_id.as_str()]))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| EngineError::KeyNotFound(cmd.program_id.clone()))?;
        let existing = self.store.load_enrollment(&user_id, &program.id).await?;
        let previous = EnrollmentState::from(existing.as_ref());

        let transition = lifecycle::transition(
            previous,
            program.status,
            cmd.request,
            self.today(cmd.now),
        )
        .inspect_err(|err| {
            tracing::debug!(
                user_id = %user_id,
                program_id = %program.id,
                from = previous.label(),
                error = %err,
                "status change refused"
            );
        })?;

        let record = match existing {
            Some(mut enrollment) => {
                enrollment.set_status(transition.to, cmd.now);
                enrollment
            }
            None => Enrollment::new(&user_id, &program.id, transition.to, cmd.now),
        };
        let saved = self.store.upsert_enrollment(&record).await?;
        tracing::info!(
            user_id = %user_id,
            program_id = %program.id,
            from = previous.label(),
            to = EnrollmentState::from(saved.status).label(),
            "status changed"
        );

        session.replace_program(program);
        session.replace_enrollment(saved.clone());
        self.refresh_after_write(session).await;

        Ok(TransitionOutcome {
            enrollment: saved,
            previous,
            requires_external_handoff: transition.requires_external_handoff,
            handoff_url: transition
                .requires_external_handoff
                .then(|| self.portal_url.clone()),
        })
    }
}
