use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use sea_orm::DatabaseConnection;

use crate::{ResultEngine, store::Store};

mod care_team;
mod drugs;
mod enrollments;
mod session;
mod store;
mod views;

pub use enrollments::TransitionOutcome;
pub use store::DatabaseStore;

/// Registration page the patient is sent to when enrolling.
pub const DEFAULT_PORTAL_URL: &str = "https://portal.copays.org/#/register";

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

#[derive(Debug)]
pub struct Engine<S = DatabaseStore> {
    store: S,
    portal_url: String,
    timezone: Tz,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }
}

impl<S: Store> Engine<S> {
    /// Engine over a custom store, with the default portal and UTC dates.
    pub fn with_store(store: S) -> Self {
        Self {
            store,
            portal_url: DEFAULT_PORTAL_URL.to_string(),
            timezone: Tz::UTC,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn portal_url(&self) -> &str {
        &self.portal_url
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    /// The calendar date of `now` in the engine timezone.
    pub fn today(&self, now: DateTime<Utc>) -> NaiveDate {
        now.with_timezone(&self.timezone).date_naive()
    }
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
    portal_url: Option<String>,
    timezone: Option<Tz>,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Enrollment portal returned on handoff
    pub fn portal_url(mut self, url: impl Into<String>) -> EngineBuilder {
        self.portal_url = Some(url.into());
        self
    }

    /// Timezone deciding what "today" is
    pub fn timezone(mut self, timezone: Tz) -> EngineBuilder {
        self.timezone = Some(timezone);
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        let portal_url = self
            .portal_url
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_PORTAL_URL.to_string());
        Ok(Engine {
            store: DatabaseStore::new(self.database),
            portal_url,
            timezone: self.timezone.unwrap_or(Tz::UTC),
        })
    }
}
