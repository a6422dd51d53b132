use std::sync::Arc;

use crate::config::AppConfig;
use crate::donation::{DonationPanel, DonationReceipt, DonationTarget, PendingDonation};
use crate::error::{AppError, Result};
use crate::gate::{AccessGate, PageAccess};
use crate::logs::{redact_email, ActivityLogger};
use crate::profile::{HeaderGreeting, MemberProfile};
use crate::routes::Route;
use crate::session::SessionStore;
use crate::storage::{FileStorage, KeyValueStorage};
use crate::wizard::{OnboardingWizard, PendingRegistration};

/// Everything a page needs: settings, the session slot, the shared gate and
/// the activity log. One per process; every window shares it.
pub struct AppContext {
    config: AppConfig,
    session: SessionStore,
    gate: AccessGate,
    logger: Option<ActivityLogger>,
}

impl AppContext {
    /// Disk-backed context. Must run inside a tokio runtime (the activity log
    /// spawns its writer).
    pub async fn open(config: AppConfig) -> Result<Self> {
        let storage_dir = config
            .storage_dir()
            .ok_or_else(|| AppError::Custom("Cannot find home directory".into()))?;

        let logger = match config.logs_dir() {
            Some(dir) => ActivityLogger::open(&dir, config.log_retention).await,
            None => None,
        };
        if logger.is_none() {
            tracing::warn!("activity log unavailable, continuing without it");
        }

        tracing::info!(storage = %storage_dir.display(), "opening local storage");
        let storage = Arc::new(FileStorage::new(storage_dir));
        Ok(Self::with_storage(config, storage, logger))
    }

    pub fn with_storage(
        config: AppConfig,
        storage: Arc<dyn KeyValueStorage>,
        logger: Option<ActivityLogger>,
    ) -> Self {
        Self {
            config,
            session: SessionStore::new(storage),
            gate: AccessGate::default(),
            logger,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    fn log(&self, prefix: &str, line: &str) {
        if let Some(logger) = &self.logger {
            logger.log(prefix, line);
        }
    }

    /// Run the access gate for a browser path.
    pub fn open_page(&self, path: &str) -> Result<PageAccess> {
        let route = Route::from_path(path)
            .ok_or_else(|| AppError::Custom(format!("Unknown page: {path}")))?;
        let access = self.gate.guard(route, &self.session)?;
        if let PageAccess::Redirect { path: to, .. } = &access {
            self.log("gate", &format!("{} without session → {to}", route.path()));
        }
        Ok(access)
    }

    pub fn start_wizard(&self) -> OnboardingWizard {
        OnboardingWizard::new(self.config.submit_delay())
    }

    pub async fn finish_registration(&self, pending: PendingRegistration) -> Result<Route> {
        let email = redact_email(pending.email());
        match pending.complete(&self.session).await {
            Ok(route) => {
                tracing::info!(%email, "member joined");
                self.log("join", &format!("{email} joined"));
                Ok(route)
            }
            Err(AppError::Cancelled) => {
                self.log("join", &format!("{email} registration cancelled"));
                Err(AppError::Cancelled)
            }
            Err(e) => {
                tracing::warn!(%email, error = %e, "registration failed");
                Err(e)
            }
        }
    }

    pub fn logout(&self) -> Result<()> {
        let previous = self.session.read_lenient();
        self.session.clear()?;
        if let Some(record) = previous {
            self.log("session", &format!("{} signed out", redact_email(&record.email)));
        }
        Ok(())
    }

    /// Dashboard view of the current member, if any.
    pub fn profile(&self) -> Result<Option<MemberProfile>> {
        Ok(self.session.read()?.as_ref().map(MemberProfile::from_record))
    }

    pub fn greeting(&self) -> HeaderGreeting {
        HeaderGreeting::from_session(&self.session)
    }

    pub fn donation_panel(&self, default_target: Option<DonationTarget>) -> DonationPanel {
        DonationPanel::new(default_target, self.config.donation_delay())
    }

    pub async fn finish_donation(&self, pending: PendingDonation) -> Result<DonationReceipt> {
        let outcome = pending.complete().await;
        if let Ok(receipt) = &outcome {
            self.log(
                "donation",
                &format!("€{} to {} ({:?})", receipt.amount_eur, receipt.target.name, receipt.frequency),
            );
        }
        outcome
    }
}
