pub mod config;
pub mod donation;
pub mod join;
pub mod session;

use std::sync::Arc;

use futures_util::future::AbortHandle;
use tokio::sync::Mutex;

use crate::context::AppContext;
use crate::donation::DonationPanel;
use crate::wizard::OnboardingWizard;

/// Label of the window declared in `tauri.conf.json`.
pub const MAIN_WINDOW: &str = "main";

/// Managed Tauri state shared by every command.
pub struct SiteState {
    pub ctx: Arc<AppContext>,
    pub wizard: Arc<Mutex<OnboardingWizard>>,
    pub donation: Arc<Mutex<DonationPanel>>,
    pub donation_abort: Arc<Mutex<Option<AbortHandle>>>,
}

impl SiteState {
    pub fn new(ctx: Arc<AppContext>) -> Self {
        Self {
            wizard: Arc::new(Mutex::new(ctx.start_wizard())),
            donation: Arc::new(Mutex::new(ctx.donation_panel(None))),
            donation_abort: Arc::new(Mutex::new(None)),
            ctx,
        }
    }

    /// Window close handler. Only the main window's close aborts submissions;
    /// returns whether it did.
    pub fn window_destroyed(&self, label: &str) -> bool {
        if label != MAIN_WINDOW {
            return false;
        }
        self.kill_sync();
        true
    }

    /// Abort in-flight submissions synchronously.
    pub fn kill_sync(&self) {
        if let Ok(mut wizard) = self.wizard.try_lock() {
            wizard.cancel();
        }
        if let Ok(mut guard) = self.donation_abort.try_lock() {
            if let Some(handle) = guard.take() {
                handle.abort();
            }
        }
    }
}
