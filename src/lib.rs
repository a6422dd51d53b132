pub mod config;
pub mod context;
pub mod donation;
pub mod error;
pub mod gate;
pub mod logs;
pub mod membership;
pub mod profile;
pub mod routes;
pub mod session;
pub mod storage;
pub mod util;
pub mod wizard;

#[cfg(feature = "desktop")]
mod commands;

use tracing_subscriber::EnvFilter;

/// Install the stderr subscriber. `RUST_LOG` overrides the default filter.
/// Safe to call more than once; later calls are no-ops.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("bluehearts=info,bluehearts_lib=info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

#[cfg(feature = "desktop")]
pub fn run() -> anyhow::Result<()> {
    use anyhow::Context;
    use std::sync::Arc;
    use tauri::{Emitter, Manager};
    use tokio::sync::broadcast::error::RecvError;

    let config = config::load_config();
    let ctx = tauri::async_runtime::block_on(context::AppContext::open(config))
        .context("failed to open local storage")?;
    let ctx = Arc::new(ctx);
    let mut session_events = ctx.session().subscribe();

    tauri::Builder::default()
        .manage(commands::SiteState::new(ctx))
        .setup(move |app| {
            // Keep every window on the latest session; last write wins
            let handle = app.handle().clone();
            tauri::async_runtime::spawn(async move {
                loop {
                    match session_events.recv().await {
                        Ok(event) => {
                            if let Err(e) = handle.emit("session-changed", &event) {
                                tracing::warn!(error = %e, "failed to forward session change");
                            }
                        }
                        Err(RecvError::Lagged(skipped)) => {
                            tracing::debug!(skipped, "session listener lagged");
                        }
                        Err(RecvError::Closed) => break,
                    }
                }
            });
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            commands::session::load_session,
            commands::session::guard_route,
            commands::session::logout,
            commands::session::member_profile,
            commands::session::header_greeting,
            commands::join::wizard_state,
            commands::join::update_registration,
            commands::join::submit_registration_step,
            commands::join::cancel_registration,
            commands::donation::donation_state,
            commands::donation::select_donation_target,
            commands::donation::choose_donation_amount,
            commands::donation::submit_donation,
            commands::donation::reset_donation,
            commands::config::load_settings,
            commands::config::save_settings,
        ])
        .on_window_event(|window, event| {
            if let tauri::WindowEvent::Destroyed = event {
                if let Some(state) = window.try_state::<commands::SiteState>() {
                    state.inner().window_destroyed(window.label());
                }
            }
        })
        .run(tauri::generate_context!())
        .context("failed to run BlueHearts")
}
