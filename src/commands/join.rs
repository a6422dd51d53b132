use serde::Serialize;

use super::SiteState;
use crate::error::{AppError, Result};
use crate::wizard::{region_options, FormUpdate, RegionOption, SubmitOutcome, WizardView};

#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WizardState {
    pub view: WizardView,
    pub regions: Vec<RegionOption>,
}

#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase", tag = "outcome", content = "data")]
pub enum StepResult {
    Advanced(WizardView),
    Stayed(WizardView),
    Busy(WizardView),
    #[serde(rename_all = "camelCase")]
    Navigate { to: String },
}

#[tauri::command]
pub async fn wizard_state(state: tauri::State<'_, SiteState>) -> Result<WizardState> {
    let wizard = state.wizard.lock().await;
    Ok(WizardState {
        view: wizard.view(),
        regions: region_options(),
    })
}

#[tauri::command]
pub async fn update_registration(
    update: FormUpdate,
    state: tauri::State<'_, SiteState>,
) -> Result<WizardView> {
    let mut wizard = state.wizard.lock().await;
    wizard.update(update);
    Ok(wizard.view())
}

/// Submit the current step. The final step waits for the simulated round
/// trip and then tells the page where to navigate.
#[tauri::command]
pub async fn submit_registration_step(state: tauri::State<'_, SiteState>) -> Result<StepResult> {
    let pending = {
        let mut wizard = state.wizard.lock().await;
        match wizard.submit() {
            SubmitOutcome::Advanced(_) => return Ok(StepResult::Advanced(wizard.view())),
            SubmitOutcome::Stayed(_) => return Ok(StepResult::Stayed(wizard.view())),
            SubmitOutcome::Busy => return Ok(StepResult::Busy(wizard.view())),
            SubmitOutcome::Submitting(pending) => pending,
        }
    };

    // Lock released so the page can still poll or cancel while we wait
    let route = state.ctx.finish_registration(pending).await?;

    // Fresh form for the next visit to /join
    *state.wizard.lock().await = state.ctx.start_wizard();

    Ok(StepResult::Navigate {
        to: route.path().to_string(),
    })
}

/// Abort a registration that is still waiting to be written.
#[tauri::command]
pub async fn cancel_registration(state: tauri::State<'_, SiteState>) -> Result<bool> {
    let mut wizard = state.wizard.lock().await;
    if !wizard.is_submitting() {
        return Err(AppError::Custom("No registration in progress".into()));
    }
    Ok(wizard.cancel())
}
