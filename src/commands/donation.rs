use super::SiteState;
use crate::donation::{DonationPanel, DonationReceipt, DonationTarget, DonorType, Frequency};
use crate::error::Result;

#[tauri::command]
pub async fn donation_state(state: tauri::State<'_, SiteState>) -> Result<DonationPanel> {
    Ok(state.donation.lock().await.clone())
}

#[tauri::command]
pub async fn select_donation_target(
    target: DonationTarget,
    state: tauri::State<'_, SiteState>,
) -> Result<DonationPanel> {
    let mut panel = state.donation.lock().await;
    panel.select_target(target);
    Ok(panel.clone())
}

/// `custom` distinguishes the free-form input from the preset buttons.
#[tauri::command]
pub async fn choose_donation_amount(
    amount: String,
    custom: bool,
    frequency: Option<Frequency>,
    donor: Option<DonorType>,
    state: tauri::State<'_, SiteState>,
) -> Result<DonationPanel> {
    let mut panel = state.donation.lock().await;
    if custom {
        panel.enter_custom(&amount);
    } else {
        panel.choose_preset(&amount);
    }
    if let Some(frequency) = frequency {
        panel.set_frequency(frequency);
    }
    if let Some(donor) = donor {
        panel.set_donor(donor);
    }
    Ok(panel.clone())
}

#[tauri::command]
pub async fn submit_donation(state: tauri::State<'_, SiteState>) -> Result<DonationReceipt> {
    let pending = {
        let mut panel = state.donation.lock().await;
        let (pending, handle) = panel.submit()?;
        *state.donation_abort.lock().await = Some(handle);
        pending
    };

    let outcome = state.ctx.finish_donation(pending).await;
    state.donation_abort.lock().await.take();
    state.donation.lock().await.finish(&outcome);
    outcome
}

#[tauri::command]
pub async fn reset_donation(state: tauri::State<'_, SiteState>) -> Result<DonationPanel> {
    let mut panel = state.donation.lock().await;
    if !panel.reset() {
        tracing::debug!("reset ignored while a donation is processing");
    }
    Ok(panel.clone())
}
