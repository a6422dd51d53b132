use std::time::Duration;

use chrono::{DateTime, Utc};
use futures_util::future::{AbortHandle, AbortRegistration, Abortable};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

// ── Types ───────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    Project,
    Member,
    Foundation,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DonationTarget {
    pub id: String,
    pub kind: TargetKind,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Frequency {
    #[default]
    OneTime,
    Monthly,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DonorType {
    #[default]
    Individual,
    Company,
}

/// Confirmation shown once the simulated payment "succeeds". Nothing is stored.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DonationReceipt {
    pub target: DonationTarget,
    pub amount_eur: f64,
    pub frequency: Frequency,
    pub donor: DonorType,
    pub completed_at: DateTime<Utc>,
}

// ── Panel ───────────────────────────────────────────────────────────────────

const FOUNDATION_PRESETS: [&str; 4] = ["50", "100", "250", "500"];
const STANDARD_PRESETS: [&str; 4] = ["20", "50", "100", "200"];

/// State behind the donate widget.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DonationPanel {
    #[serde(skip)]
    default_target: Option<DonationTarget>,
    #[serde(skip)]
    delay: Duration,
    pub frequency: Frequency,
    pub amount: String,
    pub custom_amount: bool,
    pub target: Option<DonationTarget>,
    pub show_target_selector: bool,
    pub donor: DonorType,
    pub submitting: bool,
    pub complete: bool,
}

fn default_amount(target: Option<&DonationTarget>) -> &'static str {
    match target {
        Some(t) if t.kind == TargetKind::Foundation => "100",
        _ => "50",
    }
}

impl DonationPanel {
    pub fn new(default_target: Option<DonationTarget>, delay: Duration) -> Self {
        Self {
            amount: default_amount(default_target.as_ref()).to_string(),
            show_target_selector: default_target.is_none(),
            target: default_target.clone(),
            default_target,
            delay,
            frequency: Frequency::default(),
            custom_amount: false,
            donor: DonorType::default(),
            submitting: false,
            complete: false,
        }
    }

    pub fn preset_amounts(&self) -> [&'static str; 4] {
        match &self.target {
            Some(t) if t.kind == TargetKind::Foundation => FOUNDATION_PRESETS,
            _ => STANDARD_PRESETS,
        }
    }

    pub fn choose_preset(&mut self, amount: &str) {
        self.custom_amount = false;
        self.amount = amount.to_string();
    }

    pub fn enter_custom(&mut self, amount: &str) {
        self.custom_amount = true;
        self.amount = amount.to_string();
    }

    pub fn select_target(&mut self, target: DonationTarget) {
        self.target = Some(target);
        self.show_target_selector = false;
    }

    pub fn set_frequency(&mut self, frequency: Frequency) {
        self.frequency = frequency;
    }

    pub fn set_donor(&mut self, donor: DonorType) {
        self.donor = donor;
    }

    /// Back to a blank panel with the selector open. Ignored while a payment
    /// is in flight; returns whether the panel was reset.
    pub fn reset(&mut self) -> bool {
        if self.submitting {
            return false;
        }
        self.complete = false;
        self.target = None;
        self.show_target_selector = true;
        self.amount = default_amount(self.default_target.as_ref()).to_string();
        self.custom_amount = false;
        self.frequency = Frequency::default();
        self.donor = DonorType::default();
        true
    }

    /// Validate and start the simulated payment. The returned handle aborts it.
    pub fn submit(&mut self) -> Result<(PendingDonation, AbortHandle)> {
        if self.submitting {
            return Err(AppError::Custom("A donation is already being processed".into()));
        }
        let target = self
            .target
            .clone()
            .ok_or_else(|| AppError::Custom("Choose who to support first".into()))?;
        let amount_eur: f64 = self
            .amount
            .trim()
            .parse()
            .ok()
            .filter(|a: &f64| a.is_finite() && *a > 0.0)
            .ok_or_else(|| AppError::Custom(format!("Invalid donation amount: {}", self.amount)))?;

        self.submitting = true;
        let (handle, registration) = AbortHandle::new_pair();
        Ok((
            PendingDonation {
                target,
                amount_eur,
                frequency: self.frequency,
                donor: self.donor,
                delay: self.delay,
                abort: registration,
            },
            handle,
        ))
    }

    /// Record the outcome of a finished [`PendingDonation`].
    pub fn finish(&mut self, outcome: &Result<DonationReceipt>) {
        self.submitting = false;
        self.complete = outcome.is_ok();
    }
}

#[derive(Debug)]
pub struct PendingDonation {
    target: DonationTarget,
    amount_eur: f64,
    frequency: Frequency,
    donor: DonorType,
    delay: Duration,
    abort: AbortRegistration,
}

impl PendingDonation {
    pub async fn complete(self) -> Result<DonationReceipt> {
        let Self {
            target,
            amount_eur,
            frequency,
            donor,
            delay,
            abort,
        } = self;

        let payment = async move {
            tokio::time::sleep(delay).await;
            DonationReceipt {
                target,
                amount_eur,
                frequency,
                donor,
                completed_at: Utc::now(),
            }
        };

        Abortable::new(payment, abort)
            .await
            .map_err(|_| AppError::Cancelled)
    }
}
