use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use futures_util::future::{AbortHandle, AbortRegistration, Abortable};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::membership::{MembershipRecord, MembershipTier, Region};
use crate::routes::{Route, POST_JOIN_ROUTE};
use crate::session::SessionStore;

/// Stand-in for the registration round trip; nothing is sent anywhere.
pub const DEFAULT_SUBMIT_DELAY: Duration = Duration::from_millis(1500);

// ── Steps & form ────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WizardStep {
    Identity,
    Region,
    Tier,
}

impl WizardStep {
    pub fn number(self) -> u8 {
        match self {
            WizardStep::Identity => 1,
            WizardStep::Region => 2,
            WizardStep::Tier => 3,
        }
    }

    pub fn prompt(self) -> &'static str {
        match self {
            WizardStep::Identity => "Create your account to join The BlueHearts Network community",
            WizardStep::Region => "Tell us where you're located to connect with regional efforts",
            WizardStep::Tier => "Choose your membership level and complete your registration",
        }
    }
}

/// Values accumulated across the three steps.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationForm {
    pub name: String,
    pub email: String,
    /// Collected for parity with the join form; never persisted.
    #[serde(skip_serializing, default)]
    pub password: String,
    pub region: Option<Region>,
    pub membership_type: MembershipTier,
}

/// A single field edit coming from the join page.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", tag = "field", content = "value")]
pub enum FormUpdate {
    Name(String),
    Email(String),
    Password(String),
    Region(Region),
    MembershipType(MembershipTier),
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionOption {
    pub value: Region,
    pub label: String,
}

pub fn region_options() -> Vec<RegionOption> {
    Region::ALL
        .into_iter()
        .map(|value| RegionOption {
            value,
            label: value.label(),
        })
        .collect()
}

// ── Wizard ──────────────────────────────────────────────────────────────────

#[derive(Debug)]
pub enum SubmitOutcome {
    Advanced(WizardStep),
    /// Guard failed; the wizard silently stays where it is.
    Stayed(WizardStep),
    Submitting(PendingRegistration),
    /// A registration is already in flight.
    Busy,
}

/// What the join page renders.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WizardView {
    pub step: WizardStep,
    pub step_number: u8,
    pub prompt: &'static str,
    pub form: RegistrationForm,
    pub submitting: bool,
    pub button_label: &'static str,
}

/// Linear identity → region → tier join flow.
///
/// Dropping the wizard aborts any registration still waiting to be written.
pub struct OnboardingWizard {
    step: WizardStep,
    form: RegistrationForm,
    submit_delay: Duration,
    submitting: Arc<AtomicBool>,
    pending: Option<AbortHandle>,
}

impl Default for OnboardingWizard {
    fn default() -> Self {
        Self::new(DEFAULT_SUBMIT_DELAY)
    }
}

impl OnboardingWizard {
    pub fn new(submit_delay: Duration) -> Self {
        Self {
            step: WizardStep::Identity,
            form: RegistrationForm::default(),
            submit_delay,
            submitting: Arc::new(AtomicBool::new(false)),
            pending: None,
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn form(&self) -> &RegistrationForm {
        &self.form
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::SeqCst)
    }

    pub fn button_label(&self) -> &'static str {
        if self.is_submitting() {
            return "Processing...";
        }
        match self.step {
            WizardStep::Identity => "Continue",
            WizardStep::Region => "Next: Choose Membership",
            WizardStep::Tier => "Complete Registration",
        }
    }

    pub fn view(&self) -> WizardView {
        WizardView {
            step: self.step,
            step_number: self.step.number(),
            prompt: self.step.prompt(),
            form: self.form.clone(),
            submitting: self.is_submitting(),
            button_label: self.button_label(),
        }
    }

    /// Apply a field edit. Returns false when ignored because a submission is
    /// in flight.
    pub fn update(&mut self, update: FormUpdate) -> bool {
        if self.is_submitting() {
            return false;
        }
        match update {
            FormUpdate::Name(v) => self.form.name = v,
            FormUpdate::Email(v) => self.form.email = v,
            FormUpdate::Password(v) => self.form.password = v,
            FormUpdate::Region(r) => self.form.region = Some(r),
            FormUpdate::MembershipType(t) => self.form.membership_type = t,
        }
        true
    }

    /// Form submit on the current step.
    pub fn submit(&mut self) -> SubmitOutcome {
        if self.is_submitting() {
            return SubmitOutcome::Busy;
        }
        match self.step {
            WizardStep::Identity => {
                // Emptiness only; whitespace passes
                let f = &self.form;
                if f.name.is_empty() || f.email.is_empty() || f.password.is_empty() {
                    return SubmitOutcome::Stayed(self.step);
                }
                self.step = WizardStep::Region;
                SubmitOutcome::Advanced(self.step)
            }
            WizardStep::Region => {
                if self.form.region.is_none() {
                    return SubmitOutcome::Stayed(self.step);
                }
                self.step = WizardStep::Tier;
                SubmitOutcome::Advanced(self.step)
            }
            WizardStep::Tier => match self.form.region {
                Some(region) => SubmitOutcome::Submitting(self.begin_submit(region)),
                None => {
                    self.step = WizardStep::Region;
                    SubmitOutcome::Stayed(self.step)
                }
            },
        }
    }

    fn begin_submit(&mut self, region: Region) -> PendingRegistration {
        let (handle, registration) = AbortHandle::new_pair();
        // Each submission owns its flag
        self.submitting = Arc::new(AtomicBool::new(true));
        self.pending = Some(handle);
        PendingRegistration {
            name: self.form.name.clone(),
            email: self.form.email.clone(),
            region,
            membership_type: self.form.membership_type,
            delay: self.submit_delay,
            submitting: self.submitting.clone(),
            abort: registration,
        }
    }

    /// Abort the in-flight registration, if any. Returns true if one was aborted.
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(handle) => {
                let was_running = self.is_submitting();
                handle.abort();
                self.submitting.store(false, Ordering::SeqCst);
                was_running
            }
            None => false,
        }
    }
}

impl Drop for OnboardingWizard {
    fn drop(&mut self) {
        self.cancel();
    }
}

// ── Pending registration ────────────────────────────────────────────────────

/// The delayed write produced by the final step.
#[derive(Debug)]
pub struct PendingRegistration {
    name: String,
    email: String,
    region: Region,
    membership_type: MembershipTier,
    delay: Duration,
    submitting: Arc<AtomicBool>,
    abort: AbortRegistration,
}

impl PendingRegistration {
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Wait out the simulated round trip, write the record and return where
    /// to navigate. Aborted registrations write nothing.
    pub async fn complete(self, session: &SessionStore) -> Result<Route> {
        let Self {
            name,
            email,
            region,
            membership_type,
            delay,
            submitting,
            abort,
        } = self;

        let write = async move {
            tokio::time::sleep(delay).await;
            let record = MembershipRecord::new(name, email, region, membership_type, Utc::now());
            session.write(&record)
        };

        let outcome = Abortable::new(write, abort).await;
        submitting.store(false, Ordering::SeqCst);

        match outcome {
            Ok(Ok(())) => Ok(POST_JOIN_ROUTE),
            Ok(Err(e)) => Err(e),
            Err(_aborted) => Err(AppError::Cancelled),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn session() -> SessionStore {
        SessionStore::new(Arc::new(MemoryStorage::default()))
    }

    fn fill_identity(wizard: &mut OnboardingWizard) {
        wizard.update(FormUpdate::Name("Ada Lovelace".into()));
        wizard.update(FormUpdate::Email("ada@example.com".into()));
        wizard.update(FormUpdate::Password("x".into()));
    }

    fn at_tier_step() -> OnboardingWizard {
        let mut wizard = OnboardingWizard::default();
        fill_identity(&mut wizard);
        assert!(matches!(wizard.submit(), SubmitOutcome::Advanced(WizardStep::Region)));
        wizard.update(FormUpdate::Region(Region::Europe));
        assert!(matches!(wizard.submit(), SubmitOutcome::Advanced(WizardStep::Tier)));
        wizard
    }

    #[test]
    fn test_identity_guard_requires_all_fields() {
        for missing in 0..3 {
            let mut wizard = OnboardingWizard::default();
            if missing != 0 {
                wizard.update(FormUpdate::Name("Ada".into()));
            }
            if missing != 1 {
                wizard.update(FormUpdate::Email("ada@example.com".into()));
            }
            if missing != 2 {
                wizard.update(FormUpdate::Password("x".into()));
            }
            assert!(matches!(wizard.submit(), SubmitOutcome::Stayed(WizardStep::Identity)));
            assert_eq!(wizard.step(), WizardStep::Identity);
        }
    }

    #[test]
    fn test_whitespace_passes_identity_guard() {
        let mut wizard = OnboardingWizard::default();
        wizard.update(FormUpdate::Name(" ".into()));
        wizard.update(FormUpdate::Email(" ".into()));
        wizard.update(FormUpdate::Password(" ".into()));
        assert!(matches!(wizard.submit(), SubmitOutcome::Advanced(WizardStep::Region)));
    }

    #[test]
    fn test_region_guard() {
        let mut wizard = OnboardingWizard::default();
        fill_identity(&mut wizard);
        wizard.submit();
        assert!(matches!(wizard.submit(), SubmitOutcome::Stayed(WizardStep::Region)));
        wizard.update(FormUpdate::Region(Region::Asia));
        assert!(matches!(wizard.submit(), SubmitOutcome::Advanced(WizardStep::Tier)));
    }

    #[test]
    fn test_button_labels_follow_steps() {
        let mut wizard = OnboardingWizard::default();
        assert_eq!(wizard.button_label(), "Continue");
        fill_identity(&mut wizard);
        wizard.submit();
        assert_eq!(wizard.button_label(), "Next: Choose Membership");
        assert_eq!(wizard.view().step_number, 2);
    }

    #[test]
    fn test_password_not_serialized_in_view() {
        let mut wizard = OnboardingWizard::default();
        fill_identity(&mut wizard);
        let value = serde_json::to_value(wizard.view()).unwrap();
        assert!(value["form"].get("password").is_none());
        assert_eq!(value["form"]["membershipType"], "individual");
    }

    #[test]
    fn test_form_update_wire_format() {
        let update: FormUpdate = serde_json::from_str(r#"{"field":"region","value":"north-america"}"#).unwrap();
        assert_eq!(update, FormUpdate::Region(Region::NorthAmerica));
    }

    #[test]
    fn test_region_options_in_selector_order() {
        let options = region_options();
        assert_eq!(options.len(), 7);
        assert_eq!(options[0].label, "North America");
        assert_eq!(options[6].value, Region::Antarctica);
    }

    #[tokio::test(start_paused = true)]
    async fn test_default_tier_completes_as_individual() {
        let session = session();
        let mut wizard = at_tier_step();

        let pending = match wizard.submit() {
            SubmitOutcome::Submitting(p) => p,
            other => panic!("expected submission, got {other:?}"),
        };
        assert!(wizard.is_submitting());
        assert_eq!(wizard.button_label(), "Processing...");
        assert!(matches!(wizard.submit(), SubmitOutcome::Busy));
        assert!(!wizard.update(FormUpdate::Name("Someone Else".into())));

        let route = pending.complete(&session).await.unwrap();
        assert_eq!(route, Route::Dashboard);
        assert!(!wizard.is_submitting());

        let record = session.read().unwrap().unwrap();
        assert_eq!(record.name, "Ada Lovelace");
        assert_eq!(record.region, Region::Europe);
        assert_eq!(record.membership_type, MembershipTier::Individual);
        assert!(record.is_logged_in);
    }

    #[tokio::test(start_paused = true)]
    async fn test_nothing_written_before_delay_elapses() {
        let session = session();
        let mut wizard = at_tier_step();
        wizard.update(FormUpdate::MembershipType(MembershipTier::Project));
        let SubmitOutcome::Submitting(pending) = wizard.submit() else {
            panic!("expected submission");
        };

        let reader = session.clone();
        let task = tokio::spawn(async move { pending.complete(&reader).await });

        tokio::time::sleep(Duration::from_millis(1000)).await;
        assert_eq!(session.read().unwrap(), None);

        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(task.await.unwrap().unwrap(), Route::Dashboard);
        assert_eq!(session.read().unwrap().unwrap().membership_type, MembershipTier::Project);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_aborts_pending_write() {
        let session = session();
        let mut wizard = at_tier_step();
        let SubmitOutcome::Submitting(pending) = wizard.submit() else {
            panic!("expected submission");
        };

        let writer = session.clone();
        let task = tokio::spawn(async move { pending.complete(&writer).await });
        tokio::time::sleep(Duration::from_millis(500)).await;

        assert!(wizard.cancel());
        assert!(matches!(task.await.unwrap(), Err(AppError::Cancelled)));
        assert_eq!(session.read().unwrap(), None);
        assert!(!wizard.is_submitting());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_submission_does_not_clear_newer_one() {
        let session = session();
        let mut wizard = at_tier_step();
        let SubmitOutcome::Submitting(first) = wizard.submit() else {
            panic!("expected submission");
        };
        assert!(wizard.cancel());

        let SubmitOutcome::Submitting(second) = wizard.submit() else {
            panic!("expected resubmission");
        };
        assert!(matches!(first.complete(&session).await, Err(AppError::Cancelled)));

        assert!(wizard.is_submitting());
        assert!(matches!(wizard.submit(), SubmitOutcome::Busy));

        assert_eq!(second.complete(&session).await.unwrap(), Route::Dashboard);
        assert!(!wizard.is_submitting());
        assert!(session.read().unwrap().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_wizard_aborts_pending_write() {
        let session = session();
        let mut wizard = at_tier_step();
        let SubmitOutcome::Submitting(pending) = wizard.submit() else {
            panic!("expected submission");
        };
        drop(wizard);

        assert!(matches!(pending.complete(&session).await, Err(AppError::Cancelled)));
        assert_eq!(session.read().unwrap(), None);
    }
}
