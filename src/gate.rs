use serde::Serialize;

use crate::error::Result;
use crate::membership::MembershipRecord;
use crate::routes::{Route, ONBOARDING_ROUTE};
use crate::session::SessionStore;

/// Outcome of checking a protected page.
#[derive(Clone, Debug, PartialEq)]
pub enum GateDecision {
    Granted(MembershipRecord),
    Redirect(Route),
}

/// What the frontend should do for a page it is about to mount.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", tag = "access", content = "data")]
pub enum PageAccess {
    Public,
    Granted(MembershipRecord),
    #[serde(rename_all = "camelCase")]
    Redirect { to: Route, path: &'static str },
}

/// Shared guard for every protected page, parameterized by where to send
/// visitors without a session.
#[derive(Clone, Copy, Debug)]
pub struct AccessGate {
    redirect_to: Route,
}

impl Default for AccessGate {
    fn default() -> Self {
        Self::new(ONBOARDING_ROUTE)
    }
}

impl AccessGate {
    pub fn new(redirect_to: Route) -> Self {
        Self { redirect_to }
    }

    pub fn redirect_target(&self) -> Route {
        self.redirect_to
    }

    /// Storage errors propagate; only an absent record redirects.
    pub fn check(&self, session: &SessionStore) -> Result<GateDecision> {
        match session.read()? {
            Some(record) => Ok(GateDecision::Granted(record)),
            None => Ok(GateDecision::Redirect(self.redirect_to)),
        }
    }

    /// Uniform entry point for page mounts. Public pages never touch storage.
    pub fn guard(&self, route: Route, session: &SessionStore) -> Result<PageAccess> {
        if !route.is_protected() {
            return Ok(PageAccess::Public);
        }
        Ok(match self.check(session)? {
            GateDecision::Granted(record) => PageAccess::Granted(record),
            GateDecision::Redirect(to) => {
                tracing::info!(from = route.path(), to = to.path(), "no session, redirecting");
                PageAccess::Redirect { to, path: to.path() }
            }
        })
    }
}
