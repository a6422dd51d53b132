use serde::{Deserialize, Serialize};

/// Client-side pages known to the shell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Route {
    Home,
    About,
    Projects,
    Funding,
    Sustainability,
    Dashboard,
    Join,
}

/// Where the access gate sends visitors without a session.
pub const ONBOARDING_ROUTE: Route = Route::Join;

/// Where a completed registration lands.
pub const POST_JOIN_ROUTE: Route = Route::Dashboard;

impl Route {
    pub fn path(self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::About => "/about",
            Route::Projects => "/projects",
            Route::Funding => "/funding",
            Route::Sustainability => "/sustainability",
            Route::Dashboard => "/dashboard",
            Route::Join => "/join",
        }
    }

    /// Resolve a browser path. Query strings and trailing slashes are ignored;
    /// `/projects/<id>` resolves to the projects section.
    pub fn from_path(path: &str) -> Option<Self> {
        let path = path.split(['?', '#']).next().unwrap_or("");
        let trimmed = path.trim_end_matches('/');
        let mut segments = trimmed.trim_start_matches('/').split('/');
        let first = segments.next().unwrap_or("");
        let rest = segments.next();

        let route = match first {
            "" => Route::Home,
            "about" => Route::About,
            "projects" => Route::Projects,
            "funding" => Route::Funding,
            "sustainability" => Route::Sustainability,
            "dashboard" => Route::Dashboard,
            "join" => Route::Join,
            _ => return None,
        };

        match (route, rest) {
            (_, None) => Some(route),
            (Route::Projects, Some(id)) if !id.is_empty() && segments.next().is_none() => Some(route),
            _ => None,
        }
    }

    /// Pages that require a membership record.
    pub fn is_protected(self) -> bool {
        matches!(self, Route::Dashboard)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_roundtrip() {
        for route in [
            Route::Home,
            Route::About,
            Route::Projects,
            Route::Funding,
            Route::Sustainability,
            Route::Dashboard,
            Route::Join,
        ] {
            assert_eq!(Route::from_path(route.path()), Some(route));
        }
    }

    #[test]
    fn test_from_path_normalizes() {
        assert_eq!(Route::from_path("/dashboard/"), Some(Route::Dashboard));
        assert_eq!(Route::from_path("/join?ref=hero"), Some(Route::Join));
        assert_eq!(Route::from_path("/projects/coral-thailand"), Some(Route::Projects));
        assert_eq!(Route::from_path("/projects/a/b"), None);
        assert_eq!(Route::from_path("/dashboard/settings"), None);
        assert_eq!(Route::from_path("/login"), None);
    }

    #[test]
    fn test_only_dashboard_is_protected() {
        assert!(Route::Dashboard.is_protected());
        assert!(!Route::Join.is_protected());
        assert!(!Route::Home.is_protected());
    }
}
