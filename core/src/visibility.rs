use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Delay between `Opening` and `Open`. Purely visual.
pub const OPEN_TRANSITION: Duration = Duration::from_millis(300);

/// Open/closed state of the assistant panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Closed,
    Opening,
    Open,
}

impl Visibility {
    /// `Closed` opens; `Opening` and `Open` both close.
    pub fn toggled(self) -> Self {
        match self {
            Visibility::Closed => Visibility::Opening,
            Visibility::Opening | Visibility::Open => Visibility::Closed,
        }
    }

    /// Completes the opening transition. Any other state is left alone.
    pub fn settled(self) -> Self {
        match self {
            Visibility::Opening => Visibility::Open,
            other => other,
        }
    }

    pub fn is_visible(self) -> bool {
        !matches!(self, Visibility::Closed)
    }
}

/// Page the user is currently on, as far as the assistant cares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    Landing,
    Login,
    Register,
    Waitlist,
    Dashboard,
    Upload,
    Meals,
    Workouts,
    Profile,
    Other(String),
}

impl View {
    /// Maps a route path to a view. Trailing slashes and query strings are ignored.
    pub fn from_path(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let trimmed = path.trim_end_matches('/');
        let first = trimmed.trim_start_matches('/').split('/').next().unwrap_or_default();

        match first {
            "" => View::Landing,
            "login" | "signin" => View::Login,
            "register" | "signup" => View::Register,
            "waitlist" => View::Waitlist,
            "dashboard" => View::Dashboard,
            "upload" => View::Upload,
            "meals" | "meal-plan" => View::Meals,
            "workouts" | "workout-plan" => View::Workouts,
            "profile" => View::Profile,
            _ => View::Other(trimmed.to_string()),
        }
    }

    /// Public pages where the assistant is never offered.
    pub fn is_public(&self) -> bool {
        matches!(self, View::Landing | View::Login | View::Register | View::Waitlist)
    }
}

/// What the frontend knows about the current session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SessionInfo {
    pub authenticated: bool,
}

/// Whether the assistant should be mounted at all for this session and view.
pub fn assistant_allowed(session: &SessionInfo, view: &View) -> bool {
    session.authenticated && !view.is_public()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_cycle() {
        let v = Visibility::default();
        assert_eq!(v, Visibility::Closed);

        let v = v.toggled();
        assert_eq!(v, Visibility::Opening);
        assert!(v.is_visible());

        let v = v.settled();
        assert_eq!(v, Visibility::Open);

        let v = v.toggled();
        assert_eq!(v, Visibility::Closed);
        assert!(!v.is_visible());
    }

    #[test]
    fn test_close_during_opening() {
        assert_eq!(Visibility::Opening.toggled(), Visibility::Closed);
        // a late timer must not reopen the panel
        assert_eq!(Visibility::Closed.settled(), Visibility::Closed);
        assert_eq!(Visibility::Open.settled(), Visibility::Open);
    }

    #[test]
    fn test_view_from_path() {
        assert_eq!(View::from_path("/"), View::Landing);
        assert_eq!(View::from_path(""), View::Landing);
        assert_eq!(View::from_path("/login"), View::Login);
        assert_eq!(View::from_path("/dashboard/"), View::Dashboard);
        assert_eq!(View::from_path("/meals/42?tab=macros"), View::Meals);
        assert_eq!(View::from_path("/waitlist#form"), View::Waitlist);
        assert_eq!(
            View::from_path("/settings/billing"),
            View::Other("/settings/billing".to_string())
        );
    }

    #[test]
    fn test_assistant_allowed() {
        let signed_in = SessionInfo { authenticated: true };
        let anonymous = SessionInfo::default();

        assert!(assistant_allowed(&signed_in, &View::Dashboard));
        assert!(assistant_allowed(&signed_in, &View::Upload));
        assert!(assistant_allowed(&signed_in, &View::Other("/settings".into())));
        assert!(!assistant_allowed(&signed_in, &View::Landing));
        assert!(!assistant_allowed(&signed_in, &View::Login));
        assert!(!assistant_allowed(&signed_in, &View::Waitlist));
        assert!(!assistant_allowed(&anonymous, &View::Dashboard));
    }
}
