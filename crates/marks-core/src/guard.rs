//! Navigation guard
//!
//! Decides, before every view transition, whether to proceed or redirect
//! based only on whether a session credential exists. Nothing is cached
//! between navigations.

use crate::session::Session;

/// Navigable views
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `/`, requires a session
    Home,
    /// `/login`
    Login,
    /// `/register`
    Register,
    /// Any other path, identified by its path
    Other(String),
}

impl Route {
    /// Parse a path (`/`, `/login`, ...) into a route
    pub fn from_path(path: &str) -> Self {
        let trimmed = path.trim().trim_end_matches('/');
        match trimmed {
            "" => Route::Home,
            "/login" | "login" => Route::Login,
            "/register" | "register" => Route::Register,
            _ => {
                let path = if trimmed.starts_with('/') {
                    trimmed.to_string()
                } else {
                    format!("/{}", trimmed)
                };
                Route::Other(path)
            }
        }
    }

    /// Path of this route
    pub fn path(&self) -> &str {
        match self {
            Route::Home => "/",
            Route::Login => "/login",
            Route::Register => "/register",
            Route::Other(path) => path,
        }
    }

    /// Route name as the router knows it
    pub fn name(&self) -> &str {
        match self {
            Route::Home => "home",
            Route::Login => "login",
            Route::Register => "register",
            Route::Other(path) => path,
        }
    }

    /// Login and register are the only views for signed-out users
    pub fn is_public(&self) -> bool {
        matches!(self, Route::Login | Route::Register)
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}

/// Outcome of a guard evaluation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// Enter the requested route
    Proceed,
    /// Go somewhere else instead
    Redirect(Route),
}

/// Guard decision for a target route
///
/// - signed out, target not login/register: redirect to login
/// - signed in, target login/register: redirect to home
/// - anything else: proceed
pub fn evaluate(has_session: bool, target: &Route) -> Navigation {
    match (has_session, target.is_public()) {
        (false, false) => Navigation::Redirect(Route::Login),
        (true, true) => Navigation::Redirect(Route::Home),
        _ => Navigation::Proceed,
    }
}

/// Guard bound to a session, re-checked on every navigation
#[derive(Debug, Clone)]
pub struct NavigationGuard {
    session: Session,
}

impl NavigationGuard {
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    /// Evaluate the guard for `target` against the current credential
    pub fn before_each(&self, target: &Route) -> Navigation {
        evaluate(self.session.is_authenticated(), target)
    }

    /// Route that is finally shown when navigating to `target`
    pub fn resolve(&self, target: Route) -> Route {
        match self.before_each(&target) {
            Navigation::Proceed => target,
            Navigation::Redirect(route) => route,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use std::sync::Arc;

    fn targets() -> Vec<Route> {
        vec![
            Route::Login,
            Route::Register,
            Route::Home,
            Route::Other("/settings".to_string()),
        ]
    }

    #[test]
    fn test_transition_table() {
        for target in targets() {
            let signed_out = evaluate(false, &target);
            let signed_in = evaluate(true, &target);

            match target {
                Route::Login | Route::Register => {
                    assert_eq!(signed_out, Navigation::Proceed);
                    assert_eq!(signed_in, Navigation::Redirect(Route::Home));
                }
                Route::Home | Route::Other(_) => {
                    assert_eq!(signed_out, Navigation::Redirect(Route::Login));
                    assert_eq!(signed_in, Navigation::Proceed);
                }
            }
        }
    }

    #[test]
    fn test_evaluate_is_idempotent() {
        for has_session in [true, false] {
            for target in targets() {
                assert_eq!(evaluate(has_session, &target), evaluate(has_session, &target));
            }
        }
    }

    #[test]
    fn test_guard_rechecks_session_each_time() {
        let session = Session::new(Arc::new(MemoryStore::new()));
        let guard = NavigationGuard::new(session.clone());

        assert_eq!(
            guard.before_each(&Route::Home),
            Navigation::Redirect(Route::Login)
        );

        session.set_token("tok").unwrap();
        assert_eq!(guard.before_each(&Route::Home), Navigation::Proceed);
        assert_eq!(guard.resolve(Route::Login), Route::Home);

        session.clear().unwrap();
        assert_eq!(guard.resolve(Route::Home), Route::Login);
        assert_eq!(guard.resolve(Route::Register), Route::Register);
    }

    #[test]
    fn test_route_from_path() {
        assert_eq!(Route::from_path("/"), Route::Home);
        assert_eq!(Route::from_path(""), Route::Home);
        assert_eq!(Route::from_path("/login"), Route::Login);
        assert_eq!(Route::from_path("/register/"), Route::Register);
        assert_eq!(
            Route::from_path("/folders/42"),
            Route::Other("/folders/42".to_string())
        );
        assert_eq!(Route::from_path("about"), Route::Other("/about".to_string()));
    }

    #[test]
    fn test_route_names_and_paths() {
        assert_eq!(Route::Home.name(), "home");
        assert_eq!(Route::Login.path(), "/login");
        assert_eq!(Route::Register.to_string(), "/register");
        assert!(Route::Login.is_public());
        assert!(!Route::Home.is_public());
    }
}
