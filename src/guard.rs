//! Route Guard
//!
//! Decides, for a requested path and the current session, whether the page
//! renders, shows a loading state, or redirects elsewhere.

use crate::navigation::Location;
use crate::session::SessionState;

/// Query parameter carrying the page to return to after login
pub const RETURN_URL_KEY: &str = "returnUrl";

/// Landing page of a signed-in user
pub const DASHBOARD_PATH: &str = "/dashboard";

/// Known pages of the app
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// `/`
    Home,
    Login,
    Register,
    Dashboard,
    Classes,
    ClassDetail(i64),
    Content,
    ContentDetail(i64),
    Notes,
    Progress,
    Settings,
    Notifications,
    Users,
    NotFound,
}

/// Who may view a route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Anyone
    Public,
    /// Only signed-out visitors (login, register)
    PublicOnly,
    Authenticated,
    Admin,
}

impl Route {
    /// Resolve a path; the query string and fragment are ignored
    pub fn parse(path: &str) -> Self {
        let location = Location::parse(path);
        let segments: Vec<&str> = location
            .path()
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();

        match segments.as_slice() {
            [] => Route::Home,
            ["login"] => Route::Login,
            ["register"] => Route::Register,
            ["dashboard"] => Route::Dashboard,
            ["classes"] => Route::Classes,
            ["classes", id] => id.parse().map(Route::ClassDetail).unwrap_or(Route::NotFound),
            ["content"] => Route::Content,
            ["content", id] => id.parse().map(Route::ContentDetail).unwrap_or(Route::NotFound),
            ["notes"] => Route::Notes,
            ["progress"] => Route::Progress,
            ["settings"] => Route::Settings,
            ["notifications"] => Route::Notifications,
            ["users"] => Route::Users,
            _ => Route::NotFound,
        }
    }

    pub fn access(&self) -> Access {
        match self {
            Route::Home | Route::NotFound => Access::Public,
            Route::Login | Route::Register => Access::PublicOnly,
            Route::Users => Access::Admin,
            _ => Access::Authenticated,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Login => "/login".to_string(),
            Route::Register => "/register".to_string(),
            Route::Dashboard => DASHBOARD_PATH.to_string(),
            Route::Classes => "/classes".to_string(),
            Route::ClassDetail(id) => format!("/classes/{}", id),
            Route::Content => "/content".to_string(),
            Route::ContentDetail(id) => format!("/content/{}", id),
            Route::Notes => "/notes".to_string(),
            Route::Progress => "/progress".to_string(),
            Route::Settings => "/settings".to_string(),
            Route::Notifications => "/notifications".to_string(),
            Route::Users => "/users".to_string(),
            Route::NotFound => "/404".to_string(),
        }
    }
}

/// Outcome of guarding a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Render,
    /// Session still initializing; show a spinner
    Loading,
    Redirect(String),
}

/// Route guard bound to the configured login and landing paths
#[derive(Debug, Clone)]
pub struct RouteGuard {
    login_path: String,
    default_path: String,
}

impl Default for RouteGuard {
    fn default() -> Self {
        Self::new("/login", "/classes")
    }
}

impl RouteGuard {
    pub fn new(login_path: impl Into<String>, default_path: impl Into<String>) -> Self {
        Self {
            login_path: login_path.into(),
            default_path: default_path.into(),
        }
    }

    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    pub fn default_path(&self) -> &str {
        &self.default_path
    }

    /// Decide what to do with a request for `url`.
    ///
    /// `has_token` is whether a token is persisted; protected pages without
    /// one redirect at once, before the session has finished initializing.
    /// The login redirect remembers the path only, not the query.
    pub fn evaluate(&self, url: &str, state: &SessionState, has_token: bool) -> GuardDecision {
        let route = Route::parse(url);
        let location = Location::parse(url);

        match route.access() {
            Access::Authenticated | Access::Admin => {
                if !has_token {
                    return GuardDecision::Redirect(self.login_redirect(location.path()));
                }
                if !state.is_initialized {
                    return GuardDecision::Loading;
                }
                if !state.is_authenticated {
                    return GuardDecision::Redirect(self.login_redirect(location.path()));
                }
                if route.access() == Access::Admin {
                    // A trusted token without a loaded profile is not enough
                    let is_admin = state.user.as_ref().map(|u| u.is_admin()).unwrap_or(false);
                    if !is_admin {
                        return GuardDecision::Redirect(DASHBOARD_PATH.to_string());
                    }
                }
                GuardDecision::Render
            }
            Access::PublicOnly => {
                if !state.is_initialized {
                    GuardDecision::Loading
                } else if state.is_authenticated {
                    GuardDecision::Redirect(self.default_path.clone())
                } else {
                    GuardDecision::Render
                }
            }
            Access::Public if route == Route::Home => {
                if !state.is_initialized {
                    GuardDecision::Loading
                } else if state.is_authenticated {
                    GuardDecision::Redirect(DASHBOARD_PATH.to_string())
                } else {
                    GuardDecision::Redirect(self.login_path.clone())
                }
            }
            Access::Public => GuardDecision::Render,
        }
    }

    /// `/login?returnUrl=<url>`
    pub fn login_redirect(&self, original: &str) -> String {
        Location::parse(&self.login_path)
            .with_param(RETURN_URL_KEY, original)
            .to_string()
    }

    /// Where to go after a successful login from `login_url`.
    /// Only same-app paths are honoured.
    pub fn post_login_target(&self, login_url: &str) -> String {
        Location::parse(login_url)
            .param(RETURN_URL_KEY)
            .filter(|target| is_local_path(target))
            .map(str::to_string)
            .unwrap_or_else(|| self.default_path.clone())
    }

    /// Where to go after registering
    pub fn post_register_target(&self) -> String {
        DASHBOARD_PATH.to_string()
    }
}

fn is_local_path(target: &str) -> bool {
    target.starts_with('/') && !target.starts_with("//") && !target.contains('\\')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{User, UserType};

    fn user(kind: UserType) -> User {
        User {
            id: 1,
            username: "u".into(),
            email: "u@x.io".into(),
            user_type: kind,
            age: None,
            institution: None,
            created_at: None,
        }
    }

    fn signed_in(kind: UserType) -> SessionState {
        SessionState {
            user: Some(user(kind)),
            is_authenticated: true,
            is_initialized: true,
        }
    }

    fn signed_out() -> SessionState {
        SessionState {
            user: None,
            is_authenticated: false,
            is_initialized: true,
        }
    }

    #[test]
    fn test_route_parse() {
        assert_eq!(Route::parse("/"), Route::Home);
        assert_eq!(Route::parse("/classes/12?tab=notes"), Route::ClassDetail(12));
        assert_eq!(Route::parse("/classes/abc"), Route::NotFound);
        assert_eq!(Route::parse("/content/"), Route::Content);
        assert_eq!(Route::parse("/settings?tab=security"), Route::Settings);
        assert_eq!(Route::parse("/nope"), Route::NotFound);
        assert_eq!(Route::ContentDetail(4).path(), "/content/4");
    }

    #[test]
    fn test_protected_without_token_redirects_immediately() {
        let guard = RouteGuard::default();
        let booting = SessionState::default();

        assert_eq!(
            guard.evaluate("/classes/3", &booting, false),
            GuardDecision::Redirect("/login?returnUrl=%2Fclasses%2F3".into())
        );
    }

    #[test]
    fn test_return_url_drops_query() {
        let guard = RouteGuard::default();
        assert_eq!(
            guard.evaluate("/settings?tab=security", &signed_out(), false),
            GuardDecision::Redirect("/login?returnUrl=%2Fsettings".into())
        );
    }

    #[test]
    fn test_loading_while_initializing() {
        let guard = RouteGuard::default();
        let booting = SessionState::default();
        assert_eq!(guard.evaluate("/notes", &booting, true), GuardDecision::Loading);
        assert_eq!(guard.evaluate("/login", &booting, true), GuardDecision::Loading);
    }

    #[test]
    fn test_unauthenticated_after_init() {
        let guard = RouteGuard::default();
        assert_eq!(
            guard.evaluate("/progress", &signed_out(), true),
            GuardDecision::Redirect("/login?returnUrl=%2Fprogress".into())
        );
        assert_eq!(guard.evaluate("/login", &signed_out(), false), GuardDecision::Render);
    }

    #[test]
    fn test_public_only_redirects_signed_in() {
        let guard = RouteGuard::default();
        let state = signed_in(UserType::Student);
        assert_eq!(
            guard.evaluate("/register", &state, true),
            GuardDecision::Redirect("/classes".into())
        );
        assert_eq!(guard.evaluate("/classes", &state, true), GuardDecision::Render);
    }

    #[test]
    fn test_admin_route() {
        let guard = RouteGuard::default();
        assert_eq!(
            guard.evaluate("/users", &signed_in(UserType::Professor), true),
            GuardDecision::Redirect("/dashboard".into())
        );
        assert_eq!(
            guard.evaluate("/users", &signed_in(UserType::Admin), true),
            GuardDecision::Render
        );
    }

    #[test]
    fn test_home_and_not_found() {
        let guard = RouteGuard::default();
        assert_eq!(
            guard.evaluate("/", &signed_in(UserType::Student), true),
            GuardDecision::Redirect("/dashboard".into())
        );
        assert_eq!(
            guard.evaluate("/", &signed_out(), false),
            GuardDecision::Redirect("/login".into())
        );
        assert_eq!(guard.evaluate("/whatever", &signed_out(), false), GuardDecision::Render);
    }

    #[test]
    fn test_post_login_target() {
        let guard = RouteGuard::default();
        assert_eq!(
            guard.post_login_target("/login?returnUrl=%2Fclasses%2F3"),
            "/classes/3"
        );
        assert_eq!(guard.post_login_target("/login"), "/classes");
        assert_eq!(
            guard.post_login_target("/login?returnUrl=https%3A%2F%2Fevil.example"),
            "/classes"
        );
        assert_eq!(
            guard.post_login_target("/login?returnUrl=%2F%2Fevil.example"),
            "/classes"
        );
        assert_eq!(guard.post_register_target(), "/dashboard");
    }

    #[test]
    fn test_return_url_round_trip() {
        let guard = RouteGuard::new("/login", "/classes");
        let original = "/content/7?from=notes";
        let redirect = guard.login_redirect(original);
        assert_eq!(guard.post_login_target(&redirect), original);
    }
}
