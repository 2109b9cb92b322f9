//! Role-gated navigation policy.
//!
//! Views that need a particular role send everyone else to the login view.
//! Roles are whatever the client declared at login; nothing here verifies
//! them.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::error::{KhanaError, Result};
use crate::user::{Role, UserSession};

/// A storefront view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum Route {
    Home,
    Login,
    Cart,
    ChefDashboard,
    Admin,
    OrderTracking,
}

/// Who may open a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    Public,
    AnySession,
    Role(Role),
}

/// Outcome of an access check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    Allow,
    RedirectToLogin,
}

impl Route {
    pub fn requirement(self) -> Requirement {
        match self {
            Route::Home | Route::Login => Requirement::Public,
            Route::Cart => Requirement::Role(Role::Customer),
            Route::ChefDashboard => Requirement::Role(Role::Chef),
            Route::Admin => Requirement::Role(Role::Admin),
            Route::OrderTracking => Requirement::AnySession,
        }
    }

    /// Where a freshly logged-in user lands.
    pub fn landing_for(role: Role) -> Route {
        match role {
            Role::Chef => Route::ChefDashboard,
            Role::Admin => Route::Admin,
            Role::Customer => Route::Home,
        }
    }
}

/// Stateless access checks.
pub struct AccessPolicy;

impl AccessPolicy {
    pub fn check(session: Option<&UserSession>, route: Route) -> AccessDecision {
        let allowed = match (route.requirement(), session) {
            (Requirement::Public, _) => true,
            (Requirement::AnySession, session) => session.is_some(),
            (Requirement::Role(role), Some(session)) => session.role == role,
            (Requirement::Role(_), None) => false,
        };

        if allowed {
            AccessDecision::Allow
        } else {
            AccessDecision::RedirectToLogin
        }
    }

    /// Like [`check`](Self::check) but returns the session on success and
    /// `AccessDenied` otherwise.
    pub fn require(session: Option<&UserSession>, route: Route) -> Result<&UserSession> {
        match (Self::check(session, route), session) {
            (AccessDecision::Allow, Some(session)) => Ok(session),
            _ => Err(KhanaError::access_denied(match route.requirement() {
                Requirement::Role(role) => format!("{route} requires a {role} session"),
                _ => format!("{route} requires a session"),
            })),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    fn session(role: Role) -> UserSession {
        UserSession::synthesize("t", "t@example.com", role, None)
    }

    #[test]
    fn test_public_routes_always_allowed() {
        for route in [Route::Home, Route::Login] {
            assert_eq!(AccessPolicy::check(None, route), AccessDecision::Allow);
        }
    }

    #[test]
    fn test_anonymous_redirected_from_gated_routes() {
        for route in Route::iter().filter(|r| r.requirement() != Requirement::Public) {
            assert_eq!(
                AccessPolicy::check(None, route),
                AccessDecision::RedirectToLogin,
                "{route}"
            );
        }
    }

    #[test]
    fn test_role_gates() {
        let chef = session(Role::Chef);
        let customer = session(Role::Customer);
        let admin = session(Role::Admin);

        assert_eq!(
            AccessPolicy::check(Some(&chef), Route::ChefDashboard),
            AccessDecision::Allow
        );
        assert_eq!(
            AccessPolicy::check(Some(&customer), Route::ChefDashboard),
            AccessDecision::RedirectToLogin
        );
        assert_eq!(
            AccessPolicy::check(Some(&chef), Route::Cart),
            AccessDecision::RedirectToLogin
        );
        assert_eq!(
            AccessPolicy::check(Some(&admin), Route::Admin),
            AccessDecision::Allow
        );
        assert_eq!(
            AccessPolicy::check(Some(&chef), Route::OrderTracking),
            AccessDecision::Allow
        );
    }

    #[test]
    fn test_require_reports_role() {
        let chef = session(Role::Chef);
        let err = AccessPolicy::require(Some(&chef), Route::Cart).unwrap_err();
        assert!(err.is_access_denied());
        assert!(err.to_string().contains("customer"));

        assert!(AccessPolicy::require(Some(&chef), Route::ChefDashboard).is_ok());
        assert!(AccessPolicy::require(None, Route::Home).is_err());
    }

    #[test]
    fn test_landing_routes() {
        assert_eq!(Route::landing_for(Role::Chef), Route::ChefDashboard);
        assert_eq!(Route::landing_for(Role::Admin), Route::Admin);
        assert_eq!(Route::landing_for(Role::Customer), Route::Home);
    }
}
