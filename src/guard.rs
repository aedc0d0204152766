//! Route guard: decides whether a route may render for the current session.

use crate::routes::{Route, RouteDescriptor};
use crate::session::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    Unauthenticated,
    RoleNotAllowed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Allowed,
    Denied { reason: DenyReason, redirect: Route },
}

impl GuardDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, GuardDecision::Allowed)
    }

    pub fn redirect(&self) -> Option<&Route> {
        match self {
            GuardDecision::Allowed => None,
            GuardDecision::Denied { redirect, .. } => Some(redirect),
        }
    }
}

/// Pure check of `session` against the route's allow-list.
///
/// Wrong role and missing token both send the user to `/login`.
pub fn evaluate(descriptor: &RouteDescriptor, session: &Session) -> GuardDecision {
    if descriptor.public {
        return GuardDecision::Allowed;
    }

    if !session.is_authenticated() {
        return GuardDecision::Denied {
            reason: DenyReason::Unauthenticated,
            redirect: Route::Login,
        };
    }

    if !descriptor.admits(session.role) {
        return GuardDecision::Denied {
            reason: DenyReason::RoleNotAllowed,
            redirect: Route::Login,
        };
    }

    GuardDecision::Allowed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::{Collection, ROUTE_TABLE};
    use crate::session::Role;

    fn session(token: Option<&str>, role: Option<Role>) -> Session {
        Session {
            token: token.map(str::to_string),
            role,
            ..Default::default()
        }
    }

    #[test]
    fn no_token_is_denied_everywhere_protected() {
        let roles = [None, Some(Role::SuperAdmin), Some(Role::Teacher), Some(Role::Student)];
        for descriptor in ROUTE_TABLE.iter().filter(|d| !d.public) {
            for role in roles {
                let decision = evaluate(descriptor, &session(None, role));
                assert_eq!(
                    decision,
                    GuardDecision::Denied {
                        reason: DenyReason::Unauthenticated,
                        redirect: Route::Login
                    },
                    "{} with role {:?}",
                    descriptor.pattern,
                    role
                );
            }
        }
    }

    #[test]
    fn wrong_role_is_sent_to_login() {
        let descriptor = Route::List(Collection::Teachers).descriptor();
        let decision = evaluate(descriptor, &session(Some("t1"), Some(Role::Teacher)));
        assert_eq!(decision.redirect(), Some(&Route::Login));
        assert!(matches!(
            decision,
            GuardDecision::Denied { reason: DenyReason::RoleNotAllowed, .. }
        ));
    }

    #[test]
    fn token_without_role_fails_restricted_routes() {
        let descriptor = Route::Dashboard.descriptor();
        assert!(!evaluate(descriptor, &session(Some("t1"), None)).is_allowed());
    }

    #[test]
    fn allowed_roles_render() {
        for descriptor in ROUTE_TABLE.iter().filter(|d| !d.public) {
            for role in descriptor.allowed_roles.unwrap_or(&Role::ALL) {
                assert!(
                    evaluate(descriptor, &session(Some("t1"), Some(*role))).is_allowed(),
                    "{} should admit {}",
                    descriptor.pattern,
                    role
                );
            }
        }
    }

    #[test]
    fn null_allow_list_admits_any_authenticated_session() {
        let descriptor = RouteDescriptor::authenticated("/anything");
        assert!(evaluate(&descriptor, &session(Some("t1"), None)).is_allowed());
        assert!(evaluate(&descriptor, &session(Some("t1"), Some(Role::Student))).is_allowed());
        assert!(!evaluate(&descriptor, &session(None, None)).is_allowed());
    }

    #[test]
    fn login_route_is_always_reachable() {
        assert!(evaluate(Route::Login.descriptor(), &Session::empty()).is_allowed());
    }
}
