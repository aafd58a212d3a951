//! Route guard decisions.
//!
//! The router asks [`decide`] what to do with a guarded route given the
//! current [`SessionState`]. Guarded pages are mounted only on
//! [`GuardOutcome::Render`], so their requests never leave the browser for a
//! visitor who is not allowed to see them.

use crate::models::Role;
use crate::session::SessionState;

/// Role requirement attached to a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GuardPolicy {
    /// Any visitor.
    #[default]
    None,
    /// Signed-in admins only.
    RequireAdmin,
    /// Signed-in non-admin users only.
    RequireUser,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardOutcome {
    /// Session check still running.
    Loading,
    Render,
    RedirectLogin,
    RedirectUnauthorized,
}

/// Decide from the raw flags.
pub fn decide_flags(
    loading: bool,
    is_authenticated: bool,
    is_admin: bool,
    policy: GuardPolicy,
) -> GuardOutcome {
    if policy == GuardPolicy::None {
        return GuardOutcome::Render;
    }
    if loading {
        return GuardOutcome::Loading;
    }
    if !is_authenticated {
        return GuardOutcome::RedirectLogin;
    }
    match policy {
        GuardPolicy::RequireAdmin if !is_admin => GuardOutcome::RedirectUnauthorized,
        GuardPolicy::RequireUser if is_admin => GuardOutcome::RedirectUnauthorized,
        _ => GuardOutcome::Render,
    }
}

pub fn decide(state: &SessionState, policy: GuardPolicy) -> GuardOutcome {
    decide_flags(
        state.is_loading(),
        state.is_authenticated(),
        state.is_admin(),
        policy,
    )
}

/// Where a signed-in user lands: admins on the user list, everyone else on
/// the uploader.
pub fn home_path(role: Role) -> &'static str {
    match role {
        Role::Admin => "/admin/users",
        Role::User => "/upload",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use GuardOutcome::*;
    use GuardPolicy::RequireAdmin as Admin;
    use GuardPolicy::RequireUser as UserOnly;

    #[test]
    fn test_loading_placeholder() {
        assert_eq!(decide_flags(true, false, false, Admin), Loading);
        assert_eq!(decide_flags(true, true, true, UserOnly), Loading);
    }

    #[test]
    fn test_unauthenticated_goes_to_login() {
        assert_eq!(decide_flags(false, false, false, Admin), RedirectLogin);
        assert_eq!(decide_flags(false, false, false, UserOnly), RedirectLogin);
    }

    #[test]
    fn test_require_admin() {
        assert_eq!(decide_flags(false, true, false, Admin), RedirectUnauthorized);
        assert_eq!(decide_flags(false, true, true, Admin), Render);
    }

    #[test]
    fn test_require_user() {
        assert_eq!(decide_flags(false, true, true, UserOnly), RedirectUnauthorized);
        assert_eq!(decide_flags(false, true, false, UserOnly), Render);
    }

    #[test]
    fn test_open_routes_always_render() {
        for (loading, auth, admin) in [(true, false, false), (false, false, false), (false, true, true)] {
            assert_eq!(decide_flags(loading, auth, admin, GuardPolicy::None), Render);
        }
    }

    #[test]
    fn test_decide_on_default_state() {
        assert_eq!(decide(&SessionState::default(), Admin), Loading);
    }

    #[test]
    fn test_home_path() {
        assert_eq!(home_path(Role::Admin), "/admin/users");
        assert_eq!(home_path(Role::User), "/upload");
    }
}
