use crate::models::{ParticipantRow, Role};

/// The resolved identity attached to a request once the session cookie has
/// been mapped to a participant. Handlers and templates branch on it.
#[derive(Clone, Debug)]
pub struct SessionUser {
    pub participant_id: i64,
    pub email: String,
    pub first_name: Option<String>,
    pub role: Option<Role>,
}

impl SessionUser {
    pub fn from_row(row: &ParticipantRow) -> SessionUser {
        SessionUser {
            participant_id: row.participant_id,
            email: row.email.clone(),
            first_name: row.first_name.clone(),
            role: row.role(),
        }
    }

    pub fn is_elevated(&self) -> bool {
        self.role.is_some_and(Role::is_elevated)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Capability {
    /// Any logged-in identity. Denial redirects to the login page.
    Authenticated,
    /// Manager/admin tier. Denial is a terminal 403, never a redirect.
    Elevated,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DenyReason {
    NotLoggedIn,
    NotElevated,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(DenyReason),
}

/// The single access gate applied ahead of every protected route. Runs
/// before any mutation; it never partially applies.
pub fn decide(session: Option<&SessionUser>, capability: Capability) -> Decision {
    let Some(user) = session else {
        return Decision::Deny(DenyReason::NotLoggedIn);
    };
    match capability {
        Capability::Authenticated => Decision::Allow,
        Capability::Elevated => {
            if user.is_elevated() {
                Decision::Allow
            } else {
                Decision::Deny(DenyReason::NotElevated)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: Option<Role>) -> SessionUser {
        SessionUser {
            participant_id: 7,
            email: "p@example.org".to_string(),
            first_name: None,
            role,
        }
    }

    #[test]
    fn anonymous_is_denied_everywhere() {
        assert_eq!(
            decide(None, Capability::Authenticated),
            Decision::Deny(DenyReason::NotLoggedIn)
        );
        assert_eq!(
            decide(None, Capability::Elevated),
            Decision::Deny(DenyReason::NotLoggedIn)
        );
    }

    #[test]
    fn any_identity_passes_the_authenticated_tier() {
        for role in [
            Some(Role::Participant),
            Some(Role::Manager),
            Some(Role::Admin),
            Some(Role::Donor),
            None,
        ] {
            assert_eq!(
                decide(Some(&user(role)), Capability::Authenticated),
                Decision::Allow
            );
        }
    }

    #[test]
    fn only_manager_and_admin_pass_the_elevated_tier() {
        assert_eq!(
            decide(Some(&user(Some(Role::Manager))), Capability::Elevated),
            Decision::Allow
        );
        assert_eq!(
            decide(Some(&user(Some(Role::Admin))), Capability::Elevated),
            Decision::Allow
        );
        assert_eq!(
            decide(Some(&user(Some(Role::Participant))), Capability::Elevated),
            Decision::Deny(DenyReason::NotElevated)
        );
        assert_eq!(
            decide(Some(&user(Some(Role::Donor))), Capability::Elevated),
            Decision::Deny(DenyReason::NotElevated)
        );
    }

    #[test]
    fn unparsed_role_carries_no_elevated_capability() {
        // A row with a mistyped role string resolves to no role at all.
        assert_eq!(
            decide(Some(&user(None)), Capability::Elevated),
            Decision::Deny(DenyReason::NotElevated)
        );
    }
}
