/// Closed set of participant roles. Stored as lowercase TEXT; anything else
/// parses to `None` and carries no capabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Participant,
    Manager,
    Admin,
    /// Identity created to anchor a donation; has no login credential.
    Donor,
}

impl Role {
    pub fn parse(value: &str) -> Option<Role> {
        match value {
            "participant" => Some(Role::Participant),
            "manager" => Some(Role::Manager),
            "admin" => Some(Role::Admin),
            "donor" => Some(Role::Donor),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Participant => "participant",
            Role::Manager => "manager",
            Role::Admin => "admin",
            Role::Donor => "donor",
        }
    }

    pub fn is_elevated(self) -> bool {
        matches!(self, Role::Manager | Role::Admin)
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ParticipantRow {
    pub participant_id: i64,
    pub email: String,
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub role: String,
}

impl ParticipantRow {
    pub fn role(&self) -> Option<Role> {
        Role::parse(&self.role)
    }
}

#[cfg(test)]
mod tests {
    use super::Role;

    #[test]
    fn unknown_role_strings_parse_to_none() {
        assert_eq!(Role::parse("manager"), Some(Role::Manager));
        assert_eq!(Role::parse("Manager"), None);
        assert_eq!(Role::parse("mangaer"), None);
        assert_eq!(Role::parse(""), None);
    }

    #[test]
    fn only_manager_and_admin_are_elevated() {
        assert!(Role::Manager.is_elevated());
        assert!(Role::Admin.is_elevated());
        assert!(!Role::Participant.is_elevated());
        assert!(!Role::Donor.is_elevated());
    }
}
