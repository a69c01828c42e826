/// Access level of a logged-in user.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum UserRole {
    Admin,
    User,
}

impl UserRole {
    pub(crate) fn label(self) -> &'static str {
        match self {
            UserRole::Admin => "Admin",
            UserRole::User => "User",
        }
    }

    pub(crate) fn from_label(label: &str) -> Option<Self> {
        match label {
            "Admin" => Some(UserRole::Admin),
            "User" => Some(UserRole::User),
            _ => None,
        }
    }
}

pub(crate) const INVALID_CREDENTIALS_MESSAGE: &str =
    "Invalid credentials. Try admin/admin or user/user";

/// Check a username/password pair against the demo accounts.
pub(crate) fn check_credentials(username: &str, password: &str) -> Option<UserRole> {
    match (username, password) {
        ("admin", "admin") => Some(UserRole::Admin),
        ("user", "user") => Some(UserRole::User),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_credentials() {
        assert_eq!(check_credentials("admin", "admin"), Some(UserRole::Admin));
        assert_eq!(check_credentials("user", "user"), Some(UserRole::User));
        assert_eq!(check_credentials("admin", "user"), None);
        assert_eq!(check_credentials("Admin", "admin"), None);
        assert_eq!(check_credentials("", ""), None);
    }

    #[test]
    fn test_role_labels_round_trip() {
        assert_eq!(UserRole::from_label(UserRole::Admin.label()), Some(UserRole::Admin));
        assert_eq!(UserRole::from_label(UserRole::User.label()), Some(UserRole::User));
        assert_eq!(UserRole::from_label("root"), None);
    }
}
