use serde::{Deserialize, Serialize};

use crate::models::user::Role;

/// Stored while an administrator is logged in
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub email: String,
    pub name: String,
    pub role: Role,
    pub is_authenticated: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_record_layout() {
        let session = Session {
            email: "admin@electricien.com".to_string(),
            name: "Administrateur".to_string(),
            role: Role::Admin,
            is_authenticated: true,
        };
        let value = serde_json::to_value(&session).unwrap();

        assert_eq!(value["isAuthenticated"], true);
        assert_eq!(value["role"], "Admin");
    }
}
