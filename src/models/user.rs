use serde::{Deserialize, Serialize};

/// Account role shown in the admin roster
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Admin,
    #[serde(rename = "Utilisateur", alias = "User")]
    User,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    #[serde(rename = "Actif", alias = "Active")]
    Active,
    #[serde(rename = "Inactif", alias = "Inactive")]
    Inactive,
}

/// Roster entry. Read-only display data seeded once.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub status: Status,
}

impl User {
    pub fn new(id: i64, name: &str, email: &str, role: Role, status: Status) -> Self {
        Self {
            id,
            name: name.to_string(),
            email: email.to_string(),
            role,
            status,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == Status::Active
    }
}
