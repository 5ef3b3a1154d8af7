use crate::collections::load_or_seed;
use crate::models::user::User;
use crate::storage::store::{Store, StoreKey};

/// Read-only user roster
pub struct UserDirectory {
    users: Vec<User>,
}

impl UserDirectory {
    pub fn load(store: &Store) -> Self {
        Self {
            users: store.load(StoreKey::Users).unwrap_or_default(),
        }
    }

    pub fn load_or_seed<F>(store: &Store, seed: F) -> Self
    where
        F: FnOnce() -> Vec<User>,
    {
        Self {
            users: load_or_seed(store, StoreKey::Users, seed),
        }
    }

    pub fn list(&self) -> &[User] {
        &self.users
    }

    pub fn get(&self, id: i64) -> Option<&User> {
        self.users.iter().find(|user| user.id == id)
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::{Role, Status};

    #[test]
    fn test_directory_reads_stored_roster() {
        let store = Store::in_memory();
        let roster = vec![
            User::new(1, "Jean Dupont", "jean@example.com", Role::Admin, Status::Active),
            User::new(2, "Marie Martin", "marie@example.com", Role::User, Status::Active),
        ];
        store.save(StoreKey::Users, &roster);

        let directory = UserDirectory::load_or_seed(&store, Vec::new);
        assert_eq!(directory.list(), roster.as_slice());
        assert_eq!(directory.get(2).map(|u| u.name.as_str()), Some("Marie Martin"));
        assert!(directory.get(3).is_none());
    }

    #[test]
    fn test_absent_roster_is_empty() {
        let store = Store::in_memory();
        let directory = UserDirectory::load(&store);
        assert!(directory.is_empty());
        assert!(!store.contains(StoreKey::Users));
    }
}
