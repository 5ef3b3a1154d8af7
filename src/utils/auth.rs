/// Compare a submitted login field with the configured credential
///
/// Once the lengths agree every byte is visited, so a password that is one
/// character off is rejected in the same time as one that shares nothing.
pub fn constant_time_eq(submitted: &str, configured: &str) -> bool {
    let (submitted, configured) = (submitted.as_bytes(), configured.as_bytes());
    if submitted.len() != configured.len() {
        return false;
    }

    let diff = submitted
        .iter()
        .zip(configured)
        .fold(0u8, |acc, (a, b)| acc | (a ^ b));
    diff == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equal_secrets() {
        assert!(constant_time_eq("admin123", "admin123"));
    }

    #[test]
    fn test_different_secrets() {
        assert!(!constant_time_eq("admin124", "admin123"));
    }

    #[test]
    fn test_different_length() {
        assert!(!constant_time_eq("admin", "admin123"));
    }

    #[test]
    fn test_case_sensitive() {
        assert!(!constant_time_eq("Admin@electricien.com", "admin@electricien.com"));
    }

    #[test]
    fn test_non_ascii() {
        assert!(constant_time_eq("sécurité", "sécurité"));
        assert!(!constant_time_eq("securite", "sécurité"));
    }
}
