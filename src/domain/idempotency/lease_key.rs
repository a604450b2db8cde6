//! LeaseKey value object.

use std::fmt;

/// Key under which an idempotency lease is stored.
///
/// Always `<prefix><client key>`, or `<prefix><METHOD>:<path>:<client key>`
/// when scoped by route. The client key is used verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LeaseKey(String);

impl LeaseKey {
    /// Key shared by every route.
    pub fn global(prefix: &str, client_key: &str) -> Self {
        Self(format!("{}{}", prefix, client_key))
    }

    /// Key scoped to one method and route path.
    pub fn scoped(prefix: &str, method: &str, path: &str, client_key: &str) -> Self {
        Self(format!("{}{}:{}:{}", prefix, method, path, client_key))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LeaseKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_key_is_prefix_plus_client_key() {
        assert_eq!(LeaseKey::global("idem:", "abc123").as_str(), "idem:abc123");
    }

    #[test]
    fn client_key_is_not_normalized() {
        assert_eq!(LeaseKey::global("idem:", "AbC 1").as_str(), "idem:AbC 1");
    }

    #[test]
    fn scoped_key_includes_method_and_path() {
        let key = LeaseKey::scoped("idem:", "POST", "/api/events", "abc123");
        assert_eq!(key.to_string(), "idem:POST:/api/events:abc123");
    }

    #[test]
    fn scoped_keys_differ_per_route() {
        let a = LeaseKey::scoped("idem:", "POST", "/a", "k");
        let b = LeaseKey::scoped("idem:", "POST", "/b", "k");
        assert_ne!(a, b);
    }
}
