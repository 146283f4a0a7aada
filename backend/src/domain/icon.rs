//! Avatar icon addressing.

use std::fmt;

use sha2::{Digest, Sha256};

use super::user::Username;

/// Object-store key for a user's icon.
///
/// The key is the lowercase hex SHA-256 digest of the username, so it is
/// stable for the lifetime of the account and safe to use as a file name.
///
/// # Examples
/// ```
/// use sns_backend::domain::{IconKey, Username};
///
/// let name = Username::new("alice").expect("valid username");
/// let key = IconKey::for_username(&name);
/// assert_eq!(key.as_str().len(), 64);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IconKey(String);

impl IconKey {
    pub fn for_username(username: &Username) -> Self {
        let digest = Sha256::digest(username.as_str().as_bytes());
        Self(hex::encode(digest))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for IconKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_is_sha256_hex_of_username() {
        let name = Username::new("abc").expect("valid username");
        assert_eq!(
            IconKey::for_username(&name).as_str(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn distinct_usernames_get_distinct_keys() {
        let alice = Username::new("alice").expect("valid username");
        let bob = Username::new("bob").expect("valid username");
        assert_ne!(IconKey::for_username(&alice), IconKey::for_username(&bob));
    }
}
