//! Client-side password digest.
//!
//! The server stores and compares the digest verbatim, so the plain
//! password never leaves the process.

use sha2::{Digest, Sha256};

/// Lowercase hex SHA-256 of `plain`, always 64 characters.
pub fn hash_password(plain: &str) -> String {
    hex::encode(Sha256::digest(plain.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_digest() {
        assert_eq!(
            hash_password("password"),
            "5e884898da28047151d0e56f8dc6292773603d0d6aabbdd62a11ef721d1542d8"
        );
    }

    #[test]
    fn digest_is_lowercase_hex() {
        let digest = hash_password("Пароль123");
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }
}
