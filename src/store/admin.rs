//! Admin credentials: username -> SHA-256 password digest.
//!
//! ## Rules
//!
//! - Username: 4-20 characters from `[A-Za-z0-9_]`
//! - Password: at least 8 characters from `[A-Za-z0-9!@#$%^&*]`, with at
//!   least one uppercase letter, lowercase letter, digit and special
//!   character
//!
//! Digests are lowercase hex, so `admins.txt` never holds a plaintext
//! password.

use std::sync::LazyLock;

use regex::Regex;
use sha2::{Digest, Sha256};
use tracing::warn;

use crate::error::ValidationError;
use crate::index::ChainedHashMap;
use crate::persist::codec::{decode_admin, encode_admin};

/// Username created when no credentials file exists
pub const DEFAULT_ADMIN_USERNAME: &str = "admin";

/// Password for [`DEFAULT_ADMIN_USERNAME`]
pub const DEFAULT_ADMIN_PASSWORD: &str = "Admin@123";

const SPECIAL_CHARS: &str = "!@#$%^&*";

static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_]{4,20}$").expect("Invalid regex"));

static PASSWORD_CHARSET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9!@#$%^&*]{8,}$").expect("Invalid regex"));

/// SHA-256 of the password, hex encoded
pub fn hash_password(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    if USERNAME_RE.is_match(username) {
        Ok(())
    } else {
        Err(ValidationError::InvalidFormat {
            field: "username".to_string(),
            reason: "4-20 letters, digits or underscores".to_string(),
        })
    }
}

pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    let strong = PASSWORD_CHARSET_RE.is_match(password)
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| SPECIAL_CHARS.contains(c));

    if strong {
        Ok(())
    } else {
        Err(ValidationError::InvalidFormat {
            field: "password".to_string(),
            reason: "at least 8 characters with an uppercase letter, lowercase letter, digit and special character".to_string(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct AdminTable {
    table: ChainedHashMap<String, String>,
}

impl AdminTable {
    pub fn with_buckets(bucket_count: usize) -> Self {
        Self {
            table: ChainedHashMap::with_buckets(bucket_count),
        }
    }

    /// Check a username/password pair
    pub fn authenticate(&self, username: &str, password: &str) -> bool {
        self.table
            .find(username)
            .is_some_and(|stored| *stored == hash_password(password))
    }

    /// Register a new admin.
    ///
    /// Checks run in order: username free, username format, password
    /// strength, confirmation match.
    pub fn add(&mut self, username: &str, password: &str, confirm: &str) -> Result<(), ValidationError> {
        if self.table.contains_key(username) {
            return Err(ValidationError::Duplicate {
                field: "username".to_string(),
                value: username.to_string(),
            });
        }
        validate_username(username)?;
        validate_password(password)?;
        if password != confirm {
            return Err(ValidationError::Mismatch {
                field: "password confirmation".to_string(),
            });
        }

        self.table.insert(username.to_string(), hash_password(password));
        Ok(())
    }

    /// Install the default `admin` account
    pub fn insert_default(&mut self) {
        self.table.insert(
            DEFAULT_ADMIN_USERNAME.to_string(),
            hash_password(DEFAULT_ADMIN_PASSWORD),
        );
    }

    pub fn contains(&self, username: &str) -> bool {
        self.table.contains_key(username)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn load_lines(&mut self, lines: &[String]) {
        for line in lines {
            match decode_admin(line) {
                Ok((user, hash)) => {
                    self.table.insert(user, hash);
                }
                Err(err) => warn!(error = %err, "Skipping malformed admin record"),
            }
        }
    }

    pub fn encode_lines(&self) -> Vec<String> {
        self.table.iter().map(|(u, h)| encode_admin(u, h)).collect()
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
