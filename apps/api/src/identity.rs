#![allow(dead_code)]

//! Client identity — a stable anonymous token per installation.
//!
//! The token carries no account semantics: it only lets the same
//! installation map onto the same presence record (and vote memory)
//! across restarts. Wiping the backing storage mints a fresh identity,
//! which is the accepted spoofing model.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use rand::{distributions::Alphanumeric, Rng};

const TOKEN_LEN: usize = 22;

pub trait ClientIdentityProvider: Send + Sync {
    /// Returns this installation's stable token, minting and persisting
    /// one on first use.
    fn get_or_create(&self) -> Result<String>;
}

/// Token provider backed by a plain file, the durable local key-value
/// store available everywhere a Rust client runs.
pub struct FileIdentityProvider {
    path: PathBuf,
}

impl FileIdentityProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileIdentityProvider { path: path.into() }
    }
}

impl ClientIdentityProvider for FileIdentityProvider {
    fn get_or_create(&self) -> Result<String> {
        if let Ok(existing) = fs::read_to_string(&self.path) {
            let token = existing.trim();
            if !token.is_empty() {
                return Ok(token.to_string());
            }
        }

        let token: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(TOKEN_LEN)
            .map(char::from)
            .collect();

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating identity dir {}", parent.display()))?;
        }
        fs::write(&self.path, &token)
            .with_context(|| format!("persisting identity token to {}", self.path.display()))?;
        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_is_stable_across_calls() {
        let dir = tempfile::tempdir().unwrap();
        let provider = FileIdentityProvider::new(dir.path().join("client_id"));

        let first = provider.get_or_create().unwrap();
        let second = provider.get_or_create().unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), TOKEN_LEN);
        assert!(first.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_missing_parent_directories_are_created() {
        let dir = tempfile::tempdir().unwrap();
        let provider = FileIdentityProvider::new(dir.path().join("nested/deeper/client_id"));
        assert!(!provider.get_or_create().unwrap().is_empty());
    }

    #[test]
    fn test_two_installations_get_distinct_tokens() {
        let dir = tempfile::tempdir().unwrap();
        let a = FileIdentityProvider::new(dir.path().join("a"));
        let b = FileIdentityProvider::new(dir.path().join("b"));
        assert_ne!(a.get_or_create().unwrap(), b.get_or_create().unwrap());
    }
}
