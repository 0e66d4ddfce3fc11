//! Vault state access for the markvault popup.
//!
//! The popup is a companion surface: bookmarks themselves are managed
//! by the browser extension, and this crate only mirrors the vault
//! state the popup needs (initialized, locked, failed unlock count) in
//! a small TOML file under the data directory.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::Local;
use serde::{Deserialize, Serialize};

use markvault_core::{SetupError, SetupProbe};

/// File name of the vault state file inside the vault directory.
const STORE_FILE: &str = "vault.toml";

/// Failed unlock attempts before the vault goes on hold.
pub const MAX_FAILED_UNLOCKS: u32 = 3;

/// Seconds the vault stays on hold after too many failed unlocks.
pub const HOLD_SECONDS: u64 = 30;

/// On-disk vault state.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoreFile {
    #[serde(default)]
    initialized: bool,

    #[serde(default = "default_locked")]
    locked: bool,

    #[serde(default)]
    password_digest: Option<String>,

    #[serde(default)]
    failed_unlocks: u32,

    #[serde(default)]
    bookmark_count: u32,

    #[serde(default)]
    created_at: Option<String>,
}

fn default_locked() -> bool {
    true
}

impl Default for StoreFile {
    fn default() -> Self {
        Self {
            initialized: false,
            locked: true,
            password_digest: None,
            failed_unlocks: 0,
            bookmark_count: 0,
            created_at: None,
        }
    }
}

/// Snapshot of the vault state for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultStatus {
    pub initialized: bool,
    pub locked: bool,
    pub bookmark_count: u32,
    pub created_at: Option<String>,
}

/// Result of an unlock attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnlockOutcome {
    /// Password accepted, vault is unlocked.
    Unlocked,
    /// Password rejected; this many attempts remain before the hold.
    WrongPassword { attempts_left: u32 },
    /// Too many failures, the vault is on hold.
    OnHold,
}

/// Handle to the vault state file.
#[derive(Debug, Clone)]
pub struct Vault {
    dir: PathBuf,
}

impl Vault {
    /// Vault rooted at `dir`. Nothing is read or created until the
    /// first operation.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the vault state file.
    pub fn store_path(&self) -> PathBuf {
        self.dir.join(STORE_FILE)
    }

    fn load(&self) -> Result<Option<StoreFile>> {
        let path = self.store_path();
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let store = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(Some(store))
    }

    fn save(&self, store: &StoreFile) -> Result<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create {}", self.dir.display()))?;
        let content = toml::to_string_pretty(store)?;
        std::fs::write(self.store_path(), content)?;
        Ok(())
    }

    /// Whether the vault still needs first-run setup.
    ///
    /// A missing state file means setup has never run; a present file
    /// answers from its `initialized` flag. Read and parse failures
    /// bubble up so the caller can route to the error panel.
    pub fn needs_setup(&self) -> Result<bool> {
        match self.load()? {
            Some(store) => Ok(!store.initialized),
            None => Ok(true),
        }
    }

    /// Current vault state for display.
    pub fn status(&self) -> Result<VaultStatus> {
        let store = self.load()?.unwrap_or_default();
        Ok(VaultStatus {
            initialized: store.initialized,
            locked: store.locked,
            bookmark_count: store.bookmark_count,
            created_at: store.created_at,
        })
    }

    /// First-run setup: record the password and leave the vault
    /// unlocked.
    pub fn initialize(&self, password: &str) -> Result<()> {
        if let Some(store) = self.load()? {
            if store.initialized {
                bail!("Vault is already initialized");
            }
        }
        self.save(&StoreFile {
            initialized: true,
            locked: false,
            password_digest: Some(digest(password)),
            failed_unlocks: 0,
            bookmark_count: 0,
            created_at: Some(Local::now().to_rfc3339()),
        })
    }

    /// Try to unlock the vault with `password`.
    ///
    /// While the vault is on hold every attempt reports
    /// [`UnlockOutcome::OnHold`], even with the right password.
    pub fn unlock(&self, password: &str) -> Result<UnlockOutcome> {
        let Some(mut store) = self.load()? else {
            bail!("Vault is not initialized");
        };
        if !store.initialized {
            bail!("Vault is not initialized");
        }
        if store.failed_unlocks >= MAX_FAILED_UNLOCKS {
            return Ok(UnlockOutcome::OnHold);
        }

        if store.password_digest.as_deref() == Some(digest(password).as_str()) {
            store.locked = false;
            store.failed_unlocks = 0;
            self.save(&store)?;
            return Ok(UnlockOutcome::Unlocked);
        }

        store.failed_unlocks += 1;
        self.save(&store)?;
        if store.failed_unlocks >= MAX_FAILED_UNLOCKS {
            Ok(UnlockOutcome::OnHold)
        } else {
            Ok(UnlockOutcome::WrongPassword {
                attempts_left: MAX_FAILED_UNLOCKS - store.failed_unlocks,
            })
        }
    }

    /// Lock the vault.
    pub fn lock(&self) -> Result<()> {
        let Some(mut store) = self.load()? else {
            bail!("Vault is not initialized");
        };
        store.locked = true;
        self.save(&store)
    }

    /// Clear the failed unlock counter once the hold has elapsed.
    pub fn release_hold(&self) -> Result<()> {
        let Some(mut store) = self.load()? else {
            bail!("Vault is not initialized");
        };
        store.failed_unlocks = 0;
        self.save(&store)
    }

    /// Replace the password after verifying the current one.
    pub fn change_password(&self, current: &str, new: &str) -> Result<()> {
        let Some(mut store) = self.load()? else {
            bail!("Vault is not initialized");
        };
        if !store.initialized {
            bail!("Vault is not initialized");
        }
        if store.password_digest.as_deref() != Some(digest(current).as_str()) {
            bail!("Current password does not match");
        }
        store.password_digest = Some(digest(new));
        self.save(&store)
    }
}

impl SetupProbe for Vault {
    fn needs_setup(&self) -> Result<bool, SetupError> {
        Vault::needs_setup(self).map_err(|e| SetupError::new(e.to_string()))
    }
}

/// FNV-1a digest of the password, stable across runs.
///
/// The digest only gates the popup UI; the real credential check lives
/// in the extension's background process.
fn digest(password: &str) -> String {
    const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

    let mut hash = FNV_OFFSET;
    for byte in password.as_bytes() {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    format!("{:016x}", hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_vault() -> (tempfile::TempDir, Vault) {
        let dir = tempfile::tempdir().unwrap();
        let vault = Vault::new(dir.path());
        (dir, vault)
    }

    #[test]
    fn test_missing_store_needs_setup() {
        let (_dir, vault) = temp_vault();
        assert!(vault.needs_setup().unwrap());
        assert!(!vault.store_path().exists());
    }

    #[test]
    fn test_initialize_creates_unlocked_vault() {
        let (_dir, vault) = temp_vault();
        vault.initialize("hunter2").unwrap();

        assert!(!vault.needs_setup().unwrap());
        let status = vault.status().unwrap();
        assert!(status.initialized);
        assert!(!status.locked);
        assert_eq!(status.bookmark_count, 0);
        assert!(status.created_at.is_some());
    }

    #[test]
    fn test_initialize_twice_fails() {
        let (_dir, vault) = temp_vault();
        vault.initialize("hunter2").unwrap();
        assert!(vault.initialize("other").is_err());
    }

    #[test]
    fn test_unlock_before_initialize_fails() {
        let (_dir, vault) = temp_vault();
        assert!(vault.unlock("hunter2").is_err());
    }

    #[test]
    fn test_unlock_with_correct_password() {
        let (_dir, vault) = temp_vault();
        vault.initialize("hunter2").unwrap();
        vault.lock().unwrap();

        assert_eq!(vault.unlock("hunter2").unwrap(), UnlockOutcome::Unlocked);
        assert!(!vault.status().unwrap().locked);
    }

    #[test]
    fn test_wrong_password_counts_down_to_hold() {
        let (_dir, vault) = temp_vault();
        vault.initialize("hunter2").unwrap();
        vault.lock().unwrap();

        assert_eq!(
            vault.unlock("nope").unwrap(),
            UnlockOutcome::WrongPassword { attempts_left: 2 }
        );
        assert_eq!(
            vault.unlock("nope").unwrap(),
            UnlockOutcome::WrongPassword { attempts_left: 1 }
        );
        assert_eq!(vault.unlock("nope").unwrap(), UnlockOutcome::OnHold);

        // The right password no longer helps while on hold
        assert_eq!(vault.unlock("hunter2").unwrap(), UnlockOutcome::OnHold);
    }

    #[test]
    fn test_release_hold_allows_unlocking_again() {
        let (_dir, vault) = temp_vault();
        vault.initialize("hunter2").unwrap();
        vault.lock().unwrap();

        for _ in 0..MAX_FAILED_UNLOCKS {
            let _ = vault.unlock("nope").unwrap();
        }
        assert_eq!(vault.unlock("hunter2").unwrap(), UnlockOutcome::OnHold);

        vault.release_hold().unwrap();
        assert_eq!(vault.unlock("hunter2").unwrap(), UnlockOutcome::Unlocked);
    }

    #[test]
    fn test_change_password() {
        let (_dir, vault) = temp_vault();
        vault.initialize("hunter2").unwrap();

        assert!(vault.change_password("wrong", "new").is_err());
        vault.change_password("hunter2", "correct horse").unwrap();
        vault.lock().unwrap();

        assert_eq!(
            vault.unlock("correct horse").unwrap(),
            UnlockOutcome::Unlocked
        );
    }

    #[test]
    fn test_corrupted_store_reports_error() {
        let (_dir, vault) = temp_vault();
        std::fs::create_dir_all(vault.store_path().parent().unwrap()).unwrap();
        std::fs::write(vault.store_path(), "not valid toml [[[").unwrap();

        assert!(vault.needs_setup().is_err());
        let probe: &dyn SetupProbe = &vault;
        assert!(probe.needs_setup().is_err());
    }

    #[test]
    fn test_digest_is_stable() {
        assert_eq!(digest("hunter2"), digest("hunter2"));
        assert_ne!(digest("hunter2"), digest("hunter3"));
        // Known FNV-1a value, guards against accidental algorithm drift
        assert_eq!(digest(""), "cbf29ce484222325");
    }
}
