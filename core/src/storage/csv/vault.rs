use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

pub const DEBTS_HEADER: &str = "id,user_id,description,amount,due_date\n";
pub const CREDITS_HEADER: &str = "id,user_id,amount,timestamp\n";
pub const PAYMENTS_HEADER: &str = "id,user_id,description,amount,timestamp\n";

/// CsvVault manages file paths and ensures the per-user data files exist.
///
/// Clones share the same balance lock, so every [`AccountRepository`]
/// created from the same vault serializes its balance adjustments.
///
/// [`AccountRepository`]: super::AccountRepository
#[derive(Clone)]
pub struct CsvVault {
    base_directory: PathBuf,
    balance_lock: Arc<Mutex<()>>,
}

impl CsvVault {
    /// Create a new vault with a base directory.
    pub fn new<P: AsRef<Path>>(base_directory: P) -> Result<Self> {
        let base_path = base_directory.as_ref().to_path_buf();

        if !base_path.exists() {
            fs::create_dir_all(&base_path)?;
        }

        Ok(Self {
            base_directory: base_path,
            balance_lock: Arc::new(Mutex::new(())),
        })
    }

    /// Get the base directory path.
    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    /// Get the directory path for a user's data.
    pub fn user_directory(&self, user_id: &str) -> PathBuf {
        self.base_directory.join(user_id)
    }

    pub fn account_file_path(&self, user_id: &str) -> PathBuf {
        self.user_directory(user_id).join("account.yaml")
    }

    pub fn debts_file_path(&self, user_id: &str) -> PathBuf {
        self.user_directory(user_id).join("debts.csv")
    }

    pub fn credits_file_path(&self, user_id: &str) -> PathBuf {
        self.user_directory(user_id).join("credits.csv")
    }

    pub fn payments_file_path(&self, user_id: &str) -> PathBuf {
        self.user_directory(user_id).join("payments.csv")
    }

    /// Ensure a record file exists with its header, creating the user
    /// directory on the way if needed.
    pub fn ensure_file_exists(&self, path: &Path, header: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        if !path.exists() {
            fs::write(path, header)?;
        }

        Ok(())
    }

    /// Lock guarding read-modify-write balance updates.
    pub(crate) fn balance_lock(&self) -> Arc<Mutex<()>> {
        self.balance_lock.clone()
    }
}
