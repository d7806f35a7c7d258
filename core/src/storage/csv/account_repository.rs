use anyhow::Result;
use async_trait::async_trait;
use log::{info, warn};
use shared::AccountProfile;
use std::fs;

use super::vault::CsvVault;
use crate::storage::traits::AccountStore;

/// Balance drift below a tenth of a cent is treated as zero when
/// checking whether an adjustment would overdraw the account.
const BALANCE_EPSILON: f64 = 0.001;

/// YAML-file account profile repository.
#[derive(Clone)]
pub struct AccountRepository {
    vault: CsvVault,
}

impl AccountRepository {
    pub fn new(vault: CsvVault) -> Self {
        Self { vault }
    }

    fn read_profile(&self, user_id: &str) -> Result<Option<AccountProfile>> {
        let path = self.vault.account_file_path(user_id);
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&path)?;
        let profile: AccountProfile = serde_yaml::from_str(&content)?;
        Ok(Some(profile))
    }

    fn write_profile(&self, profile: &AccountProfile) -> Result<()> {
        let path = self.vault.account_file_path(&profile.user_id);
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let content = serde_yaml::to_string(profile)?;
        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, content)?;
        fs::rename(&temp_path, &path)?;

        Ok(())
    }
}

#[async_trait]
impl AccountStore for AccountRepository {
    async fn create_profile(&self, profile: &AccountProfile) -> Result<()> {
        info!("Creating account profile for user {}", profile.user_id);

        if self.read_profile(&profile.user_id)?.is_some() {
            return Err(anyhow::anyhow!(
                "account profile already exists for user {}",
                profile.user_id
            ));
        }

        self.write_profile(profile)
    }

    async fn get_profile(&self, user_id: &str) -> Result<Option<AccountProfile>> {
        let profile = self.read_profile(user_id)?;
        if profile.is_none() {
            warn!("Account profile not found for user {}", user_id);
        }
        Ok(profile)
    }

    async fn adjust_balance(&self, user_id: &str, delta: f64) -> Result<f64> {
        let lock = self.vault.balance_lock();
        let _guard = lock.lock().await;

        let mut profile = self
            .read_profile(user_id)?
            .ok_or_else(|| anyhow::anyhow!("account profile not found for user {}", user_id))?;

        let new_balance = profile.balance + delta;
        if new_balance < -BALANCE_EPSILON {
            return Err(anyhow::anyhow!(
                "balance adjustment of {:.2} would overdraw the account (balance {:.2})",
                delta,
                profile.balance
            ));
        }

        profile.balance = new_balance.max(0.0);
        self.write_profile(&profile)?;

        info!(
            "Adjusted balance for user {} by {:.2} to {:.2}",
            user_id, delta, profile.balance
        );
        Ok(profile.balance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup() -> (AccountRepository, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let vault = CsvVault::new(temp_dir.path()).unwrap();
        (AccountRepository::new(vault), temp_dir)
    }

    fn test_profile(balance: f64) -> AccountProfile {
        AccountProfile {
            user_id: "user-1".to_string(),
            display_name: "Test User".to_string(),
            balance,
        }
    }

    #[tokio::test]
    async fn create_and_read_profile() {
        let (repo, _dir) = setup();

        repo.create_profile(&test_profile(0.0)).await.unwrap();

        let profile = repo.get_profile("user-1").await.unwrap().unwrap();
        assert_eq!(profile.display_name, "Test User");
        assert_eq!(profile.balance, 0.0);
    }

    #[tokio::test]
    async fn create_refuses_duplicate_profile() {
        let (repo, _dir) = setup();

        repo.create_profile(&test_profile(0.0)).await.unwrap();
        assert!(repo.create_profile(&test_profile(10.0)).await.is_err());
    }

    #[tokio::test]
    async fn missing_profile_reads_as_none() {
        let (repo, _dir) = setup();
        assert!(repo.get_profile("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn adjust_balance_applies_delta_and_persists() {
        let (repo, _dir) = setup();
        repo.create_profile(&test_profile(100.0)).await.unwrap();

        let balance = repo.adjust_balance("user-1", 50.0).await.unwrap();
        assert_eq!(balance, 150.0);

        let balance = repo.adjust_balance("user-1", -150.0).await.unwrap();
        assert_eq!(balance, 0.0);

        let profile = repo.get_profile("user-1").await.unwrap().unwrap();
        assert_eq!(profile.balance, 0.0);
    }

    #[tokio::test]
    async fn adjust_balance_refuses_overdraw_without_mutating() {
        let (repo, _dir) = setup();
        repo.create_profile(&test_profile(100.0)).await.unwrap();

        assert!(repo.adjust_balance("user-1", -150.0).await.is_err());

        let profile = repo.get_profile("user-1").await.unwrap().unwrap();
        assert_eq!(profile.balance, 100.0);
    }

    #[tokio::test]
    async fn adjust_balance_requires_a_profile() {
        let (repo, _dir) = setup();
        assert!(repo.adjust_balance("nobody", 10.0).await.is_err());
    }
}
