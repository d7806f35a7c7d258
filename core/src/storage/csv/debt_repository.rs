use anyhow::Result;
use async_trait::async_trait;
use csv::{Reader, Writer};
use log::{info, warn};
use shared::Debt;
use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter};
use uuid::Uuid;

use super::vault::{CsvVault, DEBTS_HEADER};
use crate::storage::traits::DebtStore;

/// CSV-based debt repository.
#[derive(Clone)]
pub struct DebtRepository {
    vault: CsvVault,
}

impl DebtRepository {
    pub fn new(vault: CsvVault) -> Self {
        Self { vault }
    }

    /// Read all of a user's debts from their CSV file.
    fn read_debts(&self, user_id: &str) -> Result<Vec<Debt>> {
        let file_path = self.vault.debts_file_path(user_id);
        self.vault.ensure_file_exists(&file_path, DEBTS_HEADER)?;

        let file = File::open(&file_path)?;
        let reader = BufReader::new(file);
        let mut csv_reader = Reader::from_reader(reader);

        let mut debts = Vec::new();
        for result in csv_reader.records() {
            let record = result?;
            debts.push(Debt {
                id: record.get(0).unwrap_or("").to_string(),
                user_id: record.get(1).unwrap_or("").to_string(),
                description: record.get(2).unwrap_or("").to_string(),
                amount: record.get(3).unwrap_or("0").parse::<f64>().unwrap_or(0.0),
                due_date: record.get(4).unwrap_or("").to_string(),
            });
        }

        Ok(debts)
    }

    /// Write all of a user's debts back to their CSV file.
    fn write_debts(&self, user_id: &str, debts: &[Debt]) -> Result<()> {
        let file_path = self.vault.debts_file_path(user_id);
        self.vault.ensure_file_exists(&file_path, DEBTS_HEADER)?;

        let temp_path = file_path.with_extension("tmp");
        {
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)?;
            let writer = BufWriter::new(file);
            let mut csv_writer = Writer::from_writer(writer);

            csv_writer.write_record(["id", "user_id", "description", "amount", "due_date"])?;
            for debt in debts {
                csv_writer.write_record([
                    &debt.id,
                    &debt.user_id,
                    &debt.description,
                    &debt.amount.to_string(),
                    &debt.due_date,
                ])?;
            }

            csv_writer.flush()?;
        }

        std::fs::rename(&temp_path, &file_path)?;
        Ok(())
    }
}

#[async_trait]
impl DebtStore for DebtRepository {
    async fn insert_debt(
        &self,
        user_id: &str,
        description: &str,
        amount: f64,
        due_date: &str,
    ) -> Result<Debt> {
        let debt = Debt {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            description: description.to_string(),
            amount,
            due_date: due_date.to_string(),
        };

        info!("Storing debt {} for user {}", debt.id, user_id);

        let mut debts = self.read_debts(user_id)?;
        debts.push(debt.clone());
        // Due dates are YYYY-MM-DD, so string order is date order.
        debts.sort_by(|a, b| a.due_date.cmp(&b.due_date));
        self.write_debts(user_id, &debts)?;

        Ok(debt)
    }

    async fn list_debts(&self, user_id: &str) -> Result<Vec<Debt>> {
        let mut debts = self.read_debts(user_id)?;
        debts.sort_by(|a, b| a.due_date.cmp(&b.due_date));
        Ok(debts)
    }

    async fn delete_debt(&self, user_id: &str, debt_id: &str) -> Result<bool> {
        let mut debts = self.read_debts(user_id)?;
        let initial_len = debts.len();

        debts.retain(|d| d.id != debt_id);

        if debts.len() < initial_len {
            self.write_debts(user_id, &debts)?;
            info!("Deleted debt {} for user {}", debt_id, user_id);
            Ok(true)
        } else {
            warn!("Debt not found for deletion: {}", debt_id);
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup() -> (DebtRepository, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let vault = CsvVault::new(temp_dir.path()).unwrap();
        (DebtRepository::new(vault), temp_dir)
    }

    #[tokio::test]
    async fn insert_assigns_an_id_and_persists() {
        let (repo, _dir) = setup();

        let debt = repo
            .insert_debt("user-1", "Electric bill", 120.50, "2025-07-01")
            .await
            .unwrap();
        assert!(!debt.id.is_empty());

        let debts = repo.list_debts("user-1").await.unwrap();
        assert_eq!(debts.len(), 1);
        assert_eq!(debts[0].description, "Electric bill");
        assert_eq!(debts[0].amount, 120.50);
        assert_eq!(debts[0].due_date, "2025-07-01");
    }

    #[tokio::test]
    async fn list_orders_by_due_date_ascending() {
        let (repo, _dir) = setup();

        repo.insert_debt("user-1", "Later", 10.0, "2025-09-01").await.unwrap();
        repo.insert_debt("user-1", "Soonest", 10.0, "2025-06-01").await.unwrap();
        repo.insert_debt("user-1", "Middle", 10.0, "2025-07-15").await.unwrap();

        let debts = repo.list_debts("user-1").await.unwrap();
        let order: Vec<&str> = debts.iter().map(|d| d.description.as_str()).collect();
        assert_eq!(order, ["Soonest", "Middle", "Later"]);
    }

    #[tokio::test]
    async fn delete_removes_only_the_named_debt() {
        let (repo, _dir) = setup();

        let keep = repo.insert_debt("user-1", "Keep", 10.0, "2025-06-01").await.unwrap();
        let gone = repo.insert_debt("user-1", "Gone", 20.0, "2025-07-01").await.unwrap();

        assert!(repo.delete_debt("user-1", &gone.id).await.unwrap());
        assert!(!repo.delete_debt("user-1", &gone.id).await.unwrap());

        let debts = repo.list_debts("user-1").await.unwrap();
        assert_eq!(debts.len(), 1);
        assert_eq!(debts[0].id, keep.id);
    }

    #[tokio::test]
    async fn descriptions_with_commas_survive_the_round_trip() {
        let (repo, _dir) = setup();

        repo.insert_debt("user-1", "Rent, June", 800.0, "2025-06-05")
            .await
            .unwrap();

        let debts = repo.list_debts("user-1").await.unwrap();
        assert_eq!(debts[0].description, "Rent, June");
    }
}
