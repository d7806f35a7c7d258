use anyhow::Result;
use async_trait::async_trait;
use csv::{Reader, Writer};
use log::{info, warn};
use shared::{CreditRecord, PaymentRecord};
use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter};
use std::path::Path;
use uuid::Uuid;

use super::vault::{CsvVault, CREDITS_HEADER, PAYMENTS_HEADER};
use crate::storage::traits::LedgerStore;

/// CSV-based repository for the two append-only history collections.
#[derive(Clone)]
pub struct LedgerRepository {
    vault: CsvVault,
}

impl LedgerRepository {
    pub fn new(vault: CsvVault) -> Self {
        Self { vault }
    }

    fn read_credits(&self, user_id: &str) -> Result<Vec<CreditRecord>> {
        let file_path = self.vault.credits_file_path(user_id);
        self.vault.ensure_file_exists(&file_path, CREDITS_HEADER)?;

        let file = File::open(&file_path)?;
        let reader = BufReader::new(file);
        let mut csv_reader = Reader::from_reader(reader);

        let mut credits = Vec::new();
        for result in csv_reader.records() {
            let record = result?;
            credits.push(CreditRecord {
                id: record.get(0).unwrap_or("").to_string(),
                user_id: record.get(1).unwrap_or("").to_string(),
                amount: record.get(2).unwrap_or("0").parse::<f64>().unwrap_or(0.0),
                timestamp: record.get(3).unwrap_or("").to_string(),
            });
        }

        Ok(credits)
    }

    fn write_credits(&self, user_id: &str, credits: &[CreditRecord]) -> Result<()> {
        let file_path = self.vault.credits_file_path(user_id);
        self.vault.ensure_file_exists(&file_path, CREDITS_HEADER)?;

        write_records(&file_path, &["id", "user_id", "amount", "timestamp"], credits, |c| {
            vec![
                c.id.clone(),
                c.user_id.clone(),
                c.amount.to_string(),
                c.timestamp.clone(),
            ]
        })
    }

    fn read_payments(&self, user_id: &str) -> Result<Vec<PaymentRecord>> {
        let file_path = self.vault.payments_file_path(user_id);
        self.vault.ensure_file_exists(&file_path, PAYMENTS_HEADER)?;

        let file = File::open(&file_path)?;
        let reader = BufReader::new(file);
        let mut csv_reader = Reader::from_reader(reader);

        let mut payments = Vec::new();
        for result in csv_reader.records() {
            let record = result?;
            payments.push(PaymentRecord {
                id: record.get(0).unwrap_or("").to_string(),
                user_id: record.get(1).unwrap_or("").to_string(),
                description: record.get(2).unwrap_or("").to_string(),
                amount: record.get(3).unwrap_or("0").parse::<f64>().unwrap_or(0.0),
                timestamp: record.get(4).unwrap_or("").to_string(),
            });
        }

        Ok(payments)
    }

    fn write_payments(&self, user_id: &str, payments: &[PaymentRecord]) -> Result<()> {
        let file_path = self.vault.payments_file_path(user_id);
        self.vault.ensure_file_exists(&file_path, PAYMENTS_HEADER)?;

        write_records(
            &file_path,
            &["id", "user_id", "description", "amount", "timestamp"],
            payments,
            |p| {
                vec![
                    p.id.clone(),
                    p.user_id.clone(),
                    p.description.clone(),
                    p.amount.to_string(),
                    p.timestamp.clone(),
                ]
            },
        )
    }
}

/// Rewrite a record file whole: temp file, header, rows, atomic rename.
fn write_records<T>(
    file_path: &Path,
    header: &[&str],
    records: &[T],
    to_row: impl Fn(&T) -> Vec<String>,
) -> Result<()> {
    let temp_path = file_path.with_extension("tmp");
    {
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_path)?;
        let writer = BufWriter::new(file);
        let mut csv_writer = Writer::from_writer(writer);

        csv_writer.write_record(header)?;
        for record in records {
            csv_writer.write_record(to_row(record))?;
        }

        csv_writer.flush()?;
    }

    std::fs::rename(&temp_path, file_path)?;
    Ok(())
}

#[async_trait]
impl LedgerStore for LedgerRepository {
    async fn insert_credit(
        &self,
        user_id: &str,
        amount: f64,
        timestamp: &str,
    ) -> Result<CreditRecord> {
        let credit = CreditRecord {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            amount,
            timestamp: timestamp.to_string(),
        };

        info!("Recording credit {} for user {}", credit.id, user_id);

        let mut credits = self.read_credits(user_id)?;
        credits.push(credit.clone());
        // RFC 3339 timestamps, so string order is chronological order.
        credits.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
        self.write_credits(user_id, &credits)?;

        Ok(credit)
    }

    async fn list_credits(&self, user_id: &str) -> Result<Vec<CreditRecord>> {
        let mut credits = self.read_credits(user_id)?;
        credits.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(credits)
    }

    async fn clear_credits(&self, user_id: &str) -> Result<u32> {
        let credits = self.read_credits(user_id)?;
        let removed = credits.len() as u32;

        if removed > 0 {
            self.write_credits(user_id, &[])?;
            info!("Cleared {} credit records for user {}", removed, user_id);
        }

        Ok(removed)
    }

    async fn insert_payment(
        &self,
        user_id: &str,
        description: &str,
        amount: f64,
        timestamp: &str,
    ) -> Result<PaymentRecord> {
        let payment = PaymentRecord {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            description: description.to_string(),
            amount,
            timestamp: timestamp.to_string(),
        };

        info!("Recording payment {} for user {}", payment.id, user_id);

        let mut payments = self.read_payments(user_id)?;
        payments.push(payment.clone());
        payments.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
        self.write_payments(user_id, &payments)?;

        Ok(payment)
    }

    async fn list_payments(&self, user_id: &str) -> Result<Vec<PaymentRecord>> {
        let mut payments = self.read_payments(user_id)?;
        payments.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(payments)
    }

    async fn delete_payment(&self, user_id: &str, payment_id: &str) -> Result<bool> {
        let mut payments = self.read_payments(user_id)?;
        let initial_len = payments.len();

        payments.retain(|p| p.id != payment_id);

        if payments.len() < initial_len {
            self.write_payments(user_id, &payments)?;
            info!("Deleted payment {} for user {}", payment_id, user_id);
            Ok(true)
        } else {
            warn!("Payment not found for deletion: {}", payment_id);
            Ok(false)
        }
    }

    async fn clear_payments(&self, user_id: &str) -> Result<u32> {
        let payments = self.read_payments(user_id)?;
        let removed = payments.len() as u32;

        if removed > 0 {
            self.write_payments(user_id, &[])?;
            info!("Cleared {} payment records for user {}", removed, user_id);
        }

        Ok(removed)
    }
}
