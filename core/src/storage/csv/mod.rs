//! CSV-file implementation of the storage contract.
//!
//! Each user gets a directory under the vault's base directory holding
//! `account.yaml` plus one CSV file per record collection. Files are
//! rewritten whole through a temp file and an atomic rename.

pub mod account_repository;
pub mod debt_repository;
pub mod ledger_repository;
pub mod vault;

pub use account_repository::AccountRepository;
pub use debt_repository::DebtRepository;
pub use ledger_repository::LedgerRepository;
pub use vault::CsvVault;
