//! # Storage Module
//!
//! Handles all data persistence for the pocketbank core.
//!
//! The domain layer depends only on the traits in [`traits`]; the
//! implementation can be swapped (hosted backend, flat files, in-memory)
//! without touching the domain logic. The bundled implementations are a
//! CSV-file store ([`csv`]) and an in-memory auth gateway ([`memory`]).

pub mod csv;
pub mod memory;
pub mod traits;

pub use csv::CsvVault;
pub use memory::MemoryAuthGateway;
pub use traits::{AccountStore, AuthGateway, DebtStore, LedgerStore};
