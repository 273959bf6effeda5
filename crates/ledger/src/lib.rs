//! Ledger - invoice records, totals and storage
//!
//! This crate provides:
//! - The data model (`Company`, `LineItem`, `Invoice`, `Settings`)
//! - The totals calculation shared by live preview and rendering
//! - Draft lifecycle: compose, save (with the number counter), duplicate
//! - A key-value persistence boundary with memory and file stores
//!
//! # Example
//!
//! ```ignore
//! use ledger::{save_draft, Company, InvoiceDraft, MemoryStore, Repository, UuidGenerator};
//!
//! let mut repo = Repository::new(MemoryStore::new());
//! let settings = repo.settings()?;
//! let client = repo.upsert_company(Company::new("Client Co", "2 Street"))?;
//!
//! let mut draft = InvoiceDraft::new(&settings, today, &mut UuidGenerator);
//! draft.select_recipient(&client);
//! let saved = save_draft(&draft, &settings, now_millis)?;
//! repo.commit_save(&saved)?;
//! ```

mod draft;
mod ids;
mod model;
mod store;
mod totals;

pub use draft::{
    duplicate_invoice, save_draft, InvoiceDraft, ItemUpdate, SavedInvoice, DEFAULT_INSTRUCTIONS,
    DEFAULT_ITEM_DESCRIPTION,
};
pub use ids::{IdGenerator, SequentialIds, UuidGenerator};
pub use model::{Company, Invoice, LineItem, Settings};
pub use store::{
    FileStore, KeyValueStore, MemoryStore, Repository, COMPANIES_KEY, HISTORY_KEY, SETTINGS_KEY,
};
pub use totals::{compute_totals, Totals};

use thiserror::Error;

/// Errors that can occur in ledger operations
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Cannot save an invoice without a recipient")]
    MissingRecipient,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Stored data under '{key}' is corrupt: {source}")]
    Corrupt {
        key: String,
        source: serde_json::Error,
    },

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for ledger operations
pub type Result<T> = std::result::Result<T, LedgerError>;
