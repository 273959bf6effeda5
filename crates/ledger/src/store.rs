//! Persistence boundary
//!
//! Three logical collections live under fixed keys, each read and written
//! as a whole JSON document. The backing store only needs string get/set.

use crate::draft::SavedInvoice;
use crate::ids::{IdGenerator, UuidGenerator};
use crate::model::{Company, Invoice, Settings};
use crate::{LedgerError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Key of the company roster
pub const COMPANIES_KEY: &str = "invoicegen_companies";
/// Key of the invoice history (most recent first)
pub const HISTORY_KEY: &str = "invoicegen_history";
/// Key of the settings singleton
pub const SETTINGS_KEY: &str = "invoicegen_settings";

/// String key-value storage
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// In-process store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// One `<key>.json` file per key under a directory
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Store rooted at `dir` (created on first write)
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(self.path_for(key), value)?;
        Ok(())
    }
}

/// Typed access to the stored collections
pub struct Repository<S, I = UuidGenerator> {
    store: S,
    ids: I,
}

impl<S: KeyValueStore> Repository<S, UuidGenerator> {
    pub fn new(store: S) -> Self {
        Self::with_ids(store, UuidGenerator)
    }
}

impl<S: KeyValueStore, I: IdGenerator> Repository<S, I> {
    /// Repository that assigns company ids from `ids`
    pub fn with_ids(store: S, ids: I) -> Self {
        Self { store, ids }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// All companies, in roster order
    pub fn companies(&self) -> Result<Vec<Company>> {
        self.load(COMPANIES_KEY)
    }

    pub fn save_companies(&mut self, companies: &[Company]) -> Result<()> {
        self.write(COMPANIES_KEY, &companies)
    }

    /// Insert or replace a company
    ///
    /// An empty id gets a fresh one and the company is appended; a known id
    /// is replaced in place. Names must not be blank.
    pub fn upsert_company(&mut self, mut company: Company) -> Result<Company> {
        if company.name.trim().is_empty() {
            return Err(LedgerError::Validation(
                "company name is required".to_string(),
            ));
        }

        let mut companies = self.companies()?;
        if company.id.is_empty() {
            company.id = self.ids.next_id();
        }

        match companies.iter_mut().find(|c| c.id == company.id) {
            Some(existing) => *existing = company.clone(),
            None => companies.push(company.clone()),
        }

        self.save_companies(&companies)?;
        Ok(company)
    }

    /// Remove a company, returning whether it existed
    ///
    /// Invoices keep their own recipient snapshot and are unaffected.
    pub fn delete_company(&mut self, id: &str) -> Result<bool> {
        let mut companies = self.companies()?;
        let before = companies.len();
        companies.retain(|c| c.id != id);
        if companies.len() == before {
            return Ok(false);
        }
        self.save_companies(&companies)?;
        Ok(true)
    }

    pub fn find_company(&self, id: &str) -> Result<Option<Company>> {
        Ok(self.companies()?.into_iter().find(|c| c.id == id))
    }

    /// Invoice history, most recent first
    pub fn invoices(&self) -> Result<Vec<Invoice>> {
        self.load(HISTORY_KEY)
    }

    /// Replace an invoice with the same id, or insert it at the front
    pub fn save_invoice(&mut self, invoice: &Invoice) -> Result<()> {
        let mut invoices = self.invoices()?;
        match invoices.iter_mut().find(|i| i.id == invoice.id) {
            Some(existing) => *existing = invoice.clone(),
            None => invoices.insert(0, invoice.clone()),
        }
        self.write(HISTORY_KEY, &invoices)
    }

    /// Remove an invoice, returning whether it existed
    pub fn delete_invoice(&mut self, id: &str) -> Result<bool> {
        let mut invoices = self.invoices()?;
        let before = invoices.len();
        invoices.retain(|i| i.id != id);
        if invoices.len() == before {
            return Ok(false);
        }
        self.write(HISTORY_KEY, &invoices)?;
        Ok(true)
    }

    pub fn find_invoice(&self, id: &str) -> Result<Option<Invoice>> {
        Ok(self.invoices()?.into_iter().find(|i| i.id == id))
    }

    /// Stored settings, or the defaults when none were saved
    pub fn settings(&self) -> Result<Settings> {
        self.load(SETTINGS_KEY)
    }

    pub fn save_settings(&mut self, settings: &Settings) -> Result<()> {
        self.write(SETTINGS_KEY, settings)
    }

    /// Persist a saved draft: the invoice, then the advanced settings
    pub fn commit_save(&mut self, saved: &SavedInvoice) -> Result<()> {
        self.save_invoice(&saved.invoice)?;
        self.save_settings(&saved.settings)
    }

    fn load<T: DeserializeOwned + Default>(&self, key: &str) -> Result<T> {
        let Some(text) = self.store.get(key)? else {
            tracing::trace!(key, "Nothing stored, using defaults");
            return Ok(T::default());
        };

        serde_json::from_str(&text).map_err(|source| {
            tracing::warn!(key, error = %source, "Stored data failed to parse");
            LedgerError::Corrupt {
                key: key.to_string(),
                source,
            }
        })
    }

    fn write<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> Result<()> {
        let text = serde_json::to_string(value)?;
        tracing::debug!(key, bytes = text.len(), "Writing store entry");
        self.store.set(key, &text)
    }
}
