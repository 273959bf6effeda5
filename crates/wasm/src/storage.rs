//! `localStorage` persistence

use ledger::{Company, Invoice, KeyValueStore, LedgerError, Repository, SavedInvoice, Settings};
use wasm_bindgen::prelude::*;

fn storage_error(value: JsValue) -> LedgerError {
    LedgerError::Storage(
        value
            .as_string()
            .unwrap_or_else(|| format!("{value:?}")),
    )
}

/// Key-value store over `window.localStorage`
pub struct LocalStorageStore {
    storage: web_sys::Storage,
}

impl LocalStorageStore {
    pub fn new() -> ledger::Result<Self> {
        let window =
            web_sys::window().ok_or_else(|| LedgerError::Storage("no window".to_string()))?;
        let storage = window
            .local_storage()
            .map_err(storage_error)?
            .ok_or_else(|| LedgerError::Storage("localStorage unavailable".to_string()))?;
        Ok(Self { storage })
    }
}

impl KeyValueStore for LocalStorageStore {
    fn get(&self, key: &str) -> ledger::Result<Option<String>> {
        self.storage.get_item(key).map_err(storage_error)
    }

    fn set(&mut self, key: &str, value: &str) -> ledger::Result<()> {
        self.storage.set_item(key, value).map_err(storage_error)
    }
}

fn js_error(e: LedgerError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Companies, invoice history and settings kept in `localStorage`
#[wasm_bindgen]
pub struct InvoiceStorage {
    repo: Repository<LocalStorageStore>,
}

#[wasm_bindgen]
impl InvoiceStorage {
    /// Open the browser's local storage
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<InvoiceStorage, JsValue> {
        let store = LocalStorageStore::new().map_err(js_error)?;
        Ok(InvoiceStorage {
            repo: Repository::new(store),
        })
    }

    /// @returns Company[]
    pub fn companies(&self) -> Result<JsValue, JsValue> {
        let companies = self.repo.companies().map_err(js_error)?;
        Ok(serde_wasm_bindgen::to_value(&companies)?)
    }

    /// Insert or replace a company
    ///
    /// @param company - Company (empty id for a new one)
    /// @returns the stored Company with its id
    #[wasm_bindgen(js_name = upsertCompany)]
    pub fn upsert_company(&mut self, company: JsValue) -> Result<JsValue, JsValue> {
        let company: Company = serde_wasm_bindgen::from_value(company)?;
        let stored = self.repo.upsert_company(company).map_err(js_error)?;
        Ok(serde_wasm_bindgen::to_value(&stored)?)
    }

    #[wasm_bindgen(js_name = deleteCompany)]
    pub fn delete_company(&mut self, id: &str) -> Result<bool, JsValue> {
        self.repo.delete_company(id).map_err(js_error)
    }

    /// @returns Company or undefined
    #[wasm_bindgen(js_name = findCompany)]
    pub fn find_company(&self, id: &str) -> Result<JsValue, JsValue> {
        let company = self.repo.find_company(id).map_err(js_error)?;
        Ok(serde_wasm_bindgen::to_value(&company)?)
    }

    /// @returns Invoice[], most recent first
    pub fn invoices(&self) -> Result<JsValue, JsValue> {
        let invoices = self.repo.invoices().map_err(js_error)?;
        Ok(serde_wasm_bindgen::to_value(&invoices)?)
    }

    #[wasm_bindgen(js_name = saveInvoice)]
    pub fn save_invoice(&mut self, invoice: JsValue) -> Result<(), JsValue> {
        let invoice: Invoice = serde_wasm_bindgen::from_value(invoice)?;
        self.repo.save_invoice(&invoice).map_err(js_error)
    }

    #[wasm_bindgen(js_name = deleteInvoice)]
    pub fn delete_invoice(&mut self, id: &str) -> Result<bool, JsValue> {
        self.repo.delete_invoice(id).map_err(js_error)
    }

    /// @returns Invoice or undefined
    #[wasm_bindgen(js_name = findInvoice)]
    pub fn find_invoice(&self, id: &str) -> Result<JsValue, JsValue> {
        let invoice = self.repo.find_invoice(id).map_err(js_error)?;
        Ok(serde_wasm_bindgen::to_value(&invoice)?)
    }

    /// @returns Settings (defaults when nothing is stored)
    pub fn settings(&self) -> Result<JsValue, JsValue> {
        let settings = self.repo.settings().map_err(js_error)?;
        Ok(serde_wasm_bindgen::to_value(&settings)?)
    }

    #[wasm_bindgen(js_name = saveSettings)]
    pub fn save_settings(&mut self, settings: JsValue) -> Result<(), JsValue> {
        let settings: Settings = serde_wasm_bindgen::from_value(settings)?;
        self.repo.save_settings(&settings).map_err(js_error)
    }

    /// Persist the result of `saveDraft`
    ///
    /// @param saved - { invoice, settings }
    #[wasm_bindgen(js_name = commitSave)]
    pub fn commit_save(&mut self, saved: JsValue) -> Result<(), JsValue> {
        let saved: SavedInvoice = serde_wasm_bindgen::from_value(saved)?;
        self.repo.commit_save(&saved).map_err(js_error)
    }
}
