//! WASM bindings for invoicegen
//!
//! This crate provides JavaScript-friendly API for:
//! - Totals and number formatting for live preview
//! - Composing, saving and duplicating drafts
//! - Rendering invoices to PDF bytes
//! - `localStorage` persistence (`InvoiceStorage`)
//!
//! # Example (JavaScript)
//!
//! ```javascript
//! import init, { InvoiceStorage, newDraft, saveDraft, renderInvoicePdf, exportFileName } from 'invoicegen-wasm';
//!
//! await init();
//!
//! const storage = new InvoiceStorage();
//! const draft = newDraft(storage.settings());
//! draft.recipient = storage.companies()[0];
//!
//! const saved = saveDraft(draft, storage.settings());
//! storage.commitSave(saved);
//!
//! const pdf = renderInvoicePdf(saved.invoice);
//! download(pdf, exportFileName(saved.invoice));
//! ```

mod storage;

pub use storage::{InvoiceStorage, LocalStorageStore};

use chrono::NaiveDate;
use invoice_render::LayoutConfig;
use ledger::{Invoice, InvoiceDraft, ItemUpdate, LineItem, Settings, UuidGenerator};
use wasm_bindgen::prelude::*;

// Initialize panic hook for better error messages in browser console
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

fn js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Today's local date (chrono's clock is not available in the browser)
fn today() -> Result<NaiveDate, JsValue> {
    let now = js_sys::Date::new_0();
    NaiveDate::from_ymd_opt(
        now.get_full_year() as i32,
        now.get_month() + 1,
        now.get_date(),
    )
    .ok_or_else(|| JsValue::from_str("invalid system date"))
}

fn now_millis() -> i64 {
    js_sys::Date::now() as i64
}

/// Subtotal, tax and total
///
/// @param items - LineItem[]
/// @param taxRate - Percentage
/// @returns { subtotal, tax, total }
#[wasm_bindgen(js_name = computeTotals)]
pub fn compute_totals(items: JsValue, tax_rate: f64) -> Result<JsValue, JsValue> {
    let items: Vec<LineItem> = serde_wasm_bindgen::from_value(items)?;
    let totals = ledger::compute_totals(&items, tax_rate);
    Ok(serde_wasm_bindgen::to_value(&totals)?)
}

/// Format an amount with two decimals
#[wasm_bindgen(js_name = formatAmount)]
pub fn format_amount(amount: f64) -> String {
    invoice_text::format_amount(amount)
}

/// Read a number from form input, zero when unparsable
#[wasm_bindgen(js_name = coerceNumber)]
pub fn coerce_number(text: &str) -> f64 {
    invoice_text::coerce_number(text)
}

/// Render an invoice to PDF
///
/// @param invoice - Invoice
/// @param layoutJson - Optional LayoutConfig JSON
/// @returns PDF bytes (Uint8Array)
#[wasm_bindgen(js_name = renderInvoicePdf)]
pub fn render_invoice_pdf(invoice: JsValue, layout_json: Option<String>) -> Result<Vec<u8>, JsValue> {
    let invoice: Invoice = serde_wasm_bindgen::from_value(invoice)?;
    let config = match layout_json {
        Some(json) => LayoutConfig::from_json(&json).map_err(js_error)?,
        None => LayoutConfig::default(),
    };
    invoice_render::render_pdf(&invoice, &config).map_err(js_error)
}

/// Download name, `Invoice_<number>.pdf`
#[wasm_bindgen(js_name = exportFileName)]
pub fn export_file_name(invoice: JsValue) -> Result<String, JsValue> {
    let invoice: Invoice = serde_wasm_bindgen::from_value(invoice)?;
    Ok(invoice_render::export_file_name(&invoice))
}

/// Fresh draft dated today
///
/// @param settings - Settings
/// @returns InvoiceDraft
#[wasm_bindgen(js_name = newDraft)]
pub fn new_draft(settings: JsValue) -> Result<JsValue, JsValue> {
    let settings: Settings = serde_wasm_bindgen::from_value(settings)?;
    let draft = InvoiceDraft::new(&settings, today()?, &mut UuidGenerator);
    Ok(serde_wasm_bindgen::to_value(&draft)?)
}

/// Append a blank row
///
/// @returns the updated InvoiceDraft
#[wasm_bindgen(js_name = addItem)]
pub fn add_item(draft: JsValue) -> Result<JsValue, JsValue> {
    let mut draft: InvoiceDraft = serde_wasm_bindgen::from_value(draft)?;
    draft.add_item(&mut UuidGenerator);
    Ok(serde_wasm_bindgen::to_value(&draft)?)
}

/// Apply a form edit to a row
///
/// @param field - "description" | "rate" | "quantity"
/// @param value - Raw input text
/// @returns the updated InvoiceDraft
#[wasm_bindgen(js_name = updateItem)]
pub fn update_item(draft: JsValue, id: &str, field: &str, value: &str) -> Result<JsValue, JsValue> {
    let mut draft: InvoiceDraft = serde_wasm_bindgen::from_value(draft)?;
    let update = ItemUpdate::from_field(field, value)
        .ok_or_else(|| JsValue::from_str(&format!("unknown item field: {field}")))?;
    draft.update_item(id, update);
    Ok(serde_wasm_bindgen::to_value(&draft)?)
}

/// Freeze a draft
///
/// @returns { invoice, settings } - pass to `InvoiceStorage.commitSave`
#[wasm_bindgen(js_name = saveDraft)]
pub fn save_draft(draft: JsValue, settings: JsValue) -> Result<JsValue, JsValue> {
    let draft: InvoiceDraft = serde_wasm_bindgen::from_value(draft)?;
    let settings: Settings = serde_wasm_bindgen::from_value(settings)?;
    let saved = ledger::save_draft(&draft, &settings, now_millis()).map_err(js_error)?;
    Ok(serde_wasm_bindgen::to_value(&saved)?)
}

/// New draft copied from a stored invoice, dated today
#[wasm_bindgen(js_name = duplicateInvoice)]
pub fn duplicate_invoice(invoice: JsValue, settings: JsValue) -> Result<JsValue, JsValue> {
    let invoice: Invoice = serde_wasm_bindgen::from_value(invoice)?;
    let settings: Settings = serde_wasm_bindgen::from_value(settings)?;
    let draft = ledger::duplicate_invoice(&invoice, &settings, today()?, &mut UuidGenerator);
    Ok(serde_wasm_bindgen::to_value(&draft)?)
}
