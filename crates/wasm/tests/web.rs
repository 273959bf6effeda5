//! Browser tests, run with `wasm-pack test --headless --chrome`

#![cfg(target_arch = "wasm32")]

use invoicegen_wasm::{
    coerce_number, compute_totals, export_file_name, format_amount, new_draft, render_invoice_pdf,
    InvoiceStorage,
};
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn formats_amounts() {
    assert_eq!(format_amount(126.5), "126.50");
    assert_eq!(coerce_number("12abc"), 12.0);
}

#[wasm_bindgen_test]
fn new_draft_uses_auto_number() {
    let settings = serde_wasm_bindgen::to_value(&ledger::Settings::default()).unwrap();
    let draft = new_draft(settings).unwrap();
    let draft: ledger::InvoiceDraft = serde_wasm_bindgen::from_value(draft).unwrap();
    assert_eq!(draft.invoice_number, "INV1001");

    let invoice = serde_wasm_bindgen::to_value(&saved_invoice(&draft)).unwrap();
    assert_eq!(export_file_name(invoice).unwrap(), "Invoice_INV1001.pdf");
}

#[wasm_bindgen_test]
fn computes_totals_from_js_items() {
    let items = vec![ledger::LineItem::new("a", "Work", 100.0, 2.0)];
    let items = serde_wasm_bindgen::to_value(&items).unwrap();
    let totals: ledger::Totals =
        serde_wasm_bindgen::from_value(compute_totals(items, 10.0).unwrap()).unwrap();
    assert_eq!(totals.subtotal, 200.0);
    assert_eq!(totals.tax, 20.0);
    assert_eq!(totals.total, 220.0);
}

#[wasm_bindgen_test]
fn renders_pdf_bytes() {
    let draft = ledger::InvoiceDraft::new(
        &ledger::Settings::default(),
        chrono::NaiveDate::from_ymd_opt(2025, 12, 3).unwrap(),
        &mut ledger::SequentialIds::new("t"),
    );
    let invoice = serde_wasm_bindgen::to_value(&saved_invoice(&draft)).unwrap();
    let bytes = render_invoice_pdf(invoice, None).unwrap();
    assert!(bytes.starts_with(b"%PDF"));
}

#[wasm_bindgen_test]
fn storage_keeps_saved_invoice() {
    let draft = ledger::InvoiceDraft::new(
        &ledger::Settings::default(),
        chrono::NaiveDate::from_ymd_opt(2025, 12, 3).unwrap(),
        &mut ledger::SequentialIds::new("web"),
    );
    let invoice = saved_invoice(&draft);

    let mut storage = InvoiceStorage::new().unwrap();
    storage
        .save_invoice(serde_wasm_bindgen::to_value(&invoice).unwrap())
        .unwrap();
    let found: Option<ledger::Invoice> =
        serde_wasm_bindgen::from_value(storage.find_invoice(&invoice.id).unwrap()).unwrap();
    assert_eq!(found, Some(invoice.clone()));
    assert!(storage.delete_invoice(&invoice.id).unwrap());
}

fn saved_invoice(draft: &ledger::InvoiceDraft) -> ledger::Invoice {
    let mut draft = draft.clone();
    draft.select_recipient(&ledger::Company::new("Client", ""));
    ledger::save_draft(&draft, &ledger::Settings::default(), 0)
        .unwrap()
        .invoice
}
