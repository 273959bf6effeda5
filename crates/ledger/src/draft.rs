//! Composing, saving and duplicating invoices
//!
//! A draft is the editable form of an invoice. Saving is a pure state
//! transition: it returns the frozen `Invoice` together with the settings the
//! caller should persist afterwards. The input settings are never touched.

use crate::ids::IdGenerator;
use crate::model::{Company, Invoice, LineItem, Settings};
use crate::totals::{compute_totals, Totals};
use crate::{LedgerError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Description of the first row of a fresh draft
pub const DEFAULT_ITEM_DESCRIPTION: &str = "Service Rendered";

/// Instructions a fresh draft starts with
pub const DEFAULT_INSTRUCTIONS: &str = "Please make payment by the due date.";

/// An invoice being composed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceDraft {
    pub id: String,
    pub invoice_number: String,
    pub date: NaiveDate,
    #[serde(default, with = "crate::model::optional_date")]
    pub due_date: Option<NaiveDate>,
    pub sender_name: String,
    pub sender_address: String,
    pub sender_phone: String,
    /// Snapshot of the selected company
    #[serde(default)]
    pub recipient: Option<Company>,
    #[serde(default)]
    pub items: Vec<LineItem>,
    #[serde(default, deserialize_with = "crate::model::lenient_number")]
    pub sales_tax_rate: f64,
    #[serde(default)]
    pub instructions: String,
}

/// Edit applied to one line item
#[derive(Debug, Clone, PartialEq)]
pub enum ItemUpdate {
    Description(String),
    Rate(f64),
    Quantity(f64),
}

impl ItemUpdate {
    /// Build an update from a form field name and its raw text
    ///
    /// Numeric fields go through `coerce_number`, so unparsable input
    /// becomes zero. Unknown field names return `None`.
    pub fn from_field(field: &str, value: &str) -> Option<Self> {
        match field {
            "description" => Some(ItemUpdate::Description(value.to_string())),
            "rate" => Some(ItemUpdate::Rate(invoice_text::coerce_number(value))),
            "quantity" => Some(ItemUpdate::Quantity(invoice_text::coerce_number(value))),
            _ => None,
        }
    }
}

/// Result of saving a draft
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedInvoice {
    pub invoice: Invoice,
    /// Settings to persist (counter advanced when the auto number was used)
    pub settings: Settings,
}

impl InvoiceDraft {
    /// Fresh draft numbered `<prefix><next>` with one default row
    pub fn new(settings: &Settings, today: NaiveDate, ids: &mut impl IdGenerator) -> Self {
        Self {
            id: ids.next_id(),
            invoice_number: settings.auto_number(),
            date: today,
            due_date: None,
            sender_name: settings.sender_name.clone(),
            sender_address: settings.sender_address.clone(),
            sender_phone: settings.sender_phone.clone(),
            recipient: None,
            items: vec![LineItem::new(
                ids.next_id(),
                DEFAULT_ITEM_DESCRIPTION,
                0.0,
                1.0,
            )],
            sales_tax_rate: settings.default_tax_rate,
            instructions: DEFAULT_INSTRUCTIONS.to_string(),
        }
    }

    /// Append a blank row and return it
    pub fn add_item(&mut self, ids: &mut impl IdGenerator) -> &mut LineItem {
        let index = self.items.len();
        self.items.push(LineItem::blank(ids.next_id()));
        &mut self.items[index]
    }

    /// Remove a row by id, returning whether it existed
    pub fn remove_item(&mut self, id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id != id);
        self.items.len() != before
    }

    /// Apply an edit to a row by id, returning whether it existed
    pub fn update_item(&mut self, id: &str, update: ItemUpdate) -> bool {
        let Some(item) = self.items.iter_mut().find(|item| item.id == id) else {
            return false;
        };
        match update {
            ItemUpdate::Description(text) => item.description = text,
            ItemUpdate::Rate(rate) => item.rate = rate,
            ItemUpdate::Quantity(quantity) => item.quantity = quantity,
        }
        true
    }

    /// Attach a copy of `company` as the recipient
    pub fn select_recipient(&mut self, company: &Company) {
        self.recipient = Some(company.clone());
    }

    pub fn clear_recipient(&mut self) {
        self.recipient = None;
    }

    /// Live totals, same calculation as a saved invoice
    pub fn totals(&self) -> Totals {
        compute_totals(&self.items, self.sales_tax_rate)
    }

    /// Whether the number is the one `settings` would hand out next
    pub fn uses_auto_number(&self, settings: &Settings) -> bool {
        self.invoice_number == settings.auto_number()
    }
}

/// Freeze a draft into an invoice
///
/// Fails with `MissingRecipient` when no company is attached. The returned
/// settings carry `next_invoice_number + 1` only when the draft kept the
/// auto-assigned number, so manual numbering never consumes the counter.
pub fn save_draft(draft: &InvoiceDraft, settings: &Settings, created_at: i64) -> Result<SavedInvoice> {
    let recipient = draft
        .recipient
        .clone()
        .ok_or(LedgerError::MissingRecipient)?;

    let invoice = Invoice {
        id: draft.id.clone(),
        invoice_number: draft.invoice_number.clone(),
        date: draft.date,
        due_date: draft.due_date,
        sender_name: draft.sender_name.clone(),
        sender_address: draft.sender_address.clone(),
        sender_phone: draft.sender_phone.clone(),
        recipient: Some(recipient),
        items: draft.items.clone(),
        sales_tax_rate: draft.sales_tax_rate,
        instructions: draft.instructions.clone(),
        created_at,
    };

    let mut next_settings = settings.clone();
    if draft.uses_auto_number(settings) {
        next_settings.next_invoice_number += 1;
    }

    tracing::debug!(
        invoice_id = %invoice.id,
        invoice_number = %invoice.invoice_number,
        next_invoice_number = next_settings.next_invoice_number,
        "Draft saved"
    );

    Ok(SavedInvoice {
        invoice,
        settings: next_settings,
    })
}

/// Start a new draft from a stored invoice
///
/// The copy gets a fresh id, today's date and the next auto number. Every
/// other field, including the recipient snapshot and the rows, is kept.
pub fn duplicate_invoice(
    invoice: &Invoice,
    settings: &Settings,
    today: NaiveDate,
    ids: &mut impl IdGenerator,
) -> InvoiceDraft {
    InvoiceDraft {
        id: ids.next_id(),
        invoice_number: settings.auto_number(),
        date: today,
        due_date: invoice.due_date,
        sender_name: invoice.sender_name.clone(),
        sender_address: invoice.sender_address.clone(),
        sender_phone: invoice.sender_phone.clone(),
        recipient: invoice.recipient.clone(),
        items: invoice.items.clone(),
        sales_tax_rate: invoice.sales_tax_rate,
        instructions: invoice.instructions.clone(),
    }
}
