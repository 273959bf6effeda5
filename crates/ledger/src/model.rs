//! Invoice data model
//!
//! Field names serialize in camelCase so records written by the browser
//! app (`invoicegen_*` keys in localStorage) load unchanged.

use crate::totals::{compute_totals, Totals};
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// A billable party kept in the roster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    #[serde(default)]
    pub id: String,
    pub name: String,
    /// Free-form, may span several lines
    #[serde(default)]
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Company {
    /// Company without an id (one is assigned when it is stored)
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            name: name.into(),
            address: address.into(),
            phone: None,
            email: None,
        }
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

/// One billable row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "lenient_number")]
    pub rate: f64,
    #[serde(default, deserialize_with = "lenient_number")]
    pub quantity: f64,
}

impl LineItem {
    pub fn new(
        id: impl Into<String>,
        description: impl Into<String>,
        rate: f64,
        quantity: f64,
    ) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            rate,
            quantity,
        }
    }

    /// Empty row as added while composing: no description, zero rate, quantity one
    pub fn blank(id: impl Into<String>) -> Self {
        Self::new(id, "", 0.0, 1.0)
    }

    /// Rate x quantity, with non-finite fields counted as zero
    pub fn amount(&self) -> f64 {
        finite_or_zero(self.rate) * finite_or_zero(self.quantity)
    }
}

/// A saved invoice
///
/// Sender fields and the recipient are snapshots taken when the invoice was
/// created. They do not follow later edits to settings or the roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: String,
    pub invoice_number: String,
    pub date: NaiveDate,
    #[serde(default, with = "optional_date")]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub sender_name: String,
    #[serde(default)]
    pub sender_address: String,
    #[serde(default)]
    pub sender_phone: String,
    #[serde(default)]
    pub recipient: Option<Company>,
    #[serde(default)]
    pub items: Vec<LineItem>,
    /// Percentage (10 means 10%)
    #[serde(default, deserialize_with = "lenient_number")]
    pub sales_tax_rate: f64,
    #[serde(default)]
    pub instructions: String,
    /// Epoch milliseconds
    #[serde(default)]
    pub created_at: i64,
}

impl Invoice {
    pub fn totals(&self) -> Totals {
        compute_totals(&self.items, self.sales_tax_rate)
    }
}

/// Process-wide defaults and the invoice number counter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub sender_name: String,
    pub sender_address: String,
    pub sender_phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender_email: Option<String>,
    #[serde(deserialize_with = "lenient_number")]
    pub default_tax_rate: f64,
    pub invoice_prefix: String,
    pub next_invoice_number: u64,
}

impl Settings {
    /// Number the next new draft receives, e.g. "INV1001"
    pub fn auto_number(&self) -> String {
        format!("{}{}", self.invoice_prefix, self.next_invoice_number)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sender_name: "Your Business Name".to_string(),
            sender_address: "Your Street Address\nCity, State, ZIP".to_string(),
            sender_phone: "+1 555 123 4567".to_string(),
            sender_email: None,
            default_tax_rate: 0.0,
            invoice_prefix: "INV".to_string(),
            next_invoice_number: 1001,
        }
    }
}

pub(crate) fn finite_or_zero(n: f64) -> f64 {
    if n.is_finite() {
        n
    } else {
        0.0
    }
}

/// Accept a JSON number, numeric text, or null; anything else reads as zero
pub(crate) fn lenient_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    let number = match value {
        Some(serde_json::Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(serde_json::Value::String(text)) => invoice_text::coerce_number(&text),
        _ => 0.0,
    };
    Ok(finite_or_zero(number))
}

/// `YYYY-MM-DD`, with the empty string standing for "no date"
pub(crate) mod optional_date {
    use chrono::NaiveDate;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match date {
            Some(date) => serializer.serialize_str(&invoice_text::format_iso_date(*date)),
            None => serializer.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            Some(text) if !text.trim().is_empty() => invoice_text::parse_iso_date(&text)
                .map(Some)
                .map_err(de::Error::custom),
            _ => Ok(None),
        }
    }
}
