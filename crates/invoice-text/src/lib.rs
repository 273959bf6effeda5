//! Invoice Text - text processing for invoice layout
//!
//! This crate provides:
//! - Two-pass word wrapping (explicit line breaks, then measured width)
//! - Amount formatting (two decimals) and quantity formatting (natural precision)
//! - Compact month-year dates ("Dec 2025") and ISO date parsing
//! - Lenient numeric coercion for text input
//!
//! # Example
//!
//! ```ignore
//! use invoice_text::{format_amount, wrap_text};
//!
//! let lines = wrap_text("Your Street Address\nCity, State, ZIP", 100.0, |s| s.len() as f64);
//! assert_eq!(lines.len(), 2);
//!
//! assert_eq!(format_amount(126.5), "126.50");
//! ```

mod formatter;
mod wrap;

pub use formatter::{
    coerce_number, format_amount, format_iso_date, format_month_year, format_quantity,
    parse_iso_date,
};
pub use wrap::wrap_text;

use thiserror::Error;

/// Errors that can occur during text processing
#[derive(Debug, Error)]
pub enum TextError {
    #[error("Invalid date: {0}")]
    InvalidDate(String),
}

/// Result type for text operations
pub type Result<T> = std::result::Result<T, TextError>;
