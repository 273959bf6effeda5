//! Invoice Render - invoice layout and PDF export
//!
//! This crate provides:
//! - `LayoutConfig`, the page geometry (JSON-loadable, A4 defaults)
//! - A layout engine producing a positioned, paginated document model
//! - A painter writing that model to PDF through `pdf-core`
//! - Export helpers (`Invoice_<number>.pdf`)
//!
//! # Example
//!
//! ```ignore
//! use invoice_render::{render_pdf, LayoutConfig};
//!
//! let bytes = render_pdf(&invoice, &LayoutConfig::default())?;
//! std::fs::write(invoice_render::export_file_name(&invoice), bytes)?;
//! ```

mod config;
mod document;
mod layout;
mod renderer;

pub use config::{ColumnWidths, FontSizes, LayoutConfig};
pub use document::{Element, FontStyle, LayoutMetrics, Page, RenderedDocument};
pub use layout::{layout_invoice, RECIPIENT_PLACEHOLDER};
pub use renderer::{export_file_name, export_to_dir, paint, render_pdf, InvoiceRenderer};

use thiserror::Error;

/// Errors that can occur during rendering
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("PDF error: {0}")]
    PdfError(#[from] pdf_core::PdfError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Result type for render operations
pub type Result<T> = std::result::Result<T, RenderError>;
