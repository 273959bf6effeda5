//! Painting laid-out invoices to PDF and exporting them

use crate::config::LayoutConfig;
use crate::document::{Element, RenderedDocument};
use crate::layout::layout_invoice;
use crate::Result;
use ledger::Invoice;
use pdf_core::{mm_to_pt, PageSize, PdfDocument};
use std::path::{Path, PathBuf};

/// Invoice renderer
///
/// # Example
/// ```ignore
/// let renderer = InvoiceRenderer::new().with_config(config);
/// let bytes = renderer.to_bytes(&invoice)?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct InvoiceRenderer {
    /// Page geometry
    config: LayoutConfig,
    /// Write uncompressed content streams (readable with a text editor)
    uncompressed: bool,
}

impl InvoiceRenderer {
    /// Renderer with the default A4 layout
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom layout configuration
    pub fn with_config(mut self, config: LayoutConfig) -> Self {
        self.config = config;
        self
    }

    /// Enable or disable content stream compression
    pub fn with_compression(mut self, compress: bool) -> Self {
        self.uncompressed = !compress;
        self
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Lay out an invoice without producing PDF
    pub fn layout(&self, invoice: &Invoice) -> RenderedDocument {
        layout_invoice(invoice, &self.config)
    }

    /// Render an invoice to PDF bytes
    pub fn to_bytes(&self, invoice: &Invoice) -> Result<Vec<u8>> {
        let document = self.layout(invoice);
        let mut pdf = paint(&document)?;
        pdf.set_title(&format!("Invoice {}", invoice.invoice_number));
        pdf.set_compression(!self.uncompressed);
        Ok(pdf.to_bytes()?)
    }

    /// Render an invoice to a file
    pub fn save<P: AsRef<Path>>(&self, invoice: &Invoice, path: P) -> Result<()> {
        let bytes = self.to_bytes(invoice)?;
        std::fs::write(path.as_ref(), bytes)?;
        tracing::info!(
            invoice_number = %invoice.invoice_number,
            path = %path.as_ref().display(),
            "Invoice exported"
        );
        Ok(())
    }

    /// Render into `dir` under the export file name and return the full path
    pub fn export(&self, invoice: &Invoice, dir: &Path) -> Result<PathBuf> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(export_file_name(invoice));
        self.save(invoice, &path)?;
        Ok(path)
    }
}

/// Write a laid-out document into a new PDF (millimetres to points)
pub fn paint(document: &RenderedDocument) -> Result<PdfDocument> {
    let mut pdf = PdfDocument::new(PageSize::from_mm(document.width, document.height));

    for page in &document.pages {
        let number = pdf.add_blank_page();
        for element in &page.elements {
            match element {
                Element::Text {
                    text,
                    x,
                    y,
                    font,
                    align,
                } => {
                    pdf.set_font(font.font, font.size);
                    pdf.insert_text(text, number, mm_to_pt(*x), mm_to_pt(*y), *align)?;
                }
                Element::Rule {
                    x1,
                    y1,
                    x2,
                    y2,
                    width,
                } => {
                    pdf.draw_line(
                        number,
                        (mm_to_pt(*x1), mm_to_pt(*y1)),
                        (mm_to_pt(*x2), mm_to_pt(*y2)),
                        mm_to_pt(*width),
                    )?;
                }
            }
        }
    }

    Ok(pdf)
}

/// Render an invoice to PDF bytes
pub fn render_pdf(invoice: &Invoice, config: &LayoutConfig) -> Result<Vec<u8>> {
    InvoiceRenderer::new()
        .with_config(config.clone())
        .to_bytes(invoice)
}

/// `Invoice_<number>.pdf`
///
/// Characters that cannot appear in a file name are replaced with `_`.
pub fn export_file_name(invoice: &Invoice) -> String {
    let number: String = invoice
        .invoice_number
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    format!("Invoice_{number}.pdf")
}

/// Render into `dir` and return the written path
pub fn export_to_dir(invoice: &Invoice, config: &LayoutConfig, dir: &Path) -> Result<PathBuf> {
    InvoiceRenderer::new()
        .with_config(config.clone())
        .export(invoice, dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn invoice(number: &str) -> Invoice {
        Invoice {
            id: "x".to_string(),
            invoice_number: number.to_string(),
            date: NaiveDate::from_ymd_opt(2025, 12, 3).unwrap(),
            due_date: None,
            sender_name: String::new(),
            sender_address: String::new(),
            sender_phone: String::new(),
            recipient: None,
            items: Vec::new(),
            sales_tax_rate: 0.0,
            instructions: String::new(),
            created_at: 0,
        }
    }

    #[test]
    fn test_export_file_name() {
        assert_eq!(export_file_name(&invoice("INV1001")), "Invoice_INV1001.pdf");
        assert_eq!(export_file_name(&invoice("2025/07")), "Invoice_2025_07.pdf");
    }

    #[test]
    fn test_paint_page_count_matches_layout() {
        let document = layout_invoice(&invoice("INV1"), &LayoutConfig::default());
        let pdf = paint(&document).unwrap();
        assert_eq!(pdf.page_count(), document.page_count());
    }
}
