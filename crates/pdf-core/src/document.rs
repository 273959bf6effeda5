//! PDF Document builder

use crate::text::{stroke_line_operators, text_show_operators, TextRun};
use crate::{Align, BuiltinFont, FontWeight, PdfError, Result};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use std::collections::{BTreeSet, HashMap};
use std::io::Write;
use std::path::Path;

/// Page dimensions in points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSize {
    pub width: f64,
    pub height: f64,
}

impl PageSize {
    /// ISO A4 (210 x 297 mm)
    pub const A4: PageSize = PageSize {
        width: 595.28,
        height: 841.89,
    };

    /// Page size from millimetre dimensions
    pub fn from_mm(width_mm: f64, height_mm: f64) -> Self {
        Self {
            width: crate::mm_to_pt(width_mm),
            height: crate::mm_to_pt(height_mm),
        }
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self::A4
    }
}

/// PDF document built from blank pages
///
/// Drawing calls are buffered per page and the lopdf object graph is
/// assembled in `to_bytes`/`save`, so a document can be serialized any
/// number of times.
pub struct PdfDocument {
    /// Size applied to every page
    page_size: PageSize,
    /// Number of pages added so far
    page_count: usize,
    /// Current font
    current_font: BuiltinFont,
    /// Current font size
    current_font_size: f32,
    /// Buffered content operators per page (page number -> operators)
    page_content_buffer: HashMap<usize, Vec<u8>>,
    /// Fonts referenced per page (page number -> fonts)
    page_fonts: HashMap<usize, BTreeSet<BuiltinFont>>,
    /// Document title for the Info dictionary
    title: Option<String>,
    /// Flate-compress content streams
    compress: bool,
}

impl PdfDocument {
    /// Create an empty document whose pages use `page_size`
    ///
    /// # Example
    /// ```ignore
    /// let mut doc = PdfDocument::new(PageSize::A4);
    /// assert_eq!(doc.page_count(), 0);
    /// ```
    pub fn new(page_size: PageSize) -> Self {
        Self {
            page_size,
            page_count: 0,
            current_font: BuiltinFont::default(),
            current_font_size: 12.0,
            page_content_buffer: HashMap::new(),
            page_fonts: HashMap::new(),
            title: None,
            compress: true,
        }
    }

    /// Get the number of pages in the document
    pub fn page_count(&self) -> usize {
        self.page_count
    }

    /// Get the page size
    pub fn page_size(&self) -> PageSize {
        self.page_size
    }

    /// Add a blank page to the document
    ///
    /// # Returns
    /// New page number (1-indexed)
    pub fn add_blank_page(&mut self) -> usize {
        self.page_count += 1;
        self.page_count
    }

    /// Set the document title (written to the Info dictionary)
    pub fn set_title(&mut self, title: &str) {
        self.title = Some(title.to_string());
    }

    /// Enable or disable Flate compression of content streams
    pub fn set_compression(&mut self, compress: bool) {
        self.compress = compress;
    }

    /// Set the current font and size
    ///
    /// # Example
    /// ```ignore
    /// doc.set_font(BuiltinFont::Helvetica, 10.0);
    /// doc.set_font_weight(FontWeight::Bold);  // Now Helvetica-Bold 10pt
    /// ```
    pub fn set_font(&mut self, font: BuiltinFont, size: f32) {
        self.current_font = font;
        self.current_font_size = size;
    }

    /// Set only the font size (keeps current font)
    pub fn set_font_size(&mut self, size: f32) {
        self.current_font_size = size;
    }

    /// Set the font weight (keeps current size)
    pub fn set_font_weight(&mut self, weight: FontWeight) {
        self.current_font = BuiltinFont::for_weight(weight);
    }

    /// Get current font's text width for a string, in points
    pub fn get_text_width(&self, text: &str) -> f64 {
        self.current_font
            .text_width_points(text, self.current_font_size)
    }

    /// Insert text at a specific position
    ///
    /// # Arguments
    /// * `text` - Text to insert
    /// * `page` - Page number (1-indexed)
    /// * `x` - X coordinate in points
    /// * `y` - Baseline Y coordinate in points (from top)
    /// * `align` - Text alignment relative to `x`
    pub fn insert_text(
        &mut self,
        text: &str,
        page: usize,
        x: f64,
        y: f64,
        align: Align,
    ) -> Result<()> {
        self.check_page(page)?;

        // Skip empty text - nothing to render
        if text.is_empty() {
            return Ok(());
        }

        let font = self.current_font;
        let hex = font.encode_text_hex(text);
        let run = TextRun {
            resource: font.resource_name(),
            size: self.current_font_size,
            hex: &hex,
            width: self.get_text_width(text),
        };

        // Convert Y coordinate from top-origin to PDF bottom-origin
        let pdf_y = self.page_size.height - y;
        let operators = text_show_operators(&run, x, pdf_y, align);

        self.page_fonts.entry(page).or_default().insert(font);
        self.buffer_content(page, &operators);

        Ok(())
    }

    /// Draw a straight line between two points (coordinates from top)
    ///
    /// # Arguments
    /// * `page` - Page number (1-indexed)
    /// * `from` - Start point in points
    /// * `to` - End point in points
    /// * `width` - Stroke width in points
    pub fn draw_line(
        &mut self,
        page: usize,
        from: (f64, f64),
        to: (f64, f64),
        width: f64,
    ) -> Result<()> {
        self.check_page(page)?;

        let height = self.page_size.height;
        let operators =
            stroke_line_operators((from.0, height - from.1), (to.0, height - to.1), width);
        self.buffer_content(page, &operators);

        Ok(())
    }

    /// Save the document to a file
    ///
    /// # Arguments
    /// * `path` - Output file path
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let bytes = self.to_bytes()?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    /// Save the document to bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut doc = self.build_document()?;

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer)
            .map_err(|e| PdfError::SaveError(e.to_string()))?;

        Ok(buffer)
    }

    fn check_page(&self, page: usize) -> Result<()> {
        if page == 0 || page > self.page_count {
            return Err(PdfError::InvalidPage(page, self.page_count));
        }
        Ok(())
    }

    /// Buffer content operators for a page (written at save time)
    fn buffer_content(&mut self, page: usize, content: &[u8]) {
        self.page_content_buffer
            .entry(page)
            .or_default()
            .extend_from_slice(content);
    }

    /// Assemble the lopdf object graph from the buffered pages
    fn build_document(&self) -> Result<Document> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        // One font object per font used anywhere in the document
        let used_fonts: BTreeSet<BuiltinFont> =
            self.page_fonts.values().flatten().copied().collect();
        let mut font_ids: HashMap<BuiltinFont, ObjectId> = HashMap::new();
        for font in used_fonts {
            let id = doc.add_object(Object::Dictionary(font.to_pdf_dictionary()));
            font_ids.insert(font, id);
        }

        let mut kids = Vec::with_capacity(self.page_count);
        for page in 1..=self.page_count {
            let content = self
                .page_content_buffer
                .get(&page)
                .map(Vec::as_slice)
                .unwrap_or_default();
            let contents_id = doc.add_object(self.content_stream(content)?);

            let mut font_dict = Dictionary::new();
            if let Some(fonts) = self.page_fonts.get(&page) {
                for font in fonts {
                    if let Some(id) = font_ids.get(font) {
                        font_dict.set(font.resource_name(), Object::Reference(*id));
                    }
                }
            }
            let mut resources = Dictionary::new();
            resources.set("Font", Object::Dictionary(font_dict));

            let mut page_dict = Dictionary::new();
            page_dict.set("Type", Object::Name(b"Page".to_vec()));
            page_dict.set("Parent", Object::Reference(pages_id));
            page_dict.set(
                "MediaBox",
                Object::Array(vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Real(self.page_size.width as f32),
                    Object::Real(self.page_size.height as f32),
                ]),
            );
            page_dict.set("Resources", Object::Dictionary(resources));
            page_dict.set("Contents", Object::Reference(contents_id));

            let page_id = doc.add_object(Object::Dictionary(page_dict));
            kids.push(Object::Reference(page_id));
        }

        let mut pages_dict = Dictionary::new();
        pages_dict.set("Type", Object::Name(b"Pages".to_vec()));
        pages_dict.set("Kids", Object::Array(kids));
        pages_dict.set("Count", Object::Integer(self.page_count as i64));
        doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

        let mut catalog = Dictionary::new();
        catalog.set("Type", Object::Name(b"Catalog".to_vec()));
        catalog.set("Pages", Object::Reference(pages_id));
        let catalog_id = doc.add_object(Object::Dictionary(catalog));
        doc.trailer.set("Root", Object::Reference(catalog_id));

        let mut info = Dictionary::new();
        info.set("Producer", Object::string_literal("invoicegen pdf-core"));
        if let Some(title) = &self.title {
            info.set("Title", Object::string_literal(title.as_str()));
        }
        let info_id = doc.add_object(Object::Dictionary(info));
        doc.trailer.set("Info", Object::Reference(info_id));

        Ok(doc)
    }

    /// Build a page content stream, Flate-compressed when enabled
    fn content_stream(&self, content: &[u8]) -> Result<Stream> {
        if !self.compress {
            return Ok(Stream::new(Dictionary::new(), content.to_vec()));
        }

        let mut encoder =
            flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
        encoder.write_all(content)?;
        let data = encoder.finish()?;

        let mut dict = Dictionary::new();
        dict.set("Filter", Object::Name(b"FlateDecode".to_vec()));
        Ok(Stream::new(dict, data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_document_is_empty() {
        let doc = PdfDocument::new(PageSize::A4);
        assert_eq!(doc.page_count(), 0);
        assert_eq!(doc.page_size(), PageSize::A4);
    }

    #[test]
    fn test_add_blank_page_numbers() {
        let mut doc = PdfDocument::new(PageSize::A4);
        assert_eq!(doc.add_blank_page(), 1);
        assert_eq!(doc.add_blank_page(), 2);
        assert_eq!(doc.page_count(), 2);
    }

    #[test]
    fn test_insert_text_invalid_page() {
        let mut doc = PdfDocument::new(PageSize::A4);
        let result = doc.insert_text("x", 1, 0.0, 0.0, Align::Left);
        assert!(matches!(result, Err(PdfError::InvalidPage(1, 0))));
    }

    #[test]
    fn test_text_width_follows_font() {
        let mut doc = PdfDocument::new(PageSize::A4);
        doc.set_font(BuiltinFont::Helvetica, 10.0);
        let regular = doc.get_text_width("TOTAL");
        doc.set_font_weight(FontWeight::Bold);
        let bold = doc.get_text_width("TOTAL");
        assert!(bold > regular);
        doc.set_font_size(20.0);
        assert!((doc.get_text_width("TOTAL") - bold * 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_page_size_from_mm() {
        let size = PageSize::from_mm(210.0, 297.0);
        assert!((size.width - PageSize::A4.width).abs() < 0.01);
        assert!((size.height - PageSize::A4.height).abs() < 0.01);
    }

    fn buffered(doc: &PdfDocument, page: usize) -> String {
        String::from_utf8(doc.page_content_buffer[&page].clone()).unwrap()
    }

    #[test]
    fn test_insert_text_flips_y_from_top() {
        let mut doc = PdfDocument::new(PageSize::A4);
        let page = doc.add_blank_page();
        doc.set_font(BuiltinFont::Helvetica, 10.0);
        doc.insert_text("A", page, 56.693, 100.0, Align::Left).unwrap();
        assert!(buffered(&doc, page).contains("56.693 741.89 Td"));
    }

    #[test]
    fn test_right_aligned_text_ends_at_anchor() {
        let mut doc = PdfDocument::new(PageSize::A4);
        let page = doc.add_blank_page();
        doc.set_font(BuiltinFont::Helvetica, 10.0);
        // "00" is 11.12pt wide at 10pt
        doc.insert_text("00", page, 538.583, 841.89, Align::Right).unwrap();
        assert!(buffered(&doc, page).contains("527.463 0 Td"));
    }

    #[test]
    fn test_draw_line_flips_both_ends() {
        let mut doc = PdfDocument::new(PageSize::A4);
        let page = doc.add_blank_page();
        doc.draw_line(page, (368.5, 41.89), (538.583, 41.89), 1.417).unwrap();
        let ops = buffered(&doc, page);
        assert!(ops.contains("368.5 800 m"));
        assert!(ops.contains("538.583 800 l"));
        assert!(ops.contains("1.417 w"));
    }
}
