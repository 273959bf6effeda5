//! Positioned document model produced by the layout engine

use pdf_core::{Align, BuiltinFont};

/// Font and size of a text element
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontStyle {
    pub font: BuiltinFont,
    /// Points
    pub size: f32,
}

impl FontStyle {
    pub fn regular(size: f32) -> Self {
        Self {
            font: BuiltinFont::Helvetica,
            size,
        }
    }

    pub fn bold(size: f32) -> Self {
        Self {
            font: BuiltinFont::HelveticaBold,
            size,
        }
    }
}

/// A drawable item; coordinates in millimetres from the top-left corner
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    /// Single line of text with `y` at the baseline
    Text {
        text: String,
        x: f64,
        y: f64,
        font: FontStyle,
        align: Align,
    },
    /// Straight stroked line
    Rule {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        width: f64,
    },
}

/// Elements of one page, in drawing order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub elements: Vec<Element>,
}

/// Where the layout put its blocks
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LayoutMetrics {
    /// Cursor after the recipient block
    pub recipient_end_y: f64,
    /// Top of the table header row
    pub table_start_y: f64,
    /// 1-indexed page of the table header
    pub table_start_page: usize,
    /// Bottom of the last table row
    pub table_end_y: f64,
    /// Baseline of the SUBTOTAL line
    pub totals_start_y: f64,
    /// 1-indexed page holding the totals block
    pub totals_page: usize,
    pub page_count: usize,
}

/// Laid-out invoice, ready to paint
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedDocument {
    /// Page width in millimetres
    pub width: f64,
    /// Page height in millimetres
    pub height: f64,
    pub pages: Vec<Page>,
    pub metrics: LayoutMetrics,
}

impl RenderedDocument {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// All text strings in page order
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.pages.iter().flat_map(|page| {
            page.elements.iter().filter_map(|element| match element {
                Element::Text { text, .. } => Some(text.as_str()),
                Element::Rule { .. } => None,
            })
        })
    }

    pub fn contains_text(&self, needle: &str) -> bool {
        self.texts().any(|text| text == needle)
    }

    /// First text element equal to `needle`, with its 1-indexed page
    pub fn find_text(&self, needle: &str) -> Option<(usize, &Element)> {
        self.pages.iter().enumerate().find_map(|(index, page)| {
            page.elements
                .iter()
                .find(|element| matches!(element, Element::Text { text, .. } if text == needle))
                .map(|element| (index + 1, element))
        })
    }
}
