//! Layout configuration
//!
//! All lengths are millimetres on the page, y measured from the top edge.
//! Font sizes are points.

use crate::Result;
use serde::{Deserialize, Serialize};

/// Geometry used by the layout engine
///
/// Every field is optional in JSON; missing ones take the A4 defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayoutConfig {
    pub page_width: f64,
    pub page_height: f64,
    pub left_margin: f64,
    pub right_margin: f64,

    /// Baseline of the `INVOICE: <number>` title
    pub title_y: f64,
    /// Baseline of the month-year label
    pub date_y: f64,
    /// Baseline of the sender name
    pub sender_name_y: f64,
    /// Baseline of the first sender address line
    pub sender_address_y: f64,
    pub sender_address_wrap_width: f64,

    /// Gap from the sender phone to `BILL TO`
    pub bill_to_gap: f64,
    /// Gap from `BILL TO` to the recipient name
    pub recipient_name_gap: f64,
    /// Gap from the recipient name to its address
    pub recipient_address_gap: f64,
    pub recipient_address_wrap_width: f64,

    /// The table never starts above this
    pub table_start_min_offset: f64,
    pub table_top_gap: f64,
    pub table_horizontal_margin: f64,
    pub cell_padding: f64,

    pub totals_gap: f64,
    pub totals_row_gap: f64,
    pub rule_gap: f64,
    /// Distance of the totals labels from the right margin
    pub totals_label_offset: f64,
    pub rule_width: f64,

    /// Vertical advance per wrapped line outside the table
    pub line_height: f64,
    pub page_top_margin: f64,
    pub page_bottom_margin: f64,

    pub font_sizes: FontSizes,
    pub column_widths: ColumnWidths,
}

/// Font sizes in points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontSizes {
    pub title: f32,
    pub heading: f32,
    pub body: f32,
}

/// Fixed table column widths; the description column takes the rest
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnWidths {
    pub rate: f64,
    pub unit: f64,
    pub total: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            page_width: 210.0,
            page_height: 297.0,
            left_margin: 20.0,
            right_margin: 20.0,
            title_y: 20.0,
            date_y: 26.0,
            sender_name_y: 40.0,
            sender_address_y: 46.0,
            sender_address_wrap_width: 100.0,
            bill_to_gap: 15.0,
            recipient_name_gap: 6.0,
            recipient_address_gap: 5.0,
            recipient_address_wrap_width: 80.0,
            table_start_min_offset: 90.0,
            table_top_gap: 10.0,
            table_horizontal_margin: 17.0,
            cell_padding: 3.0,
            totals_gap: 10.0,
            totals_row_gap: 6.0,
            rule_gap: 2.0,
            totals_label_offset: 60.0,
            rule_width: 0.5,
            line_height: 5.0,
            page_top_margin: 14.0,
            page_bottom_margin: 14.0,
            font_sizes: FontSizes::default(),
            column_widths: ColumnWidths::default(),
        }
    }
}

impl Default for FontSizes {
    fn default() -> Self {
        Self {
            title: 14.0,
            heading: 12.0,
            body: 10.0,
        }
    }
}

impl Default for ColumnWidths {
    fn default() -> Self {
        Self {
            rate: 30.0,
            unit: 20.0,
            total: 30.0,
        }
    }
}

impl LayoutConfig {
    /// Parse a configuration from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// X where right-aligned totals end
    pub fn content_right(&self) -> f64 {
        self.page_width - self.right_margin
    }

    /// Lowest baseline the body may use
    pub fn body_bottom(&self) -> f64 {
        self.page_height - self.page_bottom_margin
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_json_is_default() {
        assert_eq!(LayoutConfig::from_json("{}").unwrap(), LayoutConfig::default());
    }

    #[test]
    fn test_partial_json_overrides() {
        let config =
            LayoutConfig::from_json(r#"{"tableStartMinOffset": 100, "fontSizes": {"body": 9}}"#)
                .unwrap();
        assert_eq!(config.table_start_min_offset, 100.0);
        assert_eq!(config.font_sizes.body, 9.0);
        assert_eq!(config.font_sizes.title, 14.0);
        assert_eq!(config.left_margin, 20.0);
    }

    #[test]
    fn test_invalid_json() {
        assert!(LayoutConfig::from_json("{\"pageWidth\": \"wide\"}").is_err());
    }

    #[test]
    fn test_derived_edges() {
        let config = LayoutConfig::default();
        assert_eq!(config.content_right(), 190.0);
        assert_eq!(config.body_bottom(), 283.0);
    }
}
