//! Invoice layout engine
//!
//! Blocks are placed top to bottom with a vertical cursor: header, sender,
//! recipient, line-item table, totals. Every advance is derived from the
//! content actually placed, so wrapped text pushes later blocks down
//! instead of overlapping them.

use crate::config::LayoutConfig;
use crate::document::{Element, FontStyle, LayoutMetrics, Page, RenderedDocument};
use invoice_text::{format_amount, format_iso_date, format_month_year, format_quantity, wrap_text};
use ledger::Invoice;
use pdf_core::{pt_to_mm, Align};

/// Drawn in place of the recipient name when none is attached
pub const RECIPIENT_PLACEHOLDER: &str = "[Recipient Not Selected]";

/// Table line height relative to the font size
const TABLE_LINE_HEIGHT_FACTOR: f64 = 1.15;

/// Helvetica ascender in em
const ASCENT: f64 = 0.718;

/// Header labels of the line-item table
const HEADERS: [&str; 4] = ["DESCRIPTION", "RATE\n(USD)", "UNIT", "TOTAL"];

#[derive(Debug, Clone, Copy)]
struct Column {
    x: f64,
    width: f64,
    align: Align,
}

/// Lay out `invoice` on pages described by `config`
///
/// # Example
/// ```ignore
/// let document = layout_invoice(&invoice, &LayoutConfig::default());
/// assert!(document.contains_text("BILL TO"));
/// ```
pub fn layout_invoice(invoice: &Invoice, config: &LayoutConfig) -> RenderedDocument {
    let mut layout = Layout::new(config);

    layout.header(invoice);
    let cursor = layout.sender(invoice);
    let cursor = layout.recipient(invoice, cursor);
    layout.metrics.recipient_end_y = cursor;

    // The minimum offset only applies below the first-page header
    let mut table_start = cursor + config.table_top_gap;
    if layout.page_number() == 1 {
        table_start = table_start.max(config.table_start_min_offset);
    }
    let table_end = layout.table(invoice, table_start);
    layout.totals(invoice, table_end);

    layout.finish()
}

struct Layout<'a> {
    config: &'a LayoutConfig,
    pages: Vec<Page>,
    metrics: LayoutMetrics,
    body: FontStyle,
    body_bold: FontStyle,
}

impl<'a> Layout<'a> {
    fn new(config: &'a LayoutConfig) -> Self {
        Self {
            config,
            pages: vec![Page::default()],
            metrics: LayoutMetrics::default(),
            body: FontStyle::regular(config.font_sizes.body),
            body_bold: FontStyle::bold(config.font_sizes.body),
        }
    }

    fn finish(mut self) -> RenderedDocument {
        self.metrics.page_count = self.pages.len();
        RenderedDocument {
            width: self.config.page_width,
            height: self.config.page_height,
            pages: self.pages,
            metrics: self.metrics,
        }
    }

    /// 1-indexed number of the page being filled
    fn page_number(&self) -> usize {
        self.pages.len()
    }

    fn new_page(&mut self) {
        self.pages.push(Page::default());
        tracing::debug!(page = self.page_number(), "Started new page");
    }

    fn push(&mut self, element: Element) {
        if let Some(page) = self.pages.last_mut() {
            page.elements.push(element);
        }
    }

    fn text(&mut self, text: &str, x: f64, y: f64, font: FontStyle, align: Align) {
        if text.is_empty() {
            return;
        }
        self.push(Element::Text {
            text: text.to_string(),
            x,
            y,
            font,
            align,
        });
    }

    /// Text width in millimetres
    fn measure(font: FontStyle, text: &str) -> f64 {
        pt_to_mm(font.font.text_width_points(text, font.size))
    }

    fn wrap(font: FontStyle, text: &str, width: f64) -> Vec<String> {
        wrap_text(text, width, |s| Self::measure(font, s))
    }

    /// Baseline for a line at `y`, moved to a new page when it would fall
    /// below the body
    fn fit_line(&mut self, y: f64) -> f64 {
        if y > self.config.body_bottom() {
            self.new_page();
            self.config.page_top_margin
        } else {
            y
        }
    }

    /// Draw wrapped lines starting at `y` and return the cursor below them
    fn lines(&mut self, lines: &[String], x: f64, y: f64, font: FontStyle) -> f64 {
        let step = self.config.line_height;
        let mut y = y;
        for line in lines {
            y = self.fit_line(y);
            self.text(line, x, y, font, Align::Left);
            y += step;
        }
        y
    }

    fn header(&mut self, invoice: &Invoice) {
        let config = self.config;
        let title = format!("INVOICE: {}", invoice.invoice_number);
        self.text(
            &title,
            config.left_margin,
            config.title_y,
            FontStyle::bold(config.font_sizes.title),
            Align::Left,
        );
        self.text(
            &format_month_year(invoice.date),
            config.left_margin,
            config.date_y,
            self.body,
            Align::Left,
        );
    }

    /// Sender block; returns the cursor at the phone line
    fn sender(&mut self, invoice: &Invoice) -> f64 {
        let config = self.config;
        let x = config.left_margin;

        self.text(
            &invoice.sender_name.to_uppercase(),
            x,
            config.sender_name_y,
            FontStyle::bold(config.font_sizes.heading),
            Align::Left,
        );

        let address = Self::wrap(
            self.body,
            &invoice.sender_address,
            config.sender_address_wrap_width,
        );
        let cursor = self.lines(&address, x, config.sender_address_y, self.body);
        let cursor = self.fit_line(cursor);
        self.text(&invoice.sender_phone, x, cursor, self.body, Align::Left);

        cursor
    }

    /// Recipient block; returns the cursor after its last line
    fn recipient(&mut self, invoice: &Invoice, cursor: f64) -> f64 {
        let config = self.config;
        let x = config.left_margin;

        let mut cursor = self.fit_line(cursor + config.bill_to_gap);
        self.text(
            "BILL TO",
            x,
            cursor,
            FontStyle::bold(config.font_sizes.heading),
            Align::Left,
        );

        cursor = self.fit_line(cursor + config.recipient_name_gap);
        match &invoice.recipient {
            Some(company) => {
                self.text(&company.name, x, cursor, self.body, Align::Left);
                cursor = self.fit_line(cursor + config.recipient_address_gap);
                let address = Self::wrap(
                    self.body,
                    &company.address,
                    config.recipient_address_wrap_width,
                );
                self.lines(&address, x, cursor, self.body)
            }
            None => {
                self.text(RECIPIENT_PLACEHOLDER, x, cursor, self.body, Align::Left);
                cursor + config.line_height
            }
        }
    }

    fn columns(&self) -> [Column; 4] {
        let config = self.config;
        let widths = config.column_widths;
        let left = config.table_horizontal_margin;
        let inner = config.page_width - 2.0 * left;
        let description = (inner - widths.rate - widths.unit - widths.total).max(0.0);

        let rate_x = left + description;
        let unit_x = rate_x + widths.rate;
        let total_x = unit_x + widths.unit;
        [
            Column {
                x: left,
                width: description,
                align: Align::Left,
            },
            Column {
                x: rate_x,
                width: widths.rate,
                align: Align::Right,
            },
            Column {
                x: unit_x,
                width: widths.unit,
                align: Align::Right,
            },
            Column {
                x: total_x,
                width: widths.total,
                align: Align::Right,
            },
        ]
    }

    fn table_line_height(&self) -> f64 {
        pt_to_mm(self.config.font_sizes.body as f64 * TABLE_LINE_HEIGHT_FACTOR)
    }

    /// Wrap each cell to its column's inner width
    fn wrap_row(&self, cells: &[String; 4], columns: &[Column; 4], font: FontStyle) -> Vec<Vec<String>> {
        let padding = self.config.cell_padding;
        cells
            .iter()
            .zip(columns.iter())
            .map(|(cell, column)| Self::wrap(font, cell, column.width - 2.0 * padding))
            .collect()
    }

    fn row_height(&self, cell_lines: &[Vec<String>]) -> f64 {
        let max_lines = cell_lines.iter().map(Vec::len).max().unwrap_or(1).max(1);
        self.lines_height(max_lines)
    }

    fn lines_height(&self, lines: usize) -> f64 {
        lines as f64 * self.table_line_height() + 2.0 * self.config.cell_padding
    }

    /// Number of wrapped lines a row piece can hold in `space` millimetres
    fn lines_fitting(&self, space: f64) -> usize {
        let usable = space - 2.0 * self.config.cell_padding;
        if usable <= 0.0 {
            return 0;
        }
        (usable / self.table_line_height() + 1e-9).floor() as usize
    }

    /// Draw a row whose top edge is at `top`; returns its bottom edge
    fn draw_row(&mut self, cell_lines: &[Vec<String>], columns: &[Column; 4], font: FontStyle, top: f64) -> f64 {
        let padding = self.config.cell_padding;
        let line_height = self.table_line_height();
        let first_baseline = top + padding + pt_to_mm(font.size as f64) * ASCENT;

        for (lines, column) in cell_lines.iter().zip(columns.iter()) {
            let x = match column.align {
                Align::Left => column.x + padding,
                Align::Center => column.x + column.width / 2.0,
                Align::Right => column.x + column.width - padding,
            };
            for (i, line) in lines.iter().enumerate() {
                let y = first_baseline + i as f64 * line_height;
                self.text(line, x, y, font, column.align);
            }
        }

        top + self.row_height(cell_lines)
    }

    /// Line-item table; returns the bottom of its last row
    fn table(&mut self, invoice: &Invoice, start: f64) -> f64 {
        let columns = self.columns();
        let bottom = self.config.body_bottom();
        let top_margin = self.config.page_top_margin;

        let header_cells = HEADERS.map(str::to_string);
        let header = self.wrap_row(&header_cells, &columns, self.body_bold);
        let header_height = self.row_height(&header);

        let rows: Vec<Vec<Vec<String>>> = invoice
            .items
            .iter()
            .map(|item| {
                let cells = [
                    item.description.clone(),
                    format_amount(item.rate),
                    format_quantity(item.quantity),
                    format_amount(item.amount()),
                ];
                self.wrap_row(&cells, &columns, self.body)
            })
            .collect();

        // Rows taller than an empty page are split across pages
        let page_space = bottom - top_margin - header_height;

        // Header and first row move together when they do not fit. A row that
        // will be split anyway only needs room for its first line.
        let first_height = rows
            .first()
            .map(|row| {
                let height = self.row_height(row);
                if height > page_space {
                    self.lines_height(1)
                } else {
                    height
                }
            })
            .unwrap_or(0.0);
        let mut y = start;
        if y + header_height + first_height > bottom && y > top_margin {
            self.new_page();
            y = top_margin;
        }

        self.metrics.table_start_y = y;
        self.metrics.table_start_page = self.page_number();
        tracing::debug!(
            table_start = y,
            page = self.page_number(),
            rows = rows.len(),
            "Placing line-item table"
        );

        y = self.draw_row(&header, &columns, self.body_bold, y);
        let mut rows_on_page = 0;
        let mut fresh_page = false;

        for row in rows {
            let mut remaining = row;
            loop {
                let height = self.row_height(&remaining);
                if y + height <= bottom {
                    y = self.draw_row(&remaining, &columns, self.body, y);
                    rows_on_page += 1;
                    fresh_page = false;
                    break;
                }

                let fit = self.lines_fitting(bottom - y);
                if (rows_on_page > 0 && height <= page_space) || (fit == 0 && !fresh_page) {
                    // Move the whole row (or what is left of it) to the next page
                    y = self.table_page_break(&header, &columns);
                    rows_on_page = 0;
                    fresh_page = true;
                    continue;
                }

                // Always place at least one line on a fresh page
                let (piece, rest) = split_row(&remaining, fit.max(1));
                tracing::debug!(
                    lines = fit.max(1),
                    page = self.page_number(),
                    "Splitting tall row"
                );
                let piece_bottom = self.draw_row(&piece, &columns, self.body, y);
                if rest.iter().all(Vec::is_empty) {
                    y = piece_bottom;
                    rows_on_page += 1;
                    fresh_page = false;
                    break;
                }
                remaining = rest;
                y = self.table_page_break(&header, &columns);
                rows_on_page = 0;
                fresh_page = true;
            }
        }

        self.metrics.table_end_y = y;
        y
    }

    /// Start a new page and repeat the table header; returns the cursor below it
    fn table_page_break(&mut self, header: &[Vec<String>], columns: &[Column; 4]) -> f64 {
        self.new_page();
        self.draw_row(header, columns, self.body_bold, self.config.page_top_margin)
    }

    /// Totals block, kept on one page
    fn totals(&mut self, invoice: &Invoice, table_end: f64) {
        let config = self.config;
        let totals = invoice.totals();
        let right = config.content_right();
        let label_x = right - config.totals_label_offset;
        let block_height = 2.0 * config.totals_row_gap + config.rule_gap;

        let mut y = table_end + config.totals_gap;
        if y + block_height > config.body_bottom() {
            self.new_page();
            y = config.page_top_margin + config.totals_gap;
        }
        self.metrics.totals_start_y = y;
        self.metrics.totals_page = self.page_number();
        tracing::debug!(totals_start = y, page = self.page_number(), "Placing totals");

        self.text("SUBTOTAL", label_x, y, self.body, Align::Left);
        self.text(&format_amount(totals.subtotal), right, y, self.body, Align::Right);

        y += config.totals_row_gap;
        self.text("SALES TAX", label_x, y, self.body, Align::Left);
        self.text(&format_amount(totals.tax), right, y, self.body, Align::Right);

        y += config.rule_gap;
        self.push(Element::Rule {
            x1: label_x,
            y1: y,
            x2: right,
            y2: y,
            width: config.rule_width,
        });

        y += config.totals_row_gap;
        let label = match invoice.due_date {
            Some(date) => format!("TOTAL DUE BY {}", format_iso_date(date)),
            None => "DUE ON RECEIPT".to_string(),
        };
        self.text(&label, label_x, y, self.body_bold, Align::Left);
        self.text(&format_amount(totals.total), right, y, self.body_bold, Align::Right);
    }
}

/// Split every cell of a row after its first `lines` lines
fn split_row(row: &[Vec<String>], lines: usize) -> (Vec<Vec<String>>, Vec<Vec<String>>) {
    row.iter()
        .map(|cell| {
            let at = lines.min(cell.len());
            (cell[..at].to_vec(), cell[at..].to_vec())
        })
        .unzip()
}
