//! Integration tests for invoice-render
//!
//! Layout properties are checked on the document model; PDF output is read
//! back with lopdf.

use chrono::NaiveDate;
use invoice_render::{
    export_file_name, export_to_dir, layout_invoice, render_pdf, Element, InvoiceRenderer,
    LayoutConfig, RenderedDocument, RECIPIENT_PLACEHOLDER,
};
use ledger::{Company, Invoice, LineItem};
use lopdf::content::Content;
use pretty_assertions::assert_eq;

fn sample_invoice() -> Invoice {
    Invoice {
        id: "inv-1".to_string(),
        invoice_number: "INV1001".to_string(),
        date: NaiveDate::from_ymd_opt(2025, 12, 3).unwrap(),
        due_date: None,
        sender_name: "Your Business Name".to_string(),
        sender_address: "Your Street Address\nCity, State, ZIP".to_string(),
        sender_phone: "+1 555 123 4567".to_string(),
        recipient: Some(Company::new("Client Co", "2 Street\nTown, ST 00000")),
        items: vec![
            LineItem::new("a", "Consulting", 50.0, 1.0),
            LineItem::new("b", "Design", 25.5, 3.0),
        ],
        sales_tax_rate: 0.0,
        instructions: "Please make payment by the due date.".to_string(),
        created_at: 1_733_200_000_000,
    }
}

fn with_sender_lines(lines: usize) -> Invoice {
    let mut invoice = sample_invoice();
    invoice.sender_address = (1..=lines)
        .map(|i| format!("Address line {i}"))
        .collect::<Vec<_>>()
        .join("\n");
    invoice
}

fn pdf_strings(bytes: &[u8]) -> (usize, Vec<String>) {
    let doc = lopdf::Document::load_mem(bytes).unwrap();
    let pages = doc.get_pages();
    let mut strings = Vec::new();
    for page_id in pages.values() {
        let content = Content::decode(&doc.get_page_content(*page_id).unwrap()).unwrap();
        for op in content.operations.iter().filter(|op| op.operator == "Tj") {
            let bytes = op.operands[0].as_str().unwrap();
            strings.push(bytes.iter().map(|&b| b as char).collect());
        }
    }
    (pages.len(), strings)
}

#[test]
fn test_totals_are_shown_with_two_decimals() {
    let document = layout_invoice(&sample_invoice(), &LayoutConfig::default());
    let texts: Vec<&str> = document.texts().collect();

    let subtotal = texts.iter().position(|t| *t == "SUBTOTAL").unwrap();
    assert_eq!(texts[subtotal + 1], "126.50");
    assert_eq!(texts[subtotal + 2], "SALES TAX");
    assert_eq!(texts[subtotal + 3], "0.00");
    assert_eq!(texts[subtotal + 4], "DUE ON RECEIPT");
    assert_eq!(texts[subtotal + 5], "126.50");
}

#[test]
fn test_rows_follow_item_order() {
    let document = layout_invoice(&sample_invoice(), &LayoutConfig::default());
    let texts: Vec<&str> = document.texts().collect();
    let consulting = texts.iter().position(|t| *t == "Consulting").unwrap();
    let design = texts.iter().position(|t| *t == "Design").unwrap();
    assert!(consulting < design);
    assert_eq!(&texts[design..design + 4], &["Design", "25.50", "3", "76.50"]);
}

#[test]
fn test_missing_recipient_uses_placeholder() {
    let mut invoice = sample_invoice();
    invoice.recipient = None;

    let document = layout_invoice(&invoice, &LayoutConfig::default());
    assert!(document.contains_text(RECIPIENT_PLACEHOLDER));
    assert!(document.metrics.table_start_y >= 90.0);
}

#[test]
fn test_short_content_starts_table_at_minimum_offset() {
    let mut invoice = sample_invoice();
    invoice.recipient = None;
    invoice.sender_address = String::new();

    let document = layout_invoice(&invoice, &LayoutConfig::default());
    assert_eq!(document.metrics.table_start_y, 90.0);
}

#[test]
fn test_long_sender_address_pushes_table_down() {
    let config = LayoutConfig::default();
    let short = layout_invoice(&with_sender_lines(1), &config);
    let long = layout_invoice(&with_sender_lines(6), &config);
    assert!(long.metrics.table_start_y > short.metrics.table_start_y);
}

#[test]
fn test_table_start_is_monotonic_in_address_length() {
    let config = LayoutConfig::default();
    let starts: Vec<f64> = (0..12)
        .map(|n| layout_invoice(&with_sender_lines(n), &config).metrics.table_start_y)
        .collect();
    for pair in starts.windows(2) {
        assert!(pair[1] >= pair[0], "{starts:?}");
    }
}

#[test]
fn test_wrapped_sender_address_never_overlaps_phone() {
    let mut invoice = sample_invoice();
    invoice.sender_address = "word ".repeat(80);
    let document = layout_invoice(&invoice, &LayoutConfig::default());

    let address_lines: Vec<f64> = document.pages[0]
        .elements
        .iter()
        .filter_map(|e| match e {
            Element::Text { text, y, .. } if text.starts_with("word") => Some(*y),
            _ => None,
        })
        .collect();
    assert!(address_lines.len() > 1);

    let phone_y = match document.find_text("+1 555 123 4567") {
        Some((_, Element::Text { y, .. })) => *y,
        _ => panic!("phone missing"),
    };
    assert!(address_lines.iter().all(|y| *y < phone_y));
}

#[test]
fn test_due_date_changes_only_the_label() {
    let config = LayoutConfig::default();
    let without = layout_invoice(&sample_invoice(), &config);

    let mut invoice = sample_invoice();
    invoice.due_date = NaiveDate::from_ymd_opt(2025, 12, 31);
    let with = layout_invoice(&invoice, &config);

    assert!(with.contains_text("TOTAL DUE BY 2025-12-31"));
    assert!(!with.contains_text("DUE ON RECEIPT"));
    assert_eq!(with.metrics, without.metrics);

    let a = &without.pages[0].elements;
    let b = &with.pages[0].elements;
    assert_eq!(a.len(), b.len());
    for (left, right) in a.iter().zip(b.iter()) {
        match (left, right) {
            (
                Element::Text { text: t1, x: x1, y: y1, .. },
                Element::Text { text: t2, x: x2, y: y2, .. },
            ) => {
                assert_eq!((x1, y1), (x2, y2));
                if t1 != t2 {
                    assert_eq!(t1, "DUE ON RECEIPT");
                    assert_eq!(t2, "TOTAL DUE BY 2025-12-31");
                }
            }
            (l, r) => assert_eq!(l, r),
        }
    }
}

#[test]
fn test_layout_is_idempotent() {
    let invoice = sample_invoice();
    let config = LayoutConfig::default();
    assert_eq!(layout_invoice(&invoice, &config), layout_invoice(&invoice, &config));
    assert_eq!(
        render_pdf(&invoice, &config).unwrap(),
        render_pdf(&invoice, &config).unwrap()
    );
}

fn many_items(count: usize) -> Invoice {
    let mut invoice = sample_invoice();
    invoice.items = (0..count)
        .map(|i| LineItem::new(i.to_string(), format!("Item {i}"), 10.0, 1.0))
        .collect();
    invoice
}

fn texts_on_page(document: &RenderedDocument, page: usize) -> Vec<&str> {
    document.pages[page]
        .elements
        .iter()
        .filter_map(|e| match e {
            Element::Text { text, .. } => Some(text.as_str()),
            Element::Rule { .. } => None,
        })
        .collect()
}

#[test]
fn test_many_items_paginate_with_repeated_header() {
    let config = LayoutConfig::default();
    let document = layout_invoice(&many_items(60), &config);

    assert!(document.page_count() > 1);
    assert_eq!(document.metrics.page_count, document.page_count());

    for page in 0..document.page_count() {
        let texts = texts_on_page(&document, page);
        if texts.iter().any(|t| t.starts_with("Item ")) {
            assert!(texts.contains(&"DESCRIPTION"), "page {page} lacks header");
        }
    }

    // Header blocks only on the first page
    assert_eq!(document.find_text("INVOICE: INV1001").unwrap().0, 1);
    assert_eq!(document.texts().filter(|t| *t == "BILL TO").count(), 1);

    // Every row drawn once, nothing below the body
    for i in 0..60 {
        let label = format!("Item {i}");
        assert_eq!(document.texts().filter(|t| *t == label).count(), 1);
    }
    for page in &document.pages {
        for element in &page.elements {
            if let Element::Text { y, .. } = element {
                assert!(*y <= config.body_bottom());
            }
        }
    }

    assert_eq!(document.metrics.totals_page, document.page_count());
    assert_eq!(document.find_text("SUBTOTAL").unwrap().0, document.page_count());
    assert!(document.contains_text("600.00"));
}

#[test]
fn test_totals_block_is_never_split() {
    let config = LayoutConfig::default();
    for count in 10..40 {
        let document = layout_invoice(&many_items(count), &config);
        let subtotal_page = document.find_text("SUBTOTAL").unwrap().0;
        let due_page = document.find_text("DUE ON RECEIPT").unwrap().0;
        assert_eq!(subtotal_page, due_page, "{count} items");
    }
}

/// Text elements whose baseline falls below the printable body
fn texts_below_body<'a>(document: &'a RenderedDocument, config: &LayoutConfig) -> Vec<(usize, f64, &'a str)> {
    let mut below = Vec::new();
    for (index, page) in document.pages.iter().enumerate() {
        for element in &page.elements {
            if let Element::Text { text, y, .. } = element {
                if *y > config.body_bottom() {
                    below.push((index + 1, *y, text.as_str()));
                }
            }
        }
    }
    below
}

#[test]
fn test_tall_row_is_split_across_pages() {
    let config = LayoutConfig::default();
    let mut invoice = sample_invoice();
    let description = (0..1000).map(|i| format!("word{i}")).collect::<Vec<_>>().join(" ");
    invoice.items = vec![LineItem::new("long", description, 12.5, 2.0)];
    let document = layout_invoice(&invoice, &config);

    assert!(document.page_count() >= 3, "{} pages", document.page_count());
    let below = texts_below_body(&document, &config);
    assert!(below.is_empty(), "{below:?}");

    // Table starts in place on page 1 and continues under a repeated header
    assert_eq!(document.metrics.table_start_page, 1);
    for page in 0..document.page_count() {
        let texts = texts_on_page(&document, page);
        if texts.iter().any(|t| t.starts_with("word")) {
            assert!(texts.contains(&"DESCRIPTION"), "page {page} lacks header");
        }
    }

    // Every word drawn exactly once, in order
    let words: Vec<&str> = document
        .texts()
        .filter(|t| t.starts_with("word"))
        .flat_map(|t| t.split(' '))
        .collect();
    let expected: Vec<String> = (0..1000).map(|i| format!("word{i}")).collect();
    assert_eq!(words, expected);

    // Rate and amount only on the first piece
    assert_eq!(document.texts().filter(|t| *t == "12.50").count(), 1);
    assert_eq!(document.find_text("25.00").unwrap().0, 1);
    assert_eq!(document.metrics.totals_page, document.page_count());
}

#[test]
fn test_tall_row_after_short_rows_splits_on_current_page() {
    let config = LayoutConfig::default();
    let mut invoice = sample_invoice();
    let description = "lorem ".repeat(1500);
    invoice.items.push(LineItem::new("long", description.trim_end(), 1.0, 1.0));
    let document = layout_invoice(&invoice, &config);

    let below = texts_below_body(&document, &config);
    assert!(below.is_empty(), "{below:?}");
    // The tall row begins right under the short rows instead of leaving page 1 empty
    assert_eq!(document.find_text("Consulting").unwrap().0, 1);
    assert!(texts_on_page(&document, 0).iter().any(|t| t.starts_with("lorem")));
}

#[test]
fn test_long_sender_address_continues_on_next_page() {
    let config = LayoutConfig::default();
    let document = layout_invoice(&with_sender_lines(60), &config);

    let below = texts_below_body(&document, &config);
    assert!(below.is_empty(), "{below:?}");
    for i in 1..=60 {
        let label = format!("Address line {i}");
        assert_eq!(document.texts().filter(|t| *t == label).count(), 1, "{label}");
    }
    assert_eq!(document.find_text("Address line 1").unwrap().0, 1);
    assert_eq!(document.find_text("Address line 60").unwrap().0, 2);

    // Blocks after the address follow it onto page 2
    let (bill_to_page, bill_to) = document.find_text("BILL TO").unwrap();
    assert_eq!(bill_to_page, 2);
    assert_eq!(document.find_text("Client Co").unwrap().0, 2);
    assert_eq!(document.find_text("+1 555 123 4567").unwrap().0, 2);

    let bill_to_y = match bill_to {
        Element::Text { y, .. } => *y,
        Element::Rule { .. } => unreachable!(),
    };
    assert_eq!(document.metrics.table_start_page, 2);
    assert!(document.metrics.table_start_y > bill_to_y);
}

#[test]
fn test_empty_items_render() {
    let mut invoice = sample_invoice();
    invoice.items.clear();
    let document = layout_invoice(&invoice, &LayoutConfig::default());
    assert!(document.contains_text("DESCRIPTION"));
    assert_eq!(document.texts().filter(|t| *t == "0.00").count(), 3);
}

#[test]
fn test_pdf_output_parses() {
    let invoice = sample_invoice();
    let bytes = render_pdf(&invoice, &LayoutConfig::default()).unwrap();
    let (pages, strings) = pdf_strings(&bytes);

    assert_eq!(pages, 1);
    for expected in [
        "INVOICE: INV1001",
        "Dec 2025",
        "YOUR BUSINESS NAME",
        "BILL TO",
        "Client Co",
        "RATE",
        "(USD)",
        "126.50",
        "DUE ON RECEIPT",
    ] {
        assert!(strings.iter().any(|s| s == expected), "missing {expected}");
    }
}

#[test]
fn test_paginated_pdf_page_count() {
    let invoice = many_items(60);
    let renderer = InvoiceRenderer::new();
    let document = renderer.layout(&invoice);
    let (pages, _) = pdf_strings(&renderer.to_bytes(&invoice).unwrap());
    assert_eq!(pages, document.page_count());
}

#[test]
fn test_export_to_dir() {
    let dir = tempfile::tempdir().unwrap();
    let invoice = sample_invoice();
    let path = export_to_dir(&invoice, &LayoutConfig::default(), dir.path()).unwrap();

    assert_eq!(path, dir.path().join("Invoice_INV1001.pdf"));
    assert_eq!(export_file_name(&invoice), "Invoice_INV1001.pdf");
    let bytes = std::fs::read(&path).unwrap();
    assert!(bytes.starts_with(b"%PDF-"));
}

#[test]
fn test_custom_config_moves_blocks() {
    let config = LayoutConfig::from_json(r#"{"tableStartMinOffset": 150}"#).unwrap();
    let document = InvoiceRenderer::new()
        .with_config(config)
        .layout(&sample_invoice());
    assert_eq!(document.metrics.table_start_y, 150.0);
}
