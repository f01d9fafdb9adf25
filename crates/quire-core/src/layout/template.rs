//! The invoice/quote template.

use chrono::NaiveDate;

use super::metrics::{self, LINE_HEIGHT};
use super::{Align, Column, ColumnKind, Element, LayoutOptions, PageLayout, Rgb, TextRun};
use crate::models::document::Document;
use crate::money::{self, format_currency_with, format_number};

const TITLE_SIZE: f32 = 24.0;
const LABEL_SIZE: f32 = 9.0;
const BODY_SIZE: f32 = 10.0;
const TOTAL_SIZE: f32 = 12.0;
const ROW_HEIGHT: f32 = 22.0;
const GUTTER: f32 = 12.0;

/// Column widths as fractions of the inner width.
const COLUMNS_NO_TAX: [(ColumnKind, f32); 4] = [
    (ColumnKind::Description, 0.50),
    (ColumnKind::Quantity, 0.12),
    (ColumnKind::UnitPrice, 0.19),
    (ColumnKind::Total, 0.19),
];

const COLUMNS_WITH_TAX: [(ColumnKind, f32); 5] = [
    (ColumnKind::Description, 0.42),
    (ColumnKind::Quantity, 0.10),
    (ColumnKind::UnitPrice, 0.17),
    (ColumnKind::TaxPercent, 0.12),
    (ColumnKind::Total, 0.19),
];

struct Builder<'a> {
    opts: &'a LayoutOptions,
    x0: f32,
    inner: f32,
    y: f32,
    elements: Vec<Element>,
}

impl<'a> Builder<'a> {
    fn new(opts: &'a LayoutOptions) -> Self {
        Self {
            opts,
            x0: opts.padding,
            inner: (opts.width - 2.0 * opts.padding).max(0.0),
            y: opts.padding,
            elements: Vec::new(),
        }
    }

    fn x1(&self) -> f32 {
        self.x0 + self.inner
    }

    #[allow(clippy::too_many_arguments)]
    fn text(
        &mut self,
        x: f32,
        y: f32,
        size: f32,
        bold: bool,
        align: Align,
        color: Rgb,
        text: impl Into<String>,
    ) {
        self.elements.push(Element::Text(TextRun {
            x,
            y,
            size,
            bold,
            align,
            color,
            text: text.into(),
        }));
    }

    fn rule(&mut self, y: f32, thickness: f32) {
        self.elements.push(Element::Rule {
            x: self.x0,
            y,
            width: self.inner,
            thickness,
            color: Rgb::RULE,
        });
    }

    fn money(&self, amount: rust_decimal::Decimal) -> String {
        format_currency_with(amount, &self.opts.currency_symbol)
    }
}

/// Resolve table columns; the tax column exists only when some line is taxed.
pub(crate) fn table_columns(has_tax: bool, x0: f32, inner: f32) -> Vec<Column> {
    let shares: &[(ColumnKind, f32)] = if has_tax {
        &COLUMNS_WITH_TAX
    } else {
        &COLUMNS_NO_TAX
    };

    let mut x = x0;
    shares
        .iter()
        .map(|&(kind, fraction)| {
            let width = inner * fraction;
            let align = if kind == ColumnKind::Description {
                Align::Left
            } else {
                Align::Right
            };
            let column = Column { kind, x, width, align };
            x += width;
            column
        })
        .collect()
}

fn format_date(date: NaiveDate) -> String {
    date.format("%b %d, %Y").to_string()
}

/// Lay a document out on the fixed-width template.
pub fn layout_document(doc: &Document, opts: &LayoutOptions) -> PageLayout {
    let mut b = Builder::new(opts);

    // Title block
    let title = doc.title();
    let (x0, x1) = (b.x0, b.x1());
    let y = b.y;
    b.text(x0, y, TITLE_SIZE, true, Align::Left, Rgb::INK, title.clone());
    b.text(
        x1,
        y + (TITLE_SIZE - LABEL_SIZE) / 2.0,
        LABEL_SIZE,
        true,
        Align::Right,
        Rgb::MUTED,
        doc.status.as_str().to_uppercase(),
    );
    b.y += TITLE_SIZE * LINE_HEIGHT + 8.0;
    let y = b.y;
    b.rule(y, 1.0);
    b.y += 16.0;

    // From / Bill To
    let half = b.inner / 2.0;
    let column_width = half - GUTTER;
    let mut from = vec![(doc.sender.name.clone(), true)];
    if let Some(business) = &doc.sender.business_name {
        from.push((business.clone(), false));
    }
    if let Some(address) = &doc.sender.address {
        from.extend(
            metrics::wrap(address, column_width, BODY_SIZE)
                .into_iter()
                .map(|l| (l, false)),
        );
    }
    if let Some(phone) = &doc.sender.phone {
        from.push((phone.clone(), false));
    }

    let mut to = vec![(doc.recipient.name.clone(), true)];
    if !doc.recipient.address.trim().is_empty() {
        to.extend(
            metrics::wrap(&doc.recipient.address, column_width, BODY_SIZE)
                .into_iter()
                .map(|l| (l, false)),
        );
    }
    to.push((doc.recipient.email.clone(), false));

    let line = BODY_SIZE * LINE_HEIGHT;
    let top = b.y;
    for (x, label, lines) in [(x0, "FROM", &from), (x0 + half, "BILL TO", &to)] {
        b.text(x, top, LABEL_SIZE, true, Align::Left, Rgb::MUTED, label);
        for (i, (text, bold)) in lines.iter().enumerate() {
            let text = metrics::truncate_to_width(text, column_width, BODY_SIZE);
            b.text(
                x,
                top + LABEL_SIZE * LINE_HEIGHT + i as f32 * line,
                BODY_SIZE,
                *bold,
                Align::Left,
                Rgb::INK,
                text,
            );
        }
    }
    b.y = top + LABEL_SIZE * LINE_HEIGHT + from.len().max(to.len()) as f32 * line + 10.0;

    // Dates
    let y = b.y;
    for (x, label, date) in [
        (x0, "Issue Date", doc.issue_date),
        (x0 + half, "Due Date", doc.due_date),
    ] {
        b.text(x, y, LABEL_SIZE, true, Align::Left, Rgb::MUTED, label);
        b.text(
            x,
            y + LABEL_SIZE * LINE_HEIGHT,
            BODY_SIZE,
            false,
            Align::Left,
            Rgb::INK,
            format_date(date),
        );
    }
    b.y = y + LABEL_SIZE * LINE_HEIGHT + line + 20.0;

    // Line-item table
    let columns = table_columns(doc.has_tax(), x0, b.inner);
    let y = b.y;
    b.elements.push(Element::Fill {
        x: x0,
        y,
        width: b.inner,
        height: ROW_HEIGHT,
        color: Rgb::HEADER_FILL,
    });
    let text_offset = (ROW_HEIGHT - BODY_SIZE) / 2.0;
    for column in &columns {
        b.text(
            column.anchor(),
            y + text_offset,
            BODY_SIZE,
            true,
            column.align,
            Rgb::INK,
            column.kind.label(),
        );
    }
    b.y += ROW_HEIGHT;

    for item in &doc.line_items {
        let y = b.y;
        for column in &columns {
            let text = match column.kind {
                ColumnKind::Description => {
                    metrics::truncate_to_width(&item.description, column.width - 6.0, BODY_SIZE)
                }
                ColumnKind::Quantity => format_number(item.quantity),
                ColumnKind::UnitPrice => b.money(item.unit_price),
                ColumnKind::TaxPercent => format!("{}%", format_number(item.tax_percent)),
                ColumnKind::Total => b.money(money::line_total(item)),
            };
            b.text(
                column.anchor(),
                y + text_offset,
                BODY_SIZE,
                false,
                column.align,
                Rgb::INK,
                text,
            );
        }
        b.y += ROW_HEIGHT;
        let y = b.y;
        b.rule(y, 0.5);
    }

    // Totals
    let totals = doc.totals();
    b.y += 12.0;
    let label_x = x0 + b.inner * 0.6;
    for (label, amount) in [("Subtotal", totals.subtotal), ("Tax", totals.tax_total)] {
        let y = b.y;
        let value = b.money(amount);
        b.text(label_x, y, BODY_SIZE, false, Align::Left, Rgb::MUTED, label);
        b.text(x1, y, BODY_SIZE, false, Align::Right, Rgb::INK, value);
        b.y += 18.0;
    }
    let y = b.y;
    b.elements.push(Element::Rule {
        x: label_x,
        y,
        width: x1 - label_x,
        thickness: 1.0,
        color: Rgb::RULE,
    });
    b.y += 8.0;
    let y = b.y;
    let grand = b.money(totals.grand_total);
    b.text(label_x, y, TOTAL_SIZE, true, Align::Left, Rgb::INK, "Total");
    b.text(x1, y, TOTAL_SIZE, true, Align::Right, Rgb::INK, grand);
    b.y += TOTAL_SIZE * LINE_HEIGHT;

    // Notes
    if let Some(notes) = doc.notes.as_deref().filter(|n| !n.trim().is_empty()) {
        b.y += 20.0;
        let y = b.y;
        b.text(x0, y, LABEL_SIZE, true, Align::Left, Rgb::MUTED, "NOTES");
        b.y += LABEL_SIZE * LINE_HEIGHT;
        let inner = b.inner;
        for text in metrics::wrap(notes, inner, BODY_SIZE) {
            let y = b.y;
            b.text(x0, y, BODY_SIZE, false, Align::Left, Rgb::INK, text);
            b.y += line;
        }
    }

    let height = (b.y + opts.padding).max(opts.min_height).ceil();

    PageLayout {
        width: opts.width,
        height,
        title,
        columns,
        elements: b.elements,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::document::{LineItem, Status};
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;

    fn doc(taxes: &[i64]) -> Document {
        let today = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        let mut doc = Document::new_invoice("u1".to_string(), "42", today, 30);
        doc.sender.name = "Ada Lovelace".to_string();
        doc.recipient.name = "Acme".to_string();
        doc.recipient.email = "ap@acme.test".to_string();
        doc.line_items = taxes
            .iter()
            .enumerate()
            .map(|(i, tax)| LineItem {
                description: format!("Item {}", i + 1),
                quantity: Decimal::from(2),
                unit_price: Decimal::from(10),
                tax_percent: Decimal::from(*tax),
            })
            .collect();
        doc
    }

    fn kinds(layout: &PageLayout) -> Vec<ColumnKind> {
        layout.columns.iter().map(|c| c.kind).collect()
    }

    #[test]
    fn test_tax_column_omitted_when_all_zero() {
        let layout = layout_document(&doc(&[0, 0]), &LayoutOptions::default());
        assert!(!layout.has_column(ColumnKind::TaxPercent));
        assert!(!layout.contains_text("Tax %"));
        assert_eq!(
            kinds(&layout),
            vec![
                ColumnKind::Description,
                ColumnKind::Quantity,
                ColumnKind::UnitPrice,
                ColumnKind::Total,
            ]
        );
    }

    #[test]
    fn test_tax_column_present_when_any_taxed() {
        let layout = layout_document(&doc(&[0, 10]), &LayoutOptions::default());
        assert!(layout.has_column(ColumnKind::TaxPercent));
        assert!(layout.contains_text("Tax %"));
        assert!(layout.contains_text("10%"));
    }

    #[test]
    fn test_columns_span_inner_width() {
        for has_tax in [false, true] {
            let columns = table_columns(has_tax, 40.0, 435.0);
            let last = columns.last().unwrap();
            assert!((last.x + last.width - 475.0).abs() < 0.01);
        }
    }

    #[test]
    fn test_titles() {
        let mut d = doc(&[0]);
        let layout = layout_document(&d, &LayoutOptions::default());
        assert_eq!(layout.title, "Invoice #42");
        assert!(layout.contains_text("Invoice #42"));

        d.kind = crate::models::document::DocumentKind::Quote;
        d.status = Status::Quote;
        assert_eq!(layout_document(&d, &LayoutOptions::default()).title, "Quote #42");
    }

    #[test]
    fn test_quote_status_record_lays_out_as_quote() {
        let mut value = serde_json::to_value(doc(&[0])).unwrap();
        value.as_object_mut().unwrap().remove("kind");
        value["status"] = serde_json::json!("quote");
        let d: Document = serde_json::from_value(value).unwrap();

        let layout = layout_document(&d, &LayoutOptions::default());
        assert_eq!(layout.title, "Quote #42");
        assert!(!layout.contains_text("Invoice #42"));
    }

    #[test]
    fn test_totals_block() {
        let layout = layout_document(&doc(&[0, 10]), &LayoutOptions::default());
        assert!(layout.contains_text("$40.00"));
        assert!(layout.contains_text("$2.00"));
        assert!(layout.contains_text("$42.00"));
        assert!(layout.contains_text("$22.00"));
    }

    #[test]
    fn test_rows_in_print_order() {
        let layout = layout_document(&doc(&[0, 0, 0]), &LayoutOptions::default());
        let ys: Vec<f32> = ["Item 1", "Item 2", "Item 3"]
            .iter()
            .map(|t| layout.text_runs().find(|r| r.text == *t).unwrap().y)
            .collect();
        assert!(ys[0] < ys[1] && ys[1] < ys[2]);
    }

    #[test]
    fn test_notes_block_optional() {
        let mut d = doc(&[0]);
        let without = layout_document(&d, &LayoutOptions::default());
        assert!(!without.contains_text("NOTES"));

        d.notes = Some("Thanks for your business".to_string());
        let with = layout_document(&d, &LayoutOptions::default());
        assert!(with.contains_text("NOTES"));
        assert!(with.contains_text("Thanks for your business"));
        assert!(with.height > without.height);
    }

    #[test]
    fn test_min_height() {
        let opts = LayoutOptions {
            min_height: 900.0,
            ..Default::default()
        };
        assert_eq!(layout_document(&doc(&[0]), &opts).height, 900.0);
    }

    #[test]
    fn test_deterministic() {
        let d = doc(&[5, 0]);
        let opts = LayoutOptions::default();
        assert_eq!(layout_document(&d, &opts), layout_document(&d, &opts));
    }
}
