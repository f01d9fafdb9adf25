use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use quire_core::{inspect_pdf, Document, Exporter, LineItem, MemorySink, QuireConfig};
use rust_decimal::Decimal;
use tokio_util::sync::CancellationToken;

fn invoice(lines: usize) -> Document {
    let today = NaiveDate::from_ymd_opt(2024, 5, 2).unwrap();
    let mut doc = Document::new_invoice("u1".to_string(), "INV-0042", today, 30);
    doc.sender.name = "Northwind Studio".to_string();
    doc.recipient.name = "Acme Corp".to_string();
    doc.recipient.email = "ap@acme.test".to_string();
    doc.line_items = (0..lines)
        .map(|i| LineItem {
            description: format!("Line {}", i + 1),
            quantity: Decimal::ONE,
            unit_price: Decimal::from(10),
            tax_percent: Decimal::from(8),
        })
        .collect();
    doc
}

#[tokio::test]
async fn exported_invoice_is_one_a4_page_with_a_jpeg() {
    let config = QuireConfig::default();
    let exporter = Exporter::offscreen(&config);
    let sink = MemorySink::new();

    let outcome = exporter
        .export(&invoice(3), &sink, &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(outcome.file_name, "invoice-INV-0042.pdf");
    assert!(!outcome.cropped);

    let files = sink.files();
    assert_eq!(files.len(), 1);
    let report = inspect_pdf(&files[0].1).unwrap();

    assert_eq!(report.page_count, 1);
    assert_eq!(report.media_box, vec![0.0, 0.0, 595.0, 842.0]);
    assert_eq!(report.images.len(), 1);
    assert_eq!(report.images[0].width, 1030);
    assert_eq!(report.images[0].filter.as_deref(), Some("DCTDecode"));
    assert!(report.has_text("Invoice #INV-0042"));

    let transform = report.image_transform.unwrap();
    assert_eq!(transform[0], 515.0);
    assert_eq!(transform[4], 40.0);
}

#[tokio::test]
async fn long_invoice_is_cropped_to_the_page() {
    let config = QuireConfig::default();
    let exporter = Exporter::offscreen(&config);

    let rendered = exporter
        .render(&invoice(80), &CancellationToken::new())
        .await
        .unwrap();
    assert!(rendered.placement.cropped);
    assert_eq!(rendered.placement.height, 762.0);
    assert_eq!(rendered.placement.y, 40.0);

    let report = inspect_pdf(&rendered.bytes).unwrap();
    assert_eq!(report.page_count, 1);
}

#[tokio::test]
async fn cancelled_export_writes_nothing() {
    let exporter = Exporter::offscreen(&QuireConfig::default());
    let sink = MemorySink::new();
    let cancel = CancellationToken::new();
    cancel.cancel();

    assert!(exporter.export(&invoice(1), &sink, &cancel).await.is_err());
    assert!(sink.files().is_empty());
    assert!(!exporter.is_in_flight(&invoice(1)));
}
