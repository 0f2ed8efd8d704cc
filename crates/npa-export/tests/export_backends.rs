use std::io::Cursor;

use npa_export::{
    default_registry, export, ExportConfig, ExportError, ExportFormat, ExportOptions,
};
use npa_model::template;
use tokio_util::sync::CancellationToken;

#[tokio::test]
async fn docx_export_is_a_zip_with_document_part() {
    let registry = default_registry(&ExportConfig::default());
    let artifact = export(
        &template::standard(None),
        ExportFormat::Docx,
        &registry,
        &ExportOptions::default(),
        CancellationToken::new(),
    )
    .await
    .unwrap();

    assert_eq!(artifact.format, ExportFormat::Docx);
    assert!(artifact.bytes.starts_with(b"PK"));
    let archive = zip::ZipArchive::new(Cursor::new(artifact.bytes)).unwrap();
    assert!(archive.file_names().any(|name| name == "word/document.xml"));
}

#[tokio::test]
async fn pdf_export_produces_pdf_bytes() {
    let registry = default_registry(&ExportConfig::default());
    let artifact = export(
        &template::standard(None),
        ExportFormat::Pdf,
        &registry,
        &ExportOptions::default(),
        CancellationToken::new(),
    )
    .await
    .unwrap();

    assert!(artifact.bytes.starts_with(b"%PDF"));
    assert_eq!(artifact.pages, 8);
}

#[tokio::test]
async fn both_formats_are_registered_by_default() {
    let registry = default_registry(&ExportConfig::default());
    assert_eq!(
        registry.formats(),
        vec![ExportFormat::Pdf, ExportFormat::Docx]
    );
}

#[tokio::test]
async fn configured_letterhead_reaches_the_output() {
    let config = ExportConfig::from_str(
        r#"
        [letterhead]
        organization = ["ORGANIZAÇÃO DE TESTE"]
        "#,
    )
    .unwrap();
    let registry = default_registry(&config);
    let artifact = export(
        &template::standard(None),
        ExportFormat::Docx,
        &registry,
        &config.export_options().unwrap(),
        CancellationToken::new(),
    )
    .await
    .unwrap();

    let mut archive = zip::ZipArchive::new(Cursor::new(artifact.bytes)).unwrap();
    let mut body = String::new();
    std::io::Read::read_to_string(
        &mut archive.by_name("word/document.xml").unwrap(),
        &mut body,
    )
    .unwrap();
    assert!(body.contains("ORGANIZAÇÃO DE TESTE"));
}

#[tokio::test]
async fn cancelled_export_returns_no_bytes() {
    let cancel = CancellationToken::new();
    cancel.cancel();
    let result = export(
        &template::standard(None),
        ExportFormat::Pdf,
        &default_registry(&ExportConfig::default()),
        &ExportOptions::default(),
        cancel,
    )
    .await;
    assert!(matches!(result, Err(ExportError::Cancelled)));
}
