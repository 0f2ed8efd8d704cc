//! ZIP assembly of the WordprocessingML package

use std::io::{Cursor, Write};

use npa_render::PageSequence;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

use crate::document::{body_elements, document_xml};
use crate::error::Result;
use crate::media::Media;
use crate::parts::{self, Geometry, HEADER_EVEN, HEADER_FIRST, HEADER_ODD};

/// Page and font settings for the DOCX
#[derive(Debug, Clone, PartialEq)]
pub struct DocxOptions {
    /// Word resolves the family on the reader's machine
    pub font: String,
    pub font_size_pt: f32,
    /// Top, right, bottom, left, in centimetres
    pub margins_cm: [f32; 4],
}

impl Default for DocxOptions {
    fn default() -> Self {
        Self {
            font: "Times New Roman".to_string(),
            font_size_pt: 12.0,
            margins_cm: [2.5, 2.0, 2.0, 3.0],
        }
    }
}

/// Write a page sequence as a `.docx` package
///
/// Entries carry a fixed timestamp, so the same input gives the same bytes.
pub fn write_docx(sequence: &PageSequence, options: &DocxOptions) -> Result<Vec<u8>> {
    let geometry = Geometry::from_options(options);
    let mut media = Media::default();
    let elements = body_elements(sequence, &geometry, &mut media)?;

    let mut entries: Vec<(String, Vec<u8>)> = vec![
        ("[Content_Types].xml".to_string(), parts::content_types(&media)?),
        ("_rels/.rels".to_string(), parts::root_rels()?),
        (
            "word/document.xml".to_string(),
            document_xml(&elements, &geometry, &media)?,
        ),
        (
            "word/_rels/document.xml.rels".to_string(),
            parts::document_rels(&media)?,
        ),
        ("word/styles.xml".to_string(), parts::styles(options)?),
        ("word/settings.xml".to_string(), parts::settings()?),
        (
            format!("word/{HEADER_ODD}"),
            parts::header(3, &sequence.document_number, &geometry)?,
        ),
        (
            format!("word/{HEADER_EVEN}"),
            parts::header(2, &sequence.document_number, &geometry)?,
        ),
        (
            format!("word/{HEADER_FIRST}"),
            parts::header(1, &sequence.document_number, &geometry)?,
        ),
    ];
    for file in media.files() {
        entries.push((format!("word/{}", file.target), file.bytes.clone()));
    }

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let file_options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(DateTime::default());
    for (name, bytes) in &entries {
        zip.start_file(name.as_str(), file_options)?;
        zip.write_all(bytes)?;
    }
    let bytes = zip.finish()?.into_inner();

    tracing::info!(
        pages = sequence.pages.len(),
        images = media.files().len(),
        bytes = bytes.len(),
        "docx written"
    );
    Ok(bytes)
}
