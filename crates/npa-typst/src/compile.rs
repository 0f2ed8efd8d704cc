//! Typst compilation to PDF bytes
//!
//! Synchronous: callers that need a timeout run this on a blocking task
//! (see `npa-export`).

use chrono::NaiveDate;
use npa_render::PageSequence;
use typst::diag::{Severity, SourceDiagnostic};
use typst::foundations::Bytes;

use crate::error::{Result, TypstError};
use crate::source::{generate, TypstOptions};
use crate::world::VirtualWorld;

/// Compile a page sequence into a PDF
///
/// `today` pins the date Typst sees so output is reproducible.
pub fn compile_pdf(
    sequence: &PageSequence,
    options: &TypstOptions,
    today: NaiveDate,
) -> Result<Vec<u8>> {
    let source = generate(sequence, options)?;
    let assets = source
        .assets
        .into_iter()
        .map(|(path, bytes)| (path, Bytes::from(bytes)))
        .collect();
    let world = VirtualWorld::new(source.text, assets, today)?;

    let warned = typst::compile(&world);
    log_warnings(&warned.warnings);

    let document = warned.output.map_err(|diagnostics| {
        let errors = messages(&diagnostics, Severity::Error);
        tracing::warn!(errors = errors.len(), "typst compilation failed");
        TypstError::Compile(errors)
    })?;

    let pdf = typst_pdf::pdf(&document, &typst_pdf::PdfOptions::default()).map_err(|diagnostics| {
        TypstError::Pdf(messages(&diagnostics, Severity::Error).join("; "))
    })?;

    tracing::info!(
        pages = document.pages.len(),
        bytes = pdf.len(),
        "pdf compiled"
    );
    Ok(pdf)
}

fn log_warnings(warnings: &[SourceDiagnostic]) {
    for message in messages(warnings, Severity::Warning) {
        tracing::debug!(%message, "typst warning");
    }
}

fn messages(diagnostics: &[SourceDiagnostic], severity: Severity) -> Vec<String> {
    diagnostics
        .iter()
        .filter(|diag| diag.severity == severity)
        .map(|diag| {
            if diag.hints.is_empty() {
                diag.message.to_string()
            } else {
                let hints: Vec<String> = diag.hints.iter().map(|h| h.to_string()).collect();
                format!("{} (hint: {})", diag.message, hints.join("; "))
            }
        })
        .collect()
}
