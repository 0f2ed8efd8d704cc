//! Subcommand implementations

use std::fmt::Write as _;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use npa_export::{default_registry, export, ExportConfig, ExportFormat};
use npa_model::{template, Document};
use npa_render::{render_with, PageKind, PageSequence};
use tokio_util::sync::CancellationToken;

/// `--input` file, or the seeded template when absent
pub fn load_document(input: Option<&Path>) -> Result<Document> {
    let Some(path) = input else {
        return Ok(template::standard(None));
    };
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read document: {}", path.display()))?;
    Document::from_json(&json)
        .with_context(|| format!("Failed to parse document: {}", path.display()))
}

pub fn template(date: Option<NaiveDate>, output: Option<&Path>) -> Result<()> {
    let json = template::standard(date)
        .to_json()
        .context("Failed to serialize template")?;
    match output {
        Some(path) => write_atomically(path, json.as_bytes()),
        None => {
            println!("{json}");
            Ok(())
        }
    }
}

pub fn outline(input: Option<&Path>, config: &ExportConfig) -> Result<()> {
    let document = load_document(input)?;
    let sequence = render_with(&document, &config.render_options()?);
    print!("{}", format_outline(&sequence));
    Ok(())
}

/// One line per logical page: number, kind, running header
pub fn format_outline(sequence: &PageSequence) -> String {
    let mut out = format!(
        "{} ({} pages)\n",
        sequence.document_number, sequence.total_pages
    );
    for page in &sequence.pages {
        let kind = match &page.kind {
            PageKind::Cover => "cover".to_string(),
            PageKind::Section { number } => format!("section {number}"),
            PageKind::References => "references".to_string(),
            PageKind::Annex { letter } => format!("annex {letter}"),
        };
        let header = page
            .header
            .as_ref()
            .map(|header| format!("{} | {}", header.left, header.right))
            .unwrap_or_default();
        let _ = writeln!(out, "{:>3}  {:<12} {}", page.number, kind, header);
    }
    out
}

pub struct ExportArgs {
    pub format: ExportFormat,
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub timeout_ms: Option<u64>,
    pub logo: Option<PathBuf>,
}

pub async fn export_command(args: ExportArgs, mut config: ExportConfig) -> Result<()> {
    if let Some(timeout_ms) = args.timeout_ms {
        config.timeout_ms = timeout_ms;
    }
    if let Some(logo) = args.logo {
        config.letterhead.logo = Some(logo);
    }

    let document = load_document(args.input.as_deref())?;
    let options = config.export_options()?;
    let registry = default_registry(&config);

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupt received, cancelling export");
            on_interrupt.cancel();
        }
    });

    let artifact = export(&document, args.format, &registry, &options, cancel)
        .await
        .with_context(|| format!("Failed to export {}", args.format))?;

    let output = args
        .output
        .unwrap_or_else(|| PathBuf::from(artifact.file_name(&document.number)));
    write_atomically(&output, &artifact.bytes)?;

    tracing::info!(
        path = %output.display(),
        pages = artifact.pages,
        bytes = artifact.bytes.len(),
        timeout = ?Duration::from_millis(config.timeout_ms),
        "export written"
    );
    println!("{}", output.display());
    Ok(())
}

/// Write through a temporary file in the target directory, so a failed
/// export never leaves a partial file behind
pub fn write_atomically(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let mut file = tempfile::NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temporary file in {}", dir.display()))?;
    file.write_all(bytes)
        .context("Failed to write temporary file")?;
    file.persist(path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}
