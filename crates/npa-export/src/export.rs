//! Cancellable export of a document snapshot

use std::time::Duration;

use npa_model::Document;
use npa_render::{render_with, RenderOptions};
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::writer::{ExportFormat, WriterError, WriterRegistry};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    pub timeout: Duration,
    pub render: RenderOptions,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            render: RenderOptions::default(),
        }
    }
}

/// Bytes of a finished export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub format: ExportFormat,
    pub bytes: Vec<u8>,
    /// Logical pages in the rendered sequence
    pub pages: u32,
}

impl ExportArtifact {
    /// `NPA 01-02/SETOR/2025` -> `NPA_01-02_SETOR_2025.pdf`
    pub fn file_name(&self, document_number: &str) -> String {
        let stem: String = document_number
            .trim()
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '-' { c } else { '_' })
            .collect();
        let stem = if stem.is_empty() { "npa".to_string() } else { stem };
        format!("{stem}.{}", self.format.extension())
    }
}

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("no writer registered for {0}")]
    BackendUnavailable(ExportFormat),

    #[error("{format} writer failed: {source}")]
    Backend {
        format: ExportFormat,
        #[source]
        source: WriterError,
    },

    #[error("export cancelled")]
    Cancelled,

    #[error("export timed out after {0:?}")]
    Timeout(Duration),

    #[error("export task failed: {0}")]
    Task(String),
}

/// Render a snapshot of `document` and run the writer for `format`
///
/// The writer runs on a blocking thread, raced against `cancel` and
/// `options.timeout`. A blocking thread cannot be interrupted, so on
/// cancellation or timeout its result is dropped when it finishes.
pub async fn export(
    document: &Document,
    format: ExportFormat,
    registry: &WriterRegistry,
    options: &ExportOptions,
    cancel: CancellationToken,
) -> Result<ExportArtifact, ExportError> {
    let writer = registry
        .get(format)
        .ok_or(ExportError::BackendUnavailable(format))?;
    if cancel.is_cancelled() {
        return Err(ExportError::Cancelled);
    }

    let sequence = render_with(document, &options.render);
    let pages = sequence.total_pages;
    tracing::info!(%format, pages, "export started");

    let task = tokio::task::spawn_blocking(move || writer.write(&sequence));
    let joined = tokio::select! {
        biased;
        () = cancel.cancelled() => {
            tracing::warn!(%format, "export cancelled");
            return Err(ExportError::Cancelled);
        }
        joined = tokio::time::timeout(options.timeout, task) => joined,
    };

    let bytes = match joined {
        Ok(Ok(Ok(bytes))) => bytes,
        Ok(Ok(Err(source))) => {
            tracing::warn!(%format, error = %source, "writer failed");
            return Err(ExportError::Backend { format, source });
        }
        Ok(Err(join_error)) => return Err(ExportError::Task(join_error.to_string())),
        Err(_elapsed) => {
            tracing::warn!(%format, timeout = ?options.timeout, "export timed out");
            return Err(ExportError::Timeout(options.timeout));
        }
    };

    tracing::info!(%format, pages, bytes = bytes.len(), "export finished");
    Ok(ExportArtifact {
        format,
        bytes,
        pages,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::DocumentWriter;
    use npa_model::template;
    use npa_render::PageSequence;
    use std::sync::Arc;

    struct PageCount;

    impl DocumentWriter for PageCount {
        fn format(&self) -> ExportFormat {
            ExportFormat::Docx
        }

        fn write(&self, sequence: &PageSequence) -> Result<Vec<u8>, WriterError> {
            Ok(sequence.total_pages.to_string().into_bytes())
        }
    }

    struct Slow;

    impl DocumentWriter for Slow {
        fn format(&self) -> ExportFormat {
            ExportFormat::Pdf
        }

        fn write(&self, _: &PageSequence) -> Result<Vec<u8>, WriterError> {
            std::thread::sleep(Duration::from_millis(400));
            Ok(Vec::new())
        }
    }

    struct Failing;

    impl DocumentWriter for Failing {
        fn format(&self) -> ExportFormat {
            ExportFormat::Pdf
        }

        fn write(&self, _: &PageSequence) -> Result<Vec<u8>, WriterError> {
            Err(WriterError::Other("disk full".to_string()))
        }
    }

    fn registry(writer: Arc<dyn DocumentWriter>) -> WriterRegistry {
        let mut registry = WriterRegistry::new();
        registry.register(writer);
        registry
    }

    #[tokio::test]
    async fn test_writer_receives_rendered_sequence() {
        let document = template::standard(None);
        let artifact = export(
            &document,
            ExportFormat::Docx,
            &registry(Arc::new(PageCount)),
            &ExportOptions::default(),
            CancellationToken::new(),
        )
        .await
        .unwrap();
        assert_eq!(artifact.bytes, b"8".to_vec());
        assert_eq!(artifact.pages, 8);
    }

    #[tokio::test]
    async fn test_missing_backend() {
        let result = export(
            &template::standard(None),
            ExportFormat::Pdf,
            &WriterRegistry::new(),
            &ExportOptions::default(),
            CancellationToken::new(),
        )
        .await;
        assert!(matches!(result, Err(ExportError::BackendUnavailable(ExportFormat::Pdf))));
    }

    #[tokio::test]
    async fn test_cancelled_before_start() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let result = export(
            &template::standard(None),
            ExportFormat::Docx,
            &registry(Arc::new(PageCount)),
            &ExportOptions::default(),
            cancel,
        )
        .await;
        assert!(matches!(result, Err(ExportError::Cancelled)));
    }

    #[tokio::test]
    async fn test_cancelled_while_writing() {
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            trigger.cancel();
        });
        let result = export(
            &template::standard(None),
            ExportFormat::Pdf,
            &registry(Arc::new(Slow)),
            &ExportOptions::default(),
            cancel,
        )
        .await;
        assert!(matches!(result, Err(ExportError::Cancelled)));
    }

    #[tokio::test]
    async fn test_timeout() {
        let options = ExportOptions {
            timeout: Duration::from_millis(20),
            ..ExportOptions::default()
        };
        let result = export(
            &template::standard(None),
            ExportFormat::Pdf,
            &registry(Arc::new(Slow)),
            &options,
            CancellationToken::new(),
        )
        .await;
        assert!(matches!(result, Err(ExportError::Timeout(_))));
    }

    #[tokio::test]
    async fn test_writer_error_is_wrapped() {
        let result = export(
            &template::standard(None),
            ExportFormat::Pdf,
            &registry(Arc::new(Failing)),
            &ExportOptions::default(),
            CancellationToken::new(),
        )
        .await;
        let error = result.unwrap_err();
        assert_eq!(error.to_string(), "pdf writer failed: disk full");
    }

    #[test]
    fn test_file_name() {
        let artifact = ExportArtifact {
            format: ExportFormat::Docx,
            bytes: Vec::new(),
            pages: 1,
        };
        assert_eq!(
            artifact.file_name("NPA 01-02/SETOR/2025"),
            "NPA_01-02_SETOR_2025.docx"
        );
        assert_eq!(artifact.file_name("  "), "npa.docx");
    }
}
