//! Built-in writers, one per enabled backend feature

#[cfg(feature = "pdf")]
pub use pdf::PdfWriter;

#[cfg(feature = "docx")]
pub use docx::DocxWriter;

use crate::config::ExportConfig;
use crate::writer::WriterRegistry;

/// Registry with every writer compiled into this build
pub fn default_registry(config: &ExportConfig) -> WriterRegistry {
    let mut registry = WriterRegistry::new();
    #[cfg(feature = "pdf")]
    registry.register(std::sync::Arc::new(PdfWriter::new(config.typst_options())));
    #[cfg(feature = "docx")]
    registry.register(std::sync::Arc::new(DocxWriter::new(config.docx_options())));
    #[cfg(not(any(feature = "pdf", feature = "docx")))]
    let _ = config;
    registry
}

#[cfg(feature = "pdf")]
mod pdf {
    use chrono::{Local, NaiveDate};
    use npa_render::PageSequence;
    use npa_typst::{compile_pdf, TypstOptions};

    use crate::writer::{DocumentWriter, ExportFormat, WriterError};

    pub struct PdfWriter {
        options: TypstOptions,
        /// Date Typst reports as today; `None` uses the local date at write time
        today: Option<NaiveDate>,
    }

    impl PdfWriter {
        pub fn new(options: TypstOptions) -> Self {
            Self {
                options,
                today: None,
            }
        }

        /// Pin the compile date for reproducible output
        pub fn with_today(mut self, today: NaiveDate) -> Self {
            self.today = Some(today);
            self
        }
    }

    impl DocumentWriter for PdfWriter {
        fn format(&self) -> ExportFormat {
            ExportFormat::Pdf
        }

        fn write(&self, sequence: &PageSequence) -> Result<Vec<u8>, WriterError> {
            let today = self.today.unwrap_or_else(|| Local::now().date_naive());
            Ok(compile_pdf(sequence, &self.options, today)?)
        }
    }
}

#[cfg(feature = "docx")]
mod docx {
    use npa_docx::{write_docx, DocxOptions};
    use npa_render::PageSequence;

    use crate::writer::{DocumentWriter, ExportFormat, WriterError};

    pub struct DocxWriter {
        options: DocxOptions,
    }

    impl DocxWriter {
        pub fn new(options: DocxOptions) -> Self {
            Self { options }
        }
    }

    impl DocumentWriter for DocxWriter {
        fn format(&self) -> ExportFormat {
            ExportFormat::Docx
        }

        fn write(&self, sequence: &PageSequence) -> Result<Vec<u8>, WriterError> {
            Ok(write_docx(sequence, &self.options)?)
        }
    }
}
