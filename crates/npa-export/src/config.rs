//! TOML export configuration
//!
//! Every field has a default, so an empty file is a valid configuration:
//!
//! ```toml
//! timeout_ms = 30000
//!
//! [letterhead]
//! organization = ["MINISTÉRIO DA DEFESA", "COMANDO DA AERONÁUTICA"]
//! document_type = "NORMA PADRÃO DE AÇÃO"
//! logo = "assets/brasao.png"
//!
//! [page]
//! margins_cm = [2.5, 2.0, 2.0, 3.0]
//!
//! [fonts]
//! pdf = "Libertinus Serif"
//! docx = "Times New Roman"
//! size_pt = 12.0
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use npa_render::image::{data_uri, format_for_extension};
use npa_render::RenderOptions;
use serde::{Deserialize, Serialize};

use crate::export::ExportOptions;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Upper bound for one export, in milliseconds
    pub timeout_ms: u64,
    pub letterhead: LetterheadConfig,
    pub page: PageConfig,
    pub fonts: FontConfig,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 30_000,
            letterhead: LetterheadConfig::default(),
            page: PageConfig::default(),
            fonts: FontConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LetterheadConfig {
    pub organization: Vec<String>,
    pub document_type: String,
    /// PNG, JPEG, GIF or SVG file; relative paths resolve against the
    /// configuration file
    pub logo: Option<PathBuf>,
}

impl Default for LetterheadConfig {
    fn default() -> Self {
        let render = RenderOptions::default();
        Self {
            organization: render.organization,
            document_type: render.document_type,
            logo: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    /// Top, right, bottom, left
    pub margins_cm: [f32; 4],
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            margins_cm: [2.5, 2.0, 2.0, 3.0],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    /// Must be an embedded family
    pub pdf: String,
    /// Resolved by the word processor
    pub docx: String,
    pub size_pt: f32,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            pdf: "Libertinus Serif".to_string(),
            docx: "Times New Roman".to_string(),
            size_pt: 12.0,
        }
    }
}

impl ExportConfig {
    /// Load configuration from a TOML file
    ///
    /// A relative `letterhead.logo` is resolved against the file's directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or the TOML is malformed.
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let mut config = Self::from_str(&content)?;
        if let (Some(logo), Some(dir)) = (&config.letterhead.logo, path.parent()) {
            if logo.is_relative() {
                config.letterhead.logo = Some(dir.join(logo));
            }
        }
        Ok(config)
    }

    /// Parse configuration from a TOML string
    ///
    /// ```
    /// use npa_export::ExportConfig;
    ///
    /// # fn example() -> anyhow::Result<()> {
    /// let config = ExportConfig::from_str("timeout_ms = 500")?;
    /// assert_eq!(config.timeout_ms, 500);
    /// # Ok(())
    /// # }
    /// ```
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> anyhow::Result<Self> {
        toml::from_str(s).context("Failed to parse TOML configuration")
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Letterhead options, with the logo file read and inlined
    pub fn render_options(&self) -> anyhow::Result<RenderOptions> {
        let logo = match &self.letterhead.logo {
            Some(path) => Some(load_logo(path)?),
            None => None,
        };
        Ok(RenderOptions {
            organization: self.letterhead.organization.clone(),
            document_type: self.letterhead.document_type.clone(),
            logo,
        })
    }

    pub fn export_options(&self) -> anyhow::Result<ExportOptions> {
        Ok(ExportOptions {
            timeout: self.timeout(),
            render: self.render_options()?,
        })
    }

    #[cfg(feature = "pdf")]
    pub fn typst_options(&self) -> npa_typst::TypstOptions {
        npa_typst::TypstOptions {
            font: self.fonts.pdf.clone(),
            font_size_pt: self.fonts.size_pt,
            margins_cm: self.page.margins_cm,
        }
    }

    #[cfg(feature = "docx")]
    pub fn docx_options(&self) -> npa_docx::DocxOptions {
        npa_docx::DocxOptions {
            font: self.fonts.docx.clone(),
            font_size_pt: self.fonts.size_pt,
            margins_cm: self.page.margins_cm,
        }
    }
}

fn load_logo(path: &Path) -> anyhow::Result<String> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default();
    let format = format_for_extension(extension)
        .with_context(|| format!("Unsupported logo format: {}", path.display()))?;
    let bytes =
        fs::read(path).with_context(|| format!("Failed to read logo: {}", path.display()))?;
    Ok(data_uri(format, &bytes))
}
