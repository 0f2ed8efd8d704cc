//! Images stored under `word/media`

use std::collections::HashMap;

use npa_render::{EmbeddedImage, ImageFormat};

use crate::error::{DocxError, Result};

/// EMUs per centimetre
pub const EMU_PER_CM: u64 = 360_000;
/// EMUs per pixel at 96 dpi
const EMU_PER_PX: u64 = 9_525;
/// Used when the pixel size cannot be read
const FALLBACK_SIZE_PX: (u32, u32) = (378, 283);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaFile {
    /// Relationship id in `word/_rels/document.xml.rels`
    pub rel_id: String,
    /// Part name relative to `word/`
    pub target: String,
    pub format: ImageFormat,
    pub bytes: Vec<u8>,
    pub width_px: u32,
    pub height_px: u32,
}

impl MediaFile {
    /// Extent in EMUs, scaled down to fit the given box
    pub fn extent(&self, max_width_emu: u64, max_height_emu: u64) -> (u64, u64) {
        let width = u64::from(self.width_px.max(1)) * EMU_PER_PX;
        let height = u64::from(self.height_px.max(1)) * EMU_PER_PX;
        let scale = f64::min(
            1.0,
            f64::min(
                max_width_emu as f64 / width as f64,
                max_height_emu as f64 / height as f64,
            ),
        );
        (
            ((width as f64) * scale).round() as u64,
            ((height as f64) * scale).round() as u64,
        )
    }
}

/// Media parts of one package, deduplicated by source URI
#[derive(Debug, Default)]
pub struct Media {
    files: Vec<MediaFile>,
    by_uri: HashMap<String, usize>,
}

impl Media {
    /// Decode a data URI and return the index of its media part
    ///
    /// SVG has no portable DOCX representation: `Ok(None)`.
    pub fn embed(&mut self, uri: &str) -> Result<Option<usize>> {
        if let Some(&index) = self.by_uri.get(uri) {
            return Ok(Some(index));
        }
        let image = EmbeddedImage::from_data_uri(uri).map_err(|e| DocxError::Image(e.to_string()))?;
        if image.format == ImageFormat::Svg {
            tracing::warn!("svg image skipped in docx output");
            return Ok(None);
        }
        let (width_px, height_px) = pixel_size(image.format, &image.bytes).unwrap_or_else(|| {
            tracing::debug!(format = ?image.format, "image size unreadable, using fallback");
            FALLBACK_SIZE_PX
        });

        let index = self.files.len();
        let number = index + 1;
        self.files.push(MediaFile {
            rel_id: format!("rIdImg{number}"),
            target: format!("media/image{number}.{}", image.format.extension()),
            format: image.format,
            bytes: image.bytes,
            width_px,
            height_px,
        });
        self.by_uri.insert(uri.to_string(), index);
        Ok(Some(index))
    }

    pub fn get(&self, index: usize) -> Option<&MediaFile> {
        self.files.get(index)
    }

    pub fn files(&self) -> &[MediaFile] {
        &self.files
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

pub fn pixel_size(format: ImageFormat, bytes: &[u8]) -> Option<(u32, u32)> {
    match format {
        ImageFormat::Png => png_size(bytes),
        ImageFormat::Jpeg => jpeg_size(bytes),
        ImageFormat::Gif => gif_size(bytes),
        ImageFormat::Svg => None,
    }
}

fn png_size(bytes: &[u8]) -> Option<(u32, u32)> {
    let reader = png::Decoder::new(bytes).read_info().ok()?;
    let info = reader.info();
    Some((info.width, info.height))
}

/// Logical screen size from the GIF header
fn gif_size(bytes: &[u8]) -> Option<(u32, u32)> {
    if bytes.len() < 10 || !bytes.starts_with(b"GIF8") {
        return None;
    }
    let width = u16::from_le_bytes([bytes[6], bytes[7]]);
    let height = u16::from_le_bytes([bytes[8], bytes[9]]);
    Some((u32::from(width), u32::from(height)))
}

/// Frame size from the first SOFn marker
fn jpeg_size(bytes: &[u8]) -> Option<(u32, u32)> {
    if !bytes.starts_with(&[0xFF, 0xD8]) {
        return None;
    }
    let mut pos = 2;
    while pos + 4 <= bytes.len() {
        if bytes[pos] != 0xFF {
            return None;
        }
        let marker = bytes[pos + 1];
        if marker == 0xFF {
            pos += 1;
            continue;
        }
        let length = usize::from(u16::from_be_bytes([bytes[pos + 2], bytes[pos + 3]]));
        let is_frame = matches!(marker, 0xC0..=0xCF) && !matches!(marker, 0xC4 | 0xC8 | 0xCC);
        if is_frame {
            let frame = bytes.get(pos + 5..pos + 9)?;
            let height = u16::from_be_bytes([frame[0], frame[1]]);
            let width = u16::from_be_bytes([frame[2], frame[3]]);
            return Some((u32::from(width), u32::from(height)));
        }
        pos += 2 + length;
    }
    None
}
