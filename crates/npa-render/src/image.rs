//! Embedded images (`data:image/...;base64,` URIs)
//!
//! Both backends embed images from the bytes carried in the markup; remote
//! URLs are never fetched.

use base64::Engine;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ImageError {
    #[error("Not a data URI")]
    NotDataUri,

    #[error("Only base64 data URIs are supported")]
    NotBase64,

    #[error("Unsupported image type: {0}")]
    Unsupported(String),

    #[error("Invalid base64 payload: {0}")]
    Decode(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
    Svg,
}

impl ImageFormat {
    fn from_mime(mime: &str) -> Option<Self> {
        match mime.to_ascii_lowercase().as_str() {
            "image/png" => Some(ImageFormat::Png),
            "image/jpeg" | "image/jpg" => Some(ImageFormat::Jpeg),
            "image/gif" => Some(ImageFormat::Gif),
            "image/svg+xml" => Some(ImageFormat::Svg),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpg",
            ImageFormat::Gif => "gif",
            ImageFormat::Svg => "svg",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Gif => "image/gif",
            ImageFormat::Svg => "image/svg+xml",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedImage {
    pub format: ImageFormat,
    pub bytes: Vec<u8>,
}

impl EmbeddedImage {
    pub fn from_data_uri(uri: &str) -> Result<Self, ImageError> {
        let rest = uri
            .trim()
            .strip_prefix("data:")
            .ok_or(ImageError::NotDataUri)?;
        let (meta, payload) = rest.split_once(',').ok_or(ImageError::NotDataUri)?;
        let mime = meta
            .strip_suffix(";base64")
            .ok_or(ImageError::NotBase64)?;
        let format =
            ImageFormat::from_mime(mime).ok_or_else(|| ImageError::Unsupported(mime.to_string()))?;
        let cleaned: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(cleaned)
            .map_err(|e| ImageError::Decode(e.to_string()))?;
        Ok(Self { format, bytes })
    }
}

/// Encode raw bytes as a data URI; used when a logo is loaded from disk
pub fn data_uri(format: ImageFormat, bytes: &[u8]) -> String {
    format!(
        "data:{};base64,{}",
        format.mime_type(),
        base64::engine::general_purpose::STANDARD.encode(bytes)
    )
}

/// Guess the format from a file extension
pub fn format_for_extension(extension: &str) -> Option<ImageFormat> {
    match extension.to_ascii_lowercase().as_str() {
        "png" => Some(ImageFormat::Png),
        "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
        "gif" => Some(ImageFormat::Gif),
        "svg" => Some(ImageFormat::Svg),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_png_uri() {
        let uri = data_uri(ImageFormat::Png, &[0x89, b'P', b'N', b'G']);
        let image = EmbeddedImage::from_data_uri(&uri).unwrap();
        assert_eq!(image.format, ImageFormat::Png);
        assert_eq!(image.bytes, vec![0x89, b'P', b'N', b'G']);
    }

    #[test]
    fn test_rejects_other_uris() {
        assert_eq!(
            EmbeddedImage::from_data_uri("https://example.org/a.png"),
            Err(ImageError::NotDataUri)
        );
        assert_eq!(
            EmbeddedImage::from_data_uri("data:image/png,rawbytes"),
            Err(ImageError::NotBase64)
        );
        assert!(matches!(
            EmbeddedImage::from_data_uri("data:image/webp;base64,AAAA"),
            Err(ImageError::Unsupported(_))
        ));
        assert!(matches!(
            EmbeddedImage::from_data_uri("data:image/png;base64,@@@"),
            Err(ImageError::Decode(_))
        ));
    }
}
