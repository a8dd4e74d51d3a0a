//! Types for one classification attempt: the phase machine, the staged
//! image, and the snapshot the view renders from.

use std::io::Write;
use std::path::Path;

use image::ImageFormat;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::error::{EcosortError, Result};
use crate::models::ClassificationResult;

/// Upload cap advertised on the product's drop zone.
pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

const ACCEPTED_FORMATS: [ImageFormat; 3] =
    [ImageFormat::Jpeg, ImageFormat::Png, ImageFormat::WebP];
const FORMAT_MESSAGE: &str = "Unsupported file type. Use a JPG, PNG, or WEBP image.";
const SIZE_MESSAGE: &str = "Images can be at most 10MB.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Phase {
    #[default]
    Idle,
    Previewing,
    Submitting,
    Result,
    Tips,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Previewing => "previewing",
            Phase::Submitting => "submitting",
            Phase::Result => "result",
            Phase::Tips => "tips",
        }
    }
}

/// The staged bytes written to a named temp file so the view has a real
/// path to render. Dropping the preview deletes the file, which is what
/// revokes a replaced selection.
#[derive(Debug)]
pub struct ImagePreview {
    file: NamedTempFile,
}

impl ImagePreview {
    fn write(bytes: &[u8], format: ImageFormat) -> Result<Self> {
        let suffix = format!(
            ".{}",
            format.extensions_str().first().copied().unwrap_or("img")
        );
        let mut file = tempfile::Builder::new()
            .prefix("ecosort-preview-")
            .suffix(&suffix)
            .tempfile()?;
        file.write_all(bytes)?;
        file.flush()?;
        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

#[derive(Debug)]
pub struct SelectedImage {
    pub file_name: String,
    pub format: ImageFormat,
    pub bytes: Vec<u8>,
    pub preview: ImagePreview,
}

impl SelectedImage {
    /// Validates dropped bytes and stages them for upload. The format is
    /// sniffed from content, never trusted from the file name.
    pub(crate) fn stage(bytes: Vec<u8>, file_name: &str) -> Result<Self> {
        if bytes.is_empty() {
            return Err(EcosortError::invalid_image("The selected file is empty."));
        }
        if bytes.len() > MAX_IMAGE_BYTES {
            return Err(EcosortError::invalid_image(SIZE_MESSAGE));
        }
        let format = image::guess_format(&bytes)
            .map_err(|_| EcosortError::invalid_image(FORMAT_MESSAGE))?;
        if !ACCEPTED_FORMATS.contains(&format) {
            return Err(EcosortError::invalid_image(FORMAT_MESSAGE));
        }

        let preview = ImagePreview::write(&bytes, format)?;
        Ok(Self {
            file_name: file_name.to_string(),
            format,
            bytes,
            preview,
        })
    }

    pub(crate) fn mime(&self) -> &'static str {
        self.format.to_mime_type()
    }
}

#[derive(Debug, Default)]
pub(crate) struct WorkflowState {
    pub phase: Phase,
    pub selected: Option<SelectedImage>,
    pub result: Option<ClassificationResult>,
    /// Bumped per submission. A completing upload only applies its outcome
    /// while its number is still current; anything else is stale.
    pub submit_seq: u64,
}

impl WorkflowState {
    pub fn snapshot(&self) -> WorkflowSnapshot {
        WorkflowSnapshot {
            phase: self.phase,
            file_name: self.selected.as_ref().map(|s| s.file_name.clone()),
            preview_path: self
                .selected
                .as_ref()
                .map(|s| s.preview.path().display().to_string()),
            result: self.result.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowSnapshot {
    pub phase: Phase,
    pub file_name: Option<String>,
    pub preview_path: Option<String>,
    pub result: Option<ClassificationResult>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_bytes() -> Vec<u8> {
        let mut bytes = b"\x89PNG\r\n\x1a\n".to_vec();
        bytes.extend_from_slice(&[0u8; 32]);
        bytes
    }

    #[test]
    fn stages_a_png_and_writes_a_preview() {
        let staged = SelectedImage::stage(png_bytes(), "bottle.png").unwrap();
        assert_eq!(staged.format, ImageFormat::Png);
        assert_eq!(staged.mime(), "image/png");
        assert!(staged.preview.path().exists());
        assert!(staged
            .preview
            .path()
            .extension()
            .is_some_and(|ext| ext == "png"));
    }

    #[test]
    fn dropping_the_selection_deletes_the_preview() {
        let staged = SelectedImage::stage(png_bytes(), "bottle.png").unwrap();
        let path = staged.preview.path().to_path_buf();
        assert!(path.exists());
        drop(staged);
        assert!(!path.exists());
    }

    #[test]
    fn rejects_unsniffable_bytes() {
        let err = SelectedImage::stage(b"just some text".to_vec(), "notes.txt").unwrap_err();
        assert_eq!(err, EcosortError::invalid_image(FORMAT_MESSAGE));
    }

    #[test]
    fn rejects_recognized_but_unaccepted_formats() {
        let err = SelectedImage::stage(b"GIF89a\x00\x00".to_vec(), "anim.gif").unwrap_err();
        assert_eq!(err, EcosortError::invalid_image(FORMAT_MESSAGE));
    }

    #[test]
    fn rejects_oversized_files() {
        let mut bytes = png_bytes();
        bytes.resize(MAX_IMAGE_BYTES + 1, 0);
        let err = SelectedImage::stage(bytes, "huge.png").unwrap_err();
        assert_eq!(err, EcosortError::invalid_image(SIZE_MESSAGE));
    }

    #[test]
    fn rejects_empty_input() {
        assert!(SelectedImage::stage(Vec::new(), "empty.png").is_err());
    }
}
