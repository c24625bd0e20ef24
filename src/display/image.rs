//! Image inspection for rows carrying an `image_path` field

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use imagesize::ImageType;
use serde_json::Value;

use super::errors::{DisplayError, DisplayResult};
use crate::store::TableStore;

/// Row field naming the image file
pub const IMAGE_PATH_FIELD: &str = "image_path";

/// Recognised image container formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
    Bmp,
    WebP,
}

impl ImageFormat {
    /// Identify a format from the leading bytes of a file
    pub fn sniff(data: &[u8]) -> Option<Self> {
        match imagesize::image_type(data).ok()? {
            ImageType::Png => Some(ImageFormat::Png),
            ImageType::Jpeg => Some(ImageFormat::Jpeg),
            ImageType::Gif => Some(ImageFormat::Gif),
            ImageType::Bmp => Some(ImageFormat::Bmp),
            ImageType::Webp => Some(ImageFormat::WebP),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ImageFormat::Png => "PNG",
            ImageFormat::Jpeg => "JPEG",
            ImageFormat::Gif => "GIF",
            ImageFormat::Bmp => "BMP",
            ImageFormat::WebP => "WebP",
        }
    }
}

/// Width and height read from the image header; `None` when truncated
fn dimensions(data: &[u8]) -> Option<(u32, u32)> {
    let size = imagesize::blob_size(data).ok()?;
    Some((
        u32::try_from(size.width).ok()?,
        u32::try_from(size.height).ok()?,
    ))
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An image referenced by a row, opened and identified
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageView {
    pub table: String,
    pub row_id: Value,
    pub path: PathBuf,
    pub format: ImageFormat,
    pub size: u64,
    pub dimensions: Option<(u32, u32)>,
}

impl ImageView {
    /// Look up the first row of `table` with `id == row_id` and open the
    /// image named by its `image_path` field.
    pub fn for_row(store: &TableStore, table: &str, row_id: &Value) -> DisplayResult<Self> {
        let row = store.find_row(table, row_id)?;

        let path = match row.get(IMAGE_PATH_FIELD) {
            Some(Value::String(p)) if !p.is_empty() => PathBuf::from(p),
            _ => {
                return Err(DisplayError::MissingImagePath {
                    table: table.to_string(),
                    row_id: id_label(row_id),
                })
            }
        };

        let mut view = Self::open(&path)?;
        view.table = table.to_string();
        view.row_id = row_id.clone();
        Ok(view)
    }

    /// Open and identify an image file not tied to a row
    pub fn open(path: &Path) -> DisplayResult<Self> {
        let unavailable = |reason: String| DisplayError::ImageUnavailable {
            path: path.to_path_buf(),
            reason,
        };

        let data = fs::read(path).map_err(|e| unavailable(e.to_string()))?;
        let format = ImageFormat::sniff(&data)
            .ok_or_else(|| unavailable("unrecognised image format".to_string()))?;

        Ok(Self {
            table: String::new(),
            row_id: Value::Null,
            path: path.to_path_buf(),
            format,
            size: data.len() as u64,
            dimensions: dimensions(&data),
        })
    }

    /// One-line description
    pub fn render(&self) -> String {
        let dims = match self.dimensions {
            Some((w, h)) => format!("{}x{}, ", w, h),
            None => String::new(),
        };
        let origin = if self.table.is_empty() {
            String::new()
        } else {
            format!("{}/{}: ", self.table, id_label(&self.row_id))
        };
        format!(
            "{}{} ({}, {}{} bytes)",
            origin,
            self.path.display(),
            self.format,
            dims,
            self.size
        )
    }
}

fn id_label(id: &Value) -> String {
    match id {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
