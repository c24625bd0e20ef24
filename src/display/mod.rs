//! Text display helpers
//!
//! Read-only consumers of the table store: a bar chart of table sizes and
//! an inspector for images referenced by a row's `image_path` field.

mod chart;
mod errors;
mod image;

pub use chart::BarChart;
pub use errors::{DisplayError, DisplayResult};
pub use image::{ImageFormat, ImageView, IMAGE_PATH_FIELD};
