//! # ScanKit Export
//!
//! The export boundary: flattens finished pages into raster images
//! (background artwork plus word-wrapped, lettered text) and packages
//! chapters as ZIP archives.

pub mod archive;
pub mod font;
pub mod render;
pub mod wrap;

pub use archive::{encode_png, export_chapter_zip, render_chapter, sanitize_name, write_chapter_zip};
pub use render::{parse_hex_color, render_page, BackgroundLoader};
pub use wrap::wrap_text;

pub use scankit_core::ExportQuality;
