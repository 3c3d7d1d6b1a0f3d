//! Chapter packaging: rendered pages encoded as PNG inside a ZIP with a
//! sanitized folder layout.

use std::io::{Seek, Write};

use tiny_skia::Pixmap;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use scankit_core::{ExportError, ExportQuality};
use scankit_model::Chapter;

use crate::render::{render_page, BackgroundLoader};

/// Replaces anything outside `[A-Za-z0-9_-]` with underscores, with a
/// fallback name for fully-invalid input.
pub fn sanitize_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
        .collect();
    if cleaned.chars().all(|c| c == '_') {
        "chapter".to_string()
    } else {
        cleaned
    }
}

/// PNG-encodes a rendered page surface.
pub fn encode_png(pixmap: &Pixmap) -> Result<Vec<u8>, ExportError> {
    pixmap.encode_png().map_err(|e| ExportError::ImageEncode {
        reason: e.to_string(),
    })
}

/// Renders every page of a chapter and returns `(page_number, png)`
/// pairs in page order.
pub fn render_chapter(
    chapter: &Chapter,
    load_background: &BackgroundLoader,
    quality: ExportQuality,
) -> Result<Vec<(u32, Vec<u8>)>, ExportError> {
    let mut out = Vec::with_capacity(chapter.pages.len());
    for page in &chapter.pages {
        let pixmap = render_page(page, load_background, quality)?;
        out.push((page.page_number, encode_png(&pixmap)?));
    }
    Ok(out)
}

/// Writes rendered pages into a ZIP under `<safe_title>/page_NNN.png`.
pub fn write_chapter_zip<W: Write + Seek>(
    writer: W,
    chapter_title: &str,
    pages: &[(u32, Vec<u8>)],
) -> Result<(), ExportError> {
    let folder = sanitize_name(chapter_title);
    let mut zip = ZipWriter::new(writer);
    let options = SimpleFileOptions::default();

    for (number, png) in pages {
        let name = format!("{folder}/page_{number:03}.png");
        zip.start_file(name, options).map_err(|e| ExportError::Archive {
            reason: e.to_string(),
        })?;
        zip.write_all(png).map_err(|e| ExportError::Archive {
            reason: e.to_string(),
        })?;
    }
    zip.finish().map_err(|e| ExportError::Archive {
        reason: e.to_string(),
    })?;
    Ok(())
}

/// Renders a chapter and packages it in one step.
pub fn export_chapter_zip<W: Write + Seek>(
    writer: W,
    chapter: &Chapter,
    load_background: &BackgroundLoader,
    quality: ExportQuality,
) -> Result<usize, ExportError> {
    let pages = render_chapter(chapter, load_background, quality)?;
    let count = pages.len();
    write_chapter_zip(writer, &chapter.title, &pages)?;
    Ok(count)
}
