//! Page rasterization: background image plus lettered text blocks,
//! flattened to a pixel surface.
//!
//! Layout rules: greedy word wrap against the block width, vertical
//! centering by total wrapped height, horizontal placement per text
//! alignment, rotation as a translate-rotate-translate pivoting on the
//! block center, and stroke painted before fill when a stroke is set.

use image::DynamicImage;
use rusttype::{point as rt_point, Font, Scale};
use tiny_skia::{Color, Pixmap, PixmapPaint, Transform};

use scankit_core::{ExportError, ExportQuality};
use scankit_model::{CanvasElement, ElementKind, Page, TextAlign, TextBlock};

use crate::font;
use crate::wrap::wrap_text;

/// Line height as a multiple of the font size.
const LINE_HEIGHT_FACTOR: f64 = 1.2;

/// Supplies the decoded background image for a page url. Returning
/// `None` (decode failure, missing file) exports the page blank.
pub type BackgroundLoader<'a> = dyn Fn(&str) -> Option<DynamicImage> + 'a;

/// Flattens one page to a raster surface at the quality preset's scale.
pub fn render_page(
    page: &Page,
    load_background: &BackgroundLoader,
    quality: ExportQuality,
) -> Result<Pixmap, ExportError> {
    let scale = quality.scale();
    let width = (page.width * scale).round().max(1.0) as u32;
    let height = (page.height * scale).round().max(1.0) as u32;
    let mut pixmap =
        Pixmap::new(width, height).ok_or(ExportError::InvalidSurface { width, height })?;
    pixmap.fill(Color::WHITE);

    // Cleaned artwork when available, original otherwise.
    let url = page.cleaned_url.as_deref().unwrap_or(&page.original_url);
    match load_background(url) {
        Some(img) => draw_background(&mut pixmap, &img, width, height),
        None => tracing::warn!(url, "background unavailable; exporting blank page"),
    }

    for element in page.elements_in_paint_order() {
        if !element.is_visible {
            continue;
        }
        if let ElementKind::Text(block) = &element.kind {
            let text = block.rendered_text();
            if text.trim().is_empty() {
                continue;
            }
            draw_text_block(&mut pixmap, element, block, text, scale);
        }
    }
    Ok(pixmap)
}

fn draw_background(pixmap: &mut Pixmap, img: &DynamicImage, width: u32, height: u32) {
    let resized = img
        .resize_exact(width, height, image::imageops::FilterType::Lanczos3)
        .to_rgba8();
    let Some(mut bg) = Pixmap::new(width, height) else {
        return;
    };
    let data = bg.data_mut();
    for (i, px) in resized.pixels().enumerate() {
        let [r, g, b, a] = px.0;
        let idx = i * 4;
        data[idx] = premultiply(r, a);
        data[idx + 1] = premultiply(g, a);
        data[idx + 2] = premultiply(b, a);
        data[idx + 3] = a;
    }
    pixmap.draw_pixmap(
        0,
        0,
        bg.as_ref(),
        &PixmapPaint::default(),
        Transform::identity(),
        None,
    );
}

fn draw_text_block(
    pixmap: &mut Pixmap,
    element: &CanvasElement,
    block: &TextBlock,
    text: &str,
    scale: f64,
) {
    let size = block.font_size * scale;
    if size <= 0.0 {
        return;
    }
    let font = font::get_font_for(
        &block.font_family,
        font::is_bold(&block.font_weight),
        font::is_italic(&block.font_style),
    );
    let measure = |s: &str| font::text_width(font, s, size);

    let block_w = element.width * scale;
    let block_h = element.height * scale;
    let lines = wrap_text(text, block_w, measure);
    if lines.is_empty() {
        return;
    }
    let Some(font) = font else {
        // Wrapping worked off the heuristic, but there is nothing to
        // rasterize glyphs with.
        return;
    };

    let line_height = size * LINE_HEIGHT_FACTOR;
    let total_height = line_height * lines.len() as f64;

    // Horizontal placement of each line relative to the block's left
    // edge; oversized lines may extend past either edge.
    let placed: Vec<(f64, f64)> = lines
        .iter()
        .map(|line| {
            let w = font::text_width(Some(font), line, size);
            let x = match block.text_align {
                TextAlign::Left => 0.0,
                TextAlign::Center => (block_w - w) / 2.0,
                TextAlign::Right => block_w - w,
            };
            (x, w)
        })
        .collect();
    let min_x = placed.iter().map(|(x, _)| *x).fold(0.0_f64, f64::min);
    let max_x = placed
        .iter()
        .map(|(x, w)| x + w)
        .fold(block_w, f64::max);

    let stroke_width = block.stroke_width * scale;
    let margin = (stroke_width + size * 0.25).ceil() + 1.0;

    let local_w = ((max_x - min_x) + margin * 2.0).ceil() as u32;
    let local_h = (total_height + margin * 2.0).ceil() as u32;
    let Some(mut local) = Pixmap::new(local_w.max(1), local_h.max(1)) else {
        return;
    };

    let v_metrics = font.v_metrics(Scale::uniform(size as f32));
    let stroke = block
        .stroke
        .as_deref()
        .filter(|_| block.stroke_width > 0.0)
        .map(parse_hex_color);
    let fill = parse_hex_color(&block.fill);

    for (i, line) in lines.iter().enumerate() {
        let x = margin + (placed[i].0 - min_x);
        let baseline = margin + i as f64 * line_height + v_metrics.ascent as f64;

        // Stroke before fill: draw the run offset around a ring of the
        // stroke radius, then the fill on top.
        if let Some(stroke_color) = stroke {
            for (dx, dy) in offsets(stroke_width) {
                draw_text_run(&mut local, font, line, x + dx, baseline + dy, size, stroke_color);
            }
        }
        draw_text_run(&mut local, font, line, x, baseline, size, fill);
    }

    // Place the local raster so the wrapped text is centered vertically
    // in the block rect, then rotate about the block center.
    let dest_x = element.x * scale + min_x - margin;
    let dest_y = element.y * scale + (block_h - total_height) / 2.0 - margin;
    let center = element.center();
    let transform = Transform::from_rotate_at(
        element.rotation as f32,
        (center.x * scale) as f32,
        (center.y * scale) as f32,
    )
    .pre_translate(dest_x as f32, dest_y as f32);

    let paint = PixmapPaint {
        opacity: element.opacity.clamp(0.0, 1.0) as f32,
        ..PixmapPaint::default()
    };
    pixmap.draw_pixmap(0, 0, local.as_ref(), &paint, transform, None);
}

/// Ring of offsets approximating a stroked outline of the given radius.
fn offsets(radius: f64) -> Vec<(f64, f64)> {
    let r = radius.max(0.5);
    let d = r * std::f64::consts::FRAC_1_SQRT_2;
    vec![
        (-r, 0.0),
        (r, 0.0),
        (0.0, -r),
        (0.0, r),
        (-d, -d),
        (-d, d),
        (d, -d),
        (d, d),
    ]
}

/// Rasterizes one text run at a baseline into the pixmap.
fn draw_text_run(
    pixmap: &mut Pixmap,
    font: &Font<'_>,
    text: &str,
    x: f64,
    baseline_y: f64,
    size: f64,
    color: Color,
) {
    let scale = Scale::uniform(size as f32);
    let start = rt_point(x as f32, baseline_y as f32);
    let width = pixmap.width() as i32;
    let height = pixmap.height() as i32;

    for glyph in font.layout(text, scale, start) {
        let Some(bb) = glyph.pixel_bounding_box() else {
            continue;
        };
        let data = pixmap.data_mut();
        glyph.draw(|gx, gy, coverage| {
            let px = bb.min.x + gx as i32;
            let py = bb.min.y + gy as i32;
            if px < 0 || px >= width || py < 0 || py >= height {
                return;
            }
            let alpha = coverage * color.alpha();
            if alpha <= 0.0 {
                return;
            }
            let idx = ((py * width + px) * 4) as usize;
            blend_premultiplied(&mut data[idx..idx + 4], color, alpha);
        });
    }
}

/// Source-over blend of a straight color at the given alpha onto a
/// premultiplied RGBA pixel.
fn blend_premultiplied(pixel: &mut [u8], color: Color, alpha: f32) {
    let sa = alpha.clamp(0.0, 1.0);
    let sr = color.red() * sa;
    let sg = color.green() * sa;
    let sb = color.blue() * sa;
    let inv = 1.0 - sa;

    pixel[0] = ((sr + pixel[0] as f32 / 255.0 * inv) * 255.0).round() as u8;
    pixel[1] = ((sg + pixel[1] as f32 / 255.0 * inv) * 255.0).round() as u8;
    pixel[2] = ((sb + pixel[2] as f32 / 255.0 * inv) * 255.0).round() as u8;
    pixel[3] = ((sa + pixel[3] as f32 / 255.0 * inv) * 255.0).round() as u8;
}

/// Parses `#rrggbb` / `#rgb` into an opaque color; anything else is
/// black.
pub fn parse_hex_color(value: &str) -> Color {
    let hex = value.trim().trim_start_matches('#');
    let parsed = match hex.len() {
        6 => u32::from_str_radix(hex, 16).ok().map(|v| {
            (
                ((v >> 16) & 0xff) as u8,
                ((v >> 8) & 0xff) as u8,
                (v & 0xff) as u8,
            )
        }),
        3 => u32::from_str_radix(hex, 16).ok().map(|v| {
            let r = ((v >> 8) & 0xf) as u8;
            let g = ((v >> 4) & 0xf) as u8;
            let b = (v & 0xf) as u8;
            (r * 17, g * 17, b * 17)
        }),
        _ => None,
    };
    match parsed {
        Some((r, g, b)) => Color::from_rgba8(r, g, b, 255),
        None => {
            tracing::debug!(value, "unparseable color; using black");
            Color::BLACK
        }
    }
}

fn premultiply(channel: u8, alpha: u8) -> u8 {
    (channel as u16 * alpha as u16 / 255) as u8
}
