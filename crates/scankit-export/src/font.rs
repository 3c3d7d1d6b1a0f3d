//! System font lookup and text measurement.
//!
//! Fonts are resolved through the system font database and cached for
//! the process lifetime. When a family cannot be resolved at all the
//! measurement falls back to a width heuristic so wrapping still works;
//! glyph rendering for that block is skipped with a warning.

use fontdb::{Database, Family, Query, Source, Stretch, Style, Weight};
use rusttype::{point as rt_point, Font, Scale};
use std::{
    collections::HashMap,
    fs,
    sync::{Mutex, OnceLock},
};

/// Average glyph width as a fraction of the font size, used when no
/// system font can be resolved.
const FALLBACK_ADVANCE: f64 = 0.55;

#[derive(Clone, Eq, PartialEq, Hash)]
struct FontKey {
    family: String,
    bold: bool,
    italic: bool,
}

fn db() -> &'static Database {
    static DB: OnceLock<Database> = OnceLock::new();
    DB.get_or_init(|| {
        let mut db = Database::new();
        db.load_system_fonts();
        db
    })
}

/// Lists all installed font family names.
pub fn list_font_families() -> Vec<String> {
    let mut out: Vec<String> = db()
        .faces()
        .flat_map(|face| face.families.iter().map(|(name, _)| name.clone()))
        .collect();
    out.sort();
    out.dedup();
    out
}

/// Resolves a font for the family/weight/style triple, or `None` when
/// nothing on the system matches. Resolved fonts are cached.
pub fn get_font_for(family: &str, bold: bool, italic: bool) -> Option<&'static Font<'static>> {
    static CACHE: OnceLock<Mutex<HashMap<FontKey, Option<&'static Font<'static>>>>> =
        OnceLock::new();
    let cache = CACHE.get_or_init(|| Mutex::new(HashMap::new()));

    let key = FontKey {
        family: family.to_string(),
        bold,
        italic,
    };

    if let Some(entry) = cache.lock().unwrap_or_else(|p| p.into_inner()).get(&key) {
        return *entry;
    }

    let loaded = load_font_from_system(family, bold, italic);
    let font_ref: Option<&'static Font<'static>> = loaded.map(|font| {
        let leaked: &'static Font<'static> = Box::leak(Box::new(font));
        leaked
    });
    if font_ref.is_none() {
        tracing::warn!(family, bold, italic, "no matching system font");
    }

    cache
        .lock()
        .unwrap_or_else(|p| p.into_inner())
        .insert(key, font_ref);
    font_ref
}

fn load_font_from_system(family: &str, bold: bool, italic: bool) -> Option<Font<'static>> {
    let families: Vec<Family<'_>> = match family.trim() {
        "" | "Sans" | "sans-serif" => vec![Family::SansSerif],
        "Serif" | "serif" => vec![Family::Serif],
        "Monospace" | "monospace" => vec![Family::Monospace],
        other => vec![Family::Name(other), Family::SansSerif],
    };

    let query = Query {
        families: &families,
        weight: if bold { Weight::BOLD } else { Weight::NORMAL },
        stretch: Stretch::Normal,
        style: if italic { Style::Italic } else { Style::Normal },
    };

    let id = db().query(&query)?;
    let (source, index) = db().face_source(id)?;
    match source {
        Source::File(path) => {
            let data = fs::read(path).ok()?;
            Font::try_from_vec_and_index(data, index)
        }
        Source::Binary(data) => {
            Font::try_from_vec_and_index(data.as_ref().as_ref().to_vec(), index)
        }
        _ => None,
    }
}

/// Measured advance width of a text run at the given size.
pub fn text_width(font: Option<&Font<'_>>, text: &str, size: f64) -> f64 {
    match font {
        Some(font) => {
            let scale = Scale::uniform(size as f32);
            let start = rt_point(0.0, 0.0);
            let mut end = 0.0_f32;
            for glyph in font.layout(text, scale, start) {
                end = glyph.position().x + glyph.unpositioned().h_metrics().advance_width;
            }
            end as f64
        }
        None => text.chars().count() as f64 * size * FALLBACK_ADVANCE,
    }
}

/// True when a CSS-ish font weight means bold.
pub fn is_bold(weight: &str) -> bool {
    matches!(weight.trim(), "bold" | "bolder" | "600" | "700" | "800" | "900")
}

/// True when a CSS-ish font style means italic.
pub fn is_italic(style: &str) -> bool {
    matches!(style.trim(), "italic" | "oblique")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_width_scales_with_text_and_size() {
        let narrow = text_width(None, "ab", 10.0);
        let wide = text_width(None, "abcd", 10.0);
        assert!(wide > narrow);
        assert_eq!(text_width(None, "", 10.0), 0.0);
        assert!((text_width(None, "abcd", 20.0) - 2.0 * wide).abs() < 1e-9);
    }

    #[test]
    fn weight_and_style_parsing() {
        assert!(is_bold("bold"));
        assert!(is_bold("700"));
        assert!(!is_bold("normal"));
        assert!(is_italic("italic"));
        assert!(!is_italic("normal"));
    }
}
