//! Font resolution and text metrics.
//!
//! Resolution never leaves the user without a face: each role tries a bundled
//! font file first (executable-adjacent `fonts/`, then the working directory,
//! then `~/.fonts`), then falls back to named system families via `fontdb`,
//! then to the generic family, then to any installed face at all. Only an
//! empty font database is an error.
//!
//! Layout code measures text through the [`TypeMetrics`] trait rather than
//! touching `ab_glyph` directly, so tests can substitute deterministic
//! fixed-pitch metrics and run without font binaries.

use ab_glyph::{Font, FontArc, FontRef, FontVec, PxScale, ScaleFont, VariableFont};
use fontdb::{Database, Family, Query, Source};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FontError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("font data not parseable: {0}")]
    Invalid(#[from] ab_glyph::InvalidFont),
    #[error("no usable font found for '{0}'")]
    NoFontAvailable(String),
}

/// Which resolved face a piece of text renders in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontRole {
    /// Monospace face used for the date line in the stacked layout.
    Date,
    /// Serif face for titles and editorial body text.
    Serif,
    /// Heavy serif instance for the editorial title block.
    SerifBold,
}

/// Font files and fallback families for the three roles.
#[derive(Debug, Clone)]
pub struct FontConfig {
    pub date_file: String,
    pub date_fallbacks: Vec<String>,
    pub serif_file: String,
    pub serif_fallbacks: Vec<String>,
    /// Optional `wght` axis value pinned on the serif face.
    pub weight: Option<f32>,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            date_file: "JetBrainsMono-Regular.ttf".to_string(),
            date_fallbacks: vec!["Menlo".to_string(), "Courier New".to_string()],
            serif_file: "CormorantGaramond-Regular.ttf".to_string(),
            serif_fallbacks: vec![
                "Georgia".to_string(),
                "Times New Roman".to_string(),
                "Arial".to_string(),
            ],
            weight: None,
        }
    }
}

const BOLD_WEIGHT: f32 = 700.0;

/// The three resolved faces, ready for measurement and rasterization.
pub struct FontLibrary {
    date: FontArc,
    serif: FontArc,
    serif_bold: FontArc,
}

impl FontLibrary {
    /// Resolve every role. Fails only when neither bundled files nor any
    /// system face can be found.
    pub fn load(config: &FontConfig) -> Result<Self, FontError> {
        let mut db = Database::new();
        db.load_system_fonts();

        let (date_data, date_index) =
            resolve_face(&db, &config.date_file, &config.date_fallbacks, Family::Monospace)?;
        let date = FontVec::try_from_vec_and_index(date_data, date_index)?;

        let (serif_data, serif_index) =
            resolve_face(&db, &config.serif_file, &config.serif_fallbacks, Family::Serif)?;
        let serif = FontVec::try_from_vec_and_index(serif_data.clone(), serif_index)?;
        let serif_bold = FontVec::try_from_vec_and_index(serif_data, serif_index)?;

        let serif = match config.weight {
            Some(w) => apply_weight(serif, w),
            None => serif,
        };
        // On a static (non-variable) face this is a no-op and the bold role
        // renders in the regular instance.
        let serif_bold = apply_weight(serif_bold, BOLD_WEIGHT);

        Ok(Self {
            date: FontArc::new(date),
            serif: FontArc::new(serif),
            serif_bold: FontArc::new(serif_bold),
        })
    }

    pub fn font(&self, role: FontRole) -> &FontArc {
        match role {
            FontRole::Date => &self.date,
            FontRole::Serif => &self.serif,
            FontRole::SerifBold => &self.serif_bold,
        }
    }
}

/// Pin a `wght` axis value, clamped to the axis range the font declares.
/// Fonts without a `wght` axis pass through unchanged.
pub fn apply_weight(mut font: FontVec, weight: f32) -> FontVec {
    let axis = font.variations().into_iter().find(|a| a.tag == *b"wght");
    if let Some(axis) = axis {
        font.set_variation(b"wght", weight.clamp(axis.min_value, axis.max_value));
    }
    font
}

/// Text measurement seam between layout and rasterization.
pub trait TypeMetrics {
    /// Typographic advance of `text` in pixels, including pair kerning.
    fn advance(&self, role: FontRole, size: u32, text: &str) -> f64;
    /// Ascent + descent of the face at `size`, rounded up, at least 1.
    fn line_height(&self, role: FontRole, size: u32) -> u32;
    /// Distance from the top of the line box to the baseline.
    fn ascent(&self, role: FontRole, size: u32) -> f64;
}

impl TypeMetrics for FontLibrary {
    fn advance(&self, role: FontRole, size: u32, text: &str) -> f64 {
        let font = self.font(role);
        let scaled = font.as_scaled(PxScale::from(size as f32));
        let mut advance = 0.0f32;
        let mut prev = None;
        for ch in text.chars() {
            let id = font.glyph_id(ch);
            if let Some(prev) = prev {
                advance += scaled.kern(prev, id);
            }
            advance += scaled.h_advance(id);
            prev = Some(id);
        }
        advance as f64
    }

    fn line_height(&self, role: FontRole, size: u32) -> u32 {
        let scaled = self.font(role).as_scaled(PxScale::from(size as f32));
        (scaled.height().ceil() as u32).max(1)
    }

    fn ascent(&self, role: FontRole, size: u32) -> f64 {
        let scaled = self.font(role).as_scaled(PxScale::from(size as f32));
        scaled.ascent() as f64
    }
}

/// Bundled file first, then system fallback. Returns raw face data plus the
/// collection index `ab_glyph` needs for .ttc files.
fn resolve_face(
    db: &Database,
    file_name: &str,
    fallbacks: &[String],
    generic: Family,
) -> Result<(Vec<u8>, u32), FontError> {
    for dir in search_dirs() {
        let path = dir.join(file_name);
        if path.is_file() {
            if let Ok(bytes) = std::fs::read(&path) {
                // An unreadable or corrupt file falls through to the
                // system fallback rather than failing resolution.
                if FontRef::try_from_slice(&bytes).is_ok() {
                    return Ok((bytes, 0));
                }
            }
        }
    }

    let mut families: Vec<Family> = fallbacks.iter().map(|n| Family::Name(n)).collect();
    families.push(generic);
    let query = Query {
        families: &families,
        ..Query::default()
    };
    let id = db
        .query(&query)
        .or_else(|| db.faces().next().map(|face| face.id))
        .ok_or_else(|| FontError::NoFontAvailable(file_name.to_string()))?;

    let (source, index) = db
        .face_source(id)
        .ok_or_else(|| FontError::NoFontAvailable(file_name.to_string()))?;
    let bytes = match source {
        Source::Binary(data) => data.as_ref().as_ref().to_vec(),
        Source::File(path) => std::fs::read(&path)?,
        Source::SharedFile(path, _) => std::fs::read(&path)?,
    };
    Ok((bytes, index))
}

/// Ordered directories searched for bundled font files.
fn search_dirs() -> Vec<PathBuf> {
    let mut dirs = Vec::new();
    if let Ok(exe) = std::env::current_exe() {
        if let Some(parent) = exe.parent() {
            dirs.push(parent.join("fonts"));
        }
    }
    dirs.push(PathBuf::from("fonts"));
    if let Some(home) = std::env::var_os("HOME") {
        dirs.push(PathBuf::from(home).join(".fonts"));
    }
    dirs
}
