//! # matboard
//!
//! Batch photo framing for print-style presentation: each photograph is
//! composited onto a larger white canvas — a digital mat — with a caption
//! band carrying its capture date, title, and (in the editorial layout)
//! caption, location, and author lines. The output is re-encoded in the
//! source's own format with its EXIF tag set and ICC profile carried over.
//!
//! # Architecture: Plan, Then Render
//!
//! Framing one photo runs through a fixed pipeline:
//!
//! ```text
//! 1. Decode    source file  →  upright pixels     (EXIF orientation applied)
//! 2. Caption   overrides / EXIF / XMP  →  CaptionInput
//! 3. Layout    size + caption + settings  →  LayoutPlan  (pure data)
//! 4. Compose   plan + fonts  →  white canvas with photo and text
//! 5. Encode    canvas + source metadata  →  output file
//! ```
//!
//! The split between layout and composition is deliberate: the layout engine
//! never touches pixels or font binaries — it measures text through the
//! [`fonts::TypeMetrics`] trait — so every geometric rule (wrap widths,
//! baseline sharing, band growth) is unit-testable with deterministic
//! fixed-pitch metrics.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`settings`] | Frame geometry settings: stacked/row/editorial, pixel or percent margins |
//! | [`fonts`] | Font resolution (bundled files → system fallback) and text metrics |
//! | [`text`] | Greedy line wrapping against a pixel budget |
//! | [`layout`] | Layout engine — margins and draw instructions for the three layouts |
//! | [`compose`] | Compositor — canvas allocation, photo blit, text rasterization |
//! | [`encode`] | Format-preserving encode, collision-free naming, EXIF/ICC transplant |
//! | [`metadata`] | EXIF date and orientation, XMP titles, tag-set merging |
//! | [`scan`] | Folder listing and per-file metadata rows |
//! | [`batch`] | Sequential batch driver with progress events |
//! | [`output`] | Newline-delimited JSON event protocol |
//! | [`types`] | Shared value types: captions, overrides, summaries |
//!
//! # Design Decisions
//!
//! ## The Caption Band Never Clips
//!
//! Configured margins are minimums, not boxes. When a wrapped title outgrows
//! the caption band, the band grows; the photo is never scaled and text is
//! never truncated. The stacked and row layouts also never shrink below the
//! configured margin, so a folder of captionless photos still gets a uniform
//! mat. The editorial layout instead collapses to a tight fit when any of
//! its four text blocks is missing.
//!
//! ## Metadata Survives Re-Encoding
//!
//! The encoder rebuilds the source's EXIF tag set rather than copying the
//! segment verbatim: structural tags describing the old pixel stream are
//! dropped, pixel dimensions are rewritten to the canvas size, and the
//! orientation tag is removed because orientation is applied at decode. The
//! ICC profile is copied through untouched — this tool moves color profiles,
//! it does not interpret them.
//!
//! ## Pure-Rust Imaging
//!
//! Decode, rasterization, and encode all run on the `image`/`imageproc`
//! stack with `ab_glyph` for type. No system ImageMagick, no libjpeg, no
//! fontconfig binding — one static binary frames photos anywhere.

pub mod batch;
pub mod compose;
pub mod encode;
pub mod fonts;
pub mod layout;
pub mod metadata;
pub mod output;
pub mod scan;
pub mod settings;
pub mod text;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
