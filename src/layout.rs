//! Layout engine: turns a photo size, caption, and settings into a frame plan.
//!
//! A [`LayoutPlan`] is pure data — margin widths plus a list of
//! [`DrawInstruction`]s. Nothing here touches pixels or fonts directly; text
//! is measured through the [`TypeMetrics`] seam, which keeps every layout
//! decision deterministic and testable.
//!
//! Coordinates in a `DrawInstruction` are relative to the photo's bottom-left
//! corner, growing rightward and downward into the caption band. The
//! compositor translates them into canvas coordinates.
//!
//! The caption band never clips text: when the wrapped caption outgrows the
//! configured bottom margin, the band grows to fit. The stacked and row
//! layouts additionally never shrink below the configured margin, so an empty
//! caption still produces the full mat. The editorial layout collapses to a
//! tight fit whenever any of its four text blocks is missing.

use crate::fonts::{FontRole, TypeMetrics};
use crate::settings::{EditorialSettings, RenderSettings, ResolvedClassic};
use crate::text;
use crate::types::CaptionInput;

/// One run of text to draw, in photo-relative coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawInstruction {
    pub text: String,
    pub role: FontRole,
    pub size: u32,
    /// Offset right of the photo's left edge.
    pub x: i64,
    /// Offset below the photo's bottom edge to the top of the line box.
    pub top_offset: i64,
}

/// Margins and text placement for one framed photograph.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutPlan {
    pub side: u32,
    pub top: u32,
    pub bottom: u32,
    pub instructions: Vec<DrawInstruction>,
}

impl LayoutPlan {
    /// Canvas dimensions for a photo of the given size.
    pub fn canvas_size(&self, photo_w: u32, photo_h: u32) -> (u32, u32) {
        (photo_w + 2 * self.side, photo_h + self.top + self.bottom)
    }
}

/// Compute the frame plan for one photograph.
///
/// Settings must already be validated; layout itself cannot fail.
pub fn compute_layout(
    metrics: &impl TypeMetrics,
    photo_w: u32,
    photo_h: u32,
    caption: &CaptionInput,
    settings: &RenderSettings,
) -> LayoutPlan {
    match settings {
        RenderSettings::Stacked(c) => stacked(metrics, photo_w, caption, &c.resolve(photo_w)),
        RenderSettings::Row(c) => row(metrics, photo_w, caption, &c.resolve(photo_w)),
        RenderSettings::Editorial(e) => {
            editorial(metrics, photo_w, photo_h, caption, &e.clamped())
        }
    }
}

/// Gap between stacked lines of the same block.
fn line_gap(size: u32) -> i64 {
    ((size as f64 * 0.35).round() as i64).max(4)
}

/// Date above the title, both left-aligned at the pad inset.
fn stacked(
    metrics: &impl TypeMetrics,
    photo_w: u32,
    caption: &CaptionInput,
    s: &ResolvedClassic,
) -> LayoutPlan {
    let text_max_w = photo_w as f64 - 2.0 * s.pad as f64;
    let gap = line_gap(s.title_size);
    let top_offset = (s.bottom as f64 * 0.18).round() as i64;
    let x = s.pad as i64;

    let title_lines: Vec<String> = if caption.title.is_empty() {
        Vec::new()
    } else {
        text::wrap(&caption.title, text_max_w, |t| {
            metrics.advance(FontRole::Serif, s.title_size, t)
        })
    };

    let mut instructions = Vec::new();
    let mut y = top_offset;
    if !caption.date_text.is_empty() {
        instructions.push(DrawInstruction {
            text: caption.date_text.clone(),
            role: FontRole::Date,
            size: s.date_size,
            x,
            top_offset: y,
        });
        y += metrics.line_height(FontRole::Date, s.date_size) as i64;
        if !title_lines.is_empty() {
            y += gap;
        }
    }
    let title_h = metrics.line_height(FontRole::Serif, s.title_size) as i64;
    for (i, line) in title_lines.into_iter().enumerate() {
        if i > 0 {
            y += gap;
        }
        instructions.push(DrawInstruction {
            text: line,
            role: FontRole::Serif,
            size: s.title_size,
            x,
            top_offset: y,
        });
        y += title_h;
    }

    let content = y + top_offset / 2;
    LayoutPlan {
        side: s.border,
        top: s.border,
        bottom: (content.max(0) as u32).max(s.bottom),
        instructions,
    }
}

/// Date and title side by side on a shared baseline. The date renders in the
/// serif face here, not the monospace date face.
fn row(
    metrics: &impl TypeMetrics,
    photo_w: u32,
    caption: &CaptionInput,
    s: &ResolvedClassic,
) -> LayoutPlan {
    let text_max_w = photo_w as f64 - 2.0 * s.pad as f64;
    let row_gap = ((s.title_size as f64 * 0.35).round()).max(12.0);
    let top_offset = (s.bottom as f64 * 0.18).round() as i64;

    let has_date = !caption.date_text.is_empty();
    let date_adv = if has_date {
        metrics.advance(FontRole::Serif, s.date_size, &caption.date_text)
    } else {
        0.0
    };
    let title_max_w = if has_date {
        text_max_w - date_adv - row_gap
    } else {
        text_max_w
    };
    let title_lines: Vec<String> = if caption.title.is_empty() {
        Vec::new()
    } else {
        text::wrap(&caption.title, title_max_w, |t| {
            metrics.advance(FontRole::Serif, s.title_size, t)
        })
    };

    let date_asc = metrics.ascent(FontRole::Serif, s.date_size);
    let title_asc = metrics.ascent(FontRole::Serif, s.title_size);
    let max_asc = match (has_date, title_lines.is_empty()) {
        (true, true) => date_asc,
        (false, _) => title_asc,
        (true, false) => date_asc.max(title_asc),
    };
    let baseline = top_offset as f64 + max_asc;

    let mut instructions = Vec::new();
    let mut content_end = top_offset;
    if has_date {
        let date_top = (baseline - date_asc).round() as i64;
        instructions.push(DrawInstruction {
            text: caption.date_text.clone(),
            role: FontRole::Serif,
            size: s.date_size,
            x: s.pad as i64,
            top_offset: date_top,
        });
        content_end = content_end.max(date_top + metrics.line_height(FontRole::Serif, s.date_size) as i64);
    }

    let title_x = s.pad as i64
        + if has_date {
            (date_adv + row_gap).round() as i64
        } else {
            0
        };
    let title_h = metrics.line_height(FontRole::Serif, s.title_size) as i64;
    let tight_gap = line_gap(s.title_size);
    let mut y = (baseline - title_asc).round() as i64;
    for (i, line) in title_lines.into_iter().enumerate() {
        if i > 0 {
            y += tight_gap;
        }
        instructions.push(DrawInstruction {
            text: line,
            role: FontRole::Serif,
            size: s.title_size,
            x: title_x,
            top_offset: y,
        });
        y += title_h;
        content_end = content_end.max(y);
    }

    let content = content_end + top_offset / 2;
    LayoutPlan {
        side: s.border,
        top: s.border,
        bottom: (content.max(0) as u32).max(s.bottom),
        instructions,
    }
}

/// Vertical inset above and below the editorial text stack.
const EDITORIAL_INSET: i64 = 24;

/// Minimal gap between editorial text blocks.
const EDITORIAL_BLOCK_GAP_MIN: i64 = 12;

/// Magazine-style caption band: title, caption, location — date, author.
fn editorial(
    metrics: &impl TypeMetrics,
    photo_w: u32,
    photo_h: u32,
    caption: &CaptionInput,
    e: &EditorialSettings,
) -> LayoutPlan {
    let side = (photo_w as f64 * e.side_percent / 100.0).round() as u32;
    let top = (photo_h as f64 * e.top_percent / 100.0).round() as u32;
    let bottom_cfg = (photo_h as f64 * e.bottom_percent / 100.0).round() as u32;

    let meta = meta_line(&caption.location, &caption.date_text);
    let author = author_line(&caption.author);
    let blocks: [(&str, FontRole, u32); 4] = [
        (&caption.title, FontRole::SerifBold, block_size(bottom_cfg, 0.19)),
        (&caption.caption, FontRole::Serif, block_size(bottom_cfg, 0.11)),
        (&meta, FontRole::Serif, block_size(bottom_cfg, 0.095)),
        (&author, FontRole::Serif, block_size(bottom_cfg, 0.085)),
    ];
    let all_present = blocks.iter().all(|(text, _, _)| !text.is_empty());

    let text_max_w = photo_w as f64 - 2.0 * side as f64;
    let x = side as i64;
    let block_gap = ((bottom_cfg as f64 * 0.05).round() as i64).max(EDITORIAL_BLOCK_GAP_MIN);

    let mut instructions = Vec::new();
    let mut y = EDITORIAL_INSET;
    let mut first_block = true;
    for (text, role, size) in blocks {
        if text.is_empty() {
            continue;
        }
        if !first_block {
            y += block_gap;
        }
        first_block = false;
        let line_h = metrics.line_height(role, size) as i64;
        let intra_gap = line_gap(size);
        let lines = text::wrap(text, text_max_w, |t| metrics.advance(role, size, t));
        for (i, line) in lines.into_iter().enumerate() {
            if i > 0 {
                y += intra_gap;
            }
            instructions.push(DrawInstruction {
                text: line,
                role,
                size,
                x,
                top_offset: y,
            });
            y += line_h;
        }
    }

    let fit = (y + EDITORIAL_INSET).max(0) as u32;
    let bottom = if all_present { bottom_cfg.max(fit) } else { fit };
    LayoutPlan {
        side,
        top,
        bottom,
        instructions,
    }
}

fn block_size(bottom_cfg: u32, factor: f64) -> u32 {
    ((bottom_cfg as f64 * factor).round() as u32).max(1)
}

/// Join location and date with an em dash; either alone passes through.
fn meta_line(location: &str, date_text: &str) -> String {
    match (location.is_empty(), date_text.is_empty()) {
        (false, false) => format!("{location} — {date_text}"),
        (false, true) => location.to_string(),
        (true, false) => date_text.to_string(),
        (true, true) => String::new(),
    }
}

/// Prefix the author with a copyright mark unless it already carries one.
fn author_line(author: &str) -> String {
    if author.is_empty() || author.starts_with('©') {
        author.to_string()
    } else {
        format!("© {author}")
    }
}
