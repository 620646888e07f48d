//! Greedy line wrapping against a pixel budget.
//!
//! Wrapping is measurement-driven: the caller supplies a closure that returns
//! the typographic advance of a string in pixels, so the same algorithm works
//! with real fonts and with the fixed-pitch test metrics.

/// Wrap `text` into lines no wider than `max_width` pixels.
///
/// Policy:
/// - `max_width <= 0` returns the whole text as a single line.
/// - Text with no non-whitespace tokens becomes a single empty line, so
///   whitespace-only input can never exceed the budget.
/// - Tokens are joined greedily with single spaces; original run lengths of
///   whitespace are not preserved.
/// - A token wider than `max_width` on its own is split character by
///   character into maximal chunks that fit. A single character that still
///   exceeds the budget is emitted anyway, so every chunk has at least one
///   character and wrapping always terminates.
pub fn wrap<F>(text: &str, max_width: f64, measure: F) -> Vec<String>
where
    F: Fn(&str) -> f64,
{
    if max_width <= 0.0 {
        return vec![text.to_string()];
    }
    let tokens: Vec<&str> = text.split_whitespace().collect();
    if tokens.is_empty() {
        return vec![String::new()];
    }

    let mut lines = Vec::new();
    let mut current = String::new();
    for token in tokens {
        for piece in split_oversized(token, max_width, &measure) {
            if current.is_empty() {
                current = piece;
                continue;
            }
            let trial = format!("{current} {piece}");
            if measure(&trial) <= max_width {
                current = trial;
            } else {
                lines.push(std::mem::replace(&mut current, piece));
            }
        }
    }
    lines.push(current);
    lines
}

/// Break a single token into chunks that each fit `max_width`.
fn split_oversized<F>(token: &str, max_width: f64, measure: &F) -> Vec<String>
where
    F: Fn(&str) -> f64,
{
    if measure(token) <= max_width {
        return vec![token.to_string()];
    }
    let mut chunks = Vec::new();
    let mut chunk = String::new();
    for ch in token.chars() {
        let mut trial = chunk.clone();
        trial.push(ch);
        if !chunk.is_empty() && measure(&trial) > max_width {
            chunks.push(std::mem::take(&mut chunk));
            chunk.push(ch);
        } else {
            chunk = trial;
        }
    }
    if !chunk.is_empty() {
        chunks.push(chunk);
    }
    chunks
}
