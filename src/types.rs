//! Shared value types passed between pipeline stages.

use serde::Deserialize;

/// Text inputs for one framed photograph.
///
/// Empty strings mean "absent" — the engine never fabricates text, it only
/// renders what it is given. `caption`, `location`, and `author` are used by
/// the editorial layout only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaptionInput {
    pub date_text: String,
    pub title: String,
    pub caption: String,
    pub location: String,
    pub author: String,
}

impl CaptionInput {
    /// Build a classic (stacked/row) caption from a date and title.
    pub fn classic(date_text: &str, title: &str) -> Self {
        Self {
            date_text: date_text.trim().to_string(),
            title: title.trim().to_string(),
            ..Self::default()
        }
    }

    /// Return a copy with surrounding whitespace stripped from every field.
    pub fn trimmed(&self) -> Self {
        Self {
            date_text: self.date_text.trim().to_string(),
            title: self.title.trim().to_string(),
            caption: self.caption.trim().to_string(),
            location: self.location.trim().to_string(),
            author: self.author.trim().to_string(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.date_text.is_empty()
            && self.title.is_empty()
            && self.caption.is_empty()
            && self.location.is_empty()
            && self.author.is_empty()
    }
}

/// Per-file caption overrides loaded from the `--overrides-json` file.
///
/// Keys the caller did not set stay `None` and fall through to the values
/// extracted from the image's own metadata.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct MetadataOverride {
    pub capture_date: Option<String>,
    pub title: Option<String>,
    pub caption: Option<String>,
    pub location: Option<String>,
    pub author: Option<String>,
}

/// Final tally of a batch run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessSummary {
    pub success: usize,
    pub total: usize,
}

impl ProcessSummary {
    pub fn failed(&self) -> usize {
        self.total - self.success
    }

    pub fn all_succeeded(&self) -> bool {
        self.success == self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classic_trims_fields() {
        let caption = CaptionInput::classic("  2024-01-02 ", " Dawn \n");
        assert_eq!(caption.date_text, "2024-01-02");
        assert_eq!(caption.title, "Dawn");
        assert!(caption.caption.is_empty());
    }

    #[test]
    fn trimmed_covers_editorial_fields() {
        let caption = CaptionInput {
            date_text: " d ".into(),
            title: " t ".into(),
            caption: " c ".into(),
            location: " l ".into(),
            author: " a ".into(),
        }
        .trimmed();
        assert_eq!(caption.caption, "c");
        assert_eq!(caption.location, "l");
        assert_eq!(caption.author, "a");
    }

    #[test]
    fn whitespace_only_caption_is_empty() {
        let caption = CaptionInput::classic("   ", "\t\n").trimmed();
        assert!(caption.is_empty());
    }

    #[test]
    fn summary_failed_count() {
        let summary = ProcessSummary {
            success: 4,
            total: 5,
        };
        assert_eq!(summary.failed(), 1);
        assert!(!summary.all_succeeded());
    }

    #[test]
    fn override_deserializes_partial_keys() {
        let parsed: MetadataOverride =
            serde_json::from_str(r#"{"title": "Dusk", "author": "R. Adams"}"#).unwrap();
        assert_eq!(parsed.title.as_deref(), Some("Dusk"));
        assert_eq!(parsed.author.as_deref(), Some("R. Adams"));
        assert!(parsed.capture_date.is_none());
    }
}
