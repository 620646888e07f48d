//! Newline-delimited JSON event protocol.
//!
//! Every line the `run` subcommand prints is one serialized [`ProcessEvent`],
//! so a GUI shell can drive a progress bar and log pane off stdout without
//! scraping free-form text. `done` and `error` are terminal; a stream that
//! ends without one means the worker died mid-batch.

use serde::Serialize;

use crate::scan::ImageRow;
use crate::types::ProcessSummary;

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ProcessEvent {
    Progress { done: usize, total: usize },
    Log { message: String },
    Done { success: usize, total: usize, failed: usize },
    Error { message: String },
    ScanResult { images: Vec<ImageRow>, count: usize },
}

impl ProcessEvent {
    pub fn progress(done: usize, total: usize) -> Self {
        ProcessEvent::Progress { done, total }
    }

    pub fn log(message: impl Into<String>) -> Self {
        ProcessEvent::Log {
            message: message.into(),
        }
    }

    pub fn done(summary: &ProcessSummary) -> Self {
        ProcessEvent::Done {
            success: summary.success,
            total: summary.total,
            failed: summary.failed(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        ProcessEvent::Error {
            message: message.into(),
        }
    }

    pub fn scan_result(images: Vec<ImageRow>) -> Self {
        let count = images.len();
        ProcessEvent::ScanResult { images, count }
    }

    /// Terminal events end the stream; anything after them is a protocol bug.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ProcessEvent::Done { .. } | ProcessEvent::Error { .. })
    }
}

/// One event as one JSON line, without trailing newline.
pub fn format_event(event: &ProcessEvent) -> String {
    serde_json::to_string(event).unwrap_or_else(|_| {
        r#"{"event":"error","message":"event serialization failed"}"#.to_string()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_event_shape() {
        let line = format_event(&ProcessEvent::progress(3, 5));
        assert_eq!(line, r#"{"event":"progress","done":3,"total":5}"#);
    }

    #[test]
    fn log_event_shape() {
        let line = format_event(&ProcessEvent::log("Saved: out/a.jpg"));
        assert_eq!(line, r#"{"event":"log","message":"Saved: out/a.jpg"}"#);
    }

    #[test]
    fn done_event_carries_failed_count() {
        let summary = ProcessSummary {
            success: 4,
            total: 5,
        };
        let line = format_event(&ProcessEvent::done(&summary));
        assert_eq!(
            line,
            r#"{"event":"done","success":4,"total":5,"failed":1}"#
        );
    }

    #[test]
    fn scan_result_counts_rows() {
        let rows = vec![crate::scan::ImageRow {
            filename: "a.jpg".into(),
            capture_date: "2024-01-02".into(),
            title: "Dawn".into(),
        }];
        let event = ProcessEvent::scan_result(rows);
        let line = format_event(&event);
        assert!(line.starts_with(r#"{"event":"scan_result","#));
        assert!(line.ends_with(r#""count":1}"#));
    }

    #[test]
    fn only_done_and_error_are_terminal() {
        assert!(ProcessEvent::error("boom").is_terminal());
        assert!(
            ProcessEvent::done(&ProcessSummary {
                success: 0,
                total: 0
            })
            .is_terminal()
        );
        assert!(!ProcessEvent::progress(0, 1).is_terminal());
        assert!(!ProcessEvent::log("x").is_terminal());
    }
}
