//! Batch driver: frames every supported image in a folder, sequentially.
//!
//! One worker walks the file list in sorted order and emits
//! [`ProcessEvent`]s over an optional channel. Per-file failures are logged
//! and counted, never fatal; only a bad input directory, unusable settings,
//! or a missing font stack abort the batch before it starts. Progress is
//! monotone: `(0, total)` goes out before any work, then `(done, total)`
//! after every file whether it succeeded or not.

use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;

use crate::fonts::{FontConfig, FontError, FontLibrary};
use crate::output::ProcessEvent;
use crate::settings::{RenderSettings, SettingsError};
use crate::types::{CaptionInput, MetadataOverride, ProcessSummary};
use crate::{compose, encode, layout, metadata, scan};

#[derive(Error, Debug)]
pub enum BatchError {
    #[error("input is not a directory: {0}")]
    InvalidInput(PathBuf),
    #[error("invalid settings: {0}")]
    InvalidSettings(#[from] SettingsError),
    #[error("font resolution failed: {0}")]
    Font(#[from] FontError),
    #[error("{0}")]
    Scan(#[from] scan::ScanError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("event stream ended before completion")]
    StreamEnded,
}

/// Why one file failed; the batch keeps going either way.
#[derive(Error, Debug)]
enum FileError {
    #[error("decode failed: {0}")]
    Decode(#[from] image::ImageError),
    #[error("{0}")]
    Encode(#[from] encode::EncodeError),
}

/// Everything a batch run needs beyond the two directories.
#[derive(Debug, Clone, Default)]
pub struct BatchOptions {
    pub settings: RenderSettings,
    pub fonts: FontConfig,
    /// Filename → caption overrides, usually from `--overrides-json`.
    pub overrides: HashMap<String, MetadataOverride>,
    /// When set, only these filenames are processed.
    pub include: Option<BTreeSet<String>>,
}

/// Parse an overrides file: a JSON object mapping filename to override keys.
pub fn load_overrides(path: &Path) -> Result<HashMap<String, MetadataOverride>, BatchError> {
    let text = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

/// Frame every supported image in `input` into `output_dir`.
///
/// Emits progress and log events on `events` when given; the terminal `done`
/// or `error` event is the caller's responsibility, since only the caller
/// knows whether this result reached it.
pub fn process_folder(
    input: &Path,
    output_dir: &Path,
    options: &BatchOptions,
    events: Option<&Sender<ProcessEvent>>,
) -> Result<ProcessSummary, BatchError> {
    options.settings.validate()?;
    if !input.is_dir() {
        return Err(BatchError::InvalidInput(input.to_path_buf()));
    }
    std::fs::create_dir_all(output_dir)?;
    let fonts = FontLibrary::load(&options.fonts)?;

    let mut files = scan::list_images(input)?;
    if let Some(include) = &options.include {
        files.retain(|path| {
            path.file_name()
                .map(|name| include.contains(name.to_string_lossy().as_ref()))
                .unwrap_or(false)
        });
    }

    let total = files.len();
    emit(events, ProcessEvent::progress(0, total));

    let mut success = 0;
    for (index, path) in files.iter().enumerate() {
        match process_one(path, output_dir, options, &fonts) {
            Ok(saved) => {
                success += 1;
                emit(events, ProcessEvent::log(format!("Saved: {}", saved.display())));
            }
            Err(e) => {
                emit(
                    events,
                    ProcessEvent::log(format!(
                        "ERROR: Failed processing {}: {e}",
                        path.display()
                    )),
                );
            }
        }
        emit(events, ProcessEvent::progress(index + 1, total));
    }

    let summary = ProcessSummary { success, total };
    emit(
        events,
        ProcessEvent::log(format!(
            "Done. Processed {total} file(s), succeeded {success}, failed {}.",
            summary.failed()
        )),
    );
    Ok(summary)
}

fn process_one(
    path: &Path,
    output_dir: &Path,
    options: &BatchOptions,
    fonts: &FontLibrary,
) -> Result<PathBuf, FileError> {
    let photo = metadata::decode_oriented(path)?;
    let caption = caption_for(path, &options.overrides);
    let plan = layout::compute_layout(
        fonts,
        photo.width(),
        photo.height(),
        &caption,
        &options.settings,
    );
    let canvas = compose::render(&photo, &plan, fonts);
    Ok(encode::write_framed(&canvas, path, output_dir)?)
}

/// Override file wins key by key; anything it leaves unset falls back to the
/// image's own metadata, and finally to empty.
fn caption_for(path: &Path, overrides: &HashMap<String, MetadataOverride>) -> CaptionInput {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ov = overrides.get(&name);

    let date_text = ov
        .and_then(|o| o.capture_date.clone())
        .or_else(|| metadata::capture_date(path))
        .unwrap_or_default();
    let title = ov
        .and_then(|o| o.title.clone())
        .or_else(|| metadata::xmp_title(path))
        .unwrap_or_default();

    CaptionInput {
        date_text,
        title,
        caption: ov.and_then(|o| o.caption.clone()).unwrap_or_default(),
        location: ov.and_then(|o| o.location.clone()).unwrap_or_default(),
        author: ov.and_then(|o| o.author.clone()).unwrap_or_default(),
    }
    .trimmed()
}

fn emit(events: Option<&Sender<ProcessEvent>>, event: ProcessEvent) {
    if let Some(tx) = events {
        // A disconnected receiver must not kill the batch.
        let _ = tx.send(event);
    }
}
