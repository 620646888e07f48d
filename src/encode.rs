//! Metadata-preserving encode and output naming.
//!
//! The output container follows the source extension: JPEG sources re-encode
//! as JPEG at quality 100, TIFF as TIFF, PNG as PNG with fast compression,
//! and anything else falls back to JPEG. For JPEG and PNG the merged EXIF
//! payload and the source's ICC profile are transplanted into the encoded
//! bytes with `img-parts`; profiles are copied through verbatim, never
//! interpreted. TIFF output carries the encoder's own baseline tags only.

use image::RgbImage;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::codecs::tiff::TiffEncoder;
use img_parts::jpeg::Jpeg;
use img_parts::png::Png;
use img_parts::{Bytes, ImageEXIF, ImageICC};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::metadata;

#[derive(Error, Debug)]
pub enum EncodeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("encoding failed: {0}")]
    Image(#[from] image::ImageError),
    #[error("container rewrite failed: {0}")]
    Segments(#[from] img_parts::Error),
}

/// Output container, chosen from the source extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Container {
    Jpeg,
    Tiff,
    Png,
}

impl Container {
    pub fn from_source(path: &Path) -> Self {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "tif" | "tiff" => Container::Tiff,
            "png" => Container::Png,
            _ => Container::Jpeg,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Container::Jpeg => "jpg",
            Container::Tiff => "tif",
            Container::Png => "png",
        }
    }
}

/// First unused path for `stem.ext`, suffixing `_1`, `_2`, … on collision.
pub fn collision_free_path(dir: &Path, stem: &str, ext: &str) -> PathBuf {
    let candidate = dir.join(format!("{stem}.{ext}"));
    if !candidate.exists() {
        return candidate;
    }
    let mut n = 1u32;
    loop {
        let candidate = dir.join(format!("{stem}_{n}.{ext}"));
        if !candidate.exists() {
            return candidate;
        }
        n += 1;
    }
}

/// Encode the canvas next to its source's metadata and write it to `out_dir`.
///
/// Returns the path actually written.
pub fn write_framed(
    canvas: &RgbImage,
    source: &Path,
    out_dir: &Path,
) -> Result<PathBuf, EncodeError> {
    let container = Container::from_source(source);
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "framed".to_string());
    let out_path = collision_free_path(out_dir, &stem, container.extension());

    let encoded = encode_canvas(canvas, container)?;
    let bytes = match container {
        Container::Tiff => encoded,
        Container::Jpeg | Container::Png => {
            transplant_metadata(encoded, source, container, canvas.width(), canvas.height())?
        }
    };
    std::fs::write(&out_path, bytes)?;
    Ok(out_path)
}

fn encode_canvas(canvas: &RgbImage, container: Container) -> Result<Vec<u8>, EncodeError> {
    let mut buf = Cursor::new(Vec::new());
    match container {
        Container::Jpeg => {
            canvas.write_with_encoder(JpegEncoder::new_with_quality(&mut buf, 100))?;
        }
        Container::Png => {
            canvas.write_with_encoder(PngEncoder::new_with_quality(
                &mut buf,
                CompressionType::Fast,
                FilterType::Adaptive,
            ))?;
        }
        Container::Tiff => {
            canvas.write_with_encoder(TiffEncoder::new(&mut buf))?;
        }
    }
    Ok(buf.into_inner())
}

/// Re-read the source's metadata and splice it into the encoded bytes.
fn transplant_metadata(
    encoded: Vec<u8>,
    source: &Path,
    container: Container,
    out_w: u32,
    out_h: u32,
) -> Result<Vec<u8>, EncodeError> {
    let exif_payload = metadata::merged_exif_payload(source, out_w, out_h);
    let icc = source_icc_profile(source);

    match container {
        Container::Jpeg => {
            let mut out = Jpeg::from_bytes(Bytes::from(encoded))?;
            if let Some(exif) = exif_payload {
                out.set_exif(Some(Bytes::from(exif)));
            }
            if let Some(icc) = icc {
                out.set_icc_profile(Some(icc));
            }
            Ok(out.encoder().bytes().to_vec())
        }
        Container::Png => {
            let mut out = Png::from_bytes(Bytes::from(encoded))?;
            if let Some(exif) = exif_payload {
                out.set_exif(Some(Bytes::from(exif)));
            }
            if let Some(icc) = icc {
                out.set_icc_profile(Some(icc));
            }
            Ok(out.encoder().bytes().to_vec())
        }
        Container::Tiff => Ok(encoded),
    }
}

/// ICC profile bytes from the source container, if present. Best-effort:
/// unparseable sources simply contribute no profile.
fn source_icc_profile(source: &Path) -> Option<Bytes> {
    let bytes = Bytes::from(std::fs::read(source).ok()?);
    match Container::from_source(source) {
        Container::Jpeg => Jpeg::from_bytes(bytes).ok()?.icc_profile(),
        Container::Png => Png::from_bytes(bytes).ok()?.icc_profile(),
        Container::Tiff => None,
    }
}
