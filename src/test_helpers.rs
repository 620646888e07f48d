//! Shared test fixtures: synthetic images and deterministic font metrics.
//!
//! Layout tests run against [`FixedPitchMetrics`] instead of real faces, so
//! their numbers are stable on any machine and no font binaries are needed.
//! Image fixtures are tiny solid-color files written through the production
//! encoders.

use image::{Rgb, RgbImage};
use std::path::Path;

use crate::fonts::{FontRole, TypeMetrics};

/// Deterministic metrics: every glyph advances half the font size, the line
/// box equals the size, the baseline sits at 80% of it.
pub struct FixedPitchMetrics;

impl TypeMetrics for FixedPitchMetrics {
    fn advance(&self, _role: FontRole, size: u32, text: &str) -> f64 {
        text.chars().count() as f64 * size as f64 / 2.0
    }

    fn line_height(&self, _role: FontRole, size: u32) -> u32 {
        size.max(1)
    }

    fn ascent(&self, _role: FontRole, size: u32) -> f64 {
        size as f64 * 0.8
    }
}

/// Write a solid mid-gray image; format follows the path extension.
pub fn write_test_image(path: &Path, w: u32, h: u32) {
    RgbImage::from_pixel(w, h, Rgb([128, 128, 128]))
        .save(path)
        .unwrap();
}

/// Write a JPEG carrying an EXIF `DateTimeOriginal` value.
pub fn write_jpeg_with_date(path: &Path, w: u32, h: u32, exif_datetime: &str) {
    write_test_image(path, w, h);

    let field = exif::Field {
        tag: exif::Tag::DateTimeOriginal,
        ifd_num: exif::In::PRIMARY,
        value: exif::Value::Ascii(vec![exif_datetime.as_bytes().to_vec()]),
    };
    let mut writer = exif::experimental::Writer::new();
    writer.push_field(&field);
    let mut payload = std::io::Cursor::new(Vec::new());
    writer.write(&mut payload, false).unwrap();

    let bytes = std::fs::read(path).unwrap();
    let mut jpeg = img_parts::jpeg::Jpeg::from_bytes(bytes.into()).unwrap();
    use img_parts::ImageEXIF;
    jpeg.set_exif(Some(payload.into_inner().into()));
    std::fs::write(path, jpeg.encoder().bytes()).unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn fixed_pitch_is_linear_in_text_length() {
        let m = FixedPitchMetrics;
        assert_eq!(m.advance(FontRole::Serif, 80, "abcd"), 160.0);
        assert_eq!(m.advance(FontRole::Date, 60, ""), 0.0);
        assert_eq!(m.line_height(FontRole::Serif, 80), 80);
        assert_eq!(m.ascent(FontRole::Serif, 80), 64.0);
    }

    #[test]
    fn jpeg_fixture_round_trips_its_date() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("dated.jpg");
        write_jpeg_with_date(&path, 16, 16, "2022:12:31 23:59:59");
        assert_eq!(
            crate::metadata::capture_date(&path).as_deref(),
            Some("2022-12-31")
        );
    }
}
