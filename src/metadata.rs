//! Metadata extraction and tag-set merging.
//!
//! Three concerns live here:
//!
//! - reading the capture date (EXIF `DateTimeOriginal`, then `DateTime`)
//!   reformatted as `YYYY-MM-DD`;
//! - reading the image title from XMP `dc:title`, preferring a `.xmp`
//!   sidecar over the packet embedded in the image bytes;
//! - rebuilding the source's EXIF tag set for the re-encoded output, with
//!   stale structural tags dropped and pixel dimensions recomputed.
//!
//! Extraction is best-effort throughout: unreadable or absent metadata is
//! `None`, never an error. A photo without a date still gets framed.

use exif::experimental::Writer;
use exif::{Exif, Field, In, Reader, Tag, Value};
use image::{DynamicImage, ImageDecoder, ImageReader};
use std::io::{BufReader, Cursor};
use std::path::Path;

/// Parse the EXIF segment of an image file, if it has one.
pub fn read_exif(path: &Path) -> Option<Exif> {
    let file = std::fs::File::open(path).ok()?;
    Reader::new()
        .read_from_container(&mut BufReader::new(file))
        .ok()
}

/// Decode an image with its EXIF orientation already applied.
///
/// The returned pixels are upright, so the frame geometry always works on
/// display dimensions and the orientation tag must not survive into the
/// output (see [`merged_exif_payload`]).
pub fn decode_oriented(path: &Path) -> Result<DynamicImage, image::ImageError> {
    let reader = ImageReader::open(path)?.with_guessed_format()?;
    let mut decoder = reader.into_decoder()?;
    let orientation = decoder.orientation()?;
    let mut image = DynamicImage::from_decoder(decoder)?;
    image.apply_orientation(orientation);
    Ok(image)
}

/// Capture date as `YYYY-MM-DD`, from `DateTimeOriginal` or `DateTime`.
pub fn capture_date(path: &Path) -> Option<String> {
    capture_date_from(&read_exif(path)?)
}

pub fn capture_date_from(exif: &Exif) -> Option<String> {
    let field = exif
        .get_field(Tag::DateTimeOriginal, In::PRIMARY)
        .or_else(|| exif.get_field(Tag::DateTime, In::PRIMARY))?;
    let raw = match &field.value {
        Value::Ascii(values) => String::from_utf8_lossy(values.first()?).into_owned(),
        _ => return None,
    };
    format_exif_date(&raw)
}

/// `"YYYY:MM:DD HH:MM:SS"` → `"YYYY-MM-DD"`. Anything malformed is dropped.
fn format_exif_date(raw: &str) -> Option<String> {
    let date = raw.trim().get(..10)?;
    let mut parts = date.splitn(3, ':');
    let (y, m, d) = (parts.next()?, parts.next()?, parts.next()?);
    let digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if y.len() == 4 && m.len() == 2 && d.len() == 2 && digits(y) && digits(m) && digits(d) {
        Some(format!("{y}-{m}-{d}"))
    } else {
        None
    }
}

/// Image title from XMP `dc:title`: `<stem>.xmp` sidecar first, then the
/// packet embedded in the image bytes.
pub fn xmp_title(path: &Path) -> Option<String> {
    let sidecar = path.with_extension("xmp");
    if let Ok(bytes) = std::fs::read(&sidecar) {
        if let Some(title) = dc_title_from(&bytes) {
            return Some(title);
        }
    }
    dc_title_from(&std::fs::read(path).ok()?)
}

/// Pull the first `rdf:li` out of a `dc:title` element.
///
/// Deliberately not an XML parser: XMP packets in the wild are written by a
/// handful of tools with very regular output, and a byte scan handles the
/// namespaced markup, nested `rdf:Alt` wrapper, and `x-default` attribute
/// without caring about any of them.
fn dc_title_from(bytes: &[u8]) -> Option<String> {
    let start = find_subsequence(bytes, b"<dc:title>")?;
    let rest = &bytes[start..];
    let end = find_subsequence(rest, b"</dc:title>")?;
    let block = String::from_utf8_lossy(&rest[..end]);

    let li_open = block.find("<rdf:li")?;
    let after_open = &block[li_open..];
    let gt = after_open.find('>')?;
    let inner = &after_open[gt + 1..];
    let li_close = inner.find("</rdf:li>")?;

    let text = collapse_whitespace(&decode_entities(&strip_tags(&inner[..li_close])));
    if text.is_empty() { None } else { Some(text) }
}

fn find_subsequence(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

fn strip_tags(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_tag = false;
    for ch in s.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    out
}

fn decode_entities(s: &str) -> String {
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Tags that describe the old pixel stream and must not be copied into the
/// re-encoded output. Orientation is dropped because it was applied at
/// decode; the pixel dimensions are re-pushed with the canvas size.
const DROPPED_TAGS: &[Tag] = &[
    Tag::PixelXDimension,
    Tag::PixelYDimension,
    Tag::ImageWidth,
    Tag::ImageLength,
    Tag::Orientation,
    Tag::Compression,
    Tag::StripOffsets,
    Tag::StripByteCounts,
    Tag::RowsPerStrip,
    Tag::JPEGInterchangeFormat,
    Tag::JPEGInterchangeFormatLength,
];

/// Re-serialize the source's EXIF tag set for a canvas of `out_w` x `out_h`.
///
/// Thumbnail-IFD fields are dropped wholesale (the embedded thumbnail shows
/// the unframed photo and its offsets are meaningless after re-encode).
/// Returns the raw TIFF payload ready for an `Exif` segment, or `None` when
/// the source has no parseable EXIF.
pub fn merged_exif_payload(source: &Path, out_w: u32, out_h: u32) -> Option<Vec<u8>> {
    let exif = read_exif(source)?;
    let dimension_fields = [
        Field {
            tag: Tag::PixelXDimension,
            ifd_num: In::PRIMARY,
            value: Value::Long(vec![out_w]),
        },
        Field {
            tag: Tag::PixelYDimension,
            ifd_num: In::PRIMARY,
            value: Value::Long(vec![out_h]),
        },
    ];

    let mut writer = Writer::new();
    for field in exif.fields() {
        if field.ifd_num != In::PRIMARY {
            continue;
        }
        if DROPPED_TAGS.contains(&field.tag) {
            continue;
        }
        // Unknown values carry no data the writer could serialize.
        if matches!(field.value, Value::Unknown(..)) {
            continue;
        }
        writer.push_field(field);
    }
    for field in &dimension_fields {
        writer.push_field(field);
    }

    let mut buf = Cursor::new(Vec::new());
    writer.write(&mut buf, false).ok()?;
    Some(buf.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{write_jpeg_with_date, write_test_image};
    use tempfile::TempDir;

    // =========================================================================
    // Date formatting
    // =========================================================================

    #[test]
    fn exif_date_reformats_to_iso() {
        assert_eq!(
            format_exif_date("2024:01:02 10:30:00").as_deref(),
            Some("2024-01-02")
        );
    }

    #[test]
    fn exif_date_rejects_malformed_values() {
        assert_eq!(format_exif_date(""), None);
        assert_eq!(format_exif_date("2024-01-02"), None);
        assert_eq!(format_exif_date("not a date"), None);
        assert_eq!(format_exif_date("24:1:2 10:30:00"), None);
    }

    #[test]
    fn capture_date_reads_datetime_original() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("dated.jpg");
        write_jpeg_with_date(&path, 32, 24, "2023:07:15 08:00:00");
        assert_eq!(capture_date(&path).as_deref(), Some("2023-07-15"));
    }

    #[test]
    fn capture_date_absent_without_exif() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("plain.jpg");
        write_test_image(&path, 32, 24);
        assert_eq!(capture_date(&path), None);
    }

    // =========================================================================
    // XMP title
    // =========================================================================

    const XMP: &str = r#"<x:xmpmeta xmlns:x="adobe:ns:meta/">
      <rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#">
        <rdf:Description xmlns:dc="http://purl.org/dc/elements/1.1/">
          <dc:title>
            <rdf:Alt>
              <rdf:li xml:lang="x-default">Dawn &amp; Dusk</rdf:li>
            </rdf:Alt>
          </dc:title>
        </rdf:Description>
      </rdf:RDF>
    </x:xmpmeta>"#;

    #[test]
    fn dc_title_parses_packet() {
        assert_eq!(dc_title_from(XMP.as_bytes()).as_deref(), Some("Dawn & Dusk"));
    }

    #[test]
    fn dc_title_absent_when_no_packet() {
        assert_eq!(dc_title_from(b"just bytes"), None);
        assert_eq!(dc_title_from(b"<dc:title></dc:title>"), None);
    }

    #[test]
    fn dc_title_collapses_interior_whitespace() {
        let xmp = "<dc:title><rdf:Alt><rdf:li>  Dawn \n  over\tridge </rdf:li></rdf:Alt></dc:title>";
        assert_eq!(
            dc_title_from(xmp.as_bytes()).as_deref(),
            Some("Dawn over ridge")
        );
    }

    #[test]
    fn dc_title_strips_nested_markup() {
        let xmp = "<dc:title><rdf:li><em>Dawn</em> light</rdf:li></dc:title>";
        assert_eq!(dc_title_from(xmp.as_bytes()).as_deref(), Some("Dawn light"));
    }

    #[test]
    fn sidecar_wins_over_embedded_packet() {
        let tmp = TempDir::new().unwrap();
        let image_path = tmp.path().join("photo.jpg");
        write_test_image(&image_path, 32, 24);
        std::fs::write(
            tmp.path().join("photo.xmp"),
            "<dc:title><rdf:li>Sidecar Title</rdf:li></dc:title>",
        )
        .unwrap();
        assert_eq!(xmp_title(&image_path).as_deref(), Some("Sidecar Title"));
    }

    // =========================================================================
    // EXIF merge
    // =========================================================================

    #[test]
    fn merged_payload_rewrites_pixel_dimensions() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("dated.jpg");
        write_jpeg_with_date(&path, 32, 24, "2023:07:15 08:00:00");

        let payload = merged_exif_payload(&path, 360, 290).unwrap();
        let parsed = Reader::new()
            .read_raw(payload)
            .expect("payload must parse as raw TIFF");

        let x = parsed
            .get_field(Tag::PixelXDimension, In::PRIMARY)
            .unwrap();
        assert_eq!(x.value.get_uint(0), Some(360));
        let y = parsed
            .get_field(Tag::PixelYDimension, In::PRIMARY)
            .unwrap();
        assert_eq!(y.value.get_uint(0), Some(290));
        // The date survives the merge.
        assert_eq!(capture_date_from(&parsed).as_deref(), Some("2023-07-15"));
        // Orientation never survives.
        assert!(parsed.get_field(Tag::Orientation, In::PRIMARY).is_none());
    }

    #[test]
    fn merged_payload_absent_without_source_exif() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("plain.jpg");
        write_test_image(&path, 32, 24);
        assert!(merged_exif_payload(&path, 100, 100).is_none());
    }
}
