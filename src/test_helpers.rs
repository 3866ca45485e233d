//! Shared test utilities for the watermarker test suite.
//!
//! Fixtures are generated in code: a tiny EXIF writer produces the APP1
//! segment a camera would embed, and `image` encodes the pixel data.

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use std::io::Cursor;
use std::path::Path;

/// Fill color of generated test photos
pub const BACKGROUND: Rgb<u8> = Rgb([64, 64, 64]);

/// A flat gray RGB image
pub fn gray_image(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, BACKGROUND))
}

/// Encode an image in the given format
pub fn encode(image: &DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    image.write_to(&mut buf, format).unwrap();
    buf.into_inner()
}

/// Build a JPEG APP1 segment carrying `DateTimeOriginal` and optionally
/// `OffsetTimeOriginal`.
pub fn exif_segment(datetime: &str, offset: Option<&str>) -> Vec<u8> {
    fn ascii(s: &str) -> Vec<u8> {
        let mut bytes = s.as_bytes().to_vec();
        bytes.push(0);
        bytes
    }

    fn entry(out: &mut Vec<u8>, tag: u16, kind: u16, count: u32, value: u32) {
        out.extend_from_slice(&tag.to_be_bytes());
        out.extend_from_slice(&kind.to_be_bytes());
        out.extend_from_slice(&count.to_be_bytes());
        out.extend_from_slice(&value.to_be_bytes());
    }

    let mut values = vec![(0x9003u16, ascii(datetime))];
    if let Some(offset) = offset {
        values.push((0x9011, ascii(offset)));
    }

    // Big-endian TIFF header, IFD0 at offset 8
    let mut tiff = b"MM\x00\x2a\x00\x00\x00\x08".to_vec();

    // IFD0 holds only the pointer to the Exif IFD, which starts at 26
    tiff.extend_from_slice(&1u16.to_be_bytes());
    entry(&mut tiff, 0x8769, 4, 1, 26);
    tiff.extend_from_slice(&0u32.to_be_bytes());

    let mut data_offset = 26 + 2 + 12 * values.len() as u32 + 4;
    tiff.extend_from_slice(&(values.len() as u16).to_be_bytes());
    for (tag, bytes) in &values {
        entry(&mut tiff, *tag, 2, bytes.len() as u32, data_offset);
        data_offset += bytes.len() as u32;
    }
    tiff.extend_from_slice(&0u32.to_be_bytes());
    for (_, bytes) in &values {
        tiff.extend_from_slice(bytes);
    }

    let mut segment = vec![0xFF, 0xE1];
    segment.extend_from_slice(&((2 + 6 + tiff.len()) as u16).to_be_bytes());
    segment.extend_from_slice(b"Exif\0\0");
    segment.extend_from_slice(&tiff);
    segment
}

/// A gray JPEG with an EXIF capture date (`YYYY:MM:DD HH:MM:SS`)
pub fn jpeg_with_capture_date(width: u32, height: u32, datetime: &str) -> Vec<u8> {
    let jpeg = encode(&gray_image(width, height), ImageFormat::Jpeg);
    splice_after_soi(&jpeg, &exif_segment(datetime, None))
}

/// Insert a segment right after the JPEG start-of-image marker
pub fn splice_after_soi(jpeg: &[u8], segment: &[u8]) -> Vec<u8> {
    assert_eq!(&jpeg[..2], &[0xFF, 0xD8], "not a JPEG stream");
    [&jpeg[..2], segment, &jpeg[2..]].concat()
}

/// Write bytes to `dir/name`
pub fn write_file(dir: &Path, name: &str, bytes: &[u8]) {
    std::fs::write(dir.join(name), bytes).unwrap();
}
