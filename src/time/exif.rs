//! EXIF capture time extraction for images

use super::CaptureTime;
use crate::error::{Error, Result};
use chrono::{FixedOffset, NaiveDate, NaiveDateTime};
use exif::{DateTime, Exif, In, Reader, Tag, Value};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::{debug, trace};

/// Extract the original capture time from EXIF metadata
///
/// Unreadable metadata, a missing or blank `DateTimeOriginal` field, and
/// dates that are not on the calendar all yield [`Error::NoDateInfo`].
pub fn extract_capture_time(path: &Path) -> Result<CaptureTime> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);

    let no_date = || Error::NoDateInfo {
        path: path.to_path_buf(),
    };

    let exif = Reader::new()
        .read_from_container(&mut reader)
        .map_err(|e| {
            debug!(?path, error = %e, "No readable EXIF data");
            no_date()
        })?;

    let Some(raw) = ascii_field(&exif, Tag::DateTimeOriginal) else {
        debug!(?path, "EXIF data has no DateTimeOriginal field");
        return Err(no_date());
    };

    let capture = match DateTime::from_ascii(raw) {
        Ok(mut datetime) => {
            // Companion fields are optional; a malformed one is ignored
            if let Some(subsec) = ascii_field(&exif, Tag::SubSecTimeOriginal) {
                let _ = datetime.parse_subsec(subsec);
            }
            if let Some(offset) = ascii_field(&exif, Tag::OffsetTimeOriginal) {
                let _ = datetime.parse_offset(offset);
            }
            to_capture_time(&datetime)
        }
        Err(e) => {
            trace!(?path, error = %e, "DateTimeOriginal is not in EXIF layout");
            parse_datetime_text(raw).map(|timestamp| CaptureTime {
                timestamp,
                offset: ascii_field(&exif, Tag::OffsetTimeOriginal).and_then(parse_offset_text),
            })
        }
    };

    let capture = capture.ok_or_else(|| {
        debug!(?path, raw = %String::from_utf8_lossy(raw), "Unusable DateTimeOriginal");
        no_date()
    })?;

    trace!(?path, timestamp = %capture.timestamp, "Found EXIF capture time");
    Ok(capture)
}

/// First ASCII value of a primary-image field
fn ascii_field(exif: &Exif, tag: Tag) -> Option<&[u8]> {
    match exif.get_field(tag, In::PRIMARY)?.value {
        Value::Ascii(ref values) => values.first().map(Vec::as_slice),
        _ => None,
    }
}

/// Parse a timestamp written in one of the common non-EXIF layouts
///
/// Some writers store `DateTimeOriginal` with `-` or `/` date separators or
/// an ISO `T`, optionally followed by fractional seconds.
fn parse_datetime_text(raw: &[u8]) -> Option<NaiveDateTime> {
    let s = std::str::from_utf8(raw).ok()?;
    let s = s.trim_matches(|c: char| c.is_whitespace() || c == '\0' || c == '"');

    let formats = [
        "%Y:%m:%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y/%m/%d %H:%M:%S%.f",
    ];

    formats
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(s, format).ok())
}

/// Parse an `OffsetTimeOriginal` value such as `+09:00`
fn parse_offset_text(raw: &[u8]) -> Option<FixedOffset> {
    std::str::from_utf8(raw).ok()?.trim().parse().ok()
}

/// Convert the raw EXIF fields into a validated timestamp
fn to_capture_time(datetime: &DateTime) -> Option<CaptureTime> {
    let timestamp = NaiveDate::from_ymd_opt(
        i32::from(datetime.year),
        u32::from(datetime.month),
        u32::from(datetime.day),
    )?
    .and_hms_nano_opt(
        u32::from(datetime.hour),
        u32::from(datetime.minute),
        u32::from(datetime.second),
        datetime.nanosecond.unwrap_or(0),
    )?;

    let offset = datetime
        .offset
        .and_then(|minutes| FixedOffset::east_opt(i32::from(minutes) * 60));

    Some(CaptureTime { timestamp, offset })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use chrono::{Datelike, Timelike};
    use image::ImageFormat;

    #[test]
    fn test_to_capture_time() {
        let dt = DateTime::from_ascii(b"2024:01:15 14:30:00").unwrap();
        let capture = to_capture_time(&dt).unwrap();
        assert_eq!(capture.timestamp.year(), 2024);
        assert_eq!(capture.timestamp.month(), 1);
        assert_eq!(capture.timestamp.day(), 15);
        assert_eq!(capture.timestamp.hour(), 14);
        assert_eq!(capture.timestamp.minute(), 30);
        assert_eq!(capture.offset, None);

        // Out-of-range fields are not rejected by the EXIF parser
        let dt = DateTime::from_ascii(b"2024:13:45 14:30:00").unwrap();
        assert!(to_capture_time(&dt).is_none());
    }

    #[test]
    fn test_parse_datetime_text() {
        let expected = NaiveDate::from_ymd_opt(2023, 6, 15)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap();

        for raw in [
            "2023-06-15 10:30:00",
            "2023-06-15T10:30:00",
            "2023/06/15 10:30:00",
            "\"2023-06-15 10:30:00\"",
        ] {
            assert_eq!(parse_datetime_text(raw.as_bytes()), Some(expected), "{raw}");
        }

        let with_fraction = parse_datetime_text(b"2023-06-15 10:30:00.250").unwrap();
        assert_eq!(with_fraction.nanosecond(), 250_000_000);
        let with_fraction = parse_datetime_text(b"2023-06-15T10:30:00.5").unwrap();
        assert_eq!(with_fraction.day(), 15);

        assert_eq!(parse_datetime_text(b"2023-13-15 10:30:00"), None);
        assert_eq!(parse_datetime_text(b"June 15th"), None);
        assert_eq!(parse_datetime_text(b""), None);
    }

    #[test]
    fn test_parse_offset_text() {
        assert_eq!(parse_offset_text(b"+09:00"), FixedOffset::east_opt(9 * 3600));
        assert_eq!(parse_offset_text(b"-08:00"), FixedOffset::west_opt(8 * 3600));
        assert_eq!(parse_offset_text(b"   :  "), None);
    }

    #[test]
    fn test_extract_alternative_layouts() {
        let dir = tempfile::tempdir().unwrap();
        for (name, raw) in [
            ("dash.jpg", "2023-06-15 10:30:00"),
            ("iso.jpg", "2023-06-15T10:30:00"),
            ("slash.jpg", "2023/06/15 10:30:00"),
            ("fraction.jpg", "2023-06-15 10:30:00.120"),
        ] {
            write_file(dir.path(), name, &jpeg_with_capture_date(32, 16, raw));
            let capture = extract_capture_time(&dir.path().join(name)).unwrap();
            assert_eq!(capture.watermark_text(), "2023-06-15", "{raw}");
            assert_eq!(capture.timestamp.hour(), 10);
        }
    }

    #[test]
    fn test_extract_alternative_layout_with_offset() {
        let dir = tempfile::tempdir().unwrap();
        let jpeg = encode(&gray_image(16, 16), ImageFormat::Jpeg);
        let segment = exif_segment("2023-12-31T23:15:00", Some("+09:00"));
        write_file(dir.path(), "tokyo.jpg", &splice_after_soi(&jpeg, &segment));

        let capture = extract_capture_time(&dir.path().join("tokyo.jpg")).unwrap();
        assert_eq!(capture.watermark_text(), "2023-12-31");
        assert_eq!(capture.offset, FixedOffset::east_opt(9 * 3600));
    }

    #[test]
    fn test_extract_from_jpeg() {
        let dir = tempfile::tempdir().unwrap();
        write_file(
            dir.path(),
            "a.jpg",
            &jpeg_with_capture_date(32, 16, "2023:06:15 10:30:00"),
        );

        let capture = extract_capture_time(&dir.path().join("a.jpg")).unwrap();
        assert_eq!(capture.watermark_text(), "2023-06-15");
        assert_eq!(capture.timestamp.hour(), 10);
    }

    #[test]
    fn test_extract_reads_offset() {
        let dir = tempfile::tempdir().unwrap();
        let jpeg = encode(&gray_image(16, 16), ImageFormat::Jpeg);
        let segment = exif_segment("2023:12:31 23:15:00", Some("-08:00"));
        write_file(dir.path(), "late.jpg", &splice_after_soi(&jpeg, &segment));

        let capture = extract_capture_time(&dir.path().join("late.jpg")).unwrap();
        assert_eq!(capture.offset, FixedOffset::west_opt(8 * 3600));
        assert_eq!(capture.watermark_text(), "2023-12-31");
    }

    #[test]
    fn test_jpeg_without_exif_has_no_date() {
        let dir = tempfile::tempdir().unwrap();
        write_file(
            dir.path(),
            "c.jpg",
            &encode(&gray_image(16, 16), ImageFormat::Jpeg),
        );

        let err = extract_capture_time(&dir.path().join("c.jpg")).unwrap_err();
        assert!(matches!(err, Error::NoDateInfo { .. }));
    }

    #[test]
    fn test_blank_date_has_no_date() {
        let dir = tempfile::tempdir().unwrap();
        let jpeg = encode(&gray_image(16, 16), ImageFormat::Jpeg);
        let segment = exif_segment("    :  :     :  :  ", None);
        write_file(dir.path(), "blank.jpg", &splice_after_soi(&jpeg, &segment));

        let err = extract_capture_time(&dir.path().join("blank.jpg")).unwrap_err();
        assert!(matches!(err, Error::NoDateInfo { .. }));
    }

    #[test]
    fn test_text_file_has_no_date() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "b.txt", b"just some notes");

        let err = extract_capture_time(&dir.path().join("b.txt")).unwrap_err();
        assert!(matches!(err, Error::NoDateInfo { .. }));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = extract_capture_time(Path::new("/nonexistent/photo.jpg")).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
