//! Capture time extraction
//!
//! Reads the "photo taken" timestamp a camera stores in a file's EXIF
//! metadata and turns it into the watermark text.

pub mod exif;

use chrono::{FixedOffset, NaiveDateTime};

pub use self::exif::extract_capture_time;

/// Date format used for the watermark text
pub const WATERMARK_DATE_FORMAT: &str = "%Y-%m-%d";

/// Capture timestamp as stored in the file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureTime {
    /// Wall-clock time in the camera's own timezone
    pub timestamp: NaiveDateTime,
    /// UTC offset recorded next to the timestamp, if any
    pub offset: Option<FixedOffset>,
}

impl CaptureTime {
    /// Watermark text for this capture time: `YYYY-MM-DD`
    ///
    /// Uses the stored calendar fields as-is; the offset is never applied.
    pub fn watermark_text(&self) -> String {
        self.timestamp.format(WATERMARK_DATE_FORMAT).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn capture(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_watermark_text_is_zero_padded() {
        let time = CaptureTime {
            timestamp: capture(2023, 6, 5, 10),
            offset: None,
        };
        assert_eq!(time.watermark_text(), "2023-06-05");

        let time = CaptureTime {
            timestamp: capture(987, 1, 1, 0),
            offset: None,
        };
        assert_eq!(time.watermark_text(), "0987-01-01");
    }

    #[test]
    fn test_watermark_text_ignores_offset() {
        // 23:00 at UTC-08:00 is the next day in UTC, the stored date wins
        let time = CaptureTime {
            timestamp: capture(2023, 12, 31, 23),
            offset: FixedOffset::west_opt(8 * 3600),
        };
        assert_eq!(time.watermark_text(), "2023-12-31");
    }
}
