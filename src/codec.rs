//! Image decoding and encoding
//!
//! Input formats are detected from file content; the output format comes
//! from the file name's extension.

use crate::error::{Error, Result};
use image::{ColorType, DynamicImage, ImageError, ImageFormat, ImageReader};
use std::fs::{self, File};
use std::io::{BufReader, Cursor};
use std::path::Path;
use tracing::debug;

/// Decode an image, sniffing its format from the leading bytes
///
/// Content that matches no known format yields
/// [`Error::UnsupportedFormat`]; a recognized but broken file yields
/// [`Error::Decode`]. Both are reported as skips.
pub fn decode_image(path: &Path) -> Result<DynamicImage> {
    // No extension hint: an unrecognized signature must not fall back to it
    let file = BufReader::new(File::open(path)?);
    let reader = ImageReader::new(file).with_guessed_format()?;

    let Some(format) = reader.format() else {
        return Err(Error::UnsupportedFormat {
            path: path.to_path_buf(),
        });
    };
    debug!(?path, ?format, "Detected image format");

    reader.decode().map_err(|e| match e {
        ImageError::Unsupported(_) => Error::UnsupportedFormat {
            path: path.to_path_buf(),
        },
        other => Error::Decode {
            path: path.to_path_buf(),
            message: other.to_string(),
        },
    })
}

/// Output format named by the file's extension (text after the last `.`)
pub fn output_format(path: &Path) -> Result<ImageFormat> {
    let unknown = || Error::UnknownFormat {
        path: path.to_path_buf(),
    };

    let name = path.file_name().ok_or_else(unknown)?.to_string_lossy();
    let extension = name
        .rsplit_once('.')
        .map(|(_, ext)| ext)
        .filter(|ext| !ext.is_empty())
        .ok_or_else(unknown)?;

    ImageFormat::from_extension(extension)
        .filter(ImageFormat::writing_enabled)
        .ok_or_else(unknown)
}

/// Encode `image` as `format` and write it to `path`
///
/// The image is encoded in memory first, so a failed encode leaves no
/// partial file behind.
pub fn encode_image(image: &DynamicImage, path: &Path, format: ImageFormat) -> Result<()> {
    let converted;
    let image = match (format, image.color()) {
        (ImageFormat::Jpeg, ColorType::L8 | ColorType::Rgb8) => image,
        (ImageFormat::Jpeg, _) => {
            // JPEG carries no alpha and only 8-bit samples
            converted = DynamicImage::ImageRgb8(image.to_rgb8());
            &converted
        }
        _ => image,
    };

    let mut buf = Cursor::new(Vec::new());
    image.write_to(&mut buf, format).map_err(|e| Error::Encode {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    fs::write(path, buf.into_inner())?;
    Ok(())
}
