use crate::crop::CropBox;
use crate::THUMBNAIL_SIZE;

use image::error::{ParameterError, ParameterErrorKind};
use image::imageops::FilterType;
use image::{DynamicImage, ImageError, ImageFormat, ImageResult};
use std::io::Cursor;
use std::path::Path;

/// Formats an avatar may be stored in.
const OUTPUT_FORMATS: [ImageFormat; 5] = [
    ImageFormat::Png,
    ImageFormat::Jpeg,
    ImageFormat::Gif,
    ImageFormat::Bmp,
    ImageFormat::Tiff,
];

pub struct Thumbnail {
    pub image: DynamicImage,
    /// Format the upload was actually encoded in.
    pub source_format: ImageFormat,
}

/// Decode `bytes`, crop the centered square and resize it to
/// [THUMBNAIL_SIZE] x [THUMBNAIL_SIZE] with a Lanczos filter.
pub fn make_thumbnail(bytes: &[u8]) -> ImageResult<Thumbnail> {
    let source_format = image::guess_format(bytes)?;
    let image = image::load_from_memory_with_format(bytes, source_format)?;

    if image.width() == 0 || image.height() == 0 {
        return Err(ImageError::Parameter(ParameterError::from_kind(
            ParameterErrorKind::DimensionMismatch,
        )));
    }

    let crop = CropBox::centered(image.width(), image.height());
    let square = image.crop_imm(crop.left, crop.upper, crop.width(), crop.height());

    Ok(Thumbnail {
        image: square.resize_exact(THUMBNAIL_SIZE, THUMBNAIL_SIZE, FilterType::Lanczos3),
        source_format,
    })
}

/// Pick the stored format and file extension for an upload.
///
/// The client's extension is kept as long as it names a format we can write.
/// Otherwise the extension of the decoded format is used.
pub fn output_format(upload_name: &str, source_format: ImageFormat) -> (ImageFormat, String) {
    let upload_ext = Path::new(upload_name)
        .extension()
        .and_then(|ext| ext.to_str());

    if let Some(ext) = upload_ext {
        if let Some(format) = ImageFormat::from_extension(ext) {
            if OUTPUT_FORMATS.contains(&format) {
                return (format, ext.to_string());
            }
        }
    }

    let format = if OUTPUT_FORMATS.contains(&source_format) {
        source_format
    } else {
        ImageFormat::Png
    };
    let ext = format.extensions_str().first().copied().unwrap_or("png");

    (format, ext.to_string())
}

pub fn encode(image: &DynamicImage, format: ImageFormat) -> ImageResult<Vec<u8>> {
    // JPEG has no alpha channel; everything else takes RGBA.
    let image = match format {
        ImageFormat::Jpeg => DynamicImage::ImageRgb8(image.to_rgb8()),
        _ => DynamicImage::ImageRgba8(image.to_rgba8()),
    };

    let mut buffer = Cursor::new(Vec::new());
    image.write_to(&mut buffer, format)?;

    Ok(buffer.into_inner())
}
