use crate::error::{ConvertError, Result};
use image::codecs::jpeg::JpegEncoder;
use image::io::Reader as ImageReader;
use image::{DynamicImage, RgbImage};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

pub const DEFAULT_QUALITY: u8 = 95;

/// White background for flattening transparency.
pub const DEFAULT_BACKGROUND: [u8; 3] = [255, 255, 255];

/// Converts a single PNG file to JPG.
///
/// Transparent and partially transparent pixels are composited over
/// `background` before encoding, since JPEG has no alpha channel.
#[derive(Debug, Clone, Copy)]
pub struct Converter {
    pub quality: u8,
    pub background: [u8; 3],
}

impl Default for Converter {
    fn default() -> Self {
        Self {
            quality: DEFAULT_QUALITY,
            background: DEFAULT_BACKGROUND,
        }
    }
}

impl Converter {
    pub fn with_quality(quality: u8) -> Self {
        Self {
            quality,
            ..Self::default()
        }
    }

    /// Convert one file, returning the path of the written JPG.
    ///
    /// The output lands in `output_dir` (created if absent), or next to the
    /// source when `output_dir` is `None`. Errors are returned, never
    /// panicked, so a batch caller can record them and move on.
    pub fn convert_file(&self, source: &Path, output_dir: Option<&Path>) -> Result<PathBuf> {
        if !source.exists() {
            return Err(ConvertError::FileNotFound {
                path: source.display().to_string(),
            });
        }

        let output_dir = match output_dir {
            Some(dir) => dir.to_path_buf(),
            None => source.parent().unwrap_or_else(|| Path::new(".")).to_path_buf(),
        };
        std::fs::create_dir_all(&output_dir).map_err(|e| ConvertError::CreateDir {
            path: output_dir.display().to_string(),
            source: e,
        })?;

        let stem = source.file_stem().and_then(|s| s.to_str()).unwrap_or("image");
        let output_path = output_dir.join(format!("{}.jpg", stem));

        let img = ImageReader::open(source)
            .map_err(|e| ConvertError::FileRead {
                path: source.display().to_string(),
                source: e,
            })?
            .decode()
            .map_err(|e| ConvertError::Decode {
                path: source.display().to_string(),
                source: e,
            })?;

        let rgb = normalize_to_rgb(&img, self.background);

        let file = File::create(&output_path).map_err(|e| ConvertError::FileWrite {
            path: output_path.display().to_string(),
            source: e,
        })?;
        let mut encoder = JpegEncoder::new_with_quality(BufWriter::new(file), self.quality);
        encoder.encode_image(&rgb).map_err(|e| ConvertError::Encode {
            path: output_path.display().to_string(),
            source: e,
        })?;

        Ok(output_path)
    }
}

/// Reduce any decoded image to RGB8, flattening alpha when present.
///
/// Palette PNGs are already expanded to RGB/RGBA by the decoder, so the alpha
/// check covers them too.
fn normalize_to_rgb(img: &DynamicImage, background: [u8; 3]) -> RgbImage {
    if img.color().has_alpha() {
        flatten_onto(img, background)
    } else {
        img.to_rgb8()
    }
}

fn flatten_onto(img: &DynamicImage, background: [u8; 3]) -> RgbImage {
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    let mut flat = RgbImage::new(width, height);
    for (x, y, pixel) in rgba.enumerate_pixels() {
        let alpha = pixel[3] as u16;
        let out = flat.get_pixel_mut(x, y);
        for channel in 0..3 {
            let fg = pixel[channel] as u16;
            let bg = background[channel] as u16;
            out[channel] = ((fg * alpha + bg * (255 - alpha)) / 255) as u8;
        }
    }
    flat
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb, Rgba, RgbaImage};
    use tempfile::TempDir;

    fn write_png(dir: &Path, name: &str, img: &RgbaImage) -> PathBuf {
        let path = dir.join(name);
        img.save_with_format(&path, ImageFormat::Png).unwrap();
        path
    }

    #[test]
    fn flattens_transparent_pixels_onto_background() {
        let mut img = RgbaImage::from_pixel(2, 1, Rgba([255, 0, 0, 255]));
        img.put_pixel(1, 0, Rgba([0, 0, 255, 0]));

        let flat = flatten_onto(&DynamicImage::ImageRgba8(img), DEFAULT_BACKGROUND);

        assert_eq!(flat.get_pixel(0, 0), &Rgb([255, 0, 0]));
        assert_eq!(flat.get_pixel(1, 0), &Rgb([255, 255, 255]));
    }

    #[test]
    fn blends_partial_alpha_with_background() {
        let img = RgbaImage::from_pixel(1, 1, Rgba([255, 0, 0, 128]));

        let flat = flatten_onto(&DynamicImage::ImageRgba8(img), DEFAULT_BACKGROUND);

        // 50% red over white: red stays saturated, green/blue land mid-range.
        assert_eq!(flat.get_pixel(0, 0), &Rgb([255, 127, 127]));
    }

    #[test]
    fn opaque_images_pass_through_unblended() {
        let img = RgbaImage::from_pixel(3, 3, Rgba([10, 20, 30, 255]));

        let rgb = normalize_to_rgb(&DynamicImage::ImageRgba8(img), DEFAULT_BACKGROUND);

        assert_eq!(rgb.get_pixel(1, 1), &Rgb([10, 20, 30]));
    }

    #[test]
    fn missing_source_reports_file_not_found() {
        let converter = Converter::default();

        let err = converter
            .convert_file(Path::new("no/such/file.png"), None)
            .unwrap_err();

        assert!(matches!(err, ConvertError::FileNotFound { .. }));
    }

    #[test]
    fn output_has_no_alpha_and_transparent_area_is_white() {
        let tmp = TempDir::new().unwrap();
        let img = RgbaImage::from_pixel(8, 8, Rgba([0, 0, 0, 0]));
        let source = write_png(tmp.path(), "transparent.png", &img);

        let output = Converter::default().convert_file(&source, None).unwrap();

        assert_eq!(output.extension().and_then(|e| e.to_str()), Some("jpg"));
        let decoded = image::open(&output).unwrap();
        assert!(!decoded.color().has_alpha());
        // JPEG is lossy; allow a little drift off pure white.
        for pixel in decoded.to_rgb8().pixels() {
            for channel in 0..3 {
                assert!(pixel[channel] >= 250, "pixel not white: {:?}", pixel);
            }
        }
    }

    #[test]
    fn creates_missing_output_directory() {
        let tmp = TempDir::new().unwrap();
        let img = RgbaImage::from_pixel(4, 4, Rgba([0, 128, 0, 255]));
        let source = write_png(tmp.path(), "green.png", &img);
        let out_dir = tmp.path().join("nested").join("out");

        let output = Converter::default()
            .convert_file(&source, Some(&out_dir))
            .unwrap();

        assert!(output.starts_with(&out_dir));
        assert!(output.exists());
        assert_eq!(output.file_name().and_then(|n| n.to_str()), Some("green.jpg"));
    }

    #[test]
    fn higher_quality_never_shrinks_the_encoding() {
        let tmp = TempDir::new().unwrap();
        let mut img = RgbaImage::new(64, 64);
        for (x, y, pixel) in img.enumerate_pixels_mut() {
            *pixel = Rgba([(x * 4) as u8, (y * 4) as u8, ((x + y) * 2) as u8, 255]);
        }
        let source = write_png(tmp.path(), "gradient.png", &img);

        let low = Converter::with_quality(10)
            .convert_file(&source, Some(&tmp.path().join("low")))
            .unwrap();
        let high = Converter::with_quality(90)
            .convert_file(&source, Some(&tmp.path().join("high")))
            .unwrap();

        let low_size = std::fs::metadata(&low).unwrap().len();
        let high_size = std::fs::metadata(&high).unwrap().len();
        assert!(high_size >= low_size);
    }
}
