//! Logo handling for the statement header band.
//!
//! The header reserves a 40 pt square for the institution logo. An icon
//! reference is resolved as a filesystem path; anything missing or
//! undecodable is replaced by a generated placeholder so a bad logo never
//! sinks the whole statement.

use std::path::Path;

use genpdf::elements::Image;
use genpdf::error::{Context as _, Error};
use genpdf::Scale;
use image::{DynamicImage, GenericImageView, ImageBuffer, Rgb};
use log::warn;

/// Side length of the square logo box, in points.
const LOGO_BOX_PT: f64 = 40.0;
const PT_PER_INCH: f64 = 72.0;
const MM_PER_INCH: f64 = 25.4;

/// Assumed pixel density of decoded logos.
const LOGO_DPI: f64 = 300.0;

const PLACEHOLDER_SIDE_PX: u32 = 120;
const PLACEHOLDER_START: [u8; 3] = [23, 74, 124];
const PLACEHOLDER_END: [u8; 3] = [122, 170, 214];

/// Builds the header logo element, scaled to fit the logo box.
///
/// `icon` is interpreted as a filesystem path. A missing or undecodable icon
/// is logged and replaced by the placeholder; only a failure to embed the
/// image itself is surfaced as an error.
pub(super) fn logo_element(icon: Option<&str>) -> Result<Image, Error> {
    let dynamic = match icon {
        Some(reference) => match decode_logo(Path::new(reference)) {
            Ok(image) => image,
            Err(err) => {
                warn!("logo unavailable, using placeholder: {err}");
                placeholder_logo()
            }
        },
        None => placeholder_logo(),
    };
    fitted(dynamic)
}

fn decode_logo(path: &Path) -> Result<DynamicImage, Error> {
    let reader = image::io::Reader::open(path)
        .with_context(|| format!("Failed to open logo file {}", path.display()))?;
    reader
        .with_guessed_format()
        .context("Unable to determine logo image format")?
        .decode()
        .with_context(|| format!("Failed to decode logo file {}", path.display()))
}

/// Diagonal two-tone gradient standing in for an absent logo.
fn placeholder_logo() -> DynamicImage {
    let span = PLACEHOLDER_SIDE_PX.saturating_sub(1).max(1) as f32;
    let buffer = ImageBuffer::from_fn(PLACEHOLDER_SIDE_PX, PLACEHOLDER_SIDE_PX, |x, y| {
        let mix = ((x as f32 + y as f32) / (2.0 * span)).clamp(0.0, 1.0);
        let mut channels = [0u8; 3];
        for (index, channel) in channels.iter_mut().enumerate() {
            let start = f32::from(PLACEHOLDER_START[index]);
            let end = f32::from(PLACEHOLDER_END[index]);
            *channel = (start + (end - start) * mix).round() as u8;
        }
        Rgb(channels)
    });
    DynamicImage::ImageRgb8(buffer)
}

fn fitted(dynamic: DynamicImage) -> Result<Image, Error> {
    let (width_mm, height_mm) = natural_size_mm(&dynamic);
    let scale = fit_scale(width_mm, height_mm);
    let mut image = Image::from_dynamic_image(dynamic)?;
    image.set_scale(Scale::new(scale, scale));
    Ok(image)
}

fn natural_size_mm(image: &DynamicImage) -> (f64, f64) {
    let (px_width, px_height) = image.dimensions();
    (
        MM_PER_INCH * f64::from(px_width) / LOGO_DPI,
        MM_PER_INCH * f64::from(px_height) / LOGO_DPI,
    )
}

fn logo_box_mm() -> f64 {
    LOGO_BOX_PT / PT_PER_INCH * MM_PER_INCH
}

/// Uniform scale factor fitting an image of the given natural size into the
/// logo box while keeping the aspect ratio.
fn fit_scale(width_mm: f64, height_mm: f64) -> f64 {
    if width_mm <= f64::EPSILON || height_mm <= f64::EPSILON {
        return 1.0;
    }
    let limit = logo_box_mm();
    (limit / width_mm).min(limit / height_mm)
}
