// File: png.rs
// Location: /src/export/png.rs

use anyhow::{anyhow, Context, Result};
use image::{DynamicImage, ImageFormat, RgbImage};
use resvg::tiny_skia::{Color, Pixmap, Transform};
use resvg::usvg::{Options, Tree};
use std::io::Cursor;

use crate::render::QrGraphic;

/// Rasterizes SVG markup onto an opaque white surface. Without `target` the
/// surface takes the graphic's own size, otherwise the graphic is stretched
/// to fill `target`.
pub fn rasterize(svg: &str, target: Option<(u32, u32)>) -> Result<RgbImage> {
    let tree = Tree::from_data(svg.as_bytes(), &Options::default())
        .context("Failed to parse QR markup")?;

    let natural = tree.size();
    let (width, height) = target.unwrap_or((
        natural.width().ceil() as u32,
        natural.height().ceil() as u32,
    ));

    let mut pixmap = Pixmap::new(width, height)
        .ok_or_else(|| anyhow!("Cannot allocate a {}x{} surface", width, height))?;
    pixmap.fill(Color::WHITE);

    let transform = Transform::from_scale(
        width as f32 / natural.width(),
        height as f32 / natural.height(),
    );
    resvg::render(&tree, transform, &mut pixmap.as_mut());

    // Fully opaque, so premultiplied RGBA equals straight RGBA.
    let rgb: Vec<u8> = pixmap
        .data()
        .chunks_exact(4)
        .flat_map(|px| [px[0], px[1], px[2]])
        .collect();

    RgbImage::from_raw(width, height, rgb)
        .ok_or_else(|| anyhow!("Raster buffer does not match {}x{}", width, height))
}

pub fn encode_png(image: RgbImage) -> Result<Vec<u8>> {
    let mut out = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(image)
        .write_to(&mut out, ImageFormat::Png)
        .context("Failed to encode PNG")?;
    Ok(out.into_inner())
}

pub fn export(graphic: &QrGraphic) -> Result<Vec<u8>> {
    let image = rasterize(graphic.svg(), None)?;
    encode_png(image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    const PAYLOAD: &str = "WIFI:T:WPA;S:HomeNet;P:secret123;;";

    #[test]
    fn test_natural_size_and_colors() {
        let graphic = QrGraphic::render(PAYLOAD).unwrap();
        let image = rasterize(graphic.svg(), None).unwrap();

        assert!(image.width() >= 256);
        assert_eq!(image.width(), image.height());
        assert_eq!(*image.get_pixel(1, 1), Rgb([0, 0, 0]));
        assert!(image.pixels().any(|p| *p == Rgb([255, 255, 255])));
    }

    #[test]
    fn test_fixed_surface() {
        let graphic = QrGraphic::render(PAYLOAD).unwrap();
        let image = rasterize(graphic.svg(), Some((512, 512))).unwrap();
        assert_eq!(image.dimensions(), (512, 512));
    }

    #[test]
    fn test_png_signature() {
        let graphic = QrGraphic::render(PAYLOAD).unwrap();
        let bytes = export(&graphic).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn test_invalid_markup() {
        assert!(rasterize("<not-svg", None).is_err());
    }
}
