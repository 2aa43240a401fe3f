// File: render.rs
// Location: /src/render.rs

use anyhow::{Context, Result};
use qrcode::render::{svg, unicode};
use qrcode::{Color, EcLevel, QrCode};

/// Edge length of the on-screen code, in SVG user units.
pub const DISPLAY_SIZE: u32 = 256;

/// A rendered code: the vector markup every exporter starts from, plus the
/// module grid it was drawn from.
#[derive(Debug, Clone)]
pub struct QrGraphic {
    svg: String,
    modules: Vec<bool>,
    width: usize,
}

impl QrGraphic {
    pub fn render(payload: &str) -> Result<Self> {
        let code = QrCode::with_error_correction_level(payload.as_bytes(), EcLevel::H)
            .context("Payload does not fit in a QR code")?;

        let svg = code
            .render::<svg::Color>()
            .quiet_zone(false)
            .min_dimensions(DISPLAY_SIZE, DISPLAY_SIZE)
            .dark_color(svg::Color("#000000"))
            .light_color(svg::Color("#ffffff"))
            .build();

        let modules = code
            .to_colors()
            .into_iter()
            .map(|c| c == Color::Dark)
            .collect();

        Ok(Self {
            svg,
            modules,
            width: code.width(),
        })
    }

    pub fn svg(&self) -> &str {
        &self.svg
    }

    /// Modules per side.
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn is_dark(&self, x: usize, y: usize) -> bool {
        self.modules[y * self.width + x]
    }
}

/// Half-block art for terminals, two modules per character cell vertically.
/// Uses the same error correction level as [`QrGraphic`], so both show the same
/// symbol.
pub fn terminal_art(payload: &str) -> Result<String> {
    let code = QrCode::with_error_correction_level(payload.as_bytes(), EcLevel::H)
        .context("Payload does not fit in a QR code")?;
    let image = code
        .render::<unicode::Dense1x2>()
        .dark_color(unicode::Dense1x2::Light)
        .light_color(unicode::Dense1x2::Dark)
        .quiet_zone(true)
        .build();

    let padded = image
        .lines()
        .map(|l| format!("  {}", l))
        .collect::<Vec<_>>()
        .join("\n");
    Ok(padded)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAYLOAD: &str = "WIFI:T:WPA;S:HomeNet;P:secret123;;";

    #[test]
    fn test_svg_markup() {
        let graphic = QrGraphic::render(PAYLOAD).unwrap();
        assert!(graphic.svg().contains("<svg"));
        assert!(graphic.svg().contains("#ffffff"));
    }

    #[test]
    fn test_module_grid_matches_width() {
        let graphic = QrGraphic::render(PAYLOAD).unwrap();
        let width = graphic.width();
        assert!(width >= 21);
        assert_eq!((width - 17) % 4, 0);
        // Finder pattern corners are always dark.
        assert!(graphic.is_dark(0, 0));
        assert!(graphic.is_dark(width - 1, 0));
        assert!(graphic.is_dark(0, width - 1));
    }

    #[test]
    fn test_oversized_payload_fails() {
        let huge = "x".repeat(4000);
        assert!(QrGraphic::render(&huge).is_err());
    }

    #[test]
    fn test_terminal_art_is_padded() {
        let art = terminal_art(PAYLOAD).unwrap();
        assert!(art.lines().count() > 10);
        assert!(art.lines().all(|l| l.starts_with("  ")));
    }

    #[test]
    fn test_terminal_art_matches_graphic() {
        let width = QrGraphic::render(PAYLOAD).unwrap().width();
        let art = terminal_art(PAYLOAD).unwrap();

        // Four quiet-zone modules per side, two module rows per line.
        let modules = width + 8;
        assert_eq!(art.lines().count(), (modules + 1) / 2);
        for line in art.lines() {
            assert_eq!(line.chars().count(), modules + 2);
        }
    }
}
