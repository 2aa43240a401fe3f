// File: svg.rs
// Location: /src/export/svg.rs

use crate::render::QrGraphic;

pub fn export(graphic: &QrGraphic) -> Vec<u8> {
    graphic.svg().as_bytes().to_vec()
}
