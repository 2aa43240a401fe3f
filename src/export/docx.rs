// File: docx.rs
// Location: /src/export/docx.rs

use anyhow::{anyhow, Result};
use docx_rs::{Docx, Paragraph, Pic, Run};
use std::io::Cursor;

use super::png::{encode_png, rasterize};
use crate::credential::Credential;
use crate::render::QrGraphic;

pub const RASTER_SIZE: u32 = 512;

// 9525 EMU per pixel at 96 dpi.
const EMU_PER_PX: u32 = 9525;

pub fn export(graphic: &QrGraphic, credential: &Credential) -> Result<Vec<u8>> {
    let image = rasterize(graphic.svg(), Some((RASTER_SIZE, RASTER_SIZE)))?;
    let png = encode_png(image)?;

    let picture = Pic::new(&png).size(RASTER_SIZE * EMU_PER_PX, RASTER_SIZE * EMU_PER_PX);

    let docx = Docx::new()
        .add_paragraph(bold_line(&format!("SSID: {}", credential.ssid)))
        .add_paragraph(bold_line(&format!("Password: {}", credential.password)))
        .add_paragraph(Paragraph::new())
        .add_paragraph(Paragraph::new().add_run(Run::new().add_image(picture)));

    let mut out = Cursor::new(Vec::new());
    docx.build()
        .pack(&mut out)
        .map_err(|e| anyhow!("Failed to pack DOCX: {}", e))?;
    Ok(out.into_inner())
}

fn bold_line(text: &str) -> Paragraph {
    Paragraph::new().add_run(Run::new().add_text(text).bold())
}
