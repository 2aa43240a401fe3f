// File: pdf.rs
// Location: /src/export/pdf.rs

use anyhow::Result;
use pdf_writer::{Content, Finish, Name, Pdf, Rect, Ref, Str};

use crate::credential::Credential;
use crate::i18n::Language;
use crate::render::QrGraphic;

// A4 portrait, in points.
const PAGE_WIDTH: f32 = 595.28;
const PAGE_HEIGHT: f32 = 841.89;

const QR_LEFT: f32 = 40.0;
const QR_TOP: f32 = 100.0;
const QR_SIZE: f32 = 256.0;

const TEXT_LEFT: f32 = 40.0;
const NAME_BASELINE: f32 = 40.0;
const PASSWORD_BASELINE: f32 = 70.0;
const FONT_SIZE: f32 = 16.0;

const FONT_NAME: Name<'static> = Name(b"F1");

/// Single page with the code drawn as vector rectangles and the network name
/// and password printed above it. Positions are measured from the top edge.
pub fn export(graphic: &QrGraphic, credential: &Credential, language: Language) -> Result<Vec<u8>> {
    let catalog_id = Ref::new(1);
    let page_tree_id = Ref::new(2);
    let page_id = Ref::new(3);
    let font_id = Ref::new(4);
    let content_id = Ref::new(5);

    let mut pdf = Pdf::new();
    pdf.catalog(catalog_id).pages(page_tree_id);
    pdf.pages(page_tree_id).kids([page_id]).count(1);

    let mut page = pdf.page(page_id);
    page.media_box(Rect::new(0.0, 0.0, PAGE_WIDTH, PAGE_HEIGHT));
    page.parent(page_tree_id);
    page.contents(content_id);
    page.resources().fonts().pair(FONT_NAME, font_id);
    page.finish();

    pdf.type1_font(font_id)
        .base_font(Name(b"Helvetica"))
        .encoding_predefined(Name(b"WinAnsiEncoding"));

    let mut content = Content::new();
    draw_modules(&mut content, graphic);

    let name_line = format!("{}: {}", language.network_name_label(), credential.ssid);
    let password_line = format!("{}: {}", language.password_label(), credential.password);
    draw_text(&mut content, &name_line, NAME_BASELINE);
    draw_text(&mut content, &password_line, PASSWORD_BASELINE);

    pdf.stream(content_id, &content.finish());
    Ok(pdf.finish())
}

fn draw_modules(content: &mut Content, graphic: &QrGraphic) {
    let width = graphic.width();
    let cell = QR_SIZE / width as f32;
    let top = PAGE_HEIGHT - QR_TOP;

    content.save_state();
    content.set_fill_gray(1.0);
    content.rect(QR_LEFT, top - QR_SIZE, QR_SIZE, QR_SIZE);
    content.fill_nonzero();

    content.set_fill_gray(0.0);
    for y in 0..width {
        for x in 0..width {
            if graphic.is_dark(x, y) {
                content.rect(
                    QR_LEFT + x as f32 * cell,
                    top - (y + 1) as f32 * cell,
                    cell,
                    cell,
                );
            }
        }
    }
    content.fill_nonzero();
    content.restore_state();
}

fn draw_text(content: &mut Content, text: &str, baseline_from_top: f32) {
    let encoded = win_ansi(text);
    content.begin_text();
    content.set_font(FONT_NAME, FONT_SIZE);
    content.next_line(TEXT_LEFT, PAGE_HEIGHT - baseline_from_top);
    content.show(Str(&encoded));
    content.end_text();
}

/// Latin-1 subset of WinAnsi; anything outside it becomes `?`.
fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c as u32 {
            0x20..=0x7e | 0xa0..=0xff => c as u32 as u8,
            _ => b'?',
        })
        .collect()
}
