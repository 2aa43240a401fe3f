// File: mod.rs
// Location: /src/export/mod.rs

pub mod docx;
pub mod pdf;
pub mod png;
pub mod svg;

use anyhow::{Context, Result};
use log::{error, info};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::credential::Credential;
use crate::i18n::Language;
use crate::render::QrGraphic;
use crate::settings::DownloadButtons;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Svg,
    Png,
    Docx,
    Pdf,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 4] = [
        ExportFormat::Svg,
        ExportFormat::Png,
        ExportFormat::Docx,
        ExportFormat::Pdf,
    ];

    pub fn file_name(&self) -> &'static str {
        match self {
            ExportFormat::Svg => "wifi-qr.svg",
            ExportFormat::Png => "wifi-qr.png",
            ExportFormat::Docx => "wifi-qr.docx",
            ExportFormat::Pdf => "wifi-qr.pdf",
        }
    }

    pub fn is_enabled(&self, buttons: &DownloadButtons) -> bool {
        match self {
            ExportFormat::Svg => buttons.svg,
            ExportFormat::Png => buttons.png,
            ExportFormat::Docx => buttons.docx,
            ExportFormat::Pdf => buttons.pdf,
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExportFormat::Svg => "svg",
            ExportFormat::Png => "png",
            ExportFormat::Docx => "docx",
            ExportFormat::Pdf => "pdf",
        };
        f.write_str(name)
    }
}

impl FromStr for ExportFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "svg" => Ok(ExportFormat::Svg),
            "png" => Ok(ExportFormat::Png),
            "docx" => Ok(ExportFormat::Docx),
            "pdf" => Ok(ExportFormat::Pdf),
            _ => anyhow::bail!("Unknown export format: {}", s),
        }
    }
}

/// Runs one converter over the rendered code.
pub fn convert(
    format: ExportFormat,
    graphic: &QrGraphic,
    credential: &Credential,
    language: Language,
) -> Result<Vec<u8>> {
    match format {
        ExportFormat::Svg => Ok(svg::export(graphic)),
        ExportFormat::Png => png::export(graphic),
        ExportFormat::Docx => docx::export(graphic, credential),
        ExportFormat::Pdf => pdf::export(graphic, credential, language),
    }
}

/// Converts on a blocking task and writes `<out_dir>/<fixed file name>`.
/// Failures are logged and handed back; nothing is retried.
pub async fn write_export(
    format: ExportFormat,
    graphic: &QrGraphic,
    credential: &Credential,
    language: Language,
    out_dir: &Path,
) -> Result<PathBuf> {
    let result = run_export(format, graphic.clone(), credential.clone(), language, out_dir).await;
    match &result {
        Ok(path) => info!("Exported {} to {}", format, path.display()),
        Err(e) => error!("Export to {} failed: {:#}", format, e),
    }
    result
}

async fn run_export(
    format: ExportFormat,
    graphic: QrGraphic,
    credential: Credential,
    language: Language,
    out_dir: &Path,
) -> Result<PathBuf> {
    let bytes = tokio::task::spawn_blocking(move || convert(format, &graphic, &credential, language))
        .await
        .context("Export task panicked")??;

    tokio::fs::create_dir_all(out_dir)
        .await
        .with_context(|| format!("Failed to create {}", out_dir.display()))?;

    let path = out_dir.join(format.file_name());
    tokio::fs::write(&path, bytes)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credential::Encryption;
    use crate::payload;

    fn sample() -> (QrGraphic, Credential) {
        let cred = Credential::new("HomeNet", "secret123", Encryption::Wpa, true);
        let graphic = QrGraphic::render(&payload::encode(&cred)).unwrap();
        (graphic, cred)
    }

    #[test]
    fn test_format_names() {
        assert_eq!("PNG".parse::<ExportFormat>().unwrap(), ExportFormat::Png);
        assert!("jpeg".parse::<ExportFormat>().is_err());
        for format in ExportFormat::ALL {
            assert!(format.file_name().ends_with(&format!(".{}", format)));
        }
    }

    #[test]
    fn test_enabled_follows_buttons() {
        let buttons = DownloadButtons {
            docx: false,
            ..DownloadButtons::default()
        };
        assert!(!ExportFormat::Docx.is_enabled(&buttons));
        assert!(ExportFormat::Pdf.is_enabled(&buttons));
    }

    #[tokio::test]
    async fn test_writes_every_format() {
        let dir = tempfile::tempdir().unwrap();
        let (graphic, cred) = sample();

        for format in ExportFormat::ALL {
            let path = write_export(format, &graphic, &cred, Language::En, dir.path())
                .await
                .unwrap();
            assert_eq!(path, dir.path().join(format.file_name()));
            assert!(std::fs::metadata(&path).unwrap().len() > 0);
        }
    }

    #[test]
    fn test_unwritable_destination_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, b"x").unwrap();
        let (graphic, cred) = sample();

        let result = tokio_test::block_on(write_export(
            ExportFormat::Svg,
            &graphic,
            &cred,
            Language::En,
            &blocker.join("out"),
        ));
        assert!(result.is_err());
    }
}
