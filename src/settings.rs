// File: settings.rs
// Location: /src/settings.rs

use anyhow::{Context, Result};
use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::i18n::Language;
use crate::store::{KeyValueStore, SETTINGS_KEY};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DownloadButtons {
    pub pdf: bool,
    pub png: bool,
    pub docx: bool,
    pub svg: bool,
}

impl Default for DownloadButtons {
    fn default() -> Self {
        Self {
            pdf: true,
            png: true,
            docx: true,
            svg: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppSettings {
    pub language: Language,
    pub display_generator: bool,
    pub display_history: bool,
    pub download_buttons: DownloadButtons,
    pub dynamic_url_params: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            language: Language::En,
            display_generator: true,
            display_history: true,
            download_buttons: DownloadButtons::default(),
            dynamic_url_params: false,
        }
    }
}

impl AppSettings {
    /// Applies a `name=value` assignment using the URL parameter names.
    pub fn set_field(&mut self, name: &str, value: &str) -> Result<()> {
        let flag = || -> Result<bool> {
            value
                .parse::<bool>()
                .with_context(|| format!("Expected true or false for {}, got {:?}", name, value))
        };

        match name {
            "lang" | "language" => self.language = value.parse()?,
            "displayGenerator" => self.display_generator = flag()?,
            "displayHistory" => self.display_history = flag()?,
            "dynamicUrlParams" => self.dynamic_url_params = flag()?,
            "downloadPDF" => self.download_buttons.pdf = flag()?,
            "downloadPNG" => self.download_buttons.png = flag()?,
            "downloadDOCX" => self.download_buttons.docx = flag()?,
            "downloadSVG" => self.download_buttons.svg = flag()?,
            _ => anyhow::bail!("Unknown setting: {}", name),
        }
        Ok(())
    }
}

/// Missing or unreadable settings fall back to defaults; startup never fails on them.
/// Fields are read one by one, so a single bad value only resets that field.
pub fn load_app_settings(store: &dyn KeyValueStore) -> AppSettings {
    let content = match store.get(SETTINGS_KEY) {
        Ok(Some(content)) => content,
        Ok(None) => {
            debug!("No stored settings, using defaults");
            return AppSettings::default();
        }
        Err(e) => {
            warn!("Failed to read stored settings: {}", e);
            return AppSettings::default();
        }
    };

    let record = match serde_json::from_str::<Value>(&content) {
        Ok(Value::Object(record)) => record,
        Ok(_) => {
            warn!("Ignoring stored settings: not an object");
            return AppSettings::default();
        }
        Err(e) => {
            warn!("Ignoring malformed stored settings: {}", e);
            return AppSettings::default();
        }
    };

    let mut settings = AppSettings::default();
    read_field(&record, "language", &mut settings.language);
    read_field(&record, "displayGenerator", &mut settings.display_generator);
    read_field(&record, "displayHistory", &mut settings.display_history);
    read_field(&record, "dynamicUrlParams", &mut settings.dynamic_url_params);

    match record.get("downloadButtons") {
        Some(Value::Object(buttons)) => {
            let target = &mut settings.download_buttons;
            read_field(buttons, "pdf", &mut target.pdf);
            read_field(buttons, "png", &mut target.png);
            read_field(buttons, "docx", &mut target.docx);
            read_field(buttons, "svg", &mut target.svg);
        }
        Some(other) => warn!("Ignoring stored downloadButtons: {}", other),
        None => {}
    }
    settings
}

fn read_field<T: DeserializeOwned>(record: &Map<String, Value>, name: &str, target: &mut T) {
    let Some(value) = record.get(name) else {
        return;
    };
    match T::deserialize(value) {
        Ok(parsed) => *target = parsed,
        Err(e) => warn!("Ignoring stored setting {}: {}", name, e),
    }
}

pub fn save_app_settings(store: &dyn KeyValueStore, settings: &AppSettings) -> Result<()> {
    let json = serde_json::to_string_pretty(settings)?;
    store.set(SETTINGS_KEY, &json)?;
    Ok(())
}
