// File: url_params.rs
// Location: /src/url_params.rs
//
// Query string <-> state mapping. Both directions are pure so the sync step
// can be tested without a store or a URL.

use log::{debug, warn};
use std::collections::HashMap;
use url::form_urlencoded;

use crate::credential::{Credential, Encryption};
use crate::i18n::Language;
use crate::settings::AppSettings;

pub const SSID: &str = "ssid";
pub const PASSWORD: &str = "password";
pub const ENCRYPTION: &str = "encryption";
pub const IS_HIDDEN: &str = "isHidden";
pub const LANG: &str = "lang";
pub const DISPLAY_GENERATOR: &str = "displayGenerator";
pub const DISPLAY_HISTORY: &str = "displayHistory";
pub const DYNAMIC_URL_PARAMS: &str = "dynamicUrlParams";
pub const DOWNLOAD_PDF: &str = "downloadPDF";
pub const DOWNLOAD_PNG: &str = "downloadPNG";
pub const DOWNLOAD_DOCX: &str = "downloadDOCX";
pub const DOWNLOAD_SVG: &str = "downloadSVG";

/// What the startup seed asks the caller to do with the address afterwards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QuerySeed {
    pub applied: usize,
    /// `dynamicUrlParams=false` was in the query itself.
    pub clear_query: bool,
}

fn first_values(query: &str) -> HashMap<String, String> {
    let mut values = HashMap::new();
    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        values
            .entry(key.into_owned())
            .or_insert_with(|| value.into_owned());
    }
    values
}

/// Overrides individual settings and credential fields with the parameters
/// present in `query`. Absent parameters leave the current value untouched.
pub fn apply_query(query: &str, settings: &mut AppSettings, credential: &mut Credential) -> QuerySeed {
    let params = first_values(query.trim_start_matches('?'));
    let mut seed = QuerySeed::default();

    let mut flag = |name: &str, target: &mut bool| {
        if let Some(value) = params.get(name) {
            *target = value == "true";
            seed.applied += 1;
        }
    };

    flag(IS_HIDDEN, &mut credential.is_hidden);
    flag(DISPLAY_GENERATOR, &mut settings.display_generator);
    flag(DISPLAY_HISTORY, &mut settings.display_history);
    flag(DYNAMIC_URL_PARAMS, &mut settings.dynamic_url_params);
    flag(DOWNLOAD_PDF, &mut settings.download_buttons.pdf);
    flag(DOWNLOAD_PNG, &mut settings.download_buttons.png);
    flag(DOWNLOAD_DOCX, &mut settings.download_buttons.docx);
    flag(DOWNLOAD_SVG, &mut settings.download_buttons.svg);

    if let Some(ssid) = params.get(SSID) {
        credential.ssid = ssid.clone();
        seed.applied += 1;
    }
    if let Some(password) = params.get(PASSWORD) {
        credential.password = password.clone();
        seed.applied += 1;
    }
    if let Some(value) = params.get(ENCRYPTION) {
        match value.parse::<Encryption>() {
            Ok(mode) => {
                credential.encryption = mode;
                seed.applied += 1;
            }
            Err(e) => warn!("Ignoring URL parameter {}: {}", ENCRYPTION, e),
        }
    }
    if let Some(value) = params.get(LANG) {
        match value.parse::<Language>() {
            Ok(language) => {
                settings.language = language;
                seed.applied += 1;
            }
            Err(e) => warn!("Ignoring URL parameter {}: {}", LANG, e),
        }
    }

    seed.clear_query = params
        .get(DYNAMIC_URL_PARAMS)
        .is_some_and(|v| v == "false");

    debug!("Applied {} URL parameters", seed.applied);
    seed
}

/// The query string mirroring `settings` and `credential`, or `None` when the
/// address should carry no query at all.
pub fn derive_query(settings: &AppSettings, credential: &Credential) -> Option<String> {
    if !settings.dynamic_url_params {
        return None;
    }

    let defaults = AppSettings::default();
    let buttons = &settings.download_buttons;
    let mut query = form_urlencoded::Serializer::new(String::new());

    if !credential.ssid.is_empty() {
        query.append_pair(SSID, &credential.ssid);
    }
    if !credential.password.is_empty() {
        query.append_pair(PASSWORD, &credential.password);
    }
    if credential.encryption != Encryption::default() {
        query.append_pair(ENCRYPTION, credential.encryption.as_str());
    }
    if credential.is_hidden {
        query.append_pair(IS_HIDDEN, "true");
    }
    if settings.language != defaults.language {
        query.append_pair(LANG, settings.language.code());
    }

    let flags = [
        (DISPLAY_GENERATOR, settings.display_generator, defaults.display_generator),
        (DISPLAY_HISTORY, settings.display_history, defaults.display_history),
        (DYNAMIC_URL_PARAMS, settings.dynamic_url_params, defaults.dynamic_url_params),
        (DOWNLOAD_PDF, buttons.pdf, defaults.download_buttons.pdf),
        (DOWNLOAD_PNG, buttons.png, defaults.download_buttons.png),
        (DOWNLOAD_DOCX, buttons.docx, defaults.download_buttons.docx),
        (DOWNLOAD_SVG, buttons.svg, defaults.download_buttons.svg),
    ];
    for (name, value, default) in flags {
        if value != default {
            query.append_pair(name, if value { "true" } else { "false" });
        }
    }

    let query = query.finish();
    if query.is_empty() {
        None
    } else {
        Some(query)
    }
}
