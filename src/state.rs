// File: state.rs
// Location: /src/state.rs

use anyhow::{anyhow, Result};
use log::{debug, info, warn};

use crate::credential::Credential;
use crate::history::{self, History, HistoryEntry};
use crate::location::PageUrl;
use crate::payload;
use crate::settings::{self, AppSettings};
use crate::store::KeyValueStore;
use crate::url_params;

/// Everything the page owned: settings, the form, the code on display and the
/// history list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppState {
    pub settings: AppSettings,
    pub credential: Credential,
    /// Payload of the code currently displayed, if any.
    pub qr_value: Option<String>,
    pub history: History,
}

impl AppState {
    /// Stored settings and history first, then the query string as a
    /// one-time override of individual fields. Ends with a sync, so the seeded
    /// settings are persisted and the address mirrors the resulting state.
    pub fn startup(store: &dyn KeyValueStore, url: &mut PageUrl) -> Self {
        let mut state = AppState {
            settings: settings::load_app_settings(store),
            history: history::load_history(store),
            ..AppState::default()
        };

        let seed = url_params::apply_query(url.query(), &mut state.settings, &mut state.credential);
        if seed.clear_query {
            debug!("dynamicUrlParams=false in URL, clearing query");
            url.replace_query(None);
        }

        info!(
            "Loaded state: {} history entries, {} URL overrides",
            state.history.len(),
            seed.applied
        );

        if let Err(e) = state.sync(store, url) {
            warn!("Failed to persist settings after startup: {:#}", e);
        }
        state
    }

    /// Persists settings and rewrites the query of `url` to mirror the state.
    /// Run after every change.
    pub fn sync(&self, store: &dyn KeyValueStore, url: &mut PageUrl) -> Result<()> {
        settings::save_app_settings(store, &self.settings)?;
        let query = url_params::derive_query(&self.settings, &self.credential);
        url.replace_query(query.as_deref());
        Ok(())
    }

    /// Encodes the current form, displays it and prepends it to the history.
    pub fn generate(&mut self, store: &dyn KeyValueStore, now_ms: i64) -> Result<&HistoryEntry> {
        self.credential.validate()?;

        let reserved = payload::reserved_characters(&self.credential);
        if !reserved.is_empty() {
            warn!(
                "Network name or password contains reserved characters {:?}; they are not escaped",
                reserved
            );
        }

        let value = payload::encode(&self.credential);
        self.qr_value = Some(value.clone());
        self.history.record(&self.credential, &value, now_ms);
        history::save_history(store, &self.history)?;

        info!("Generated QR code for {}", self.credential.ssid);
        Ok(&self.history.entries()[0])
    }

    /// Restores an entry's fields and its stored payload; the payload is not
    /// re-encoded.
    pub fn load_history(&mut self, id: i64) -> Result<&HistoryEntry> {
        let entry = self
            .history
            .get(id)
            .ok_or_else(|| anyhow!("No history entry with id {}", id))?;

        self.credential = entry.credential();
        self.qr_value = Some(entry.qr_value.clone());
        debug!("Loaded history entry {}", id);
        Ok(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credential::Encryption;
    use crate::i18n::Language;
    use crate::store::{MemoryStore, HISTORY_KEY, SETTINGS_KEY};

    fn page(url: &str) -> PageUrl {
        PageUrl::parse(url).unwrap()
    }

    #[test]
    fn test_startup_with_empty_storage() {
        let store = MemoryStore::new();
        let mut url = page("http://localhost/");
        let state = AppState::startup(&store, &mut url);

        assert_eq!(state, AppState::default());
    }

    #[test]
    fn test_query_overrides_stored_settings() {
        let store = MemoryStore::new();
        store
            .set(SETTINGS_KEY, r#"{"language":"fr","displayHistory":false}"#)
            .unwrap();
        let mut url = page("http://localhost/?lang=es&ssid=Guest");

        let state = AppState::startup(&store, &mut url);

        assert_eq!(state.settings.language, Language::Es);
        assert!(!state.settings.display_history);
        assert_eq!(state.credential.ssid, "Guest");
        assert_eq!(url.query(), "");
        assert_eq!(settings::load_app_settings(&store).language, Language::Es);
    }

    #[test]
    fn test_seeded_password_never_stays_in_address() {
        let store = MemoryStore::new();
        let mut url = page("http://localhost/?ssid=Guest&password=pw");

        let state = AppState::startup(&store, &mut url);

        assert!(!state.settings.dynamic_url_params);
        assert_eq!(state.credential.password, "pw");
        assert_eq!(url.as_str(), "http://localhost/");
    }

    #[test]
    fn test_startup_mirrors_seed_when_enabled() {
        let store = MemoryStore::new();
        let mut url = page("http://localhost/?encryption=WPA&ssid=Guest&dynamicUrlParams=true");

        AppState::startup(&store, &mut url);

        assert_eq!(url.query(), "ssid=Guest&dynamicUrlParams=true");
        assert!(settings::load_app_settings(&store).dynamic_url_params);
    }

    #[test]
    fn test_explicit_disable_clears_address() {
        let store = MemoryStore::new();
        let mut url = page("http://localhost/app?dynamicUrlParams=false&ssid=Guest");

        let state = AppState::startup(&store, &mut url);

        assert_eq!(url.as_str(), "http://localhost/app");
        assert_eq!(state.credential.ssid, "Guest");
    }

    #[test]
    fn test_sync_persists_and_mirrors() {
        let store = MemoryStore::new();
        let mut url = page("http://localhost/?dynamicUrlParams=true");
        let mut state = AppState::startup(&store, &mut url);

        state.credential = Credential::new("HomeNet", "secret123", Encryption::Wep, false);
        state.sync(&store, &mut url).unwrap();
        assert_eq!(
            url.query(),
            "ssid=HomeNet&password=secret123&encryption=WEP&dynamicUrlParams=true"
        );
        assert_eq!(settings::load_app_settings(&store), state.settings);

        state.settings.dynamic_url_params = false;
        state.sync(&store, &mut url).unwrap();
        assert_eq!(url.query(), "");
        assert!(!settings::load_app_settings(&store).dynamic_url_params);
    }

    #[test]
    fn test_generate_prepends_exact_payload() {
        let store = MemoryStore::new();
        let mut state = AppState::default();
        state.credential = Credential::new("HomeNet", "secret123", Encryption::Wpa, true);

        let entry = state.generate(&store, 1_000).unwrap().clone();

        assert_eq!(entry.qr_value, "WIFI:T:WPA;S:HomeNet;P:secret123;H:true;;");
        assert_eq!(entry.qr_value, payload::encode(&state.credential));
        assert_eq!(state.qr_value.as_deref(), Some(entry.qr_value.as_str()));
        assert_eq!(state.history.len(), 1);
        assert!(store.get(HISTORY_KEY).unwrap().unwrap().contains("HomeNet"));

        state.credential.ssid = "Office".into();
        state.generate(&store, 2_000).unwrap();
        assert_eq!(state.history.len(), 2);
        assert_eq!(state.history.entries()[0].ssid, "Office");
        assert_eq!(history::load_history(&store), state.history);
    }

    #[test]
    fn test_generate_keeps_unreadable_history() {
        let store = MemoryStore::new();
        store
            .set(
                HISTORY_KEY,
                r#"[{"id":2,"ssid":"Home","password":"pw","encryption":"WPA",
                     "isHidden":false,"qrValue":"WIFI:T:WPA;S:Home;P:pw;;"},
                    {"id":1,"ssid":"Lab","password":"pw","encryption":"WPA3",
                     "isHidden":false,"qrValue":"WIFI:T:WPA3;S:Lab;P:pw;;"}]"#,
            )
            .unwrap();
        let mut url = PageUrl::default();
        let mut state = AppState::startup(&store, &mut url);

        state.credential = Credential::new("HomeNet", "secret123", Encryption::Wpa, false);
        state.generate(&store, 3).unwrap();

        let reloaded = history::load_history(&store);
        assert_eq!(reloaded.len(), 2);
        assert_eq!(reloaded.unreadable_count(), 1);
        assert_eq!(reloaded.entries()[0].ssid, "HomeNet");
        assert!(reloaded.get(2).is_some());
    }

    #[test]
    fn test_generate_requires_fields() {
        let store = MemoryStore::new();
        let mut state = AppState::default();
        state.credential.ssid = "HomeNet".into();

        assert!(state.generate(&store, 1).is_err());
        assert!(state.history.is_empty());
        assert_eq!(state.qr_value, None);
        assert_eq!(store.get(HISTORY_KEY).unwrap(), None);
    }

    #[test]
    fn test_load_history_restores_verbatim() {
        let store = MemoryStore::new();
        let mut state = AppState::default();
        state.credential = Credential::new("Cafe", "latte", Encryption::NoPass, true);
        let id = state.generate(&store, 10).unwrap().id;

        state.credential = Credential::new("Other", "zzz", Encryption::Wep, false);
        state.qr_value = None;

        let entry = state.load_history(id).unwrap().clone();
        assert_eq!(state.credential, Credential::new("Cafe", "latte", Encryption::NoPass, true));
        assert_eq!(state.qr_value.as_deref(), Some(entry.qr_value.as_str()));
    }

    #[test]
    fn test_load_history_keeps_stored_payload() {
        let store = MemoryStore::new();
        store
            .set(
                HISTORY_KEY,
                r#"[{"id":7,"ssid":"Old","password":"pw","encryption":"WPA",
                    "isHidden":false,"qrValue":"WIFI:S:Old;T:WPA;P:pw;;"}]"#,
            )
            .unwrap();
        let mut url = PageUrl::default();
        let mut state = AppState::startup(&store, &mut url);

        state.load_history(7).unwrap();
        assert_eq!(state.qr_value.as_deref(), Some("WIFI:S:Old;T:WPA;P:pw;;"));
        assert!(state.load_history(8).is_err());
    }
}
