// File: history.rs
// Location: /src/history.rs

use anyhow::Result;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::credential::{Credential, Encryption};
use crate::store::{KeyValueStore, HISTORY_KEY};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: i64,
    pub ssid: String,
    pub password: String,
    pub encryption: Encryption,
    pub is_hidden: bool,
    pub qr_value: String,
}

impl HistoryEntry {
    pub fn credential(&self) -> Credential {
        Credential::new(&self.ssid, &self.password, self.encryption, self.is_hidden)
    }
}

/// Previously generated codes, most recent first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct History {
    entries: Vec<HistoryEntry>,
    /// Stored records that could not be read; written back untouched on save.
    unreadable: Vec<Value>,
}

impl History {
    pub fn new(entries: Vec<HistoryEntry>) -> Self {
        Self {
            entries,
            unreadable: Vec::new(),
        }
    }

    /// Number of stored records kept aside because they could not be read.
    pub fn unreadable_count(&self) -> usize {
        self.unreadable.len()
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: i64) -> Option<&HistoryEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Prepends a new entry. `now_ms` becomes the id unless an existing entry
    /// already holds an id at or above it.
    pub fn record(&mut self, credential: &Credential, qr_value: &str, now_ms: i64) -> &HistoryEntry {
        let id = match self.entries.iter().map(|e| e.id).max() {
            Some(max) if max >= now_ms => max
                .checked_add(1)
                .unwrap_or_else(|| self.free_id_below(now_ms)),
            _ => now_ms,
        };

        self.entries.insert(
            0,
            HistoryEntry {
                id,
                ssid: credential.ssid.clone(),
                password: credential.password.clone(),
                encryption: credential.encryption,
                is_hidden: credential.is_hidden,
                qr_value: qr_value.to_string(),
            },
        );
        &self.entries[0]
    }

    /// Highest id at or below `start` that no entry uses.
    fn free_id_below(&self, start: i64) -> i64 {
        let mut id = start;
        while id > i64::MIN && self.get(id).is_some() {
            id = id.saturating_sub(1);
        }
        id
    }
}

/// Records that fail to parse are kept aside and written back by
/// [`save_history`], so a bad record never costs the readable ones.
pub fn load_history(store: &dyn KeyValueStore) -> History {
    let content = match store.get(HISTORY_KEY) {
        Ok(Some(content)) => content,
        Ok(None) => return History::default(),
        Err(e) => {
            warn!("Failed to read stored history: {}", e);
            return History::default();
        }
    };

    let records = match serde_json::from_str::<Value>(&content) {
        Ok(Value::Array(records)) => records,
        Ok(other) => {
            warn!("Stored history is not a list, keeping it aside");
            return History {
                entries: Vec::new(),
                unreadable: vec![other],
            };
        }
        Err(e) => {
            warn!("Stored history is not valid JSON ({}), keeping it aside", e);
            return History {
                entries: Vec::new(),
                unreadable: vec![Value::String(content)],
            };
        }
    };

    let mut history = History::default();
    for record in records {
        match serde_json::from_value::<HistoryEntry>(record.clone()) {
            Ok(entry) => history.entries.push(entry),
            Err(e) => {
                warn!("Keeping unreadable history record aside: {}", e);
                history.unreadable.push(record);
            }
        }
    }
    debug!(
        "Loaded {} history entries ({} unreadable)",
        history.entries.len(),
        history.unreadable.len()
    );
    history
}

pub fn save_history(store: &dyn KeyValueStore, history: &History) -> Result<()> {
    let mut records = Vec::with_capacity(history.entries.len() + history.unreadable.len());
    for entry in &history.entries {
        records.push(serde_json::to_value(entry)?);
    }
    records.extend(history.unreadable.iter().cloned());

    let json = serde_json::to_string_pretty(&records)?;
    store.set(HISTORY_KEY, &json)?;
    Ok(())
}
