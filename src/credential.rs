// File: credential.rs
// Location: /src/credential.rs

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Encryption {
    #[default]
    #[serde(rename = "WPA")]
    Wpa,
    #[serde(rename = "WEP")]
    Wep,
    #[serde(rename = "nopass")]
    NoPass,
}

impl Encryption {
    /// Token used both in the `T:` clause and in the `encryption` URL parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            Encryption::Wpa => "WPA",
            Encryption::Wep => "WEP",
            Encryption::NoPass => "nopass",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Encryption::Wpa => "WPA/WPA2",
            Encryption::Wep => "WEP",
            Encryption::NoPass => "None",
        }
    }
}

impl fmt::Display for Encryption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Encryption {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "WPA" => Ok(Encryption::Wpa),
            "WEP" => Ok(Encryption::Wep),
            "nopass" => Ok(Encryption::NoPass),
            _ => anyhow::bail!("Unknown encryption mode: {}", s),
        }
    }
}

/// The in-progress form contents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credential {
    pub ssid: String,
    pub password: String,
    pub encryption: Encryption,
    pub is_hidden: bool,
}

impl Credential {
    pub fn new(ssid: &str, password: &str, encryption: Encryption, is_hidden: bool) -> Self {
        Self {
            ssid: ssid.to_string(),
            password: password.to_string(),
            encryption,
            is_hidden,
        }
    }

    /// Generate and export stay disabled until both required fields are filled.
    pub fn is_complete(&self) -> bool {
        !self.ssid.is_empty() && !self.password.is_empty()
    }

    /// Replaces the fields that were given and leaves the rest as they are.
    pub fn apply_overrides(
        &mut self,
        ssid: Option<String>,
        password: Option<String>,
        encryption: Option<Encryption>,
        is_hidden: Option<bool>,
    ) {
        if let Some(ssid) = ssid {
            self.ssid = ssid;
        }
        if let Some(password) = password {
            self.password = password;
        }
        if let Some(encryption) = encryption {
            self.encryption = encryption;
        }
        if let Some(is_hidden) = is_hidden {
            self.is_hidden = is_hidden;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.ssid.is_empty() {
            anyhow::bail!("Network name is required");
        }
        if self.password.is_empty() {
            anyhow::bail!("Password is required");
        }
        Ok(())
    }
}
