// File: i18n.rs
// Location: /src/i18n.rs

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Fr,
    Es,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Fr => "fr",
            Language::Es => "es",
        }
    }

    pub fn network_name_label(&self) -> &'static str {
        match self {
            Language::En => "Network Name",
            Language::Fr => "Nom du réseau",
            Language::Es => "Nombre de la red",
        }
    }

    pub fn password_label(&self) -> &'static str {
        match self {
            Language::En => "Password",
            Language::Fr => "Mot de passe",
            Language::Es => "Contraseña",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "en" => Ok(Language::En),
            "fr" => Ok(Language::Fr),
            "es" => Ok(Language::Es),
            _ => anyhow::bail!("Unsupported language: {}", s),
        }
    }
}
