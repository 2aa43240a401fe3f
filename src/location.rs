// File: location.rs
// Location: /src/location.rs

use anyhow::{Context, Result};
use url::Url;

pub const DEFAULT_PAGE_URL: &str = "http://localhost/";

/// The address the state is mirrored into. Rewriting it never reloads anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageUrl {
    url: Url,
}

impl PageUrl {
    pub fn parse(input: &str) -> Result<Self> {
        let url = Url::parse(input).with_context(|| format!("Invalid page URL: {}", input))?;
        Ok(Self { url })
    }

    pub fn query(&self) -> &str {
        self.url.query().unwrap_or("")
    }

    /// Replaces the query in place; `None` leaves only the path.
    pub fn replace_query(&mut self, query: Option<&str>) {
        self.url.set_query(query);
        if self.url.query() == Some("") {
            self.url.set_query(None);
        }
    }

    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }
}

impl Default for PageUrl {
    fn default() -> Self {
        Self {
            url: Url::parse(DEFAULT_PAGE_URL).expect("default page URL is valid"),
        }
    }
}
