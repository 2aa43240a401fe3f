// File: lib.rs
// Location: /src/lib.rs

pub mod credential;
pub mod export;
pub mod history;
pub mod i18n;
pub mod location;
pub mod payload;
pub mod render;
pub mod settings;
pub mod state;
pub mod store;
pub mod url_params;
