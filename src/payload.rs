// File: payload.rs
// Location: /src/payload.rs

use crate::credential::Credential;

/// Characters with a special meaning inside a `WIFI:` field.
const RESERVED: [char; 5] = ['\\', ';', ',', '"', ':'];

/// Builds the `WIFI:` URI scanned by phone cameras.
///
/// Field values are inserted as typed. Reserved characters are not escaped,
/// so a network name containing `;` produces a payload that scanners may
/// split differently; see [`reserved_characters`].
pub fn encode(credential: &Credential) -> String {
    let hidden = if credential.is_hidden { "H:true;" } else { "" };
    format!(
        "WIFI:T:{};S:{};P:{};{};",
        credential.encryption.as_str(),
        credential.ssid,
        credential.password,
        hidden
    )
}

/// Reserved characters present in the network name or password, in order of
/// first appearance.
pub fn reserved_characters(credential: &Credential) -> Vec<char> {
    let mut found = Vec::new();
    for c in credential.ssid.chars().chain(credential.password.chars()) {
        if RESERVED.contains(&c) && !found.contains(&c) {
            found.push(c);
        }
    }
    found
}
