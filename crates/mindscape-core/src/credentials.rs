//! API key lookup for the text-generation service.
//!
//! The environment wins over the OS keyring so CI and one-off runs can
//! inject a key without touching the keyring.

/// Environment variable checked before the keyring.
pub const HF_KEY_ENV: &str = "MINDSCAPE_HF_KEY";
/// Keyring entry name under the `mindscape` service.
pub const HF_KEY_ENTRY: &str = "hf_key";

/// The configured API key, if any. Blank values count as missing.
pub fn hf_api_key() -> Option<String> {
    if let Some(key) = non_blank(std::env::var(HF_KEY_ENV).ok()) {
        return Some(key);
    }
    match keyring_store::get(HF_KEY_ENTRY) {
        Ok(key) => non_blank(key),
        Err(e) => {
            tracing::warn!(error = %e, "keyring lookup failed");
            None
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Thin wrapper around the OS keyring for credential storage.
pub mod keyring_store {
    const SERVICE: &str = "mindscape";

    pub fn get(key: &str) -> Result<Option<String>, keyring::Error> {
        let entry = keyring::Entry::new(SERVICE, key)?;
        match entry.get_password() {
            Ok(pw) => Ok(Some(pw)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub fn set(key: &str, value: &str) -> Result<(), keyring::Error> {
        let entry = keyring::Entry::new(SERVICE, key)?;
        entry.set_password(value)
    }

    pub fn delete(key: &str) -> Result<(), keyring::Error> {
        let entry = keyring::Entry::new(SERVICE, key)?;
        match entry.delete_credential() {
            Ok(()) => Ok(()),
            Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_values_are_missing() {
        assert_eq!(non_blank(None), None);
        assert_eq!(non_blank(Some("   ".into())), None);
        assert_eq!(non_blank(Some(" hf_abc \n".into())), Some("hf_abc".into()));
    }
}
