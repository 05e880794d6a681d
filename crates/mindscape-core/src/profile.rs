//! User display name and the dashboard greeting.

use crate::error::Result;
use crate::storage::{KeyValueStore, KeyValueStoreExt};

const USER_NAME_KEY: &str = "userName";

/// Stored display name, empty when never set.
pub fn user_name<S: KeyValueStore + ?Sized>(store: &S) -> String {
    store.get_json::<String>(USER_NAME_KEY).unwrap_or_default()
}

/// Store a trimmed display name; a blank name removes the key.
pub fn set_user_name<S: KeyValueStore + ?Sized>(store: &S, name: &str) -> Result<()> {
    let name = name.trim();
    if name.is_empty() {
        store.remove(USER_NAME_KEY)?;
    } else {
        store.set_json(USER_NAME_KEY, name)?;
    }
    Ok(())
}

/// Salutation for a local hour (0..=23).
pub fn salutation(hour: u32) -> &'static str {
    match hour {
        5..=11 => "Good Morning",
        12..=17 => "Good Afternoon",
        _ => "Good Evening",
    }
}

/// "Good Morning, Sam", or just the salutation without a name.
pub fn greeting(hour: u32, name: &str) -> String {
    let name = name.trim();
    if name.is_empty() {
        salutation(hour).to_string()
    } else {
        format!("{}, {name}", salutation(hour))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn salutation_boundaries() {
        assert_eq!(salutation(4), "Good Evening");
        assert_eq!(salutation(5), "Good Morning");
        assert_eq!(salutation(11), "Good Morning");
        assert_eq!(salutation(12), "Good Afternoon");
        assert_eq!(salutation(17), "Good Afternoon");
        assert_eq!(salutation(18), "Good Evening");
    }

    #[test]
    fn greeting_appends_name() {
        assert_eq!(greeting(9, "Sam"), "Good Morning, Sam");
        assert_eq!(greeting(20, "  "), "Good Evening");
    }

    #[test]
    fn name_roundtrip_and_clear() {
        let store = MemoryStore::new();
        assert_eq!(user_name(&store), "");
        set_user_name(&store, "  Ada ").unwrap();
        assert_eq!(user_name(&store), "Ada");
        set_user_name(&store, "").unwrap();
        assert!(store.is_empty());
    }
}
