use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single todo entry.
///
/// Serialized as `{id, title, isComplete}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoItem {
    pub id: Uuid,
    pub title: String,
    pub is_complete: bool,
}

impl TodoItem {
    /// Build an incomplete item from user input. Returns `None` when the
    /// title is blank after trimming.
    pub fn new(title: &str) -> Option<Self> {
        let title = title.trim();
        if title.is_empty() {
            return None;
        }
        Some(Self {
            id: Uuid::new_v4(),
            title: title.to_string(),
            is_complete: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_trims_title() {
        let item = TodoItem::new("  Buy milk \n").unwrap();
        assert_eq!(item.title, "Buy milk");
        assert!(!item.is_complete);
    }

    #[test]
    fn blank_titles_are_rejected() {
        assert!(TodoItem::new("").is_none());
        assert!(TodoItem::new(" \t ").is_none());
    }

    #[test]
    fn wire_format_uses_camel_case() {
        let item = TodoItem {
            id: Uuid::nil(),
            title: "Stretch".into(),
            is_complete: true,
        };
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["isComplete"], true);
        assert_eq!(json["title"], "Stretch");
        assert_eq!(json["id"], "00000000-0000-0000-0000-000000000000");
    }

    #[test]
    fn accepts_uppercase_ids() {
        let raw = r#"{"id":"E621E1F8-C36C-495A-93FC-0C247A3E6E5F","title":"Run","isComplete":false}"#;
        let item: TodoItem = serde_json::from_str(raw).unwrap();
        assert_eq!(item.title, "Run");
    }
}
