//! Ordered todo list plus an independently configured goal.
//!
//! The full list is rewritten to `todoItems` on every change; the goal
//! lives under `todoGoal`. A failed write reloads both from the store, so
//! memory only ever holds what was saved.

use chrono::Utc;
use uuid::Uuid;

use super::item::TodoItem;
use crate::error::{Result, StorageError};
use crate::events::{Event, SubscriptionId, Subscribers};
use crate::storage::{KeyValueStore, KeyValueStoreExt};

/// How many items the dashboard card lists before summarizing the rest.
pub const DASHBOARD_PREVIEW: usize = 5;
/// Upper bound for the goal stepper.
pub const MAX_GOAL: u32 = 100;

const ITEMS_KEY: &str = "todoItems";
const GOAL_KEY: &str = "todoGoal";
const DEFAULT_GOAL: u32 = 10;

/// Leading slice of the list and how many items it leaves out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TodoPreview<'a> {
    pub items: &'a [TodoItem],
    pub overflow: usize,
}

pub struct TodoLedger<S: KeyValueStore> {
    store: S,
    items: Vec<TodoItem>,
    goal: u32,
    default_goal: u32,
    subscribers: Subscribers,
}

impl<S: KeyValueStore> TodoLedger<S> {
    pub fn load(store: S) -> Self {
        Self::load_with_default_goal(store, DEFAULT_GOAL)
    }

    /// Rehydrate, using `default_goal` when no goal was ever stored.
    pub fn load_with_default_goal(store: S, default_goal: u32) -> Self {
        let mut ledger = Self {
            store,
            items: Vec::new(),
            goal: 0,
            default_goal: default_goal.min(MAX_GOAL),
            subscribers: Subscribers::new(),
        };
        ledger.reload();
        ledger
    }

    /// Read the list and goal back from the store. Corrupt data reads as empty.
    pub fn reload(&mut self) {
        self.items = self.store.get_json(ITEMS_KEY).unwrap_or_default();
        self.goal = self
            .store
            .get_json::<u32>(GOAL_KEY)
            .map_or(self.default_goal, |g| g.min(MAX_GOAL));
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn items(&self) -> &[TodoItem] {
        &self.items
    }

    pub fn get(&self, id: Uuid) -> Option<&TodoItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn completed_count(&self) -> usize {
        self.items.iter().filter(|item| item.is_complete).count()
    }

    pub fn goal(&self) -> u32 {
        self.goal
    }

    /// Completed items over the goal, capped at 1.0. A zero goal counts as one.
    pub fn progress(&self) -> f64 {
        let ratio = self.completed_count() as f64 / f64::from(self.goal.max(1));
        ratio.min(1.0)
    }

    pub fn preview(&self, limit: usize) -> TodoPreview<'_> {
        let shown = limit.min(self.items.len());
        TodoPreview {
            items: &self.items[..shown],
            overflow: self.items.len() - shown,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Append a new incomplete item. Blank titles are a no-op.
    pub fn add(&mut self, title: &str) -> Result<Option<Event>> {
        let Some(item) = TodoItem::new(title) else {
            return Ok(None);
        };
        let event = Event::TodoAdded {
            id: item.id,
            title: item.title.clone(),
            at: Utc::now(),
        };
        self.items.push(item);
        self.persist_items()?;
        Ok(Some(self.emit(event)))
    }

    /// Flip completion. Unknown ids are a no-op.
    pub fn toggle(&mut self, id: Uuid) -> Result<Option<Event>> {
        let Some(item) = self.items.iter_mut().find(|item| item.id == id) else {
            return Ok(None);
        };
        item.is_complete = !item.is_complete;
        let event = Event::TodoToggled {
            id,
            is_complete: item.is_complete,
            at: Utc::now(),
        };
        self.persist_items()?;
        Ok(Some(self.emit(event)))
    }

    /// Remove an item. Unknown ids are a no-op.
    pub fn delete(&mut self, id: Uuid) -> Result<Option<Event>> {
        let Some(index) = self.items.iter().position(|item| item.id == id) else {
            return Ok(None);
        };
        self.items.remove(index);
        self.persist_items()?;
        Ok(Some(self.emit(Event::TodoDeleted { id, at: Utc::now() })))
    }

    /// Clamp to `0..=MAX_GOAL` and persist.
    pub fn set_goal(&mut self, goal: u32) -> Result<Event> {
        self.goal = goal.min(MAX_GOAL);
        let saved = self.store.set_json(GOAL_KEY, &self.goal);
        self.reload_on_error(saved)?;
        Ok(self.emit(Event::TodoGoalChanged {
            goal: self.goal,
            at: Utc::now(),
        }))
    }

    /// Drop every item and broadcast [`Event::TodosReset`] so other
    /// observers of the stored list rehydrate. The goal is kept.
    pub fn reset_all(&mut self) -> Result<Event> {
        self.items.clear();
        let removed = self.store.remove(ITEMS_KEY);
        self.reload_on_error(removed)?;
        tracing::info!("todos reset");
        Ok(self.emit(Event::TodosReset { at: Utc::now() }))
    }

    pub fn subscribe(&mut self, callback: impl FnMut(&Event) + 'static) -> SubscriptionId {
        self.subscribers.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.unsubscribe(id)
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn persist_items(&mut self) -> Result<()> {
        let saved = self.store.set_json(ITEMS_KEY, &self.items);
        self.reload_on_error(saved)
    }

    fn reload_on_error(&mut self, outcome: Result<(), StorageError>) -> Result<()> {
        if let Err(e) = outcome {
            tracing::warn!(error = %e, "todo write failed, reloading");
            self.reload();
            return Err(e.into());
        }
        Ok(())
    }

    fn emit(&mut self, event: Event) -> Event {
        self.subscribers.notify(&event);
        event
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Reads through to `0`; every write fails.
    struct ReadOnlyStore<'a>(&'a MemoryStore);

    impl KeyValueStore for ReadOnlyStore<'_> {
        fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
            self.0.get(key)
        }

        fn set(&self, _key: &str, _value: &[u8]) -> Result<(), StorageError> {
            Err(StorageError::Locked)
        }

        fn remove(&self, _key: &str) -> Result<(), StorageError> {
            Err(StorageError::Locked)
        }

        fn keys(&self) -> Result<Vec<String>, StorageError> {
            self.0.keys()
        }
    }

    #[test]
    fn blank_titles_are_ignored() {
        let store = MemoryStore::new();
        let mut todos = TodoLedger::load(&store);
        assert!(todos.add("").unwrap().is_none());
        assert!(todos.add("   ").unwrap().is_none());
        assert!(todos.is_empty());
        assert!(store.get(ITEMS_KEY).unwrap().is_none());
    }

    #[test]
    fn add_appends_incomplete_item() {
        let store = MemoryStore::new();
        let mut todos = TodoLedger::load(&store);
        todos.add("Walk dog").unwrap();
        todos.add("Buy milk").unwrap();
        assert_eq!(todos.len(), 2);
        assert_eq!(todos.items()[1].title, "Buy milk");
        assert!(!todos.items()[1].is_complete);
    }

    #[test]
    fn toggle_and_delete_by_id() {
        let store = MemoryStore::new();
        let mut todos = TodoLedger::load(&store);
        todos.add("a").unwrap();
        todos.add("b").unwrap();
        let id = todos.items()[0].id;

        todos.toggle(id).unwrap();
        assert_eq!(todos.completed_count(), 1);
        todos.toggle(id).unwrap();
        assert_eq!(todos.completed_count(), 0);

        assert!(todos.delete(id).unwrap().is_some());
        assert!(todos.get(id).is_none());
        assert_eq!(todos.items()[0].title, "b");
    }

    #[test]
    fn unknown_ids_are_no_ops() {
        let store = MemoryStore::new();
        let mut todos = TodoLedger::load(&store);
        todos.add("a").unwrap();
        let stranger = Uuid::new_v4();
        assert!(todos.toggle(stranger).unwrap().is_none());
        assert!(todos.delete(stranger).unwrap().is_none());
        assert_eq!(todos.len(), 1);
    }

    #[test]
    fn goal_defaults_clamps_and_persists() {
        let store = MemoryStore::new();
        let mut todos = TodoLedger::load(&store);
        assert_eq!(todos.goal(), 10);
        todos.set_goal(250).unwrap();
        assert_eq!(todos.goal(), MAX_GOAL);
        todos.set_goal(3).unwrap();
        assert_eq!(TodoLedger::load(&store).goal(), 3);
    }

    #[test]
    fn progress_never_divides_by_zero() {
        let store = MemoryStore::new();
        let mut todos = TodoLedger::load(&store);
        todos.set_goal(0).unwrap();
        assert_eq!(todos.progress(), 0.0);
        todos.add("x").unwrap();
        let id = todos.items()[0].id;
        todos.toggle(id).unwrap();
        assert_eq!(todos.progress(), 1.0);
    }

    #[test]
    fn preview_reports_overflow() {
        let store = MemoryStore::new();
        let mut todos = TodoLedger::load(&store);
        for n in 0..7 {
            todos.add(&format!("task {n}")).unwrap();
        }
        let preview = todos.preview(DASHBOARD_PREVIEW);
        assert_eq!(preview.items.len(), 5);
        assert_eq!(preview.items[0].title, "task 0");
        assert_eq!(preview.overflow, 2);

        let short = todos.preview(10);
        assert_eq!(short.items.len(), 7);
        assert_eq!(short.overflow, 0);
    }

    #[test]
    fn reset_then_reload_is_empty() {
        let store = MemoryStore::new();
        let mut todos = TodoLedger::load(&store);
        todos.add("a").unwrap();
        todos.set_goal(4).unwrap();
        todos.reset_all().unwrap();
        let reloaded = TodoLedger::load(&store);
        assert!(reloaded.is_empty());
        assert_eq!(reloaded.goal(), 4);
    }

    #[test]
    fn reset_broadcast_rehydrates_other_observers() {
        let store = Rc::new(MemoryStore::new());
        let mut settings = TodoLedger::load(Rc::clone(&store));
        let dashboard = Rc::new(RefCell::new(TodoLedger::load(Rc::clone(&store))));

        dashboard.borrow_mut().add("shared").unwrap();
        settings.reload();
        assert_eq!(settings.len(), 1);

        let observer = Rc::clone(&dashboard);
        settings.subscribe(move |event| {
            if matches!(event, Event::TodosReset { .. }) {
                observer.borrow_mut().reload();
            }
        });
        settings.reset_all().unwrap();

        assert!(dashboard.borrow().is_empty());
    }

    #[test]
    fn failed_write_reverts_to_stored_state() {
        let store = MemoryStore::new();
        let mut seeded = TodoLedger::load(&store);
        seeded.add("kept").unwrap();
        seeded.set_goal(4).unwrap();

        let mut todos = TodoLedger::load(ReadOnlyStore(&store));
        let id = todos.items()[0].id;
        assert!(todos.add("lost").is_err());
        assert!(todos.toggle(id).is_err());
        assert!(todos.set_goal(9).is_err());
        assert!(todos.reset_all().is_err());

        assert_eq!(todos.len(), 1);
        assert_eq!(todos.items()[0].title, "kept");
        assert!(!todos.items()[0].is_complete);
        assert_eq!(todos.goal(), 4);
    }

    #[test]
    fn corrupt_list_reads_as_empty() {
        let store = MemoryStore::new();
        store.set(ITEMS_KEY, b"[{\"oops\":").unwrap();
        store.set(GOAL_KEY, b"\"many\"").unwrap();
        let todos = TodoLedger::load(&store);
        assert!(todos.is_empty());
        assert_eq!(todos.goal(), 10);
    }
}
