//! Todo list with a completion goal.

mod item;
mod ledger;

pub use item::TodoItem;
pub use ledger::{TodoLedger, TodoPreview, DASHBOARD_PREVIEW, MAX_GOAL};
