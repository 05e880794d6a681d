use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calendar::{Pin, Rating};
use crate::flow::FlowPhase;

/// Every state change in the system produces an Event.
/// Front ends either poll the returned value or subscribe to a ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    RatingChanged {
        day: NaiveDate,
        rating: Rating,
        pin: Option<Pin>,
        /// Previous holder of the pin, reset to the boundary rating.
        displaced: Option<NaiveDate>,
        at: DateTime<Utc>,
    },
    CalendarReset {
        at: DateTime<Utc>,
    },
    TodoAdded {
        id: Uuid,
        title: String,
        at: DateTime<Utc>,
    },
    TodoToggled {
        id: Uuid,
        is_complete: bool,
        at: DateTime<Utc>,
    },
    TodoDeleted {
        id: Uuid,
        at: DateTime<Utc>,
    },
    TodoGoalChanged {
        goal: u32,
        at: DateTime<Utc>,
    },
    /// Broadcast so every observer of the persisted list rehydrates.
    TodosReset {
        at: DateTime<Utc>,
    },
    FlowStarted {
        phase: FlowPhase,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    FlowPaused {
        phase: FlowPhase,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    PhaseCompleted {
        phase: FlowPhase,
        sets_remaining: u32,
        at: DateTime<Utc>,
    },
    PhaseSwitched {
        phase: FlowPhase,
        duration_secs: u64,
        at: DateTime<Utc>,
    },
}

/// Handle returned by [`Subscribers::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback = Box<dyn FnMut(&Event)>;

/// Callback registry owned by a ledger.
///
/// Callbacks run synchronously, in subscription order, on the thread that
/// mutated the ledger.
#[derive(Default)]
pub struct Subscribers {
    next_id: u64,
    callbacks: Vec<(SubscriptionId, Callback)>,
}

impl Subscribers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, callback: impl FnMut(&Event) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.callbacks.push((id, Box::new(callback)));
        id
    }

    /// Returns false when the id was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.callbacks.len();
        self.callbacks.retain(|(sid, _)| *sid != id);
        self.callbacks.len() != before
    }

    pub fn notify(&mut self, event: &Event) {
        for (_, callback) in &mut self.callbacks {
            callback(event);
        }
    }

    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }
}

impl std::fmt::Debug for Subscribers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscribers")
            .field("count", &self.callbacks.len())
            .finish()
    }
}
