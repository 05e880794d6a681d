//! Flow/break interval timer.
//!
//! The timer is a wall-clock-based state machine. It does not use
//! internal threads - the caller is responsible for calling `tick()` periodically.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running <-> Paused
//!            |
//!            v
//!        PhaseDone --toggle--> Idle (other phase loaded)
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut timer = FlowTimer::default();
//! timer.toggle(); // start
//! // In a loop:
//! timer.tick(); // Returns Some(Event::PhaseCompleted) when the countdown ends
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::events::Event;
use crate::storage::FlowConfig;

/// Longest duration the picker offers: 5:59:59.
pub const MAX_DURATION_SECS: u64 = 5 * 3600 + 59 * 60 + 59;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowPhase {
    Flow,
    Break,
}

impl FlowPhase {
    pub fn other(self) -> Self {
        match self {
            FlowPhase::Flow => FlowPhase::Break,
            FlowPhase::Break => FlowPhase::Flow,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FlowPhase::Flow => "FLOW",
            FlowPhase::Break => "BREAK",
        }
    }

    /// Title and body announcing the end of this phase.
    pub fn completion_message(self) -> (&'static str, &'static str) {
        match self {
            FlowPhase::Flow => ("Nice flow!", "Now let's take a break."),
            FlowPhase::Break => ("Your break is done!", "Let's flow again."),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowState {
    Idle,
    Running,
    Paused,
    /// Countdown reached zero; the next toggle switches phase.
    PhaseDone,
}

/// Focus/break countdown.
///
/// Operates on wall-clock deltas -- no internal thread.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowTimer {
    flow_secs: u64,
    break_secs: u64,
    phase: FlowPhase,
    state: FlowState,
    remaining_ms: u64,
    sets_total: u32,
    sets_remaining: u32,
    /// Timestamp (ms since epoch) of the last start or flush.
    #[serde(default)]
    last_tick_epoch_ms: Option<u64>,
}

impl Default for FlowTimer {
    fn default() -> Self {
        Self::from_config(&FlowConfig::default())
    }
}

impl FlowTimer {
    pub fn new(flow_secs: u64, break_secs: u64, sets: u32) -> Self {
        let flow_secs = flow_secs.min(MAX_DURATION_SECS);
        Self {
            flow_secs,
            break_secs: break_secs.min(MAX_DURATION_SECS),
            phase: FlowPhase::Flow,
            state: FlowState::Idle,
            remaining_ms: flow_secs * 1000,
            sets_total: sets,
            sets_remaining: sets,
            last_tick_epoch_ms: None,
        }
    }

    pub fn from_config(config: &FlowConfig) -> Self {
        Self::new(config.flow_secs, config.break_secs, config.sets)
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> FlowState {
        self.state
    }

    pub fn phase(&self) -> FlowPhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.state == FlowState::Running
    }

    pub fn remaining_ms(&self) -> u64 {
        self.remaining_ms
    }

    /// Remaining whole seconds, rounded up so 0.4 s still shows 00:01.
    pub fn remaining_secs(&self) -> u64 {
        self.remaining_ms.div_ceil(1000)
    }

    pub fn sets_remaining(&self) -> u32 {
        self.sets_remaining
    }

    pub fn sets_total(&self) -> u32 {
        self.sets_total
    }

    pub fn flow_secs(&self) -> u64 {
        self.flow_secs
    }

    pub fn break_secs(&self) -> u64 {
        self.break_secs
    }

    pub fn phase_duration_secs(&self, phase: FlowPhase) -> u64 {
        match phase {
            FlowPhase::Flow => self.flow_secs,
            FlowPhase::Break => self.break_secs,
        }
    }

    /// 0.0 .. 1.0 progress within the current phase.
    pub fn progress(&self) -> f64 {
        let total = (self.phase_duration_secs(self.phase) * 1000).max(1);
        (1.0 - self.remaining_ms as f64 / total as f64).clamp(0.0, 1.0)
    }

    /// What the dial shows: the next phase's name after a countdown ends,
    /// the remaining time otherwise.
    pub fn display(&self) -> String {
        if self.state == FlowState::PhaseDone {
            self.phase.other().label().to_string()
        } else {
            format_duration(self.remaining_secs())
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// The single start/pause button.
    pub fn toggle(&mut self) -> Option<Event> {
        self.toggle_at(now_ms())
    }

    /// Call periodically. Returns `Some(Event::PhaseCompleted)` when the countdown ends.
    pub fn tick(&mut self) -> Option<Event> {
        self.tick_at(now_ms())
    }

    /// Count down by an explicit amount, independent of the wall clock.
    pub fn advance(&mut self, elapsed_ms: u64) -> Option<Event> {
        if self.state != FlowState::Running {
            return None;
        }
        self.remaining_ms = self.remaining_ms.saturating_sub(elapsed_ms);
        self.complete_if_elapsed()
    }

    pub fn set_flow_duration(&mut self, secs: u64) {
        self.flow_secs = secs.min(MAX_DURATION_SECS);
        if self.phase == FlowPhase::Flow && !self.is_running() {
            self.remaining_ms = self.flow_secs * 1000;
        }
    }

    pub fn set_break_duration(&mut self, secs: u64) {
        self.break_secs = secs.min(MAX_DURATION_SECS);
        if self.phase == FlowPhase::Break && !self.is_running() {
            self.remaining_ms = self.break_secs * 1000;
        }
    }

    /// Back to an idle flow phase with every set restored.
    pub fn reset(&mut self) {
        self.phase = FlowPhase::Flow;
        self.state = FlowState::Idle;
        self.remaining_ms = self.flow_secs * 1000;
        self.sets_remaining = self.sets_total;
        self.last_tick_epoch_ms = None;
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn toggle_at(&mut self, now: u64) -> Option<Event> {
        match self.state {
            FlowState::PhaseDone => {
                self.phase = self.phase.other();
                let duration_secs = self.phase_duration_secs(self.phase);
                self.remaining_ms = duration_secs * 1000;
                self.state = FlowState::Idle;
                Some(Event::PhaseSwitched {
                    phase: self.phase,
                    duration_secs,
                    at: Utc::now(),
                })
            }
            FlowState::Idle | FlowState::Paused => {
                if self.remaining_ms == 0 {
                    self.remaining_ms = self.phase_duration_secs(self.phase) * 1000;
                }
                self.state = FlowState::Running;
                self.last_tick_epoch_ms = Some(now);
                Some(Event::FlowStarted {
                    phase: self.phase,
                    remaining_secs: self.remaining_secs(),
                    at: Utc::now(),
                })
            }
            FlowState::Running => {
                // Flush elapsed time first.
                self.flush_elapsed(now);
                self.state = FlowState::Paused;
                self.last_tick_epoch_ms = None;
                Some(Event::FlowPaused {
                    phase: self.phase,
                    remaining_secs: self.remaining_secs(),
                    at: Utc::now(),
                })
            }
        }
    }

    fn tick_at(&mut self, now: u64) -> Option<Event> {
        if self.state != FlowState::Running {
            return None;
        }
        self.flush_elapsed(now);
        self.complete_if_elapsed()
    }

    fn flush_elapsed(&mut self, now: u64) {
        if let Some(last) = self.last_tick_epoch_ms {
            let elapsed = now.saturating_sub(last);
            self.remaining_ms = self.remaining_ms.saturating_sub(elapsed);
            self.last_tick_epoch_ms = Some(now);
        }
    }

    fn complete_if_elapsed(&mut self) -> Option<Event> {
        if self.remaining_ms > 0 {
            return None;
        }
        self.state = FlowState::PhaseDone;
        self.last_tick_epoch_ms = None;
        if self.phase == FlowPhase::Flow {
            self.sets_remaining = self.sets_remaining.saturating_sub(1);
        }
        tracing::debug!(phase = ?self.phase, sets_remaining = self.sets_remaining, "phase completed");
        Some(Event::PhaseCompleted {
            phase: self.phase,
            sets_remaining: self.sets_remaining,
            at: Utc::now(),
        })
    }
}

/// `H:MM:SS` when an hour or longer, `MM:SS` otherwise.
pub fn format_duration(total_secs: u64) -> String {
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes:02}:{seconds:02}")
    }
}

fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
