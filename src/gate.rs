//! ==============================================================================
//! gate.rs - command gate
//! ==============================================================================
//!
//! purpose:
//!     at most one device command is in flight. a request arriving while one
//!     is pending is dropped before any network call.
//!
//! relationships:
//!     - used by: monitor.rs (toggle claims it, poll tick checks it)
//!
//! ==============================================================================

use serde::Serialize;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::domain::DeviceKind;

/// Where the most recent command stands
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum CommandPhase {
    #[default]
    Idle,
    Pending { device: DeviceKind },
    Confirmed { device: DeviceKind, is_on: bool },
    RolledBack { device: DeviceKind, reason: String },
}

impl CommandPhase {
    pub fn is_pending(&self) -> bool {
        matches!(self, CommandPhase::Pending { .. })
    }
}

#[derive(Debug, Default)]
pub struct CommandGate {
    phase: Mutex<CommandPhase>,
}

impl CommandGate {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, CommandPhase> {
        self.phase.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// true while a command is in flight
    pub fn is_busy(&self) -> bool {
        self.lock().is_pending()
    }

    pub fn phase(&self) -> CommandPhase {
        self.lock().clone()
    }

    /// Claims the gate for `device`, or `None` if a command is already pending
    pub fn try_begin(&self, device: DeviceKind) -> Option<GatePermit<'_>> {
        let mut phase = self.lock();
        if phase.is_pending() {
            return None;
        }
        *phase = CommandPhase::Pending { device };
        Some(GatePermit { gate: self, device, settled: None })
    }
}

/// Held for the lifetime of one command; releases the gate on drop
#[must_use = "dropping the permit releases the gate"]
pub struct GatePermit<'a> {
    gate: &'a CommandGate,
    device: DeviceKind,
    settled: Option<CommandPhase>,
}

impl GatePermit<'_> {
    pub fn device(&self) -> DeviceKind {
        self.device
    }

    pub fn confirm(mut self, is_on: bool) {
        self.settled = Some(CommandPhase::Confirmed { device: self.device, is_on });
    }

    pub fn roll_back(mut self, reason: String) {
        self.settled = Some(CommandPhase::RolledBack { device: self.device, reason });
    }
}

impl Drop for GatePermit<'_> {
    fn drop(&mut self) {
        // unsettled means the command was abandoned mid-flight
        *self.gate.lock() = self.settled.take().unwrap_or(CommandPhase::Idle);
    }
}
