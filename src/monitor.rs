//! ==============================================================================
//! monitor.rs - the dashboard controller
//! ==============================================================================
//!
//! purpose:
//!     owns the command gate and the poll scheduler and drives the three
//!     flows that touch the backend:
//!     - poll tick: sensors, then action log (skipped while a command is pending)
//!     - full refresh: same fetches, reported on the system-status banner
//!     - toggle: gate -> command -> optimistic repaint -> delayed log confirm
//!
//! relationships:
//!     - uses: remote.rs (backend), reconciler.rs (painting), gate.rs, scheduler.rs
//!     - used by: lifecycle.rs (signals), server.rs (user toggles)
//!
//! ==============================================================================

use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::config::FeedbackConfig;
use crate::domain::{CommandRequest, DeviceKind};
use crate::gate::{CommandGate, CommandPhase};
use crate::reconciler::Reconciler;
use crate::remote::RemoteState;
use crate::scheduler::PollScheduler;
use crate::surface::{Severity, SurfaceHandle};
use crate::Result;

pub const STATUS_READY: &str = "Sistema ativo e monitorando";
pub const STATUS_CONNECT_FAILED: &str = "Erro ao conectar com o sistema";
pub const STATUS_REFRESH_FAILED: &str = "Erro ao atualizar dados";

/// What happened to one toggle request
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum ToggleOutcome {
    /// another command was in flight; nothing was sent
    Dropped,
    Confirmed { device: DeviceKind, is_on: bool, message: String },
    RolledBack { device: DeviceKind, reason: String },
}

// ==============================================================================
// controller
// ==============================================================================
// cheap to clone: every clone shares the same gate, scheduler and surface.

#[derive(Clone)]
pub struct RoomMonitor {
    remote: Arc<dyn RemoteState>,
    reconciler: Reconciler,
    gate: Arc<CommandGate>,
    scheduler: Arc<Mutex<PollScheduler>>,
    feedback: FeedbackConfig,
}

impl RoomMonitor {
    pub fn new(
        remote: Arc<dyn RemoteState>,
        surface: SurfaceHandle,
        poll_interval: std::time::Duration,
        feedback: FeedbackConfig,
    ) -> Self {
        Self {
            remote,
            reconciler: Reconciler::new(surface, feedback),
            gate: Arc::new(CommandGate::new()),
            scheduler: Arc::new(Mutex::new(PollScheduler::new(poll_interval))),
            feedback,
        }
    }

    pub fn reconciler(&self) -> &Reconciler {
        &self.reconciler
    }

    pub fn surface(&self) -> &SurfaceHandle {
        self.reconciler.surface()
    }

    /// true while a device command is in flight
    pub fn command_in_flight(&self) -> bool {
        self.gate.is_busy()
    }

    pub fn command_phase(&self) -> CommandPhase {
        self.gate.phase()
    }

    // --------------------------------------------------------------------------
    // polling
    // --------------------------------------------------------------------------

    fn scheduler(&self) -> MutexGuard<'_, PollScheduler> {
        self.scheduler.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// (Re)arms periodic polling; never leaves two timers running
    pub fn start_polling(&self) {
        let monitor = self.clone();
        self.scheduler().start(move || {
            let monitor = monitor.clone();
            async move { monitor.poll_tick().await }
        });
    }

    pub fn stop_polling(&self) {
        self.scheduler().stop();
    }

    pub fn polling_active(&self) -> bool {
        self.scheduler().is_active()
    }

    /// One scheduled refresh; does nothing while a command is pending
    pub async fn poll_tick(&self) {
        if self.gate.is_busy() {
            tracing::debug!("command in flight, skipping poll tick");
            return;
        }
        if let Err(e) = self.refresh_sensors().await {
            tracing::warn!(error = %e, "sensor refresh failed");
            self.reconciler.paint_system_status(STATUS_REFRESH_FAILED, Severity::Warning);
        }
        if let Err(e) = self.refresh_action_log().await {
            tracing::warn!(error = %e, "action log refresh failed");
        }
    }

    pub async fn refresh_sensors(&self) -> Result<()> {
        let snapshot = self.remote.fetch_sensors().await?;
        tracing::trace!(?snapshot, "sensor snapshot");
        self.reconciler.paint_sensors(&snapshot);
        Ok(())
    }

    pub async fn refresh_action_log(&self) -> Result<()> {
        match self.remote.fetch_action_log().await? {
            Some(log) => self.reconciler.paint_action_log(&log),
            None => tracing::debug!("action log reply had no entries field, keeping current view"),
        }
        Ok(())
    }

    /// Sensors then action log, with the outcome shown on the status banner
    ///
    /// Both fetches are always attempted; the first error is returned.
    pub async fn refresh_all(&self) -> Result<()> {
        // the log is fetched even when the sensor read failed
        let sensors = self.refresh_sensors().await;
        let log = self.refresh_action_log().await;
        let result = sensors.and(log);

        match &result {
            Ok(()) => self.reconciler.paint_system_status(STATUS_READY, Severity::Info),
            Err(e) => {
                tracing::error!(error = %e, "full refresh failed");
                self.reconciler.paint_system_status(STATUS_CONNECT_FAILED, Severity::Danger);
            }
        }
        result
    }

    // --------------------------------------------------------------------------
    // commands
    // --------------------------------------------------------------------------

    /// Flips `device` relative to what the surface currently shows
    ///
    /// Dropped silently when another command is still pending. The device is
    /// repainted only after the backend confirms; the action log is re-read
    /// after a short delay to pick up the logged action.
    pub async fn toggle(&self, device: DeviceKind) -> ToggleOutcome {
        let Some(permit) = self.gate.try_begin(device) else {
            tracing::debug!(%device, "command already in flight, toggle dropped");
            return ToggleOutcome::Dropped;
        };

        let result = {
            let _busy = self.reconciler.busy(device);
            let request = CommandRequest::toggle(device, self.reconciler.displayed_device_state(device));
            self.dispatch(request).await
        };

        match result {
            Ok((is_on, message)) => {
                permit.confirm(is_on);
                ToggleOutcome::Confirmed { device, is_on, message }
            }
            Err(e) => {
                let reason = e.to_string();
                permit.roll_back(reason.clone());
                ToggleOutcome::RolledBack { device, reason }
            }
        }
    }

    async fn dispatch(&self, request: CommandRequest) -> Result<(bool, String)> {
        let device = request.device;
        tracing::info!(%device, action = ?request.desired_action, "sending device command");

        match self.remote.send_command(&request).await.and_then(|o| o.into_result()) {
            Ok(message) => {
                let is_on = request.target_state();
                self.reconciler.paint_device_status(device, is_on);
                self.reconciler.paint_notification(&message, Severity::Success);
                self.schedule_log_confirmation();
                Ok((is_on, message))
            }
            Err(e) => {
                tracing::warn!(%device, error = %e, "device command failed");
                self.reconciler
                    .paint_notification(&format!("Erro ao controlar {device}: {e}"), Severity::Danger);
                Err(e)
            }
        }
    }

    fn schedule_log_confirmation(&self) {
        let monitor = self.clone();
        let delay = self.feedback.log_confirm_delay();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Err(e) = monitor.refresh_action_log().await {
                tracing::warn!(error = %e, "action log confirmation failed");
            }
        });
    }
}
