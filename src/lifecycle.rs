//! ==============================================================================
//! lifecycle.rs - visibility and connectivity handling
//! ==============================================================================
//!
//! purpose:
//!     page visibility and network connectivity decide whether polling runs.
//!     each signal goes through [`RoomMonitor::handle_signal`], which only uses
//!     the start/stop/refresh primitives of the controller.
//!
//! relationships:
//!     - uses: monitor.rs (start_polling, stop_polling, refresh_all)
//!     - used by: server.rs (POST /lifecycle), main.rs (on_ready)
//!
//! ==============================================================================

use serde::{Deserialize, Serialize};

use crate::monitor::RoomMonitor;
use crate::surface::Severity;

pub const STATUS_RESTORED: &str = "Conexão restaurada";
pub const STATUS_OFFLINE: &str = "Sem conexão com a internet";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Visible,
    Hidden,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Connectivity {
    Online,
    Offline,
}

/// External signal, as posted by the page: `{"visibility":"hidden"}` or
/// `{"connectivity":"online"}`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LifecycleSignal {
    Visibility(Visibility),
    Connectivity(Connectivity),
}

impl RoomMonitor {
    /// Page ready: one full refresh, then polling regardless of its outcome
    pub async fn on_ready(&self) {
        // refresh_all already reported any failure on the banner and the log
        self.refresh_all().await.ok();
        self.start_polling();
        tracing::info!("room monitor ready");
    }

    pub async fn handle_signal(&self, signal: LifecycleSignal) {
        tracing::info!(?signal, "lifecycle signal");
        match signal {
            LifecycleSignal::Visibility(Visibility::Hidden) => self.stop_polling(),
            LifecycleSignal::Visibility(Visibility::Visible) => {
                self.start_polling();
                self.refresh_all().await.ok();
            }
            LifecycleSignal::Connectivity(Connectivity::Offline) => {
                self.reconciler().paint_system_status(STATUS_OFFLINE, Severity::Warning);
                self.stop_polling();
            }
            LifecycleSignal::Connectivity(Connectivity::Online) => {
                self.reconciler().paint_system_status(STATUS_RESTORED, Severity::Success);
                self.start_polling();
                self.refresh_all().await.ok();
            }
        }
    }
}
