//! ==============================================================================
//! domain.rs - snapshots, devices and command types
//! ==============================================================================
//!
//! purpose:
//!     the data exchanged between the backend and the dashboard.
//!     wire payloads (portuguese field names, as served by the backend) are
//!     kept private to this module and converted into the snapshot types.
//!
//! relationships:
//!     - used by: remote.rs (decodes payloads), reconciler.rs (paints snapshots),
//!       monitor.rs (builds command requests)
//!
//! ==============================================================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// how many log entries the dashboard shows
pub const ACTION_LOG_VIEW_LEN: usize = 10;

// ==============================================================================
// snapshots
// ==============================================================================

/// one complete sensor/actuator reading, replaced wholesale on every poll
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SensorSnapshot {
    /// temperature in celsius
    pub temperature: f64,
    /// someone is in the room
    pub presence: bool,
    /// luminosity in lux
    pub luminosity: f64,
    pub light_on: bool,
    pub fan_on: bool,
    /// backend-formatted time of the reading
    pub timestamp: String,
}

impl SensorSnapshot {
    pub fn device_on(&self, device: DeviceKind) -> bool {
        match device {
            DeviceKind::Light => self.light_on,
            DeviceKind::Fan => self.fan_on,
        }
    }
}

/// action log as received, oldest first
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ActionLogSnapshot {
    entries: Vec<String>,
}

impl ActionLogSnapshot {
    pub fn new(entries: Vec<String>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// last ten entries, most recent first
    pub fn display_view(&self) -> Vec<String> {
        self.entries
            .iter()
            .rev()
            .take(ACTION_LOG_VIEW_LEN)
            .cloned()
            .collect()
    }
}

// ==============================================================================
// devices and commands
// ==============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceKind {
    Light,
    Fan,
}

impl DeviceKind {
    pub const ALL: [DeviceKind; 2] = [DeviceKind::Light, DeviceKind::Fan];

    /// device name understood by the backend
    pub fn wire_name(self) -> &'static str {
        match self {
            DeviceKind::Light => "luz",
            DeviceKind::Fan => "ventilador",
        }
    }

    /// prefix of the surface element ids ("light-status", "fan-btn", ...)
    pub fn element_prefix(self) -> &'static str {
        match self {
            DeviceKind::Light => "light",
            DeviceKind::Fan => "fan",
        }
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

impl FromStr for DeviceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "light" | "luz" => Ok(DeviceKind::Light),
            "fan" | "ventilador" => Ok(DeviceKind::Fan),
            other => Err(format!("unknown device: {other}")),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum DesiredAction {
    #[serde(rename = "ligar")]
    Enable,
    #[serde(rename = "desligar")]
    Disable,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CommandRequest {
    pub device: DeviceKind,
    pub desired_action: DesiredAction,
}

impl CommandRequest {
    /// toggle semantics: a device shown as on is asked to turn off, and vice versa
    pub fn toggle(device: DeviceKind, currently_on: bool) -> Self {
        let desired_action = if currently_on {
            DesiredAction::Disable
        } else {
            DesiredAction::Enable
        };
        Self { device, desired_action }
    }

    /// the device state this request asks for
    pub fn target_state(&self) -> bool {
        self.desired_action == DesiredAction::Enable
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CommandOutcome {
    Accepted(String),
    Rejected(String),
}

impl CommandOutcome {
    /// accepted message, or the rejection as `Error::CommandRejected`
    pub fn into_result(self) -> crate::Result<String> {
        match self {
            CommandOutcome::Accepted(message) => Ok(message),
            CommandOutcome::Rejected(reason) => Err(crate::Error::CommandRejected(reason)),
        }
    }
}

// ==============================================================================
// wire payloads
// ==============================================================================

/// GET /api/data
#[derive(Debug, Deserialize)]
pub(crate) struct SensorPayload {
    temperatura: f64,
    presenca: bool,
    luminosidade: f64,
    #[serde(rename = "lightStatus")]
    light_status: bool,
    #[serde(rename = "fanStatus")]
    fan_status: bool,
    timestamp: String,
}

impl From<SensorPayload> for SensorSnapshot {
    fn from(p: SensorPayload) -> Self {
        Self {
            temperature: p.temperatura,
            presence: p.presenca,
            luminosity: p.luminosidade,
            light_on: p.light_status,
            fan_on: p.fan_status,
            timestamp: p.timestamp,
        }
    }
}

/// GET /api/actions - a missing `actions` field means "no update"
#[derive(Debug, Deserialize)]
pub(crate) struct ActionsPayload {
    #[serde(default)]
    pub actions: Option<Vec<String>>,
}

/// POST /api/devices body
#[derive(Debug, Serialize)]
pub(crate) struct CommandBody {
    pub device: &'static str,
    pub action: DesiredAction,
}

impl From<&CommandRequest> for CommandBody {
    fn from(req: &CommandRequest) -> Self {
        Self {
            device: req.device.wire_name(),
            action: req.desired_action,
        }
    }
}

pub(crate) const DEFAULT_REJECTION: &str = "Erro ao controlar dispositivo";
pub(crate) const DEFAULT_ACCEPTED: &str = "Comando executado";

/// POST /api/devices reply
#[derive(Debug, Deserialize)]
pub(crate) struct CommandReply {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl CommandReply {
    pub fn into_outcome(self, status_ok: bool) -> CommandOutcome {
        if status_ok && self.success {
            CommandOutcome::Accepted(self.message.unwrap_or_else(|| DEFAULT_ACCEPTED.to_string()))
        } else {
            CommandOutcome::Rejected(
                self.error
                    .or(self.message)
                    .unwrap_or_else(|| DEFAULT_REJECTION.to_string()),
            )
        }
    }
}
