//! Room monitor - client-side sync layer for the smart room dashboard
//!
//! Polls the backend for sensor and action-log snapshots, reconciles them
//! into the presentation surface, and sends device commands through a gate
//! that keeps at most one in flight.

pub mod config;
pub mod domain;
pub mod error;
pub mod gate;
pub mod lifecycle;
pub mod monitor;
pub mod reconciler;
pub mod remote;
pub mod scheduler;
pub mod server;
pub mod surface;

pub use config::MonitorConfig;
pub use domain::{ActionLogSnapshot, CommandOutcome, CommandRequest, DeviceKind, SensorSnapshot};
pub use error::{Error, Result};
pub use lifecycle::{Connectivity, LifecycleSignal, Visibility};
pub use monitor::{RoomMonitor, ToggleOutcome};
pub use remote::{HttpRemote, RemoteState};
pub use surface::{Surface, SurfaceHandle};
