//! Shared test utilities

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use room_monitor::config::FeedbackConfig;
use room_monitor::{
    ActionLogSnapshot, CommandOutcome, CommandRequest, Error, RemoteState, Result, RoomMonitor,
    SensorSnapshot, Surface, SurfaceHandle,
};
use tokio::sync::Semaphore;

pub const POLL_INTERVAL: Duration = Duration::from_millis(3000);

/// Scripted backend with call counters
#[derive(Default)]
pub struct FakeRemote {
    pub sensors: Mutex<Option<SensorSnapshot>>,
    pub actions: Mutex<Option<Vec<String>>>,
    /// when set, the actions reply parses but carries no `actions` field
    pub omit_actions_field: AtomicBool,
    /// reply for the next commands; `None` means a transport failure
    pub command_reply: Mutex<Option<CommandOutcome>>,
    pub sensor_calls: AtomicUsize,
    pub log_calls: AtomicUsize,
    pub command_calls: AtomicUsize,
    pub commands: Mutex<Vec<CommandRequest>>,
    /// when set, send_command waits for a permit before replying
    pub hold_commands: Option<Arc<Semaphore>>,
}

impl FakeRemote {
    pub fn healthy() -> Self {
        Self {
            sensors: Mutex::new(Some(scenario_snapshot())),
            actions: Mutex::new(Some(Vec::new())),
            command_reply: Mutex::new(Some(CommandOutcome::Accepted("ok".into()))),
            ..Self::default()
        }
    }

    pub fn with_reply(self, reply: Option<CommandOutcome>) -> Self {
        *self.command_reply.lock().unwrap() = reply;
        self
    }

    pub fn held(mut self) -> (Self, Arc<Semaphore>) {
        let hold = Arc::new(Semaphore::new(0));
        self.hold_commands = Some(hold.clone());
        (self, hold)
    }

    pub fn offline(&self) {
        *self.sensors.lock().unwrap() = None;
        *self.actions.lock().unwrap() = None;
    }

    pub fn sensor_calls(&self) -> usize {
        self.sensor_calls.load(Ordering::SeqCst)
    }

    pub fn log_calls(&self) -> usize {
        self.log_calls.load(Ordering::SeqCst)
    }

    pub fn command_calls(&self) -> usize {
        self.command_calls.load(Ordering::SeqCst)
    }

    pub fn network_calls(&self) -> usize {
        self.sensor_calls() + self.log_calls() + self.command_calls()
    }
}

fn backend_down() -> Error {
    Error::MalformedResponse("backend unreachable".into())
}

#[async_trait]
impl RemoteState for FakeRemote {
    async fn fetch_sensors(&self) -> Result<SensorSnapshot> {
        self.sensor_calls.fetch_add(1, Ordering::SeqCst);
        self.sensors.lock().unwrap().clone().ok_or_else(backend_down)
    }

    async fn fetch_action_log(&self) -> Result<Option<ActionLogSnapshot>> {
        self.log_calls.fetch_add(1, Ordering::SeqCst);
        let actions = self.actions.lock().unwrap().clone().ok_or_else(backend_down)?;
        if self.omit_actions_field.load(Ordering::SeqCst) {
            return Ok(None);
        }
        Ok(Some(ActionLogSnapshot::new(actions)))
    }

    async fn send_command(&self, request: &CommandRequest) -> Result<CommandOutcome> {
        self.command_calls.fetch_add(1, Ordering::SeqCst);
        self.commands.lock().unwrap().push(*request);
        if let Some(hold) = &self.hold_commands {
            hold.acquire().await.expect("semaphore closed").forget();
        }
        self.command_reply.lock().unwrap().clone().ok_or_else(backend_down)
    }
}

/// `{temperatura:22, presenca:false, luminosidade:300, lightStatus:false, fanStatus:false, timestamp:"12:00:00"}`
pub fn scenario_snapshot() -> SensorSnapshot {
    SensorSnapshot {
        temperature: 22.0,
        presence: false,
        luminosity: 300.0,
        light_on: false,
        fan_on: false,
        timestamp: "12:00:00".into(),
    }
}

pub fn monitor_with(remote: Arc<FakeRemote>) -> RoomMonitor {
    RoomMonitor::new(
        remote,
        SurfaceHandle::new(Surface::dashboard()),
        POLL_INTERVAL,
        FeedbackConfig::default(),
    )
}

/// Lets spawned tasks run on the paused clock
pub async fn settle() {
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
}
