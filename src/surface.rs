//! ==============================================================================
//! surface.rs - the presentation surface
//! ==============================================================================
//!
//! purpose:
//!     an in-memory element model addressed by stable ids, the same ids the
//!     dashboard markup uses. the reconciler writes into it, the surface
//!     endpoint serializes it for the page.
//!
//! relationships:
//!     - written by: reconciler.rs
//!     - served by: server.rs (GET /surface)
//!
//! ==============================================================================

use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

// stable element ids
pub const TEMPERATURE: &str = "temp-value";
pub const PRESENCE: &str = "presence-value";
pub const LUMINOSITY: &str = "light-value";
pub const LAST_UPDATE: &str = "last-update";
pub const ACTION_LOG: &str = "action-log";
pub const SYSTEM_STATUS: &str = "system-status";

/// regions that flash "updated" after a sensor paint
pub const SENSOR_CARDS: [&str; 3] = ["temp-card", "presence-card", "luminosity-card"];

pub const SENSOR_CARD_CLASS: &str = "sensor-card";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Info,
    Success,
    Warning,
    Danger,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Success => "success",
            Severity::Warning => "warning",
            Severity::Danger => "danger",
        }
    }

    pub fn alert_class(self) -> String {
        format!("alert alert-{}", self.as_str())
    }
}

/// one addressable element
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Element {
    pub text: String,
    pub class_name: String,
    pub disabled: bool,
    /// line items (only the action log uses these)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<String>,
}

impl Element {
    fn with_class(class_name: &str) -> Self {
        Self { class_name: class_name.to_string(), ..Self::default() }
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.class_name.split_whitespace().any(|c| c == class)
    }

    pub fn add_class(&mut self, class: &str) {
        if !self.has_class(class) {
            if !self.class_name.is_empty() {
                self.class_name.push(' ');
            }
            self.class_name.push_str(class);
        }
    }

    pub fn remove_class(&mut self, class: &str) {
        self.class_name = self
            .class_name
            .split_whitespace()
            .filter(|c| *c != class)
            .collect::<Vec<_>>()
            .join(" ");
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Notification {
    pub id: u64,
    pub message: String,
    pub severity: Severity,
}

/// Whole-page state
#[derive(Clone, Debug, Default, Serialize)]
pub struct Surface {
    elements: BTreeMap<String, Element>,
    notifications: Vec<Notification>,
    #[serde(skip)]
    next_notification: u64,
}

impl Surface {
    /// Empty surface; every write to it is a no-op
    pub fn new() -> Self {
        Self::default()
    }

    /// Surface with every element the dashboard addresses
    pub fn dashboard() -> Self {
        let mut surface = Self::new();
        for id in [TEMPERATURE, PRESENCE, LUMINOSITY, LAST_UPDATE, ACTION_LOG] {
            surface.insert(id, Element::default());
        }
        surface.insert(SYSTEM_STATUS, Element::with_class(&Severity::Info.alert_class()));
        for card in SENSOR_CARDS {
            surface.insert(card, Element::with_class(SENSOR_CARD_CLASS));
        }
        for device in crate::domain::DeviceKind::ALL {
            surface.insert(&status_id(device), Element::default());
            surface.insert(&button_id(device), Element::with_class("btn"));
        }
        surface
    }

    pub fn insert(&mut self, id: &str, element: Element) {
        self.elements.insert(id.to_string(), element);
    }

    pub fn get(&self, id: &str) -> Option<&Element> {
        self.elements.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Element> {
        self.elements.get_mut(id)
    }

    pub fn text(&self, id: &str) -> Option<&str> {
        self.get(id).map(|e| e.text.as_str())
    }

    /// Ids of every element carrying `class`
    pub fn ids_with_class(&self, class: &str) -> Vec<String> {
        self.elements
            .iter()
            .filter(|(_, e)| e.has_class(class))
            .map(|(id, _)| id.clone())
            .collect()
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn push_notification(&mut self, message: String, severity: Severity) -> u64 {
        self.next_notification += 1;
        let id = self.next_notification;
        self.notifications.push(Notification { id, message, severity });
        id
    }

    pub fn dismiss_notification(&mut self, id: u64) {
        self.notifications.retain(|n| n.id != id);
    }
}

pub fn status_id(device: crate::domain::DeviceKind) -> String {
    format!("{}-status", device.element_prefix())
}

pub fn button_id(device: crate::domain::DeviceKind) -> String {
    format!("{}-btn", device.element_prefix())
}

/// Shared handle to the surface
///
/// Writes are short and synchronous, so a std mutex is enough.
#[derive(Clone, Default)]
pub struct SurfaceHandle(Arc<Mutex<Surface>>);

impl SurfaceHandle {
    pub fn new(surface: Surface) -> Self {
        Self(Arc::new(Mutex::new(surface)))
    }

    pub fn lock(&self) -> MutexGuard<'_, Surface> {
        // a panicked painter leaves a still-usable surface
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn snapshot(&self) -> Surface {
        self.lock().clone()
    }
}
