//! ==============================================================================
//! reconciler.rs - paint operations
//! ==============================================================================
//!
//! purpose:
//!     writes snapshots and feedback into the shared surface. every paint
//!     overwrites what was there; none of them read prior state, except
//!     `displayed_device_state` which the toggle uses to pick a direction.
//!
//! relationships:
//!     - writes: surface.rs
//!     - used by: monitor.rs, lifecycle.rs
//!
//! ==============================================================================

use std::time::Duration;

use crate::config::FeedbackConfig;
use crate::domain::{ActionLogSnapshot, DeviceKind, SensorSnapshot};
use crate::surface::{self, Severity, SurfaceHandle};

pub const LABEL_ON: &str = "Ligado";
pub const LABEL_OFF: &str = "Desligado";
pub const EMPTY_LOG_PLACEHOLDER: &str = "Nenhuma ação registrada";

const UPDATED_CLASS: &str = "updated";
const LOADING_CLASS: &str = "loading";

#[derive(Clone)]
pub struct Reconciler {
    surface: SurfaceHandle,
    feedback: FeedbackConfig,
}

impl Reconciler {
    pub fn new(surface: SurfaceHandle, feedback: FeedbackConfig) -> Self {
        Self { surface, feedback }
    }

    pub fn surface(&self) -> &SurfaceHandle {
        &self.surface
    }

    pub fn paint_sensors(&self, snapshot: &SensorSnapshot) {
        {
            let mut s = self.surface.lock();
            set_text(&mut s, surface::TEMPERATURE, format!("{}°C", snapshot.temperature));
            set_text(
                &mut s,
                surface::PRESENCE,
                if snapshot.presence { "Detectada" } else { "Ausente" }.to_string(),
            );
            set_text(&mut s, surface::LUMINOSITY, format!("{} lux", snapshot.luminosity));
            set_text(&mut s, surface::LAST_UPDATE, snapshot.timestamp.clone());
        }
        for device in DeviceKind::ALL {
            self.paint_device_status(device, snapshot.device_on(device));
        }
        self.flash_sensor_cards();
    }

    /// Renders the last ten entries, newest first, or the placeholder
    pub fn paint_action_log(&self, log: &ActionLogSnapshot) {
        let mut s = self.surface.lock();
        let Some(el) = s.get_mut(surface::ACTION_LOG) else {
            return;
        };
        if log.is_empty() {
            el.text = EMPTY_LOG_PLACEHOLDER.to_string();
            el.items.clear();
        } else {
            el.text.clear();
            el.items = log.display_view();
        }
    }

    pub fn paint_device_status(&self, device: DeviceKind, is_on: bool) {
        let mut s = self.surface.lock();
        if let Some(label) = s.get_mut(&surface::status_id(device)) {
            label.text = if is_on { LABEL_ON } else { LABEL_OFF }.to_string();
            label.class_name =
                format!("font-weight-bold {}", if is_on { "text-success" } else { "text-secondary" });
        }
        if let Some(button) = s.get_mut(&surface::button_id(device)) {
            button.class_name = format!("btn {}", if is_on { "device-on" } else { "device-off" });
        }
    }

    /// On/off as currently shown by the status label
    pub fn displayed_device_state(&self, device: DeviceKind) -> bool {
        self.surface
            .lock()
            .text(&surface::status_id(device))
            .is_some_and(|text| text.starts_with("Ligad"))
    }

    pub fn paint_system_status(&self, message: &str, severity: Severity) {
        let mut s = self.surface.lock();
        if let Some(el) = s.get_mut(surface::SYSTEM_STATUS) {
            el.text = message.to_string();
            el.class_name = severity.alert_class();
        }
    }

    /// Transient message, dismissed after the configured lifetime
    pub fn paint_notification(&self, message: &str, severity: Severity) {
        let id = self.surface.lock().push_notification(message.to_string(), severity);
        let handle = self.surface.clone();
        self.after(self.feedback.notification_lifetime(), move || {
            handle.lock().dismiss_notification(id);
        });
    }

    pub fn set_button_busy(&self, device: DeviceKind, busy: bool) {
        let mut s = self.surface.lock();
        if let Some(button) = s.get_mut(&surface::button_id(device)) {
            if busy {
                button.add_class(LOADING_CLASS);
            } else {
                button.remove_class(LOADING_CLASS);
            }
            button.disabled = busy;
        }
    }

    /// Marks the button busy until the returned guard drops
    pub fn busy(&self, device: DeviceKind) -> BusyButton<'_> {
        self.set_button_busy(device, true);
        BusyButton { reconciler: self, device }
    }

    fn flash_sensor_cards(&self) {
        let cards = {
            let mut s = self.surface.lock();
            let cards = s.ids_with_class(surface::SENSOR_CARD_CLASS);
            for id in &cards {
                if let Some(card) = s.get_mut(id) {
                    card.add_class(UPDATED_CLASS);
                }
            }
            cards
        };
        let handle = self.surface.clone();
        self.after(self.feedback.refresh_flash(), move || {
            let mut s = handle.lock();
            for id in &cards {
                if let Some(card) = s.get_mut(id) {
                    card.remove_class(UPDATED_CLASS);
                }
            }
        });
    }

    fn after(&self, delay: Duration, f: impl FnOnce() + Send + 'static) {
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            f();
        });
    }
}

fn set_text(s: &mut surface::Surface, id: &str, text: String) {
    if let Some(el) = s.get_mut(id) {
        el.text = text;
    }
}

/// Clears a button's busy state on drop
pub struct BusyButton<'a> {
    reconciler: &'a Reconciler,
    device: DeviceKind,
}

impl Drop for BusyButton<'_> {
    fn drop(&mut self) {
        self.reconciler.set_button_busy(self.device, false);
    }
}
