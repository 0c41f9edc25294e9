//! Controller tests: refresh cycles, toggles and the command gate

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use room_monitor::domain::DesiredAction;
use room_monitor::gate::CommandPhase;
use room_monitor::monitor::{STATUS_CONNECT_FAILED, STATUS_READY, STATUS_REFRESH_FAILED};
use room_monitor::reconciler::{EMPTY_LOG_PLACEHOLDER, LABEL_OFF, LABEL_ON};
use room_monitor::surface::{Severity, ACTION_LOG, SYSTEM_STATUS};
use room_monitor::{CommandOutcome, DeviceKind, ToggleOutcome};

mod common;
use common::{monitor_with, settle, FakeRemote, POLL_INTERVAL};

#[tokio::test(start_paused = true)]
async fn initial_load_paints_scenario_snapshot() {
    let remote = Arc::new(FakeRemote::healthy());
    let monitor = monitor_with(remote.clone());

    monitor.on_ready().await;

    let surface = monitor.surface().snapshot();
    assert_eq!(surface.text("light-status"), Some(LABEL_OFF));
    assert_eq!(surface.text("fan-status"), Some(LABEL_OFF));
    assert_eq!(surface.text(ACTION_LOG), Some(EMPTY_LOG_PLACEHOLDER));
    assert_eq!(surface.text(SYSTEM_STATUS), Some(STATUS_READY));
    assert_eq!(remote.sensor_calls(), 1);
    assert_eq!(remote.log_calls(), 1);
    assert!(monitor.polling_active());
}

#[tokio::test(start_paused = true)]
async fn initial_load_failure_still_starts_polling() {
    let remote = Arc::new(FakeRemote::healthy());
    remote.offline();
    let monitor = monitor_with(remote.clone());

    monitor.on_ready().await;

    let surface = monitor.surface().snapshot();
    let status = surface.get(SYSTEM_STATUS).unwrap();
    assert_eq!(status.text, STATUS_CONNECT_FAILED);
    assert_eq!(status.class_name, Severity::Danger.alert_class());
    assert!(monitor.polling_active());
}

#[tokio::test(start_paused = true)]
async fn polling_refreshes_every_interval() {
    let remote = Arc::new(FakeRemote::healthy());
    let monitor = monitor_with(remote.clone());
    monitor.on_ready().await;

    tokio::time::sleep(POLL_INTERVAL * 2 + Duration::from_millis(100)).await;
    assert_eq!(remote.sensor_calls(), 3);
    assert_eq!(remote.log_calls(), 3);
}

#[tokio::test(start_paused = true)]
async fn starting_twice_keeps_a_single_timer() {
    let remote = Arc::new(FakeRemote::healthy());
    let monitor = monitor_with(remote.clone());
    monitor.start_polling();
    monitor.start_polling();

    tokio::time::sleep(POLL_INTERVAL + Duration::from_millis(100)).await;
    assert_eq!(remote.sensor_calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn poll_tick_sensor_failure_shows_warning() {
    let remote = Arc::new(FakeRemote::healthy());
    remote.offline();
    let monitor = monitor_with(remote.clone());

    monitor.poll_tick().await;

    let surface = monitor.surface().snapshot();
    let status = surface.get(SYSTEM_STATUS).unwrap();
    assert_eq!(status.text, STATUS_REFRESH_FAILED);
    assert_eq!(status.class_name, Severity::Warning.alert_class());
    // log is still attempted after the sensor failure
    assert_eq!(remote.log_calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn successful_toggle_is_applied_then_confirmed() {
    let remote = Arc::new(
        FakeRemote::healthy().with_reply(Some(CommandOutcome::Accepted("Light turned on".into()))),
    );
    let monitor = monitor_with(remote.clone());
    monitor.refresh_all().await.unwrap();
    let log_calls = remote.log_calls();

    let outcome = monitor.toggle(DeviceKind::Light).await;
    assert_eq!(
        outcome,
        ToggleOutcome::Confirmed {
            device: DeviceKind::Light,
            is_on: true,
            message: "Light turned on".into()
        }
    );

    let sent = remote.commands.lock().unwrap().clone();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].device, DeviceKind::Light);
    assert_eq!(sent[0].desired_action, DesiredAction::Enable);

    let surface = monitor.surface().snapshot();
    assert_eq!(surface.text("light-status"), Some(LABEL_ON));
    let note = &surface.notifications()[0];
    assert_eq!(note.message, "Light turned on");
    assert_eq!(note.severity, Severity::Success);
    let button = surface.get("light-btn").unwrap();
    assert!(!button.disabled);
    assert!(!button.has_class("loading"));

    assert!(!monitor.command_in_flight());
    assert_eq!(
        monitor.command_phase(),
        CommandPhase::Confirmed { device: DeviceKind::Light, is_on: true }
    );

    // the log is re-read only after the confirmation delay
    tokio::time::sleep(Duration::from_millis(400)).await;
    assert_eq!(remote.log_calls(), log_calls);
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(remote.log_calls(), log_calls + 1);
}

#[tokio::test(start_paused = true)]
async fn toggle_from_on_asks_to_disable() {
    let remote = Arc::new(FakeRemote::healthy());
    let monitor = monitor_with(remote.clone());
    monitor.reconciler().paint_device_status(DeviceKind::Fan, true);

    let outcome = monitor.toggle(DeviceKind::Fan).await;

    assert!(matches!(outcome, ToggleOutcome::Confirmed { is_on: false, .. }));
    assert_eq!(remote.commands.lock().unwrap()[0].desired_action, DesiredAction::Disable);
    assert_eq!(monitor.surface().snapshot().text("fan-status"), Some(LABEL_OFF));
}

#[tokio::test(start_paused = true)]
async fn rejected_toggle_leaves_device_unchanged() {
    let remote = Arc::new(
        FakeRemote::healthy().with_reply(Some(CommandOutcome::Rejected("device offline".into()))),
    );
    let monitor = monitor_with(remote.clone());
    monitor.refresh_all().await.unwrap();
    let log_calls = remote.log_calls();

    let outcome = monitor.toggle(DeviceKind::Fan).await;
    assert_eq!(
        outcome,
        ToggleOutcome::RolledBack { device: DeviceKind::Fan, reason: "device offline".into() }
    );

    let surface = monitor.surface().snapshot();
    assert_eq!(surface.text("fan-status"), Some(LABEL_OFF));
    let note = &surface.notifications()[0];
    assert_eq!(note.severity, Severity::Danger);
    assert!(note.message.contains("device offline"));
    assert!(!surface.get("fan-btn").unwrap().disabled);
    assert!(!monitor.command_in_flight());

    // no confirmation fetch after a failure
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(remote.log_calls(), log_calls);
}

#[tokio::test(start_paused = true)]
async fn network_failure_leaves_device_unchanged() {
    let remote = Arc::new(FakeRemote::healthy().with_reply(None));
    let monitor = monitor_with(remote.clone());
    monitor.reconciler().paint_device_status(DeviceKind::Light, true);

    let outcome = monitor.toggle(DeviceKind::Light).await;

    assert!(matches!(outcome, ToggleOutcome::RolledBack { device: DeviceKind::Light, .. }));
    assert_eq!(monitor.surface().snapshot().text("light-status"), Some(LABEL_ON));
    assert!(!monitor.command_in_flight());
}

#[tokio::test(start_paused = true)]
async fn rapid_toggles_send_one_command() {
    let (remote, hold) = FakeRemote::healthy().held();
    let remote = Arc::new(remote);
    let monitor = monitor_with(remote.clone());

    let first = {
        let monitor = monitor.clone();
        tokio::spawn(async move { monitor.toggle(DeviceKind::Light).await })
    };
    settle().await;
    assert!(monitor.command_in_flight());
    assert!(monitor.surface().snapshot().get("light-btn").unwrap().disabled);

    for _ in 0..5 {
        assert_eq!(monitor.toggle(DeviceKind::Light).await, ToggleOutcome::Dropped);
    }
    // the other device is gated too
    assert_eq!(monitor.toggle(DeviceKind::Fan).await, ToggleOutcome::Dropped);
    assert_eq!(remote.command_calls(), 1);

    hold.add_permits(1);
    let outcome = first.await.unwrap();
    assert!(matches!(outcome, ToggleOutcome::Confirmed { is_on: true, .. }));
    assert!(!monitor.command_in_flight());
    assert_eq!(remote.command_calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn poll_tick_is_skipped_while_command_pending() {
    let (remote, hold) = FakeRemote::healthy().held();
    let remote = Arc::new(remote);
    let monitor = monitor_with(remote.clone());

    let pending = {
        let monitor = monitor.clone();
        tokio::spawn(async move { monitor.toggle(DeviceKind::Fan).await })
    };
    settle().await;
    let calls = remote.network_calls();

    monitor.poll_tick().await;
    assert_eq!(remote.network_calls(), calls);

    hold.add_permits(1);
    pending.await.unwrap();
    monitor.poll_tick().await;
    assert_eq!(remote.sensor_calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn action_log_shows_newest_ten() {
    let remote = Arc::new(FakeRemote::healthy());
    *remote.actions.lock().unwrap() = Some((1..=15).map(|i| format!("action {i}")).collect());
    let monitor = monitor_with(remote.clone());

    monitor.refresh_action_log().await.unwrap();

    let surface = monitor.surface().snapshot();
    let log = surface.get(ACTION_LOG).unwrap();
    assert_eq!(log.items.len(), 10);
    assert_eq!(log.items[0], "action 15");
    assert_eq!(log.items[9], "action 6");
}

#[tokio::test(start_paused = true)]
async fn full_refresh_reads_log_after_sensor_failure() {
    let remote = Arc::new(FakeRemote::healthy());
    *remote.sensors.lock().unwrap() = None;
    *remote.actions.lock().unwrap() = Some(vec!["Luz ligada".into()]);
    let monitor = monitor_with(remote.clone());

    monitor.on_ready().await;

    assert_eq!(remote.sensor_calls(), 1);
    assert_eq!(remote.log_calls(), 1);
    let surface = monitor.surface().snapshot();
    assert_eq!(surface.get(ACTION_LOG).unwrap().items, vec!["Luz ligada".to_string()]);
    let status = surface.get(SYSTEM_STATUS).unwrap();
    assert_eq!(status.text, STATUS_CONNECT_FAILED);
    assert_eq!(status.class_name, Severity::Danger.alert_class());
}

#[tokio::test(start_paused = true)]
async fn log_without_entries_field_keeps_current_view() {
    let remote = Arc::new(FakeRemote::healthy());
    *remote.actions.lock().unwrap() = Some(vec!["Luz ligada".into(), "Ventilador ligado".into()]);
    let monitor = monitor_with(remote.clone());
    monitor.refresh_action_log().await.unwrap();

    remote.omit_actions_field.store(true, Ordering::SeqCst);
    monitor.poll_tick().await;

    assert_eq!(remote.log_calls(), 2);
    let surface = monitor.surface().snapshot();
    let log = surface.get(ACTION_LOG).unwrap();
    assert_eq!(log.items, vec!["Ventilador ligado".to_string(), "Luz ligada".to_string()]);
    assert!(log.text.is_empty());
}
