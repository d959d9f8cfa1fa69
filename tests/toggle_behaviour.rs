//! Behaviour-driven tests for the overlay toggle.
//!
//! A scripted backend stands in for the overlay service and records every
//! state it is asked to apply.

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use rtss_overlay::{
    BackendError, InvalidSliderValue, Notification, OverlayBackend, OverlayState, OverlayToggle,
};
use std::cell::RefCell;

// ---------------------------------------------------------------------------
// World types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default)]
enum ServiceBehaviour {
    #[default]
    Apply,
    Decline,
    Unreachable,
}

#[derive(Debug, Default)]
struct ScriptedBackend {
    behaviour: ServiceBehaviour,
    calls: RefCell<Vec<OverlayState>>,
}

impl OverlayBackend for ScriptedBackend {
    fn set_overlay_status(&self, state: OverlayState) -> Result<bool, BackendError> {
        self.calls.borrow_mut().push(state);
        match self.behaviour {
            ServiceBehaviour::Apply => Ok(true),
            ServiceBehaviour::Decline => Ok(false),
            ServiceBehaviour::Unreachable => Err(BackendError::Transport {
                message: "connection refused".to_owned(),
            }),
        }
    }
}

#[derive(Default)]
struct ToggleWorld {
    toggle: Option<OverlayToggle<ScriptedBackend>>,
    notification: Option<Notification>,
    rejection: Option<InvalidSliderValue>,
}

#[fixture]
fn world() -> ToggleWorld {
    ToggleWorld::default()
}

fn toggle(world: &mut ToggleWorld) -> &mut OverlayToggle<ScriptedBackend> {
    world.toggle.as_mut().expect("service configured")
}

fn with_service(world: &mut ToggleWorld, behaviour: ServiceBehaviour) {
    world.toggle = Some(OverlayToggle::new(ScriptedBackend {
        behaviour,
        ..ScriptedBackend::default()
    }));
}

// ---------------------------------------------------------------------------
// Step definitions
// ---------------------------------------------------------------------------

#[given("an overlay service that applies every change")]
fn given_applying_service(world: &mut ToggleWorld) {
    with_service(world, ServiceBehaviour::Apply);
}

#[given("an overlay service that declines every change")]
fn given_declining_service(world: &mut ToggleWorld) {
    with_service(world, ServiceBehaviour::Decline);
}

#[given("an overlay service that is unreachable")]
fn given_unreachable_service(world: &mut ToggleWorld) {
    with_service(world, ServiceBehaviour::Unreachable);
}

#[when("the panel opens")]
fn when_panel_opens(world: &mut ToggleWorld) {
    assert!(world.toggle.is_some());
}

#[when("the slider moves to {value}")]
fn when_slider_moves(world: &mut ToggleWorld, value: i64) {
    match toggle(world).on_slider_change(value) {
        Ok(notification) => world.notification = Some(notification),
        Err(err) => world.rejection = Some(err),
    }
}

#[then("the slider shows \"{label}\"")]
fn then_slider_shows(world: &mut ToggleWorld, label: String) {
    assert_eq!(toggle(world).selection().label(), label);
}

#[then("the service has received {count} calls")]
fn then_call_count(world: &mut ToggleWorld, count: usize) {
    assert_eq!(toggle(world).backend().calls.borrow().len(), count);
}

#[then("the user sees \"{title}\" with \"{body}\"")]
fn then_user_sees(world: &mut ToggleWorld, title: String, body: String) {
    let notification = world.notification.as_ref().expect("notification shown");
    assert_eq!(notification, &Notification::new(title, body));
}

#[then("the slider value is rejected")]
fn then_value_rejected(world: &mut ToggleWorld) {
    assert!(world.rejection.is_some(), "expected rejection");
    assert!(world.notification.is_none());
}

// ---------------------------------------------------------------------------
// Scenario bindings
// ---------------------------------------------------------------------------

#[scenario(path = "tests/features/overlay_toggle.feature", name = "Toggle starts off")]
fn scenario_starts_off(world: ToggleWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/overlay_toggle.feature",
    name = "Switching the overlay on"
)]
fn scenario_switch_on(world: ToggleWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/overlay_toggle.feature",
    name = "Service declines the change"
)]
fn scenario_declined(world: ToggleWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/overlay_toggle.feature",
    name = "Service cannot be reached"
)]
fn scenario_unreachable(world: ToggleWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/overlay_toggle.feature",
    name = "Out-of-range slider value is rejected"
)]
fn scenario_out_of_range(world: ToggleWorld) {
    let _ = world;
}
