//! Integration test: topic routing and root commands.

use ledstrand_common::consts::PWM_RANGE;
use ledstrand_common::settings::{LedSettings, load_settings_from_str};
use ledstrand_controller::controller::{Controller, ControllerError};

/// Sample strands with immediate transitions and a linear ramp.
fn immediate_linear() -> LedSettings {
    load_settings_from_str(
        r#"
[led]
pins = [12, 14]
root_scaling = [1, 0.5]
topic_base = "home/topic_name"
default_transition_ms = 0
ramp_coefficient = 1.0
"#,
    )
    .unwrap()
}

#[test]
fn channel_command_only_touches_its_channel() {
    let settings = immediate_linear();
    let mut controller = Controller::new(&settings);

    let publications = controller.handle("home/topic_name1/set", "ON", 0).unwrap();
    assert_eq!(publications.len(), 1);
    assert_eq!(publications[0].topic, "home/topic_name1");
    assert_eq!(publications[0].payload, "ON");

    assert!(!controller.channel(0).unwrap().is_on());
    assert!(controller.channel(1).unwrap().is_on());
}

#[test]
fn root_command_reaches_every_channel() {
    let settings = immediate_linear();
    let mut controller = Controller::new(&settings);

    let publications = controller.handle("home/topic_name/set", "ON", 0).unwrap();
    let topics: Vec<_> = publications.iter().map(|p| p.topic.as_str()).collect();
    assert_eq!(topics, ["home/topic_name0", "home/topic_name1", "home/topic_name"]);
    assert!(publications.iter().all(|p| p.payload == "ON"));

    controller.handle("home/topic_name/set", "OFF", 5).unwrap();
    assert_eq!(controller.render(5), [0, 0]);
}

#[test]
fn half_scaled_channel_renders_half() {
    let settings = immediate_linear();
    let mut controller = Controller::new(&settings);
    controller.handle("home/topic_name/set", "ON", 0).unwrap();

    let levels = controller.levels(0);
    assert_eq!(levels[0], 1.0);
    assert_eq!(levels[1], 0.5);

    let duty = controller.render(0);
    assert_eq!(duty[0], PWM_RANGE);
    assert_eq!(duty[1], 512);
}

#[test]
fn channel_command_uses_full_range() {
    let settings = immediate_linear();
    let mut controller = Controller::new(&settings);
    controller.handle("home/topic_name1/set", "ON", 0).unwrap();

    assert_eq!(controller.levels(0), [0.0, 1.0]);
    assert_eq!(controller.render(0), [0, PWM_RANGE]);
}

#[test]
fn root_brightness_keeps_ratio() {
    let settings = immediate_linear();
    let mut controller = Controller::new(&settings);
    for brightness in ["1", "64", "200", "255"] {
        controller.handle("home/topic_name/set", brightness, 0).unwrap();
        let levels = controller.levels(0);
        assert!((levels[1] - levels[0] / 2.0).abs() < 1e-12);
    }

    // the strand's own topic drops the ceiling again
    controller.handle("home/topic_name1/set", "255", 0).unwrap();
    assert_eq!(controller.render(0), [PWM_RANGE, PWM_RANGE]);
}

#[test]
fn rejected_messages_leave_state_untouched() {
    let settings = immediate_linear();
    let mut controller = Controller::new(&settings);
    controller.handle("home/topic_name0/set", "ON", 0).unwrap();

    let err = controller
        .handle("home/topic_name0/set", "on", 1)
        .unwrap_err();
    assert_eq!(err.to_string(), "unrecognized command payload 'on'");

    let err = controller.handle("home/topic_name9/set", "OFF", 1).unwrap_err();
    assert!(matches!(err, ControllerError::UnknownTopic(_)));

    assert!(controller.channel(0).unwrap().is_on());
    assert_eq!(controller.render(1)[0], PWM_RANGE);
}

#[test]
fn custom_vocabulary_is_published() {
    let settings = load_settings_from_str(
        r#"
[led]
pins = [4]
root_scaling = [1.0]
default_transition_ms = 0

[commands]
on = "an"
off = "aus"
"#,
    )
    .unwrap();
    let mut controller = Controller::new(&settings);
    let publications = controller.handle("home/topic_name0/set", "an", 0).unwrap();
    assert_eq!(publications[0].payload, "an");
    let publications = controller.handle("home/topic_name0/set", "aus", 0).unwrap();
    assert_eq!(publications[0].payload, "aus");
}
