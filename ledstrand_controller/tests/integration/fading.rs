//! Integration test: fades driven by the default transition.
//!
//! Sample settings: 3000 ms transition, quadratic ramp, scaling [1.0, 0.5].

use ledstrand_common::consts::PWM_RANGE;
use ledstrand_common::settings::{LedSettings, SettingsFile};
use ledstrand_controller::controller::Controller;

const TRANSITION_MS: u64 = 3000;

fn sample() -> LedSettings {
    SettingsFile::default().validate().unwrap()
}

#[test]
fn fade_in_reaches_full_output_after_transition() {
    let settings = sample();
    let mut controller = Controller::new(&settings);
    controller.handle("home/topic_name0/set", "ON", 1000).unwrap();

    assert_eq!(controller.render(1000), [0, 0]);
    assert!(controller.is_animating(1000));

    // halfway through the fade: n = 0.5, quadratic -> 0.25
    let levels = controller.levels(1000 + TRANSITION_MS / 2);
    assert!((levels[0] - 0.25).abs() < 1e-12);

    assert!(controller.is_animating(1000 + TRANSITION_MS - 1));
    assert!(!controller.is_animating(1000 + TRANSITION_MS));
    assert_eq!(controller.render(1000 + TRANSITION_MS), [PWM_RANGE, 0]);
}

#[test]
fn fade_output_is_monotonic() {
    let settings = sample();
    let mut controller = Controller::new(&settings);
    controller.handle("home/topic_name/set", "ON", 0).unwrap();

    let mut last = [0u16; 2];
    for now in (0..=TRANSITION_MS).step_by(50) {
        let duty = controller.render(now);
        assert!(duty[0] >= last[0] && duty[1] >= last[1], "at {now} ms: {duty:?}");
        last = [duty[0], duty[1]];
    }
    assert_eq!(last, [PWM_RANGE, 512]);
}

#[test]
fn interrupted_fade_continues_from_current_level() {
    let settings = sample();
    let mut controller = Controller::new(&settings);
    controller.handle("home/topic_name0/set", "ON", 0).unwrap();

    // reverse halfway: normalized level is 0.5 at 1500 ms
    controller.handle("home/topic_name0/set", "OFF", 1500).unwrap();
    let level = controller.channel(0).unwrap().level_at(1500);
    assert!((level - 0.5).abs() < 1e-12);

    let level = controller.channel(0).unwrap().level_at(3000);
    assert!((level - 0.25).abs() < 1e-12);

    assert_eq!(controller.render(1500 + TRANSITION_MS), [0, 0]);
}

#[test]
fn brightness_change_fades_between_levels() {
    let mut file = SettingsFile::default();
    file.led.ramp_coefficient = 1.0;
    let settings = file.validate().unwrap();
    let mut controller = Controller::new(&settings);

    controller.handle("home/topic_name0/set", "255", 0).unwrap();
    controller.handle("home/topic_name0/set", "51", TRANSITION_MS).unwrap();

    let start = controller.levels(TRANSITION_MS)[0];
    let end = controller.levels(2 * TRANSITION_MS)[0];
    assert!((start - 1.0).abs() < 1e-12);
    assert!((end - 0.2).abs() < 1e-12);
}
