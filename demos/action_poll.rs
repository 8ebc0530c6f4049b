//! Load an action profile from TOML and poll it over simulated frames.

use switchboard::{ActionProfile, Input, InputEvent, Key};

const PROFILE: &str = r#"
name = "demo"
description = "Keyboard + any-pad bindings"

[actions.jump]
triggers = [
    { type = "key", key = 32 },
    { type = "joy_button", slot = "any", button = 0 },
]

[actions.throttle]
triggers = [{ type = "joy_axis", slot = "any", axis = 5, threshold = 0.2 }]
"#;

fn main() {
    env_logger::init();

    let profile = ActionProfile::from_toml_str(PROFILE).expect("profile parses");
    let mut input = Input::new();
    input.load_action_profile(&profile);
    input.joy_connection_changed(0, true, "Demo Pad", "demo-guid");

    // One scripted event batch per frame.
    let frames: Vec<Vec<InputEvent>> = vec![
        vec![InputEvent::Key {
            key: Key(32),
            pressed: true,
            echo: false,
        }],
        vec![InputEvent::JoyAxis {
            slot: 0,
            axis: 5,
            value: 0.7,
        }],
        vec![
            InputEvent::Key {
                key: Key(32),
                pressed: false,
                echo: false,
            },
            // The pad takes over jump in the same frame the key lifts.
            InputEvent::JoyButton {
                slot: 0,
                button: 0,
                pressed: true,
            },
        ],
        vec![],
    ];

    for (n, events) in frames.into_iter().enumerate() {
        for event in events {
            input.parse_input_event(event);
        }

        let jump = input.action_state("jump");
        println!(
            "frame {n}: jump pressed={} just_pressed={} just_released={} | throttle={}",
            jump.pressed,
            jump.just_pressed,
            jump.just_released,
            input.is_action_pressed("throttle"),
        );

        input.end_frame(1.0 / 60.0);
    }
}
