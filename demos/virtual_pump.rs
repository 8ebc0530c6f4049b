//! Pump a scripted source through the facade and watch the listener bus.
//!
//! Run with `RUST_LOG=debug cargo run --example virtual_pump` to see the
//! DebugLogger echo every dispatched event.

use glam::Vec2;
use switchboard::{
    DebugLogger, EventFilter, Input, InputEvent, Key, MouseButton, VirtualSource,
};

fn main() {
    env_logger::init();

    let mut input = Input::new();
    input.add_listener(DebugLogger::new(), EventFilter::All, None);

    let mut source = VirtualSource::new("script");
    source.press_key(Key(87));
    source.feed_all([
        InputEvent::MouseMotion {
            position: Vec2::new(320.0, 240.0),
            relative: Vec2::new(12.0, -3.0),
        },
        InputEvent::MouseButton {
            button: MouseButton::Left,
            pressed: true,
            position: Vec2::new(320.0, 240.0),
        },
    ]);

    let dispatched = input.pump(&mut source);
    println!("dispatched {dispatched} event(s)");

    println!(
        "W held: {}, left click edge: {}, cursor at {:?}",
        input.is_key_pressed(Key(87)),
        input.is_mouse_button_just_pressed(MouseButton::Left),
        input.mouse_position(),
    );

    input.end_frame(1.0 / 60.0);
    println!(
        "after the frame boundary the edge is gone: {}",
        input.is_mouse_button_just_pressed(MouseButton::Left),
    );
    println!("mouse speed last frame: {:?}", input.last_mouse_speed());
}
