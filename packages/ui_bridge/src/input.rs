//! Engine-native input translated into the GUI library's event stream.
//!
//! The translator is a per-event classifier: no state of its own beyond the
//! per-frame caches owned by the [`Bridge`](crate::Bridge) (pending scroll,
//! embedded-viewport route). Each native event produces zero or more library
//! events and a consumed/not-consumed verdict for the host's input dispatch.

use crate::{
    platform::{
        CursorShape,
        GamepadAxis,
        GamepadButton,
        InputEvent,
        KeyModifiers,
        NativeKey,
        Platform,
        PointerButton,
    },
    ui::{
        UiContext,
        UiCursor,
        UiKey,
        UiMouseButton,
    },
    Bridge,
};
use vek::*;


/// Translate one native event. Returns whether the GUI library consumed it
/// (the host should stop propagating consumed events).
pub(crate) fn process(
    bridge: &mut Bridge,
    ui: &mut dyn UiContext,
    platform: &mut dyn Platform,
    event: &InputEvent,
) -> bool {
    let multi_windows = ui.config_flags().multi_windows;
    let window_origin = if multi_windows {
        platform.window_position()
    } else {
        Vec2::zero()
    };

    // an active embedded render target gets its own remapped copy of every
    // event, on top of normal translation
    if let Some(route) = bridge.sub_viewport {
        let target_size = platform.sub_viewport_size(route.target);
        let mut routed = event.clone();
        match &mut routed {
            InputEvent::PointerMotion { position, global_position } |
            InputEvent::PointerButton { position, global_position, .. } => {
                let local = *global_position - window_origin - route.origin;
                *position = Vec2 {
                    x: local.x.clamp(0.0, target_size.w),
                    y: local.y.clamp(0.0, target_size.h),
                };
            }
            _ => (),
        }
        if !platform.push_sub_viewport_input(route.target, &routed) {
            platform.push_sub_viewport_unhandled_input(route.target, &routed);
        }
    }

    match *event {
        InputEvent::PointerMotion { position, global_position } => {
            if multi_windows {
                // the library resolves which platform window is targeted,
                // which takes desktop coordinates
                ui.add_mouse_pos_event(global_position);
            } else {
                ui.add_mouse_pos_event(position);
            }
            ui.want_capture_mouse()
        }
        InputEvent::PointerButton { button, pressed, factor, .. } => {
            match button {
                PointerButton::Left => {
                    ui.add_mouse_button_event(UiMouseButton::Left, pressed);
                }
                PointerButton::Right => {
                    ui.add_mouse_button_event(UiMouseButton::Right, pressed);
                }
                PointerButton::Middle => {
                    ui.add_mouse_button_event(UiMouseButton::Middle, pressed);
                }
                PointerButton::Extra1 => {
                    ui.add_mouse_button_event(UiMouseButton::Extra1, pressed);
                }
                PointerButton::Extra2 => {
                    ui.add_mouse_button_event(UiMouseButton::Extra2, pressed);
                }
                // wheel directions are scroll, not buttons; positive y is
                // "scroll content up"
                PointerButton::WheelUp => bridge.pending_scroll.y = factor,
                PointerButton::WheelDown => bridge.pending_scroll.y = -factor,
                PointerButton::WheelLeft => bridge.pending_scroll.x = -factor,
                PointerButton::WheelRight => bridge.pending_scroll.x = factor,
            }
            ui.want_capture_mouse()
        }
        InputEvent::Key { key, pressed, codepoint } => {
            // held modifiers must stay correct across key repeat and focus
            // changes, so poll them instead of trusting the event
            sync_key_mods(ui, platform.modifiers());
            if let Some(ui_key) = map_key(key) {
                ui.add_key_event(ui_key, pressed);
                if pressed && ui.want_text_input() {
                    if let Some(c) = codepoint.filter(|&c| c != '\0') {
                        ui.add_input_character(c);
                    }
                }
            } else {
                trace!(?key, "no ui mapping for key");
            }
            ui.want_capture_keyboard() || ui.want_text_input()
        }
        InputEvent::PanGesture { delta } => {
            bridge.pending_scroll = -delta;
            ui.want_capture_mouse()
        }
        InputEvent::GamepadButton { button, pressed } => {
            if !ui.config_flags().gamepad_nav {
                return false;
            }
            match map_gamepad_button(button, bridge.settings.joy_button_swap_ab) {
                Some(ui_key) => {
                    ui.add_key_event(ui_key, pressed);
                    true
                }
                None => false,
            }
        }
        InputEvent::GamepadAxis { axis, value } => {
            if !ui.config_flags().gamepad_nav {
                return false;
            }
            let (pressed, value) =
                apply_dead_zone(value, bridge.settings.joy_axis_dead_zone);
            ui.add_key_analog_event(map_gamepad_axis(axis), pressed, value);
            true
        }
    }
}

pub(crate) fn sync_key_mods(ui: &mut dyn UiContext, mods: KeyModifiers) {
    ui.add_key_event(UiKey::ModCtrl, mods.ctrl);
    ui.add_key_event(UiKey::ModShift, mods.shift);
    ui.add_key_event(UiKey::ModAlt, mods.alt);
    ui.add_key_event(UiKey::ModSuper, mods.super_key);
}

/// Analog values inside the dead zone read as released with zero magnitude,
/// so stick drift never registers as sustained input.
pub(crate) fn apply_dead_zone(value: f32, dead_zone: f32) -> (bool, f32) {
    if value.abs() < dead_zone {
        (false, 0.0)
    } else {
        (true, value)
    }
}

pub(crate) fn map_cursor(cursor: UiCursor) -> CursorShape {
    match cursor {
        UiCursor::Arrow => CursorShape::Arrow,
        UiCursor::TextInput => CursorShape::IBeam,
        UiCursor::ResizeAll => CursorShape::Move,
        UiCursor::ResizeNS => CursorShape::VSize,
        UiCursor::ResizeEW => CursorShape::HSize,
        UiCursor::ResizeNESW => CursorShape::BDiagSize,
        UiCursor::ResizeNWSE => CursorShape::FDiagSize,
        UiCursor::Hand => CursorShape::PointingHand,
        UiCursor::NotAllowed => CursorShape::Forbidden,
        _ => CursorShape::Arrow,
    }
}

pub(crate) fn map_gamepad_button(
    button: GamepadButton,
    swap_ab: bool,
) -> Option<UiKey> {
    Some(match button {
        GamepadButton::Start => UiKey::GamepadStart,
        GamepadButton::Back => UiKey::GamepadBack,
        GamepadButton::FaceUp => UiKey::GamepadFaceUp,
        GamepadButton::FaceDown => if swap_ab {
            UiKey::GamepadFaceRight
        } else {
            UiKey::GamepadFaceDown
        },
        GamepadButton::FaceLeft => UiKey::GamepadFaceLeft,
        GamepadButton::FaceRight => if swap_ab {
            UiKey::GamepadFaceDown
        } else {
            UiKey::GamepadFaceRight
        },
        GamepadButton::DpadUp => UiKey::GamepadDpadUp,
        GamepadButton::DpadDown => UiKey::GamepadDpadDown,
        GamepadButton::DpadLeft => UiKey::GamepadDpadLeft,
        GamepadButton::DpadRight => UiKey::GamepadDpadRight,
        GamepadButton::LeftShoulder => UiKey::GamepadL1,
        GamepadButton::RightShoulder => UiKey::GamepadR1,
        GamepadButton::LeftStick => UiKey::GamepadL3,
        GamepadButton::RightStick => UiKey::GamepadR3,
        _ => return None,
    })
}

pub(crate) fn map_gamepad_axis(axis: GamepadAxis) -> UiKey {
    match axis {
        GamepadAxis::LeftX => UiKey::GamepadLStickRight,
        GamepadAxis::LeftY => UiKey::GamepadLStickDown,
        GamepadAxis::RightX => UiKey::GamepadRStickRight,
        GamepadAxis::RightY => UiKey::GamepadRStickDown,
        GamepadAxis::TriggerLeft => UiKey::GamepadL2,
        GamepadAxis::TriggerRight => UiKey::GamepadR2,
    }
}

pub(crate) fn map_key(key: NativeKey) -> Option<UiKey> {
    Some(match key {
        NativeKey::Tab => UiKey::Tab,
        NativeKey::Left => UiKey::LeftArrow,
        NativeKey::Right => UiKey::RightArrow,
        NativeKey::Up => UiKey::UpArrow,
        NativeKey::Down => UiKey::DownArrow,
        NativeKey::PageUp => UiKey::PageUp,
        NativeKey::PageDown => UiKey::PageDown,
        NativeKey::Home => UiKey::Home,
        NativeKey::End => UiKey::End,
        NativeKey::Insert => UiKey::Insert,
        NativeKey::Delete => UiKey::Delete,
        NativeKey::Backspace => UiKey::Backspace,
        NativeKey::Space => UiKey::Space,
        NativeKey::Enter => UiKey::Enter,
        NativeKey::Escape => UiKey::Escape,
        NativeKey::Ctrl => UiKey::LeftCtrl,
        NativeKey::Shift => UiKey::LeftShift,
        NativeKey::Alt => UiKey::LeftAlt,
        NativeKey::SuperL => UiKey::LeftSuper,
        NativeKey::SuperR => UiKey::RightSuper,
        NativeKey::Menu => UiKey::Menu,
        NativeKey::Key0 => UiKey::Num0,
        NativeKey::Key1 => UiKey::Num1,
        NativeKey::Key2 => UiKey::Num2,
        NativeKey::Key3 => UiKey::Num3,
        NativeKey::Key4 => UiKey::Num4,
        NativeKey::Key5 => UiKey::Num5,
        NativeKey::Key6 => UiKey::Num6,
        NativeKey::Key7 => UiKey::Num7,
        NativeKey::Key8 => UiKey::Num8,
        NativeKey::Key9 => UiKey::Num9,
        NativeKey::Apostrophe => UiKey::Apostrophe,
        NativeKey::Comma => UiKey::Comma,
        NativeKey::Minus => UiKey::Minus,
        NativeKey::Period => UiKey::Period,
        NativeKey::Slash => UiKey::Slash,
        NativeKey::Semicolon => UiKey::Semicolon,
        NativeKey::Equal => UiKey::Equal,
        NativeKey::BracketLeft => UiKey::LeftBracket,
        NativeKey::Backslash => UiKey::Backslash,
        NativeKey::BracketRight => UiKey::RightBracket,
        NativeKey::QuoteLeft => UiKey::GraveAccent,
        NativeKey::CapsLock => UiKey::CapsLock,
        NativeKey::ScrollLock => UiKey::ScrollLock,
        NativeKey::NumLock => UiKey::NumLock,
        NativeKey::Print => UiKey::PrintScreen,
        NativeKey::Pause => UiKey::Pause,
        NativeKey::Kp0 => UiKey::Keypad0,
        NativeKey::Kp1 => UiKey::Keypad1,
        NativeKey::Kp2 => UiKey::Keypad2,
        NativeKey::Kp3 => UiKey::Keypad3,
        NativeKey::Kp4 => UiKey::Keypad4,
        NativeKey::Kp5 => UiKey::Keypad5,
        NativeKey::Kp6 => UiKey::Keypad6,
        NativeKey::Kp7 => UiKey::Keypad7,
        NativeKey::Kp8 => UiKey::Keypad8,
        NativeKey::Kp9 => UiKey::Keypad9,
        NativeKey::KpPeriod => UiKey::KeypadDecimal,
        NativeKey::KpDivide => UiKey::KeypadDivide,
        NativeKey::KpMultiply => UiKey::KeypadMultiply,
        NativeKey::KpSubtract => UiKey::KeypadSubtract,
        NativeKey::KpAdd => UiKey::KeypadAdd,
        NativeKey::KpEnter => UiKey::KeypadEnter,
        NativeKey::A => UiKey::A,
        NativeKey::B => UiKey::B,
        NativeKey::C => UiKey::C,
        NativeKey::D => UiKey::D,
        NativeKey::E => UiKey::E,
        NativeKey::F => UiKey::F,
        NativeKey::G => UiKey::G,
        NativeKey::H => UiKey::H,
        NativeKey::I => UiKey::I,
        NativeKey::J => UiKey::J,
        NativeKey::K => UiKey::K,
        NativeKey::L => UiKey::L,
        NativeKey::M => UiKey::M,
        NativeKey::N => UiKey::N,
        NativeKey::O => UiKey::O,
        NativeKey::P => UiKey::P,
        NativeKey::Q => UiKey::Q,
        NativeKey::R => UiKey::R,
        NativeKey::S => UiKey::S,
        NativeKey::T => UiKey::T,
        NativeKey::U => UiKey::U,
        NativeKey::V => UiKey::V,
        NativeKey::W => UiKey::W,
        NativeKey::X => UiKey::X,
        NativeKey::Y => UiKey::Y,
        NativeKey::Z => UiKey::Z,
        NativeKey::F1 => UiKey::F1,
        NativeKey::F2 => UiKey::F2,
        NativeKey::F3 => UiKey::F3,
        NativeKey::F4 => UiKey::F4,
        NativeKey::F5 => UiKey::F5,
        NativeKey::F6 => UiKey::F6,
        NativeKey::F7 => UiKey::F7,
        NativeKey::F8 => UiKey::F8,
        NativeKey::F9 => UiKey::F9,
        NativeKey::F10 => UiKey::F10,
        NativeKey::F11 => UiKey::F11,
        NativeKey::F12 => UiKey::F12,
        _ => return None,
    })
}


#[cfg(test)]
use crate::{
    settings::Settings,
    test_fakes::{
        FakePlatform,
        FakeRenderer,
        FakeUi,
        UiEventRecord,
    },
    platform::SubViewportId,
};

#[cfg(test)]
fn test_bridge() -> Bridge {
    Bridge::new(Box::new(FakeRenderer::new()), Settings::default())
}

#[cfg(test)]
fn motion(global: Vec2<f32>) -> InputEvent {
    InputEvent::PointerMotion {
        position: global,
        global_position: global,
    }
}

#[cfg(test)]
fn wheel(button: PointerButton, factor: f32) -> InputEvent {
    InputEvent::PointerButton {
        button,
        pressed: true,
        factor,
        position: Vec2::zero(),
        global_position: Vec2::zero(),
    }
}

#[test]
fn test_one_scroll_event_per_frame_last_wins() {
    let mut bridge = test_bridge();
    let mut ui = FakeUi::new();
    let mut platform = FakePlatform::new();

    bridge.process_input(&mut ui, &mut platform, &wheel(PointerButton::WheelUp, 1.0));
    bridge.process_input(&mut ui, &mut platform, &wheel(PointerButton::WheelUp, 2.5));
    bridge.process_input(&mut ui, &mut platform, &wheel(PointerButton::WheelDown, 0.5));

    bridge.begin_frame(&mut ui, &mut platform, 0.016, Extent2::new(640.0, 480.0));

    let wheels: Vec<_> = ui
        .events
        .iter()
        .filter_map(|event| match event {
            &UiEventRecord::MouseWheel(delta) => Some(delta),
            _ => None,
        })
        .collect();
    assert_eq!(wheels, vec![Vec2::new(0.0, -0.5)]);
}

#[test]
fn test_wheel_axis_signs() {
    let mut bridge = test_bridge();
    let mut ui = FakeUi::new();
    let mut platform = FakePlatform::new();

    bridge.process_input(&mut ui, &mut platform, &wheel(PointerButton::WheelLeft, 2.0));
    assert_eq!(bridge.pending_scroll, Vec2::new(-2.0, 0.0));
    bridge.process_input(&mut ui, &mut platform, &wheel(PointerButton::WheelRight, 3.0));
    assert_eq!(bridge.pending_scroll, Vec2::new(3.0, 0.0));
    bridge.process_input(&mut ui, &mut platform, &wheel(PointerButton::WheelUp, 1.5));
    assert_eq!(bridge.pending_scroll, Vec2::new(3.0, 1.5));
}

#[test]
fn test_pan_gesture_inverts_both_axes() {
    let mut bridge = test_bridge();
    let mut ui = FakeUi::new();
    let mut platform = FakePlatform::new();

    let consumed = bridge.process_input(
        &mut ui,
        &mut platform,
        &InputEvent::PanGesture { delta: Vec2::new(3.0, -4.0) },
    );
    assert_eq!(bridge.pending_scroll, Vec2::new(-3.0, 4.0));
    assert!(!consumed);

    ui.want_capture_mouse = true;
    let consumed = bridge.process_input(
        &mut ui,
        &mut platform,
        &InputEvent::PanGesture { delta: Vec2::new(1.0, 0.0) },
    );
    assert!(consumed);
}

#[test]
fn test_dead_zone_boundary() {
    assert_eq!(apply_dead_zone(0.19, 0.2), (false, 0.0));
    assert_eq!(apply_dead_zone(-0.19, 0.2), (false, 0.0));
    assert_eq!(apply_dead_zone(0.2, 0.2), (true, 0.2));
    assert_eq!(apply_dead_zone(-0.2, 0.2), (true, -0.2));
    assert_eq!(apply_dead_zone(0.9, 0.2), (true, 0.9));
}

#[test]
fn test_dead_zone_filters_axis_events() {
    let mut bridge = test_bridge();
    bridge.settings.joy_axis_dead_zone = 0.2;
    let mut ui = FakeUi::new();
    ui.config_flags.gamepad_nav = true;
    let mut platform = FakePlatform::new();

    bridge.process_input(
        &mut ui,
        &mut platform,
        &InputEvent::GamepadAxis { axis: GamepadAxis::LeftX, value: 0.1 },
    );
    bridge.process_input(
        &mut ui,
        &mut platform,
        &InputEvent::GamepadAxis { axis: GamepadAxis::LeftX, value: 0.6 },
    );
    assert_eq!(
        ui.events,
        vec![
            UiEventRecord::KeyAnalog(UiKey::GamepadLStickRight, false, 0.0),
            UiEventRecord::KeyAnalog(UiKey::GamepadLStickRight, true, 0.6),
        ],
    );
}

#[test]
fn test_ab_swap_changes_only_face_buttons() {
    for button in [
        GamepadButton::Start,
        GamepadButton::Back,
        GamepadButton::FaceUp,
        GamepadButton::FaceLeft,
        GamepadButton::DpadUp,
        GamepadButton::DpadDown,
        GamepadButton::DpadLeft,
        GamepadButton::DpadRight,
        GamepadButton::LeftShoulder,
        GamepadButton::RightShoulder,
        GamepadButton::LeftStick,
        GamepadButton::RightStick,
    ] {
        assert_eq!(
            map_gamepad_button(button, false),
            map_gamepad_button(button, true),
        );
    }
    assert_eq!(
        map_gamepad_button(GamepadButton::FaceDown, false),
        Some(UiKey::GamepadFaceDown),
    );
    assert_eq!(
        map_gamepad_button(GamepadButton::FaceDown, true),
        Some(UiKey::GamepadFaceRight),
    );
    assert_eq!(
        map_gamepad_button(GamepadButton::FaceRight, false),
        Some(UiKey::GamepadFaceRight),
    );
    assert_eq!(
        map_gamepad_button(GamepadButton::FaceRight, true),
        Some(UiKey::GamepadFaceDown),
    );
    assert_eq!(map_gamepad_button(GamepadButton::Guide, false), None);
}

#[test]
fn test_gamepad_ignored_without_nav_flag() {
    let mut bridge = test_bridge();
    let mut ui = FakeUi::new();
    let mut platform = FakePlatform::new();

    let consumed = bridge.process_input(
        &mut ui,
        &mut platform,
        &InputEvent::GamepadButton { button: GamepadButton::FaceDown, pressed: true },
    );
    assert!(!consumed);
    assert!(ui.events.is_empty());
}

#[test]
fn test_modifier_sync_precedes_key() {
    let mut bridge = test_bridge();
    let mut ui = FakeUi::new();
    let mut platform = FakePlatform::new();
    platform.modifiers = KeyModifiers { ctrl: true, ..Default::default() };

    bridge.process_input(
        &mut ui,
        &mut platform,
        &InputEvent::Key { key: NativeKey::A, pressed: true, codepoint: None },
    );
    assert_eq!(
        ui.events,
        vec![
            UiEventRecord::Key(UiKey::ModCtrl, true),
            UiEventRecord::Key(UiKey::ModShift, false),
            UiEventRecord::Key(UiKey::ModAlt, false),
            UiEventRecord::Key(UiKey::ModSuper, false),
            UiEventRecord::Key(UiKey::A, true),
        ],
    );
}

#[test]
fn test_unmapped_key_dropped_but_mods_synced() {
    let mut bridge = test_bridge();
    let mut ui = FakeUi::new();
    let mut platform = FakePlatform::new();

    let consumed = bridge.process_input(
        &mut ui,
        &mut platform,
        &InputEvent::Key {
            key: NativeKey::VolumeUp,
            pressed: true,
            codepoint: None,
        },
    );
    assert!(!consumed);
    // modifier sync still happened, nothing else did
    assert_eq!(ui.events.len(), 4);
    assert!(ui.events.iter().all(|event| matches!(
        event,
        UiEventRecord::Key(
            UiKey::ModCtrl | UiKey::ModShift | UiKey::ModAlt | UiKey::ModSuper,
            _,
        ),
    )));
}

#[test]
fn test_text_input_needs_press_codepoint_and_interest() {
    let mut bridge = test_bridge();
    let mut ui = FakeUi::new();
    let mut platform = FakePlatform::new();

    let key = |pressed, codepoint| InputEvent::Key {
        key: NativeKey::X,
        pressed,
        codepoint,
    };

    // library not interested
    bridge.process_input(&mut ui, &mut platform, &key(true, Some('x')));
    assert!(!ui.events.contains(&UiEventRecord::Character('x')));

    ui.want_text_input = true;
    // release transition
    bridge.process_input(&mut ui, &mut platform, &key(false, Some('x')));
    assert!(!ui.events.contains(&UiEventRecord::Character('x')));
    // no codepoint
    bridge.process_input(&mut ui, &mut platform, &key(true, None));
    assert!(!ui.events.contains(&UiEventRecord::Character('x')));

    let consumed = bridge.process_input(&mut ui, &mut platform, &key(true, Some('x')));
    assert!(ui.events.contains(&UiEventRecord::Character('x')));
    assert!(consumed);
}

#[test]
fn test_pointer_motion_coordinates_by_mode() {
    let mut bridge = test_bridge();
    let mut ui = FakeUi::new();
    let mut platform = FakePlatform::new();

    let event = InputEvent::PointerMotion {
        position: Vec2::new(10.0, 20.0),
        global_position: Vec2::new(110.0, 220.0),
    };

    let consumed = bridge.process_input(&mut ui, &mut platform, &event);
    assert_eq!(
        ui.events,
        vec![UiEventRecord::MousePos(Vec2::new(10.0, 20.0))],
    );
    assert!(!consumed);

    ui.events.clear();
    ui.config_flags.multi_windows = true;
    ui.want_capture_mouse = true;
    let consumed = bridge.process_input(&mut ui, &mut platform, &event);
    assert_eq!(
        ui.events,
        vec![UiEventRecord::MousePos(Vec2::new(110.0, 220.0))],
    );
    assert!(consumed);
}

#[test]
fn test_mouse_buttons_map_directly() {
    let mut bridge = test_bridge();
    let mut ui = FakeUi::new();
    let mut platform = FakePlatform::new();

    for (native, expected) in [
        (PointerButton::Left, UiMouseButton::Left),
        (PointerButton::Right, UiMouseButton::Right),
        (PointerButton::Middle, UiMouseButton::Middle),
        (PointerButton::Extra1, UiMouseButton::Extra1),
        (PointerButton::Extra2, UiMouseButton::Extra2),
    ] {
        ui.events.clear();
        bridge.process_input(
            &mut ui,
            &mut platform,
            &InputEvent::PointerButton {
                button: native,
                pressed: true,
                factor: 1.0,
                position: Vec2::zero(),
                global_position: Vec2::zero(),
            },
        );
        assert_eq!(ui.events, vec![UiEventRecord::MouseButton(expected, true)]);
    }
}

#[test]
fn test_sub_viewport_remap_and_clamp() {
    let mut bridge = test_bridge();
    let mut ui = FakeUi::new();
    ui.config_flags.multi_windows = true;
    let mut platform = FakePlatform::new();
    platform.window_position = Vec2::new(100.0, 50.0);
    platform.sub_viewport_size = Extent2::new(200.0, 100.0);

    let target = SubViewportId(7);
    bridge.set_sub_viewport(target, Vec2::new(10.0, 5.0));

    bridge.process_input(&mut ui, &mut platform, &motion(Vec2::new(150.0, 75.0)));
    let (routed_target, routed) = platform.routed.last().unwrap().clone();
    assert_eq!(routed_target, target);
    assert_eq!(
        routed,
        InputEvent::PointerMotion {
            position: Vec2::new(40.0, 20.0),
            global_position: Vec2::new(150.0, 75.0),
        },
    );

    // outside the target's bounds clamps into them
    bridge.process_input(&mut ui, &mut platform, &motion(Vec2::new(900.0, 0.0)));
    let (_, routed) = platform.routed.last().unwrap().clone();
    match routed {
        InputEvent::PointerMotion { position, .. } => {
            assert_eq!(position, Vec2::new(200.0, 0.0));
        }
        _ => panic!("expected pointer motion"),
    }
}

#[test]
fn test_sub_viewport_unhandled_fallback_and_additivity() {
    let mut bridge = test_bridge();
    let mut ui = FakeUi::new();
    let mut platform = FakePlatform::new();
    platform.sub_viewport_size = Extent2::new(100.0, 100.0);

    let target = SubViewportId(3);
    bridge.set_sub_viewport(target, Vec2::zero());

    platform.sub_viewport_handled = false;
    bridge.process_input(&mut ui, &mut platform, &motion(Vec2::new(5.0, 5.0)));
    assert_eq!(platform.routed.len(), 1);
    assert_eq!(platform.routed_unhandled.len(), 1);
    // routing is additive: top-level translation still happened
    assert_eq!(ui.events.len(), 1);

    platform.sub_viewport_handled = true;
    bridge.process_input(&mut ui, &mut platform, &motion(Vec2::new(6.0, 6.0)));
    assert_eq!(platform.routed.len(), 2);
    assert_eq!(platform.routed_unhandled.len(), 1);

    // non-pointer events are routed too, without remapping
    bridge.process_input(
        &mut ui,
        &mut platform,
        &InputEvent::Key { key: NativeKey::A, pressed: true, codepoint: None },
    );
    assert_eq!(platform.routed.len(), 3);
}
