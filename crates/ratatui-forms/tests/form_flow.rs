use chrono::NaiveDate;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui_forms::input::key;
use ratatui_forms::input::InputEvent;
use ratatui_forms::input::KeyCode;
use ratatui_forms::input::KeyEvent;
use ratatui_forms::registry::register_builtins;
use ratatui_forms::registry::ControlAction;
use ratatui_forms::registry::FormValue;
use ratatui_forms::registry::Registry;

fn press(code: KeyCode) -> InputEvent {
    InputEvent::Key(KeyEvent::new(code))
}

#[test]
fn registry_driven_number_entry() {
    let mut registry = Registry::new();
    register_builtins(&mut registry);
    let mut control = registry.create("NumberInput").unwrap();

    for c in "1234".chars() {
        control.handle_event(InputEvent::Key(key(c)));
    }
    assert_eq!(control.value(), Some(FormValue::Number(1234.0)));
    assert!(control.is_complete());

    let mut buf = Buffer::empty(Rect::new(0, 0, 20, 1));
    control.render_ref(Rect::new(0, 0, 20, 1), &mut buf);
    let line: String = (0..20)
        .filter_map(|x| buf.cell((x, 0)).map(|c| c.symbol().to_string()))
        .collect();
    assert!(line.starts_with("1,234"));
    assert!(control.cursor_pos(Rect::new(0, 0, 20, 1)).is_some());
}

#[test]
fn registry_driven_masked_entry_reports_pending_state() {
    let mut registry = Registry::new();
    register_builtins(&mut registry);
    let mut control = registry.create("MaskedInput").unwrap();

    let action = control.handle_event(InputEvent::Key(key('1')));
    match action {
        ControlAction::Changed { value, complete } => {
            assert_eq!(value, Some(FormValue::Text("1".to_string())));
            assert!(!complete, "one digit of ten is pending");
        }
        other => panic!("unexpected action {other:?}"),
    }
    // A letter does not fit a digit slot and produces no action at all.
    assert_eq!(control.handle_event(InputEvent::Key(key('a'))), ControlAction::None);
}

#[test]
fn date_picker_full_flow_through_the_trait_object() {
    let mut registry = Registry::new();
    register_builtins(&mut registry);
    let mut control = registry.create("DatePicker").unwrap();

    for c in "20240520".chars() {
        control.handle_event(InputEvent::Key(key(c)));
    }
    assert_eq!(
        control.value(),
        Some(FormValue::Date(
            NaiveDate::from_ymd_opt(2024, 5, 20).unwrap()
        ))
    );

    // Open the calendar, move one day back, pick it.
    control.handle_event(press(KeyCode::Down));
    control.handle_event(press(KeyCode::Left));
    let action = control.handle_event(press(KeyCode::Enter));
    assert_eq!(
        action,
        ControlAction::Changed {
            value: Some(FormValue::Date(
                NaiveDate::from_ymd_opt(2024, 5, 19).unwrap()
            )),
            complete: true,
        }
    );
}

#[test]
fn every_builtin_renders_into_a_small_buffer() {
    let mut registry = Registry::new();
    register_builtins(&mut registry);
    let area = Rect::new(0, 0, 24, 10);
    for name in registry.names().map(str::to_string).collect::<Vec<_>>() {
        let mut control = registry.create(&name).unwrap();
        let mut buf = Buffer::empty(area);
        control.handle_event(press(KeyCode::Down));
        control.render_ref(area, &mut buf);
    }
}
