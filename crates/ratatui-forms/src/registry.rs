//! Name-to-widget registry.
//!
//! Hosts that build forms from declarative descriptions (a config file, a
//! schema) need a way to turn a widget name into a live control. The
//! registry is an explicit map from string identifier to factory, populated
//! once at startup; [`register_builtins`] binds every widget in this crate
//! under a fixed name. Registration is additive: a taken name is never
//! overwritten.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use chrono::NaiveTime;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui_forms_core::input::InputEvent;

use crate::calendar_popup::CalendarPopup;
use crate::date_picker::DatePicker;
use crate::date_range_picker::DateRangePicker;
use crate::masked_input::MaskedInput;
use crate::number_input::NumberInput;
use crate::select_input::SelectInput;
use crate::text_input::TextInput;
use crate::time_picker::TimePicker;

/// A validated widget value, as carried by [`ControlAction::Changed`].
#[derive(Clone, Debug, PartialEq)]
pub enum FormValue {
    Text(String),
    Number(f64),
    Date(NaiveDate),
    Time(NaiveTime),
    DateRange { start: NaiveDate, end: NaiveDate },
    Choice { index: usize, label: String },
}

/// Type-erased result of feeding one input event to a control.
///
/// `Changed` always carries the best value the control can produce right
/// now; `complete: false` flags a pending state (e.g. a half-filled mask)
/// rather than withholding the notification.
#[derive(Clone, Debug, PartialEq)]
pub enum ControlAction {
    None,
    Redraw,
    Changed {
        value: Option<FormValue>,
        complete: bool,
    },
    Submitted {
        value: Option<FormValue>,
    },
}

/// The contract every form widget satisfies for registry-driven hosts.
pub trait FormControl {
    fn handle_event(&mut self, event: InputEvent) -> ControlAction;
    fn render_ref(&mut self, area: Rect, buf: &mut Buffer);
    /// Caret position for text-entry controls; `None` for pickers.
    fn cursor_pos(&self, _area: Rect) -> Option<(u16, u16)> {
        None
    }
    fn value(&self) -> Option<FormValue>;
    fn is_complete(&self) -> bool;
}

pub type ControlFactory = Box<dyn Fn() -> Box<dyn FormControl>>;

#[derive(Default)]
pub struct Registry {
    factories: BTreeMap<String, ControlFactory>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `name` to `factory`. Returns `false` (and keeps the existing
    /// binding) when the name is already taken.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        factory: impl Fn() -> Box<dyn FormControl> + 'static,
    ) -> bool {
        let name = name.into();
        if self.factories.contains_key(&name) {
            return false;
        }
        self.factories.insert(name, Box::new(factory));
        true
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    pub fn create(&self, name: &str) -> Option<Box<dyn FormControl>> {
        self.factories.get(name).map(|f| f())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }
}

/// Binds every widget in this crate under its fixed name. The names are
/// stable API; adding widgets is additive and never renames.
pub fn register_builtins(registry: &mut Registry) {
    registry.register("TextInput", || Box::new(TextInput::new()));
    registry.register("MaskedInput", || Box::new(MaskedInput::default()));
    registry.register("NumberInput", || Box::new(NumberInput::default()));
    registry.register("DatePicker", || Box::new(DatePicker::default()));
    registry.register("CalendarPopup", || Box::new(CalendarPopup::default()));
    registry.register("DateRangePicker", || Box::new(DateRangePicker::default()));
    registry.register("TimePicker", || Box::new(TimePicker::default()));
    registry.register("SelectInput", || Box::new(SelectInput::default()));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtins_are_bound_under_fixed_names() {
        let mut registry = Registry::new();
        register_builtins(&mut registry);
        for name in [
            "MaskedInput",
            "NumberInput",
            "DatePicker",
            "CalendarPopup",
            "DateRangePicker",
            "TimePicker",
            "TextInput",
            "SelectInput",
        ] {
            assert!(registry.contains(name), "{name} missing");
            assert!(registry.create(name).is_some(), "{name} factory failed");
        }
    }

    #[test]
    fn registration_is_additive() {
        let mut registry = Registry::new();
        register_builtins(&mut registry);
        assert!(!registry.register("TextInput", || Box::new(TextInput::new())));
        assert!(registry.register("Custom", || Box::new(TextInput::new())));
        assert!(registry.contains("Custom"));
    }
}
