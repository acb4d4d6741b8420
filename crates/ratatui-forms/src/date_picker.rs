use chrono::Datelike;
use chrono::NaiveDate;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui_forms_core::calendar::Selection;
use ratatui_forms_core::input::InputEvent;
use ratatui_forms_core::input::KeyCode;
use ratatui_forms_core::mask::MaskDescriptor;
use ratatui_forms_core::popup;
use ratatui_forms_core::popup::PopupState;

use crate::calendar_popup;
use crate::calendar_popup::CalendarAction;
use crate::calendar_popup::CalendarPopup;
use crate::calendar_popup::CalendarPopupOptions;
use crate::masked_input::MaskedInput;
use crate::masked_input::MaskedInputAction;
use crate::masked_input::MaskedInputOptions;
use crate::registry::ControlAction;
use crate::registry::FormControl;
use crate::registry::FormValue;

/// Field ordering of the typed date. The separator is configurable; the
/// digit layout follows the order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DateOrder {
    #[default]
    YearMonthDay,
    DayMonthYear,
    MonthDayYear,
}

impl DateOrder {
    pub fn descriptor(self, separator: char) -> String {
        match self {
            DateOrder::YearMonthDay => format!("####{separator}##{separator}##"),
            DateOrder::DayMonthYear | DateOrder::MonthDayYear => {
                format!("##{separator}##{separator}####")
            }
        }
    }

    /// Interprets the mask's stored digits (no separators) as a date.
    /// Returns `None` for impossible dates like `2024-02-31`.
    pub fn date_from_digits(self, digits: &str) -> Option<NaiveDate> {
        if digits.len() != 8 || !digits.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        let num = |s: &str| s.parse::<u32>().ok();
        let (year, month, day) = match self {
            DateOrder::YearMonthDay => (num(&digits[0..4])?, num(&digits[4..6])?, num(&digits[6..8])?),
            DateOrder::DayMonthYear => (num(&digits[4..8])?, num(&digits[2..4])?, num(&digits[0..2])?),
            DateOrder::MonthDayYear => (num(&digits[4..8])?, num(&digits[0..2])?, num(&digits[2..4])?),
        };
        NaiveDate::from_ymd_opt(year as i32, month, day)
    }

    pub fn digits_from_date(self, date: NaiveDate) -> String {
        match self {
            DateOrder::YearMonthDay => {
                format!("{:04}{:02}{:02}", date.year(), date.month(), date.day())
            }
            DateOrder::DayMonthYear => {
                format!("{:02}{:02}{:04}", date.day(), date.month(), date.year())
            }
            DateOrder::MonthDayYear => {
                format!("{:02}{:02}{:04}", date.month(), date.day(), date.year())
            }
        }
    }

    pub fn display(self, date: NaiveDate, separator: char) -> String {
        match self {
            DateOrder::YearMonthDay => format!(
                "{:04}{separator}{:02}{separator}{:02}",
                date.year(),
                date.month(),
                date.day()
            ),
            DateOrder::DayMonthYear => format!(
                "{:02}{separator}{:02}{separator}{:04}",
                date.day(),
                date.month(),
                date.year()
            ),
            DateOrder::MonthDayYear => format!(
                "{:02}{separator}{:02}{separator}{:04}",
                date.month(),
                date.day(),
                date.year()
            ),
        }
    }
}

#[derive(Clone, Debug)]
pub struct DatePickerOptions {
    pub order: DateOrder,
    pub separator: char,
    /// Close the popup as soon as a date is picked.
    pub auto_close: bool,
    pub field: MaskedInputOptions,
    pub calendar: CalendarPopupOptions,
}

impl Default for DatePickerOptions {
    fn default() -> Self {
        Self {
            order: DateOrder::default(),
            separator: '-',
            auto_close: true,
            field: MaskedInputOptions::default(),
            calendar: CalendarPopupOptions::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DatePickerAction {
    None,
    Redraw,
    Changed {
        date: Option<NaiveDate>,
        complete: bool,
    },
    Submitted(Option<NaiveDate>),
}

/// A masked date field with a calendar popup. Typing a complete valid date
/// moves the calendar; picking from the calendar fills the field.
#[derive(Clone, Debug)]
pub struct DatePicker {
    field: MaskedInput,
    calendar: CalendarPopup,
    popup: PopupState,
    options: DatePickerOptions,
}

impl Default for DatePicker {
    fn default() -> Self {
        Self::new(DatePickerOptions::default())
    }
}

impl DatePicker {
    pub fn new(options: DatePickerOptions) -> Self {
        let descriptor = options.order.descriptor(options.separator);
        // The generated descriptor is always well-formed.
        let mask =
            MaskDescriptor::parse(&descriptor).unwrap_or_else(|_| MaskDescriptor::digits(8));
        Self {
            field: MaskedInput::with_options(mask, options.field.clone()),
            calendar: CalendarPopup::new().with_options(options.calendar.clone()),
            popup: PopupState::new(),
            options,
        }
    }

    pub fn is_open(&self) -> bool {
        self.popup.is_open()
    }

    /// The typed date, clamped into the calendar's selectable range.
    pub fn value(&self) -> Option<NaiveDate> {
        let date = self
            .field
            .is_complete()
            .then(|| self.options.order.date_from_digits(&self.field.raw()))
            .flatten()?;
        let date = match self.options.calendar.min {
            Some(min) if date < min => min,
            _ => date,
        };
        let date = match self.options.calendar.max {
            Some(max) if date > max => max,
            _ => date,
        };
        Some(date)
    }

    pub fn set_value(&mut self, date: NaiveDate) {
        self.field
            .set_text(&self.options.order.digits_from_date(date));
        self.calendar.set_cursor(date);
        self.calendar.set_selection(Selection::Single(date));
    }

    pub fn clear(&mut self) {
        self.field.clear();
        self.calendar.set_selection(Selection::None);
    }

    pub fn formatted(&self) -> String {
        self.field.formatted()
    }

    pub fn handle_event(&mut self, event: InputEvent) -> DatePickerAction {
        if self.popup.is_open() {
            if self.popup.handle_dismiss(&event) {
                return DatePickerAction::Redraw;
            }
            return match self.calendar.handle_event(event) {
                CalendarAction::Picked(date) => {
                    self.field
                        .set_text(&self.options.order.digits_from_date(date));
                    if self.options.auto_close {
                        self.popup.close();
                    }
                    DatePickerAction::Changed {
                        date: Some(date),
                        complete: true,
                    }
                }
                CalendarAction::Redraw => DatePickerAction::Redraw,
                CalendarAction::None => DatePickerAction::None,
            };
        }

        if let InputEvent::Key(key) = &event {
            if key.code == KeyCode::Down {
                self.open_popup();
                return DatePickerAction::Redraw;
            }
        }
        if let InputEvent::Mouse(m) = &event {
            if m.is_left_down() {
                if popup::contains(self.popup.anchor(), m.x, m.y) {
                    self.open_popup();
                    return DatePickerAction::Redraw;
                }
                return DatePickerAction::None;
            }
        }

        match self.field.input(event) {
            MaskedInputAction::None => DatePickerAction::None,
            MaskedInputAction::Changed(_) => {
                let date = self.value();
                if let Some(d) = date {
                    self.calendar.set_cursor(d);
                    self.calendar.set_selection(Selection::Single(d));
                }
                DatePickerAction::Changed {
                    complete: date.is_some(),
                    date,
                }
            }
            MaskedInputAction::Submitted(_) => DatePickerAction::Submitted(self.value()),
        }
    }

    pub fn render_ref(&mut self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let anchor = Rect::new(area.x, area.y, area.width, 1);
        self.popup.set_anchor(anchor);
        self.field.render_ref(anchor, buf);

        if self.popup.is_open() && area.height > 1 {
            let overlay = Rect::new(
                area.x,
                area.y + 1,
                calendar_popup::GRID_WIDTH.min(area.width),
                calendar_popup::GRID_HEIGHT.min(area.height - 1),
            );
            self.popup.set_overlay(overlay);
            let selection = match self.value() {
                Some(d) => Selection::Single(d),
                None => Selection::None,
            };
            self.calendar.render_with(overlay, buf, &selection);
        }
    }

    pub fn cursor_pos(&self, area: Rect) -> Option<(u16, u16)> {
        if self.popup.is_open() {
            return None;
        }
        self.field
            .cursor_pos(Rect::new(area.x, area.y, area.width, 1.min(area.height)))
    }

    fn open_popup(&mut self) {
        if let Some(date) = self.value() {
            self.calendar.set_cursor(date);
            self.calendar.set_selection(Selection::Single(date));
        }
        self.popup.open();
    }
}

impl FormControl for DatePicker {
    fn handle_event(&mut self, event: InputEvent) -> ControlAction {
        match DatePicker::handle_event(self, event) {
            DatePickerAction::None => ControlAction::None,
            DatePickerAction::Redraw => ControlAction::Redraw,
            DatePickerAction::Changed { date, complete } => ControlAction::Changed {
                value: date.map(FormValue::Date),
                complete,
            },
            DatePickerAction::Submitted(date) => ControlAction::Submitted {
                value: date.map(FormValue::Date),
            },
        }
    }

    fn render_ref(&mut self, area: Rect, buf: &mut Buffer) {
        DatePicker::render_ref(self, area, buf);
    }

    fn cursor_pos(&self, area: Rect) -> Option<(u16, u16)> {
        DatePicker::cursor_pos(self, area)
    }

    fn value(&self) -> Option<FormValue> {
        DatePicker::value(self).map(FormValue::Date)
    }

    fn is_complete(&self) -> bool {
        DatePicker::value(self).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui_forms_core::input::key;
    use ratatui_forms_core::input::KeyEvent;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn typing_a_full_date_completes() {
        let mut picker = DatePicker::default();
        for c in "20240520".chars() {
            picker.handle_event(InputEvent::Key(key(c)));
        }
        assert_eq!(picker.formatted(), "2024-05-20");
        assert_eq!(picker.value(), Some(date(2024, 5, 20)));
    }

    #[test]
    fn impossible_dates_stay_incomplete() {
        let mut picker = DatePicker::default();
        for c in "20240231".chars() {
            picker.handle_event(InputEvent::Key(key(c)));
        }
        assert_eq!(picker.value(), None);
        match picker.handle_event(InputEvent::Key(KeyEvent::new(KeyCode::Backspace))) {
            DatePickerAction::Changed { date, complete } => {
                assert_eq!(date, None);
                assert!(!complete);
            }
            other => panic!("unexpected action {other:?}"),
        }
    }

    #[test]
    fn popup_pick_fills_the_field() {
        let mut picker = DatePicker::default();
        picker.set_value(date(2024, 5, 20));
        picker.handle_event(InputEvent::Key(KeyEvent::new(KeyCode::Down)));
        assert!(picker.is_open());
        // Left moves the calendar cursor, Enter picks it.
        picker.handle_event(InputEvent::Key(KeyEvent::new(KeyCode::Left)));
        let action = picker.handle_event(InputEvent::Key(KeyEvent::new(KeyCode::Enter)));
        assert_eq!(
            action,
            DatePickerAction::Changed {
                date: Some(date(2024, 5, 19)),
                complete: true,
            }
        );
        assert!(!picker.is_open(), "auto-close after pick");
        assert_eq!(picker.formatted(), "2024-05-19");
    }

    #[test]
    fn escape_closes_without_changing_the_value() {
        let mut picker = DatePicker::default();
        picker.set_value(date(2024, 5, 20));
        picker.handle_event(InputEvent::Key(KeyEvent::new(KeyCode::Down)));
        picker.handle_event(InputEvent::Key(KeyEvent::new(KeyCode::Left)));
        let action = picker.handle_event(InputEvent::Key(KeyEvent::new(KeyCode::Esc)));
        assert_eq!(action, DatePickerAction::Redraw);
        assert!(!picker.is_open());
        assert_eq!(picker.value(), Some(date(2024, 5, 20)));
    }

    #[test]
    fn typed_dates_clamp_into_the_selectable_range() {
        let mut options = DatePickerOptions::default();
        options.calendar.min = NaiveDate::from_ymd_opt(2024, 1, 1);
        options.calendar.max = NaiveDate::from_ymd_opt(2024, 12, 31);
        let mut picker = DatePicker::new(options);
        for c in "20250215".chars() {
            picker.handle_event(InputEvent::Key(key(c)));
        }
        assert_eq!(picker.value(), Some(date(2024, 12, 31)));
    }

    #[test]
    fn day_month_year_order_round_trips() {
        let order = DateOrder::DayMonthYear;
        let d = date(2024, 5, 20);
        assert_eq!(order.digits_from_date(d), "20052024");
        assert_eq!(order.date_from_digits("20052024"), Some(d));
        assert_eq!(order.display(d, '/'), "20/05/2024");
    }
}
