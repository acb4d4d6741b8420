use chrono::NaiveDate;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui_forms_core::calendar::DateRange;
use ratatui_forms_core::calendar::Selection;
use ratatui_forms_core::input::InputEvent;
use ratatui_forms_core::input::KeyCode;
use ratatui_forms_core::popup;
use ratatui_forms_core::popup::PopupState;
use ratatui_forms_core::range::RangePhase;
use ratatui_forms_core::range::RangeSelection;
use ratatui_forms_core::render;

use crate::calendar_popup;
use crate::calendar_popup::CalendarAction;
use crate::calendar_popup::CalendarPopup;
use crate::calendar_popup::CalendarPopupOptions;
use crate::date_picker::DateOrder;
use crate::registry::ControlAction;
use crate::registry::FormControl;
use crate::registry::FormValue;
use crate::theme::Theme;

#[derive(Clone, Debug)]
pub struct DateRangePickerOptions {
    pub order: DateOrder,
    pub separator: char,
    /// Close the popup when the second endpoint lands.
    pub auto_close: bool,
    pub style: Style,
    pub hint_style: Style,
    pub hint: String,
    pub calendar: CalendarPopupOptions,
}

impl Default for DateRangePickerOptions {
    fn default() -> Self {
        let theme = Theme::default();
        Self {
            order: DateOrder::default(),
            separator: '-',
            auto_close: true,
            style: theme.text,
            hint_style: theme.hint,
            hint: "start – end".to_string(),
            calendar: CalendarPopupOptions::default(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DateRangeAction {
    None,
    Redraw,
    /// Emitted only when the pair is complete; both endpoints are set and
    /// ordered.
    Changed(DateRange),
    Cleared,
}

/// Two-click date range selection over a calendar popup. While the end
/// point is pending, the grid previews the range up to the day cursor.
#[derive(Clone, Debug)]
pub struct DateRangePicker {
    selection: RangeSelection<NaiveDate>,
    calendar: CalendarPopup,
    popup: PopupState,
    options: DateRangePickerOptions,
}

impl Default for DateRangePicker {
    fn default() -> Self {
        Self::new(DateRangePickerOptions::default())
    }
}

impl DateRangePicker {
    pub fn new(options: DateRangePickerOptions) -> Self {
        Self {
            selection: RangeSelection::new(),
            calendar: CalendarPopup::new().with_options(options.calendar.clone()),
            popup: PopupState::new(),
            options,
        }
    }

    pub fn is_open(&self) -> bool {
        self.popup.is_open()
    }

    pub fn phase(&self) -> RangePhase {
        self.selection.phase()
    }

    /// The committed pair once both endpoints are set.
    pub fn value(&self) -> Option<(NaiveDate, NaiveDate)> {
        match (self.selection.start(), self.selection.end()) {
            (Some(start), Some(end)) => Some((start, end)),
            _ => None,
        }
    }

    pub fn set_value(&mut self, start: NaiveDate, end: NaiveDate) {
        self.selection.clear();
        self.selection.click(start.min(end));
        self.selection.click(start.max(end));
        self.calendar.set_cursor(end.max(start));
    }

    pub fn clear(&mut self) {
        self.selection.clear();
    }

    pub fn handle_event(&mut self, event: InputEvent) -> DateRangeAction {
        if self.popup.is_open() {
            if self.popup.handle_dismiss(&event) {
                // Cancelling mid-selection discards the pending start; a
                // complete pair survives the popup closing.
                if !self.selection.is_complete() {
                    self.selection.clear();
                }
                return DateRangeAction::Redraw;
            }
            if let InputEvent::Key(key) = &event {
                if key.code == KeyCode::Delete {
                    self.selection.clear();
                    return DateRangeAction::Cleared;
                }
            }
            return match self.calendar.handle_event(event) {
                CalendarAction::Picked(date) => {
                    if self.selection.click(date) == RangePhase::Complete {
                        if self.options.auto_close {
                            self.popup.close();
                        }
                        DateRangeAction::Changed(self.selection.span())
                    } else {
                        DateRangeAction::Redraw
                    }
                }
                CalendarAction::Redraw => DateRangeAction::Redraw,
                CalendarAction::None => DateRangeAction::None,
            };
        }

        match &event {
            InputEvent::Key(key) => match key.code {
                KeyCode::Enter | KeyCode::Down => {
                    self.open_popup();
                    DateRangeAction::Redraw
                }
                KeyCode::Delete | KeyCode::Backspace => {
                    if self.selection.phase() == RangePhase::Empty {
                        DateRangeAction::None
                    } else {
                        self.selection.clear();
                        DateRangeAction::Cleared
                    }
                }
                _ => DateRangeAction::None,
            },
            InputEvent::Mouse(m) => {
                if m.is_left_down() && popup::contains(self.popup.anchor(), m.x, m.y) {
                    self.open_popup();
                    DateRangeAction::Redraw
                } else {
                    DateRangeAction::None
                }
            }
            InputEvent::Paste(_) => DateRangeAction::None,
        }
    }

    pub fn render_ref(&mut self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let anchor = Rect::new(area.x, area.y, area.width, 1);
        self.popup.set_anchor(anchor);
        buf.set_style(anchor, self.options.style);

        let text = self.display_text();
        if text.is_empty() {
            render::render_line_clipped(
                area.x,
                area.y,
                0,
                area.width,
                buf,
                &self.options.hint,
                self.options.hint_style,
            );
        } else {
            render::render_line_clipped(
                area.x,
                area.y,
                0,
                area.width,
                buf,
                &text,
                self.options.style,
            );
        }

        if self.popup.is_open() && area.height > 1 {
            let overlay = Rect::new(
                area.x,
                area.y + 1,
                calendar_popup::GRID_WIDTH.min(area.width),
                calendar_popup::GRID_HEIGHT.min(area.height - 1),
            );
            self.popup.set_overlay(overlay);
            let marked = self.marked_range();
            self.calendar
                .render_with(overlay, buf, &Selection::Range(marked));
        }
    }

    /// The range shown on the grid: the committed pair, or the live preview
    /// up to the day cursor while the end point is pending.
    fn marked_range(&self) -> DateRange {
        match self.selection.phase() {
            RangePhase::AwaitingEnd => self.selection.preview(self.calendar.cursor()),
            _ => self.selection.span(),
        }
    }

    fn display_text(&self) -> String {
        let fmt = |d: NaiveDate| self.options.order.display(d, self.options.separator);
        match (self.selection.start(), self.selection.end()) {
            (Some(start), Some(end)) => format!("{} – {}", fmt(start), fmt(end)),
            (Some(start), None) => format!("{} – …", fmt(start)),
            _ => String::new(),
        }
    }

    fn open_popup(&mut self) {
        if let Some(start) = self.selection.start() {
            self.calendar.set_cursor(self.selection.end().unwrap_or(start));
        }
        self.popup.open();
    }
}

impl FormControl for DateRangePicker {
    fn handle_event(&mut self, event: InputEvent) -> ControlAction {
        match DateRangePicker::handle_event(self, event) {
            DateRangeAction::None => ControlAction::None,
            DateRangeAction::Redraw => ControlAction::Redraw,
            DateRangeAction::Changed(range) => match (range.start, range.end) {
                (Some(start), Some(end)) => ControlAction::Changed {
                    value: Some(FormValue::DateRange { start, end }),
                    complete: true,
                },
                _ => ControlAction::Changed {
                    value: None,
                    complete: false,
                },
            },
            DateRangeAction::Cleared => ControlAction::Changed {
                value: None,
                complete: false,
            },
        }
    }

    fn render_ref(&mut self, area: Rect, buf: &mut Buffer) {
        DateRangePicker::render_ref(self, area, buf);
    }

    fn value(&self) -> Option<FormValue> {
        DateRangePicker::value(self).map(|(start, end)| FormValue::DateRange { start, end })
    }

    fn is_complete(&self) -> bool {
        self.selection.is_complete()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui_forms_core::input::KeyEvent;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn open_at(start: NaiveDate) -> DateRangePicker {
        let mut picker = DateRangePicker::default();
        picker.calendar.set_cursor(start);
        picker.handle_event(InputEvent::Key(KeyEvent::new(KeyCode::Down)));
        picker
    }

    #[test]
    fn two_picks_complete_and_close() {
        let mut picker = open_at(date(2024, 5, 10));
        picker.handle_event(InputEvent::Key(KeyEvent::new(KeyCode::Enter)));
        assert_eq!(picker.phase(), RangePhase::AwaitingEnd);
        // Move ten days forward and pick the end.
        picker.handle_event(InputEvent::Key(KeyEvent::new(KeyCode::Down)));
        picker.handle_event(InputEvent::Key(KeyEvent::new(KeyCode::Right)));
        picker.handle_event(InputEvent::Key(KeyEvent::new(KeyCode::Right)));
        picker.handle_event(InputEvent::Key(KeyEvent::new(KeyCode::Right)));
        let action = picker.handle_event(InputEvent::Key(KeyEvent::new(KeyCode::Enter)));
        assert_eq!(
            action,
            DateRangeAction::Changed(DateRange {
                start: Some(date(2024, 5, 10)),
                end: Some(date(2024, 5, 20)),
            })
        );
        assert!(!picker.is_open(), "auto-close on completion");
        assert_eq!(picker.value(), Some((date(2024, 5, 10), date(2024, 5, 20))));
    }

    #[test]
    fn inverted_picks_swap() {
        let mut picker = open_at(date(2024, 5, 20));
        picker.handle_event(InputEvent::Key(KeyEvent::new(KeyCode::Enter)));
        picker.calendar.set_cursor(date(2024, 5, 10));
        picker.handle_event(InputEvent::Key(KeyEvent::new(KeyCode::Enter)));
        assert_eq!(picker.value(), Some((date(2024, 5, 10), date(2024, 5, 20))));
    }

    #[test]
    fn cancel_mid_selection_discards_the_pending_start() {
        let mut picker = open_at(date(2024, 5, 10));
        picker.handle_event(InputEvent::Key(KeyEvent::new(KeyCode::Enter)));
        assert_eq!(picker.phase(), RangePhase::AwaitingEnd);
        picker.handle_event(InputEvent::Key(KeyEvent::new(KeyCode::Esc)));
        assert!(!picker.is_open());
        assert_eq!(picker.phase(), RangePhase::Empty);
    }

    #[test]
    fn complete_pair_survives_closing() {
        let mut picker = DateRangePicker::default();
        picker.set_value(date(2024, 5, 10), date(2024, 5, 20));
        picker.handle_event(InputEvent::Key(KeyEvent::new(KeyCode::Down)));
        picker.handle_event(InputEvent::Key(KeyEvent::new(KeyCode::Esc)));
        assert_eq!(picker.value(), Some((date(2024, 5, 10), date(2024, 5, 20))));
    }

    #[test]
    fn delete_clears_the_range() {
        let mut picker = DateRangePicker::default();
        picker.set_value(date(2024, 5, 10), date(2024, 5, 20));
        let action = picker.handle_event(InputEvent::Key(KeyEvent::new(KeyCode::Delete)));
        assert_eq!(action, DateRangeAction::Cleared);
        assert_eq!(picker.value(), None);
        assert_eq!(picker.phase(), RangePhase::Empty);
    }

    #[test]
    fn preview_follows_the_cursor_while_awaiting_end() {
        let mut picker = open_at(date(2024, 5, 10));
        picker.handle_event(InputEvent::Key(KeyEvent::new(KeyCode::Enter)));
        picker.calendar.set_cursor(date(2024, 5, 14));
        let preview = picker.marked_range();
        assert_eq!(preview.start, Some(date(2024, 5, 10)));
        assert_eq!(preview.end, Some(date(2024, 5, 14)));
        // Nothing is committed yet.
        assert_eq!(picker.selection.end(), None);
    }
}
