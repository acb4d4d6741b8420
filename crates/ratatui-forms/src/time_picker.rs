use chrono::NaiveTime;
use chrono::Timelike;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui_forms_core::input::InputEvent;
use ratatui_forms_core::input::KeyCode;
use ratatui_forms_core::input::MouseEventKind;
use ratatui_forms_core::mask::MaskDescriptor;
use ratatui_forms_core::popup;
use ratatui_forms_core::popup::PopupState;
use ratatui_forms_core::render;

use crate::masked_input::MaskedInput;
use crate::masked_input::MaskedInputAction;
use crate::masked_input::MaskedInputOptions;
use crate::registry::ControlAction;
use crate::registry::FormControl;
use crate::registry::FormValue;
use crate::theme::Theme;

#[derive(Clone, Debug)]
pub struct TimePickerOptions {
    /// Interval between entries in the suggestion list.
    pub step_minutes: u32,
    pub auto_close: bool,
    pub list_height: u16,
    pub field: MaskedInputOptions,
    pub list_style: Style,
    pub cursor_style: Style,
}

impl Default for TimePickerOptions {
    fn default() -> Self {
        let theme = Theme::default();
        Self {
            step_minutes: 30,
            auto_close: true,
            list_height: 6,
            field: MaskedInputOptions::default(),
            list_style: theme.popup,
            cursor_style: theme.cursor,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TimePickerAction {
    None,
    Redraw,
    Changed {
        /// `None` while the field is half-typed or holds an impossible
        /// time like `27:80`.
        time: Option<NaiveTime>,
        complete: bool,
    },
    Submitted(Option<NaiveTime>),
}

/// A `##:##` 24-hour field with a step-interval suggestion list.
#[derive(Clone, Debug)]
pub struct TimePicker {
    field: MaskedInput,
    popup: PopupState,
    cursor: usize,
    scroll: usize,
    options: TimePickerOptions,
}

impl Default for TimePicker {
    fn default() -> Self {
        Self::new(TimePickerOptions::default())
    }
}

impl TimePicker {
    pub fn new(options: TimePickerOptions) -> Self {
        let mask = MaskDescriptor::parse("##:##").unwrap_or_else(|_| MaskDescriptor::digits(4));
        Self {
            field: MaskedInput::with_options(mask, options.field.clone()),
            popup: PopupState::new(),
            cursor: 0,
            scroll: 0,
            options,
        }
    }

    pub fn is_open(&self) -> bool {
        self.popup.is_open()
    }

    pub fn formatted(&self) -> String {
        self.field.formatted()
    }

    /// The typed time once the field is complete and within the 24h clock.
    pub fn value(&self) -> Option<NaiveTime> {
        if !self.field.is_complete() {
            return None;
        }
        let raw = self.field.raw();
        let hour = raw.get(0..2).and_then(|s| s.parse::<u32>().ok())?;
        let minute = raw.get(2..4).and_then(|s| s.parse::<u32>().ok())?;
        NaiveTime::from_hms_opt(hour, minute, 0)
    }

    pub fn set_value(&mut self, time: NaiveTime) {
        self.field
            .set_text(&format!("{:02}{:02}", time.hour(), time.minute()));
    }

    pub fn clear(&mut self) {
        self.field.clear();
    }

    /// The suggestion list entries for the configured step.
    pub fn entries(&self) -> Vec<NaiveTime> {
        let step = self.options.step_minutes.clamp(1, 24 * 60);
        (0..24 * 60)
            .step_by(step as usize)
            .filter_map(|m| NaiveTime::from_hms_opt(m / 60, m % 60, 0))
            .collect()
    }

    pub fn handle_event(&mut self, event: InputEvent) -> TimePickerAction {
        if self.popup.is_open() {
            if self.popup.handle_dismiss(&event) {
                return TimePickerAction::Redraw;
            }
            return self.handle_open(event);
        }

        if let InputEvent::Key(key) = &event {
            if key.code == KeyCode::Down {
                self.open_popup();
                return TimePickerAction::Redraw;
            }
        }
        if let InputEvent::Mouse(m) = &event {
            if m.is_left_down() {
                if popup::contains(self.popup.anchor(), m.x, m.y) {
                    self.open_popup();
                    return TimePickerAction::Redraw;
                }
                return TimePickerAction::None;
            }
        }

        match self.field.input(event) {
            MaskedInputAction::None => TimePickerAction::None,
            MaskedInputAction::Changed(_) => {
                let time = self.value();
                TimePickerAction::Changed {
                    complete: time.is_some(),
                    time,
                }
            }
            MaskedInputAction::Submitted(_) => TimePickerAction::Submitted(self.value()),
        }
    }

    pub fn render_ref(&mut self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let anchor = Rect::new(area.x, area.y, area.width, 1);
        self.popup.set_anchor(anchor);
        self.field.render_ref(anchor, buf);

        if !self.popup.is_open() || area.height < 2 {
            return;
        }
        let entries = self.entries();
        let height = self
            .options
            .list_height
            .min(area.height - 1)
            .min(entries.len() as u16);
        let overlay = Rect::new(area.x, area.y + 1, 7.min(area.width), height);
        self.popup.set_overlay(overlay);
        buf.set_style(overlay, self.options.list_style);

        self.scroll = follow_cursor(self.scroll, self.cursor, height as usize);
        for row in 0..height as usize {
            let Some(time) = entries.get(self.scroll + row) else {
                break;
            };
            let style = if self.scroll + row == self.cursor {
                self.options.cursor_style
            } else {
                self.options.list_style
            };
            let line = format!(" {:02}:{:02} ", time.hour(), time.minute());
            render::render_line_clipped(
                overlay.x,
                overlay.y + row as u16,
                0,
                overlay.width,
                buf,
                &line,
                style,
            );
        }
    }

    pub fn cursor_pos(&self, area: Rect) -> Option<(u16, u16)> {
        if self.popup.is_open() {
            return None;
        }
        self.field
            .cursor_pos(Rect::new(area.x, area.y, area.width, 1.min(area.height)))
    }

    fn handle_open(&mut self, event: InputEvent) -> TimePickerAction {
        let entries = self.entries();
        match event {
            InputEvent::Key(key) => match key.code {
                KeyCode::Up => {
                    self.cursor = self.cursor.saturating_sub(1);
                    TimePickerAction::Redraw
                }
                KeyCode::Down => {
                    self.cursor = (self.cursor + 1).min(entries.len().saturating_sub(1));
                    TimePickerAction::Redraw
                }
                KeyCode::Enter => match entries.get(self.cursor) {
                    Some(&time) => self.pick(time),
                    None => TimePickerAction::None,
                },
                _ => TimePickerAction::None,
            },
            InputEvent::Mouse(m) => match m.kind {
                MouseEventKind::ScrollUp => {
                    self.cursor = self.cursor.saturating_sub(1);
                    TimePickerAction::Redraw
                }
                MouseEventKind::ScrollDown => {
                    self.cursor = (self.cursor + 1).min(entries.len().saturating_sub(1));
                    TimePickerAction::Redraw
                }
                _ if m.is_left_down() => {
                    let overlay = self.popup.overlay();
                    if popup::contains(overlay, m.x, m.y) {
                        let index = self.scroll + (m.y - overlay.y) as usize;
                        match entries.get(index) {
                            Some(&time) => {
                                self.cursor = index;
                                self.pick(time)
                            }
                            None => TimePickerAction::None,
                        }
                    } else {
                        TimePickerAction::None
                    }
                }
                _ => TimePickerAction::None,
            },
            InputEvent::Paste(_) => TimePickerAction::None,
        }
    }

    fn pick(&mut self, time: NaiveTime) -> TimePickerAction {
        self.set_value(time);
        if self.options.auto_close {
            self.popup.close();
        }
        TimePickerAction::Changed {
            time: Some(time),
            complete: true,
        }
    }

    fn open_popup(&mut self) {
        let entries = self.entries();
        self.cursor = match self.value() {
            Some(time) => {
                let minutes = time.hour() * 60 + time.minute();
                entries
                    .iter()
                    .position(|t| t.hour() * 60 + t.minute() >= minutes)
                    .unwrap_or(0)
            }
            None => 0,
        };
        self.popup.open();
    }
}

fn follow_cursor(scroll: usize, cursor: usize, height: usize) -> usize {
    if height == 0 {
        return scroll;
    }
    if cursor < scroll {
        cursor
    } else if cursor >= scroll + height {
        cursor - height + 1
    } else {
        scroll
    }
}

impl FormControl for TimePicker {
    fn handle_event(&mut self, event: InputEvent) -> ControlAction {
        match TimePicker::handle_event(self, event) {
            TimePickerAction::None => ControlAction::None,
            TimePickerAction::Redraw => ControlAction::Redraw,
            TimePickerAction::Changed { time, complete } => ControlAction::Changed {
                value: time.map(FormValue::Time),
                complete,
            },
            TimePickerAction::Submitted(time) => ControlAction::Submitted {
                value: time.map(FormValue::Time),
            },
        }
    }

    fn render_ref(&mut self, area: Rect, buf: &mut Buffer) {
        TimePicker::render_ref(self, area, buf);
    }

    fn cursor_pos(&self, area: Rect) -> Option<(u16, u16)> {
        TimePicker::cursor_pos(self, area)
    }

    fn value(&self) -> Option<FormValue> {
        TimePicker::value(self).map(FormValue::Time)
    }

    fn is_complete(&self) -> bool {
        TimePicker::value(self).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui_forms_core::input::key;
    use ratatui_forms_core::input::KeyEvent;

    #[test]
    fn typing_a_valid_time_completes() {
        let mut picker = TimePicker::default();
        for c in "0930".chars() {
            picker.handle_event(InputEvent::Key(key(c)));
        }
        assert_eq!(picker.formatted(), "09:30");
        assert_eq!(picker.value(), NaiveTime::from_hms_opt(9, 30, 0));
    }

    #[test]
    fn out_of_clock_times_are_incomplete() {
        let mut picker = TimePicker::default();
        for c in "2780".chars() {
            picker.handle_event(InputEvent::Key(key(c)));
        }
        assert_eq!(picker.formatted(), "27:80");
        assert_eq!(picker.value(), None);
        match picker.handle_event(InputEvent::Key(KeyEvent::new(KeyCode::Backspace))) {
            TimePickerAction::Changed { time, complete } => {
                assert_eq!(time, None);
                assert!(!complete);
            }
            other => panic!("unexpected action {other:?}"),
        }
    }

    #[test]
    fn list_pick_fills_the_field() {
        let mut picker = TimePicker::default();
        picker.handle_event(InputEvent::Key(KeyEvent::new(KeyCode::Down)));
        assert!(picker.is_open());
        // First entry is 00:00; step down to 01:00.
        picker.handle_event(InputEvent::Key(KeyEvent::new(KeyCode::Down)));
        picker.handle_event(InputEvent::Key(KeyEvent::new(KeyCode::Down)));
        let action = picker.handle_event(InputEvent::Key(KeyEvent::new(KeyCode::Enter)));
        assert_eq!(
            action,
            TimePickerAction::Changed {
                time: NaiveTime::from_hms_opt(1, 0, 0),
                complete: true,
            }
        );
        assert!(!picker.is_open());
        assert_eq!(picker.formatted(), "01:00");
    }

    #[test]
    fn entries_respect_the_step() {
        let picker = TimePicker::new(TimePickerOptions {
            step_minutes: 360,
            ..TimePickerOptions::default()
        });
        let entries = picker.entries();
        assert_eq!(entries.len(), 4);
        assert_eq!(entries[1], NaiveTime::from_hms_opt(6, 0, 0).unwrap());
    }

    #[test]
    fn opening_seeks_the_typed_time() {
        let mut picker = TimePicker::default();
        for c in "0930".chars() {
            picker.handle_event(InputEvent::Key(key(c)));
        }
        picker.handle_event(InputEvent::Key(KeyEvent::new(KeyCode::Down)));
        // 09:30 is entry 19 with the default 30-minute step.
        assert_eq!(picker.cursor, 19);
    }
}
