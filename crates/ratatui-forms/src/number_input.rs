use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui_forms_core::input::InputEvent;
use ratatui_forms_core::input::KeyCode;
use ratatui_forms_core::input::KeyEvent;
use ratatui_forms_core::numeric::NumberFormat;
use ratatui_forms_core::numeric::NumberState;
use ratatui_forms_core::numeric::NumericValue;
use ratatui_forms_core::render;

use crate::registry::ControlAction;
use crate::registry::FormControl;
use crate::registry::FormValue;
use crate::theme::Theme;

#[derive(Clone, Debug)]
pub struct NumberInputOptions {
    pub style: Style,
    pub hint_style: Style,
    pub hint: String,
}

impl Default for NumberInputOptions {
    fn default() -> Self {
        let theme = Theme::default();
        Self {
            style: theme.text,
            hint_style: theme.hint,
            hint: String::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum NumberInputAction {
    None,
    Changed {
        /// Clamped to the configured bounds; `None` while no digit is typed.
        value: Option<NumericValue>,
        complete: bool,
    },
    Submitted(Option<NumericValue>),
}

/// Numeric field with grouping separators, bound clamping and a cursor that
/// stays put when regrouping shifts the display text.
#[derive(Clone, Debug)]
pub struct NumberInput {
    state: NumberState,
    scroll: u16,
    options: NumberInputOptions,
}

impl Default for NumberInput {
    fn default() -> Self {
        Self::new(NumberFormat::default())
    }
}

impl NumberInput {
    pub fn new(format: NumberFormat) -> Self {
        Self::with_options(format, NumberInputOptions::default())
    }

    pub fn with_options(format: NumberFormat, options: NumberInputOptions) -> Self {
        Self {
            state: NumberState::new(format),
            scroll: 0,
            options,
        }
    }

    pub fn state(&self) -> &NumberState {
        &self.state
    }

    pub fn formatted(&self) -> String {
        self.state.formatted()
    }

    pub fn value(&self) -> Option<NumericValue> {
        self.state.value()
    }

    pub fn set_value(&mut self, value: &NumericValue) {
        self.state.set_value(value);
    }

    pub fn clear(&mut self) {
        self.state.clear();
    }

    pub fn input(&mut self, event: InputEvent) -> NumberInputAction {
        match event {
            InputEvent::Key(key) => self.handle_key(key),
            InputEvent::Paste(text) => {
                let mut changed = false;
                for c in text.chars() {
                    changed |= self.state.insert(c);
                }
                if changed {
                    self.changed()
                } else {
                    NumberInputAction::None
                }
            }
            InputEvent::Mouse(_) => NumberInputAction::None,
        }
    }

    pub fn render_ref(&mut self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        buf.set_style(Rect::new(area.x, area.y, area.width, 1), self.options.style);
        if self.state.is_empty() && !self.options.hint.is_empty() {
            render::render_line_clipped(
                area.x,
                area.y,
                0,
                area.width,
                buf,
                &self.options.hint,
                self.options.hint_style,
            );
            return;
        }
        let text = self.state.formatted();
        let cursor_col = render::width_before(&text, self.state.cursor()) as u16;
        self.scroll = render::scroll_into_view(self.scroll, cursor_col, area.width);
        render::render_line_clipped(
            area.x,
            area.y,
            self.scroll,
            area.width,
            buf,
            &text,
            self.options.style,
        );
    }

    pub fn cursor_pos(&self, area: Rect) -> Option<(u16, u16)> {
        if area.width == 0 || area.height == 0 {
            return None;
        }
        let text = self.state.formatted();
        let col = render::width_before(&text, self.state.cursor()) as u16;
        let x = col.saturating_sub(self.scroll);
        (x < area.width).then_some((area.x + x, area.y))
    }

    fn changed(&self) -> NumberInputAction {
        NumberInputAction::Changed {
            value: self.state.value(),
            complete: self.state.is_complete(),
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> NumberInputAction {
        match key.code {
            KeyCode::Char(c) => {
                if !key.plain() {
                    return NumberInputAction::None;
                }
                if self.state.insert(c) {
                    self.changed()
                } else {
                    NumberInputAction::None
                }
            }
            KeyCode::Backspace => {
                if self.state.backspace() {
                    self.changed()
                } else {
                    NumberInputAction::None
                }
            }
            KeyCode::Delete => {
                if self.state.delete() {
                    self.changed()
                } else {
                    NumberInputAction::None
                }
            }
            KeyCode::Left => {
                self.state.move_left();
                NumberInputAction::None
            }
            KeyCode::Right => {
                self.state.move_right();
                NumberInputAction::None
            }
            KeyCode::Home => {
                self.state.home();
                NumberInputAction::None
            }
            KeyCode::End => {
                self.state.end();
                NumberInputAction::None
            }
            KeyCode::Enter => NumberInputAction::Submitted(self.state.commit()),
            _ => NumberInputAction::None,
        }
    }
}

impl FormControl for NumberInput {
    fn handle_event(&mut self, event: InputEvent) -> ControlAction {
        match self.input(event) {
            NumberInputAction::None => ControlAction::None,
            NumberInputAction::Changed { value, complete } => ControlAction::Changed {
                value: value.map(|v| FormValue::Number(v.to_f64())),
                complete,
            },
            NumberInputAction::Submitted(value) => ControlAction::Submitted {
                value: value.map(|v| FormValue::Number(v.to_f64())),
            },
        }
    }

    fn render_ref(&mut self, area: Rect, buf: &mut Buffer) {
        NumberInput::render_ref(self, area, buf);
    }

    fn cursor_pos(&self, area: Rect) -> Option<(u16, u16)> {
        NumberInput::cursor_pos(self, area)
    }

    fn value(&self) -> Option<FormValue> {
        self.state.value().map(|v| FormValue::Number(v.to_f64()))
    }

    fn is_complete(&self) -> bool {
        self.state.is_complete()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui_forms_core::input::key;

    #[test]
    fn emitted_value_is_clamped_while_typing() {
        let mut input = NumberInput::new(NumberFormat {
            min: 0.0,
            max: 100.0,
            ..NumberFormat::default()
        });
        input.input(InputEvent::Key(key('1')));
        input.input(InputEvent::Key(key('5')));
        let action = input.input(InputEvent::Key(key('0')));
        match action {
            NumberInputAction::Changed { value, complete } => {
                assert_eq!(value.unwrap().to_f64(), 100.0);
                assert!(complete);
            }
            other => panic!("unexpected action {other:?}"),
        }
        // The display is not rewritten until commit.
        assert_eq!(input.formatted(), "150");
    }

    #[test]
    fn enter_commits_to_canonical_text() {
        let mut input = NumberInput::new(NumberFormat {
            min: 0.0,
            max: 100.0,
            ..NumberFormat::default()
        });
        for c in "150".chars() {
            input.input(InputEvent::Key(key(c)));
        }
        let action = input.input(InputEvent::Key(KeyEvent::new(KeyCode::Enter)));
        match action {
            NumberInputAction::Submitted(Some(v)) => assert_eq!(v.to_f64(), 100.0),
            other => panic!("unexpected action {other:?}"),
        }
        assert_eq!(input.formatted(), "100");
    }

    #[test]
    fn rejected_characters_do_nothing() {
        let mut input = NumberInput::default();
        assert_eq!(input.input(InputEvent::Key(key('x'))), NumberInputAction::None);
        assert!(input.value().is_none());
    }
}
