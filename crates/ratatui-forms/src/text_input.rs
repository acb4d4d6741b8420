use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui_forms_core::input::InputEvent;
use ratatui_forms_core::input::KeyCode;
use ratatui_forms_core::input::KeyEvent;
use ratatui_forms_core::render;

use crate::registry::ControlAction;
use crate::registry::FormControl;
use crate::registry::FormValue;
use crate::theme::Theme;

#[derive(Clone, Debug)]
pub struct TextInputOptions {
    pub style: Style,
    pub hint_style: Style,
    /// Placeholder text shown while the field is empty.
    pub hint: String,
}

impl Default for TextInputOptions {
    fn default() -> Self {
        let theme = Theme::default();
        Self {
            style: theme.text,
            hint_style: theme.hint,
            hint: String::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TextInputAction {
    None,
    Changed(String),
    Submitted(String),
}

/// Single-line free-text field with horizontal scrolling.
#[derive(Clone, Debug, Default)]
pub struct TextInput {
    chars: Vec<char>,
    cursor: usize,
    scroll: u16,
    options: TextInputOptions,
}

impl TextInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: TextInputOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn text(&self) -> String {
        self.chars.iter().collect()
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.chars = text.into().chars().filter(|c| !c.is_control()).collect();
        self.cursor = self.chars.len();
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn input(&mut self, event: InputEvent) -> TextInputAction {
        match event {
            InputEvent::Key(key) => self.handle_key(key),
            InputEvent::Paste(s) => {
                let mut changed = false;
                for c in s.chars().filter(|c| !c.is_control()) {
                    self.chars.insert(self.cursor, c);
                    self.cursor += 1;
                    changed = true;
                }
                if changed {
                    TextInputAction::Changed(self.text())
                } else {
                    TextInputAction::None
                }
            }
            InputEvent::Mouse(_) => TextInputAction::None,
        }
    }

    pub fn render_ref(&mut self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        buf.set_style(Rect::new(area.x, area.y, area.width, 1), self.options.style);
        if self.chars.is_empty() && !self.options.hint.is_empty() {
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
        let text = self.text();
        let cursor_col = render::width_before(&text, self.cursor) as u16;
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
        let text = self.text();
        let col = render::width_before(&text, self.cursor) as u16;
        let x = col.saturating_sub(self.scroll);
        (x < area.width).then_some((area.x + x, area.y))
    }

    fn handle_key(&mut self, key: KeyEvent) -> TextInputAction {
        match key.code {
            KeyCode::Char(c) => {
                if !key.plain() || c.is_control() {
                    return TextInputAction::None;
                }
                self.chars.insert(self.cursor, c);
                self.cursor += 1;
                TextInputAction::Changed(self.text())
            }
            KeyCode::Backspace => {
                if self.cursor == 0 {
                    return TextInputAction::None;
                }
                self.cursor -= 1;
                self.chars.remove(self.cursor);
                TextInputAction::Changed(self.text())
            }
            KeyCode::Delete => {
                if self.cursor >= self.chars.len() {
                    return TextInputAction::None;
                }
                self.chars.remove(self.cursor);
                TextInputAction::Changed(self.text())
            }
            KeyCode::Left => {
                self.cursor = self.cursor.saturating_sub(1);
                TextInputAction::None
            }
            KeyCode::Right => {
                self.cursor = (self.cursor + 1).min(self.chars.len());
                TextInputAction::None
            }
            KeyCode::Home => {
                self.cursor = 0;
                TextInputAction::None
            }
            KeyCode::End => {
                self.cursor = self.chars.len();
                TextInputAction::None
            }
            KeyCode::Enter => TextInputAction::Submitted(self.text()),
            _ => TextInputAction::None,
        }
    }
}

impl FormControl for TextInput {
    fn handle_event(&mut self, event: InputEvent) -> ControlAction {
        match self.input(event) {
            TextInputAction::None => ControlAction::None,
            TextInputAction::Changed(text) => ControlAction::Changed {
                value: Some(FormValue::Text(text)),
                complete: true,
            },
            TextInputAction::Submitted(text) => ControlAction::Submitted {
                value: Some(FormValue::Text(text)),
            },
        }
    }

    fn render_ref(&mut self, area: Rect, buf: &mut Buffer) {
        TextInput::render_ref(self, area, buf);
    }

    fn cursor_pos(&self, area: Rect) -> Option<(u16, u16)> {
        TextInput::cursor_pos(self, area)
    }

    fn value(&self) -> Option<FormValue> {
        Some(FormValue::Text(self.text()))
    }

    fn is_complete(&self) -> bool {
        true
    }
}
