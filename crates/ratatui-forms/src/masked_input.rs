use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui_forms_core::input::InputEvent;
use ratatui_forms_core::input::KeyCode;
use ratatui_forms_core::input::KeyEvent;
use ratatui_forms_core::mask::MaskDescriptor;
use ratatui_forms_core::masked::MaskedState;
use ratatui_forms_core::masked::PasteMode;
use ratatui_forms_core::render;

use crate::registry::ControlAction;
use crate::registry::FormControl;
use crate::registry::FormValue;
use crate::theme::Theme;

#[derive(Clone, Debug)]
pub struct MaskedInputOptions {
    pub style: Style,
    pub hint_style: Style,
    pub paste_mode: PasteMode,
    /// Draw one dim `_` per unfilled slot after the typed prefix.
    pub show_slot_hint: bool,
}

impl Default for MaskedInputOptions {
    fn default() -> Self {
        let theme = Theme::default();
        Self {
            style: theme.text,
            hint_style: theme.hint,
            paste_mode: PasteMode::default(),
            show_slot_hint: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MaskedValue {
    /// Stored input characters only; literals are not included.
    pub raw: String,
    pub complete: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MaskedInputAction {
    None,
    Changed(MaskedValue),
    Submitted(MaskedValue),
}

/// Format-mask field: every keystroke is validated against the mask, the
/// cursor auto-advances over literals, invalid input is silently dropped.
#[derive(Clone, Debug)]
pub struct MaskedInput {
    state: MaskedState,
    scroll: u16,
    options: MaskedInputOptions,
}

impl Default for MaskedInput {
    fn default() -> Self {
        Self::new(MaskDescriptor::digits(10))
    }
}

impl MaskedInput {
    pub fn new(mask: MaskDescriptor) -> Self {
        Self::with_options(mask, MaskedInputOptions::default())
    }

    pub fn with_options(mask: MaskDescriptor, options: MaskedInputOptions) -> Self {
        Self {
            state: MaskedState::new(mask).with_paste_mode(options.paste_mode),
            scroll: 0,
            options,
        }
    }

    pub fn state(&self) -> &MaskedState {
        &self.state
    }

    pub fn formatted(&self) -> String {
        self.state.formatted()
    }

    pub fn raw(&self) -> String {
        self.state.raw()
    }

    pub fn is_complete(&self) -> bool {
        self.state.is_complete()
    }

    pub fn set_text(&mut self, text: &str) {
        self.state.set_text(text);
    }

    pub fn clear(&mut self) {
        self.state.clear();
    }

    pub fn input(&mut self, event: InputEvent) -> MaskedInputAction {
        match event {
            InputEvent::Key(key) => self.handle_key(key),
            InputEvent::Paste(text) => {
                if self.state.paste(&text) > 0 {
                    MaskedInputAction::Changed(self.snapshot())
                } else {
                    MaskedInputAction::None
                }
            }
            InputEvent::Mouse(_) => MaskedInputAction::None,
        }
    }

    pub fn render_ref(&mut self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        buf.set_style(Rect::new(area.x, area.y, area.width, 1), self.options.style);
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
        if self.options.show_slot_hint {
            let unfilled = self.state.mask().placeholder_count() - self.state.raw().chars().count();
            let hint: String = "_".repeat(unfilled);
            let text_cols = render::display_width(&text) as u16;
            if text_cols >= self.scroll {
                render::render_line_clipped(
                    area.x + (text_cols - self.scroll).min(area.width),
                    area.y,
                    0,
                    area.width.saturating_sub(text_cols.saturating_sub(self.scroll)),
                    buf,
                    &hint,
                    self.options.hint_style,
                );
            }
        }
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

    fn snapshot(&self) -> MaskedValue {
        MaskedValue {
            raw: self.state.raw(),
            complete: self.state.is_complete(),
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> MaskedInputAction {
        match key.code {
            KeyCode::Char(c) => {
                if !key.plain() {
                    return MaskedInputAction::None;
                }
                if self.state.insert(c) {
                    MaskedInputAction::Changed(self.snapshot())
                } else {
                    MaskedInputAction::None
                }
            }
            KeyCode::Backspace => {
                if self.state.backspace() {
                    MaskedInputAction::Changed(self.snapshot())
                } else {
                    MaskedInputAction::None
                }
            }
            KeyCode::Delete => {
                if self.state.delete() {
                    MaskedInputAction::Changed(self.snapshot())
                } else {
                    MaskedInputAction::None
                }
            }
            KeyCode::Left => {
                self.state.move_left();
                MaskedInputAction::None
            }
            KeyCode::Right => {
                self.state.move_right();
                MaskedInputAction::None
            }
            KeyCode::Home => {
                self.state.home();
                MaskedInputAction::None
            }
            KeyCode::End => {
                self.state.end();
                MaskedInputAction::None
            }
            KeyCode::Enter => MaskedInputAction::Submitted(self.snapshot()),
            _ => MaskedInputAction::None,
        }
    }
}

impl FormControl for MaskedInput {
    fn handle_event(&mut self, event: InputEvent) -> ControlAction {
        match self.input(event) {
            MaskedInputAction::None => ControlAction::None,
            MaskedInputAction::Changed(v) => ControlAction::Changed {
                complete: v.complete,
                value: Some(FormValue::Text(v.raw)),
            },
            MaskedInputAction::Submitted(v) => ControlAction::Submitted {
                value: Some(FormValue::Text(v.raw)),
            },
        }
    }

    fn render_ref(&mut self, area: Rect, buf: &mut Buffer) {
        MaskedInput::render_ref(self, area, buf);
    }

    fn cursor_pos(&self, area: Rect) -> Option<(u16, u16)> {
        MaskedInput::cursor_pos(self, area)
    }

    fn value(&self) -> Option<FormValue> {
        Some(FormValue::Text(self.state.raw()))
    }

    fn is_complete(&self) -> bool {
        self.state.is_complete()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui_forms_core::input::key;

    fn masked(descriptor: &str) -> MaskedInput {
        MaskedInput::new(MaskDescriptor::parse(descriptor).unwrap())
    }

    #[test]
    fn typing_fills_and_reports_completion() {
        let mut input = masked("##-##");
        for c in "123".chars() {
            input.input(InputEvent::Key(key(c)));
        }
        assert_eq!(input.formatted(), "12-3");
        let action = input.input(InputEvent::Key(key('4')));
        assert_eq!(
            action,
            MaskedInputAction::Changed(MaskedValue {
                raw: "1234".to_string(),
                complete: true,
            })
        );
    }

    #[test]
    fn rejected_keystroke_is_not_an_action() {
        let mut input = masked("###");
        assert_eq!(input.input(InputEvent::Key(key('a'))), MaskedInputAction::None);
        assert_eq!(input.formatted(), "");
    }

    #[test]
    fn paste_reports_one_change() {
        let mut input = masked("##/##");
        let action = input.input(InputEvent::Paste("12/34".to_string()));
        assert_eq!(
            action,
            MaskedInputAction::Changed(MaskedValue {
                raw: "1234".to_string(),
                complete: true,
            })
        );
    }
}
