use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui_forms_core::input::InputEvent;
use ratatui_forms_core::input::KeyCode;
use ratatui_forms_core::input::MouseEventKind;
use ratatui_forms_core::popup;
use ratatui_forms_core::popup::PopupState;
use ratatui_forms_core::render;

use crate::registry::ControlAction;
use crate::registry::FormControl;
use crate::registry::FormValue;
use crate::theme::Theme;

#[derive(Clone, Debug)]
pub struct SelectInputOptions {
    pub style: Style,
    pub hint_style: Style,
    /// Shown while nothing is selected.
    pub hint: String,
    pub list_style: Style,
    pub cursor_style: Style,
    pub selected_style: Style,
    pub list_height: u16,
}

impl Default for SelectInputOptions {
    fn default() -> Self {
        let theme = Theme::default();
        Self {
            style: theme.text,
            hint_style: theme.hint,
            hint: "Select…".to_string(),
            list_style: theme.popup,
            cursor_style: theme.cursor,
            selected_style: theme.selected,
            list_height: 6,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SelectAction {
    None,
    Redraw,
    Changed { index: usize, label: String },
}

/// Dropdown over a fixed option list.
#[derive(Clone, Debug, Default)]
pub struct SelectInput {
    items: Vec<String>,
    selected: Option<usize>,
    cursor: usize,
    scroll: usize,
    popup: PopupState,
    options: SelectInputOptions,
}

impl SelectInput {
    pub fn new(items: Vec<String>) -> Self {
        Self {
            items,
            ..Self::default()
        }
    }

    pub fn with_options(items: Vec<String>, options: SelectInputOptions) -> Self {
        Self {
            items,
            options,
            ..Self::default()
        }
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn set_items(&mut self, items: Vec<String>) {
        self.items = items;
        self.selected = self.selected.filter(|&i| i < self.items.len());
        self.cursor = self.cursor.min(self.items.len().saturating_sub(1));
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_label(&self) -> Option<&str> {
        self.selected.and_then(|i| self.items.get(i)).map(String::as_str)
    }

    /// Programmatic selection; out-of-range indices are ignored.
    pub fn select(&mut self, index: usize) -> bool {
        if index >= self.items.len() {
            return false;
        }
        self.selected = Some(index);
        self.cursor = index;
        true
    }

    pub fn clear(&mut self) {
        self.selected = None;
    }

    pub fn is_open(&self) -> bool {
        self.popup.is_open()
    }

    pub fn handle_event(&mut self, event: InputEvent) -> SelectAction {
        if self.popup.is_open() {
            if self.popup.handle_dismiss(&event) {
                return SelectAction::Redraw;
            }
            return self.handle_open(event);
        }

        match &event {
            InputEvent::Key(key) => match key.code {
                KeyCode::Enter | KeyCode::Down => {
                    self.open_popup();
                    SelectAction::Redraw
                }
                _ => SelectAction::None,
            },
            InputEvent::Mouse(m) => {
                if m.is_left_down() && popup::contains(self.popup.anchor(), m.x, m.y) {
                    self.open_popup();
                    SelectAction::Redraw
                } else {
                    SelectAction::None
                }
            }
            InputEvent::Paste(_) => SelectAction::None,
        }
    }

    pub fn render_ref(&mut self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let anchor = Rect::new(area.x, area.y, area.width, 1);
        self.popup.set_anchor(anchor);
        buf.set_style(anchor, self.options.style);
        match self.selected_label() {
            Some(label) => {
                let label = label.to_string();
                render::render_line_clipped(
                    area.x,
                    area.y,
                    0,
                    area.width,
                    buf,
                    &label,
                    self.options.style,
                );
            }
            None => {
                render::render_line_clipped(
                    area.x,
                    area.y,
                    0,
                    area.width,
                    buf,
                    &self.options.hint,
                    self.options.hint_style,
                );
            }
        }

        if !self.popup.is_open() || area.height < 2 || self.items.is_empty() {
            return;
        }
        let height = self
            .options
            .list_height
            .min(area.height - 1)
            .min(self.items.len() as u16);
        let overlay = Rect::new(area.x, area.y + 1, area.width, height);
        self.popup.set_overlay(overlay);
        buf.set_style(overlay, self.options.list_style);

        self.scroll = follow_cursor(self.scroll, self.cursor, height as usize);
        for row in 0..height as usize {
            let index = self.scroll + row;
            let Some(item) = self.items.get(index) else {
                break;
            };
            let style = if index == self.cursor {
                self.options.cursor_style
            } else if Some(index) == self.selected {
                self.options.selected_style
            } else {
                self.options.list_style
            };
            let line = format!(" {item}");
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

    fn handle_open(&mut self, event: InputEvent) -> SelectAction {
        match event {
            InputEvent::Key(key) => match key.code {
                KeyCode::Up => {
                    self.cursor = self.cursor.saturating_sub(1);
                    SelectAction::Redraw
                }
                KeyCode::Down => {
                    self.cursor = (self.cursor + 1).min(self.items.len().saturating_sub(1));
                    SelectAction::Redraw
                }
                KeyCode::Enter => self.pick(self.cursor),
                _ => SelectAction::None,
            },
            InputEvent::Mouse(m) => match m.kind {
                MouseEventKind::ScrollUp => {
                    self.cursor = self.cursor.saturating_sub(1);
                    SelectAction::Redraw
                }
                MouseEventKind::ScrollDown => {
                    self.cursor = (self.cursor + 1).min(self.items.len().saturating_sub(1));
                    SelectAction::Redraw
                }
                _ if m.is_left_down() => {
                    let overlay = self.popup.overlay();
                    if popup::contains(overlay, m.x, m.y) {
                        self.pick(self.scroll + (m.y - overlay.y) as usize)
                    } else {
                        SelectAction::None
                    }
                }
                _ => SelectAction::None,
            },
            InputEvent::Paste(_) => SelectAction::None,
        }
    }

    fn pick(&mut self, index: usize) -> SelectAction {
        let Some(label) = self.items.get(index) else {
            return SelectAction::None;
        };
        let label = label.clone();
        self.selected = Some(index);
        self.cursor = index;
        self.popup.close();
        SelectAction::Changed { index, label }
    }

    fn open_popup(&mut self) {
        self.cursor = self.selected.unwrap_or(0);
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

impl FormControl for SelectInput {
    fn handle_event(&mut self, event: InputEvent) -> ControlAction {
        match SelectInput::handle_event(self, event) {
            SelectAction::None => ControlAction::None,
            SelectAction::Redraw => ControlAction::Redraw,
            SelectAction::Changed { index, label } => ControlAction::Changed {
                value: Some(FormValue::Choice { index, label }),
                complete: true,
            },
        }
    }

    fn render_ref(&mut self, area: Rect, buf: &mut Buffer) {
        SelectInput::render_ref(self, area, buf);
    }

    fn value(&self) -> Option<FormValue> {
        let index = self.selected?;
        let label = self.items.get(index)?.clone();
        Some(FormValue::Choice { index, label })
    }

    fn is_complete(&self) -> bool {
        self.selected.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui_forms_core::input::KeyEvent;

    fn select() -> SelectInput {
        SelectInput::new(vec![
            "Red".to_string(),
            "Green".to_string(),
            "Blue".to_string(),
        ])
    }

    #[test]
    fn keyboard_selection_closes_and_reports() {
        let mut input = select();
        input.handle_event(InputEvent::Key(KeyEvent::new(KeyCode::Enter)));
        assert!(input.is_open());
        input.handle_event(InputEvent::Key(KeyEvent::new(KeyCode::Down)));
        let action = input.handle_event(InputEvent::Key(KeyEvent::new(KeyCode::Enter)));
        assert_eq!(
            action,
            SelectAction::Changed {
                index: 1,
                label: "Green".to_string(),
            }
        );
        assert!(!input.is_open());
        assert_eq!(input.selected_label(), Some("Green"));
    }

    #[test]
    fn escape_keeps_the_previous_selection() {
        let mut input = select();
        input.select(2);
        input.handle_event(InputEvent::Key(KeyEvent::new(KeyCode::Enter)));
        input.handle_event(InputEvent::Key(KeyEvent::new(KeyCode::Up)));
        input.handle_event(InputEvent::Key(KeyEvent::new(KeyCode::Esc)));
        assert_eq!(input.selected(), Some(2));
        assert!(!input.is_open());
    }

    #[test]
    fn cursor_stays_in_bounds() {
        let mut input = select();
        input.handle_event(InputEvent::Key(KeyEvent::new(KeyCode::Enter)));
        for _ in 0..10 {
            input.handle_event(InputEvent::Key(KeyEvent::new(KeyCode::Down)));
        }
        let action = input.handle_event(InputEvent::Key(KeyEvent::new(KeyCode::Enter)));
        assert_eq!(
            action,
            SelectAction::Changed {
                index: 2,
                label: "Blue".to_string(),
            }
        );
    }

    #[test]
    fn shrinking_items_drops_stale_selection() {
        let mut input = select();
        input.select(2);
        input.set_items(vec!["Only".to_string()]);
        assert_eq!(input.selected(), None);
    }
}
