use chrono::Datelike;
use chrono::Days;
use chrono::NaiveDate;
use chrono::Weekday;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui_forms_core::calendar;
use ratatui_forms_core::calendar::Selection;
use ratatui_forms_core::calendar::YearMonth;
use ratatui_forms_core::input::InputEvent;
use ratatui_forms_core::input::KeyCode;
use ratatui_forms_core::input::KeyEvent;
use ratatui_forms_core::input::MouseEventKind;
use ratatui_forms_core::popup;
use ratatui_forms_core::render;

use crate::registry::ControlAction;
use crate::registry::FormControl;
use crate::registry::FormValue;
use crate::theme::Theme;

/// 7 columns of `"dd "` cells.
pub const GRID_WIDTH: u16 = 21;
/// Header + weekday row + 6 grid rows.
pub const GRID_HEIGHT: u16 = 8;

const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

#[derive(Clone, Debug)]
pub struct CalendarPopupOptions {
    pub week_start: Weekday,
    /// Earliest selectable date; earlier cells render but cannot be picked.
    pub min: Option<NaiveDate>,
    /// Latest selectable date.
    pub max: Option<NaiveDate>,
    pub style: Style,
    pub header_style: Style,
    pub weekday_style: Style,
    pub outside_style: Style,
    pub today_style: Style,
    pub selected_style: Style,
    pub in_range_style: Style,
    pub cursor_style: Style,
}

impl Default for CalendarPopupOptions {
    fn default() -> Self {
        let theme = Theme::default();
        Self {
            week_start: Weekday::Mon,
            min: None,
            max: None,
            style: theme.popup,
            header_style: theme.header,
            weekday_style: theme.hint,
            outside_style: theme.outside,
            today_style: theme.today,
            selected_style: theme.selected,
            in_range_style: theme.in_range,
            cursor_style: theme.cursor,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CalendarAction {
    None,
    Redraw,
    Picked(NaiveDate),
}

/// Month-grid widget: a keyboard/mouse cursor over the 42-cell grid, month
/// and year paging, and a pick gesture. Selection marking is recomputed
/// from the current [`Selection`] on every render.
#[derive(Clone, Debug)]
pub struct CalendarPopup {
    month: YearMonth,
    cursor: NaiveDate,
    today: NaiveDate,
    selection: Selection,
    area: Rect,
    options: CalendarPopupOptions,
}

impl Default for CalendarPopup {
    fn default() -> Self {
        Self::new()
    }
}

impl CalendarPopup {
    pub fn new() -> Self {
        let today = chrono::Local::now().date_naive();
        Self::starting_at(today)
    }

    /// Deterministic constructor; `new` starts at the wall-clock date.
    pub fn starting_at(today: NaiveDate) -> Self {
        Self {
            month: YearMonth::of(today),
            cursor: today,
            today,
            selection: Selection::None,
            area: Rect::default(),
            options: CalendarPopupOptions::default(),
        }
    }

    pub fn with_options(mut self, options: CalendarPopupOptions) -> Self {
        self.options = options;
        self
    }

    pub fn month(&self) -> YearMonth {
        self.month
    }

    pub fn cursor(&self) -> NaiveDate {
        self.cursor
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn set_today(&mut self, today: NaiveDate) {
        self.today = today;
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn set_selection(&mut self, selection: Selection) {
        self.selection = selection;
    }

    /// Moves the cursor and shows its month.
    pub fn set_cursor(&mut self, date: NaiveDate) {
        self.cursor = date;
        self.month = YearMonth::of(date);
    }

    pub fn handle_event(&mut self, event: InputEvent) -> CalendarAction {
        match event {
            InputEvent::Key(key) => self.handle_key(key),
            InputEvent::Mouse(m) => {
                if m.is_left_down() {
                    if let Some(date) = self.hit_test(m.x, m.y) {
                        self.set_cursor(date);
                        return self.pick(date);
                    }
                    return CalendarAction::None;
                }
                match m.kind {
                    MouseEventKind::ScrollUp => self.page_months(-1),
                    MouseEventKind::ScrollDown => self.page_months(1),
                    _ => CalendarAction::None,
                }
            }
            InputEvent::Paste(_) => CalendarAction::None,
        }
    }

    pub fn render_ref(&mut self, area: Rect, buf: &mut Buffer) {
        let selection = self.selection;
        self.render_with(area, buf, &selection);
    }

    /// Renders with an externally owned selection, used by the date and
    /// date-range pickers.
    pub fn render_with(&mut self, area: Rect, buf: &mut Buffer, selection: &Selection) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        self.area = area;
        buf.set_style(area, self.options.style);

        let header = format!(
            "{} {}",
            MONTHS[(self.month.month() - 1) as usize],
            self.month.year()
        );
        let pad = (area.width as usize).saturating_sub(header.chars().count()) / 2;
        render::render_line_clipped(
            area.x + pad as u16,
            area.y,
            0,
            area.width,
            buf,
            &header,
            self.options.header_style,
        );

        if area.height < 2 {
            return;
        }
        let labels = calendar::weekday_labels(self.options.week_start);
        for (col, label) in labels.iter().enumerate() {
            render::render_line_clipped(
                area.x + col as u16 * 3,
                area.y + 1,
                0,
                2,
                buf,
                label,
                self.options.weekday_style,
            );
        }

        let grid = calendar::month_grid(self.month, self.options.week_start, self.today, selection);
        for (i, day) in grid.iter().enumerate() {
            let row = (i / calendar::GRID_COLS) as u16;
            let col = (i % calendar::GRID_COLS) as u16;
            let y = area.y + 2 + row;
            if y >= area.y + area.height {
                break;
            }
            let mut style = if day.in_current_month && self.selectable(day.date) {
                self.options.style
            } else {
                self.options.outside_style
            };
            if day.is_in_range {
                style = self.options.in_range_style;
            }
            if day.is_today {
                style = style.patch(self.options.today_style);
            }
            if day.is_selected {
                style = style.patch(self.options.selected_style);
            }
            if day.date == self.cursor {
                style = style.patch(self.options.cursor_style);
            }
            let cell = format!("{:>2}", day.date.day());
            render::render_line_clipped(area.x + col * 3, y, 0, 2, buf, &cell, style);
        }
    }

    fn pick(&mut self, date: NaiveDate) -> CalendarAction {
        if !self.selectable(date) {
            return CalendarAction::None;
        }
        self.selection = Selection::Single(date);
        CalendarAction::Picked(date)
    }

    fn selectable(&self, date: NaiveDate) -> bool {
        self.options.min.is_none_or(|min| date >= min)
            && self.options.max.is_none_or(|max| date <= max)
    }

    fn handle_key(&mut self, key: KeyEvent) -> CalendarAction {
        match key.code {
            KeyCode::Left => self.move_days(-1),
            KeyCode::Right => self.move_days(1),
            KeyCode::Up => self.move_days(-7),
            KeyCode::Down => self.move_days(7),
            KeyCode::PageUp => {
                if key.modifiers.ctrl {
                    self.page_years(-1)
                } else {
                    self.page_months(-1)
                }
            }
            KeyCode::PageDown => {
                if key.modifiers.ctrl {
                    self.page_years(1)
                } else {
                    self.page_months(1)
                }
            }
            KeyCode::Home => {
                self.cursor = self.month.first_day();
                CalendarAction::Redraw
            }
            KeyCode::End => {
                self.cursor = clamp_day(self.month, 31);
                CalendarAction::Redraw
            }
            KeyCode::Enter => {
                let date = self.cursor;
                self.pick(date)
            }
            _ => CalendarAction::None,
        }
    }

    fn move_days(&mut self, delta: i64) -> CalendarAction {
        let moved = if delta < 0 {
            self.cursor.checked_sub_days(Days::new(delta.unsigned_abs()))
        } else {
            self.cursor.checked_add_days(Days::new(delta as u64))
        };
        if let Some(date) = moved {
            self.set_cursor(date);
        }
        CalendarAction::Redraw
    }

    fn page_months(&mut self, delta: i32) -> CalendarAction {
        self.month = self.month.add_months(delta);
        self.cursor = clamp_day(self.month, self.cursor.day());
        CalendarAction::Redraw
    }

    fn page_years(&mut self, delta: i32) -> CalendarAction {
        self.month = self.month.add_years(delta);
        self.cursor = clamp_day(self.month, self.cursor.day());
        CalendarAction::Redraw
    }

    fn hit_test(&self, x: u16, y: u16) -> Option<NaiveDate> {
        let area = self.area;
        if area.width == 0 || !popup::contains(area, x, y) || y < area.y + 2 {
            return None;
        }
        let col = (x - area.x) / 3;
        let row = (y - area.y - 2) as usize;
        if col as usize >= calendar::GRID_COLS || row >= calendar::GRID_WEEKS {
            return None;
        }
        let origin = calendar::grid_origin(self.month, self.options.week_start);
        origin.checked_add_days(Days::new((row * calendar::GRID_COLS + col as usize) as u64))
    }
}

/// A valid date in `ym` at most `day` days in, clamped to the month length.
fn clamp_day(ym: YearMonth, day: u32) -> NaiveDate {
    let day = day.min(ym.days()).max(1);
    NaiveDate::from_ymd_opt(ym.year(), ym.month(), day).unwrap_or(ym.first_day())
}

impl FormControl for CalendarPopup {
    fn handle_event(&mut self, event: InputEvent) -> ControlAction {
        match CalendarPopup::handle_event(self, event) {
            CalendarAction::None => ControlAction::None,
            CalendarAction::Redraw => ControlAction::Redraw,
            CalendarAction::Picked(date) => ControlAction::Changed {
                value: Some(FormValue::Date(date)),
                complete: true,
            },
        }
    }

    fn render_ref(&mut self, area: Rect, buf: &mut Buffer) {
        CalendarPopup::render_ref(self, area, buf);
    }

    fn value(&self) -> Option<FormValue> {
        match self.selection {
            Selection::Single(date) => Some(FormValue::Date(date)),
            _ => None,
        }
    }

    fn is_complete(&self) -> bool {
        matches!(self.selection, Selection::Single(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui_forms_core::input::ctrl;
    use ratatui_forms_core::input::KeyModifiers;
    use ratatui_forms_core::input::MouseButton;
    use ratatui_forms_core::input::MouseEvent;
    use ratatui_forms_core::input::MouseEventKind;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn popup_at(d: NaiveDate) -> CalendarPopup {
        CalendarPopup::starting_at(d)
    }

    #[test]
    fn arrows_move_the_day_cursor_across_months() {
        let mut cal = popup_at(date(2024, 5, 31));
        cal.handle_event(InputEvent::Key(KeyEvent::new(KeyCode::Right)));
        assert_eq!(cal.cursor(), date(2024, 6, 1));
        assert_eq!(cal.month(), YearMonth::of(date(2024, 6, 1)));
        cal.handle_event(InputEvent::Key(KeyEvent::new(KeyCode::Up)));
        assert_eq!(cal.cursor(), date(2024, 5, 25));
    }

    #[test]
    fn paging_clamps_the_day() {
        let mut cal = popup_at(date(2024, 3, 31));
        cal.handle_event(InputEvent::Key(KeyEvent::new(KeyCode::PageUp)));
        assert_eq!(cal.cursor(), date(2024, 2, 29));
        cal.handle_event(InputEvent::Key(ctrl(KeyCode::PageUp)));
        assert_eq!(cal.cursor(), date(2023, 2, 28));
    }

    #[test]
    fn enter_picks_the_cursor_date() {
        let mut cal = popup_at(date(2024, 5, 20));
        let action = cal.handle_event(InputEvent::Key(KeyEvent::new(KeyCode::Enter)));
        assert_eq!(action, CalendarAction::Picked(date(2024, 5, 20)));
        assert_eq!(cal.selection(), Selection::Single(date(2024, 5, 20)));
    }

    #[test]
    fn mouse_click_picks_a_cell() {
        let mut cal = popup_at(date(2024, 5, 15));
        let mut buf = Buffer::empty(Rect::new(0, 0, GRID_WIDTH, GRID_HEIGHT));
        cal.render_ref(Rect::new(0, 0, GRID_WIDTH, GRID_HEIGHT), &mut buf);
        // Row 2, col 0 is the grid origin: Monday 2024-04-29.
        let action = cal.handle_event(InputEvent::Mouse(MouseEvent {
            x: 0,
            y: 2,
            kind: MouseEventKind::Down(MouseButton::Left),
            modifiers: KeyModifiers::none(),
        }));
        assert_eq!(action, CalendarAction::Picked(date(2024, 4, 29)));
    }

    #[test]
    fn picks_outside_the_selectable_range_are_ignored() {
        let mut cal = popup_at(date(2024, 5, 15)).with_options(CalendarPopupOptions {
            min: Some(date(2024, 5, 10)),
            max: Some(date(2024, 5, 20)),
            ..CalendarPopupOptions::default()
        });
        cal.set_cursor(date(2024, 5, 21));
        let action = cal.handle_event(InputEvent::Key(KeyEvent::new(KeyCode::Enter)));
        assert_eq!(action, CalendarAction::None);
        assert_eq!(cal.selection(), Selection::None);
        cal.set_cursor(date(2024, 5, 20));
        let action = cal.handle_event(InputEvent::Key(KeyEvent::new(KeyCode::Enter)));
        assert_eq!(action, CalendarAction::Picked(date(2024, 5, 20)));
    }

    #[test]
    fn render_marks_today_and_selection() {
        let mut cal = popup_at(date(2024, 5, 15));
        cal.set_selection(Selection::Single(date(2024, 5, 10)));
        let mut buf = Buffer::empty(Rect::new(0, 0, GRID_WIDTH, GRID_HEIGHT));
        cal.render_ref(Rect::new(0, 0, GRID_WIDTH, GRID_HEIGHT), &mut buf);
        let header: String = (0..GRID_WIDTH)
            .filter_map(|x| buf.cell((x, 0)).map(|c| c.symbol().to_string()))
            .collect();
        assert!(header.contains("May 2024"));
    }
}
