use ratatui::style::Style;

/// A coherent set of styles shared by the form widgets. Widget options
/// default to these values; override per widget or swap the whole theme.
#[derive(Clone, Debug)]
pub struct Theme {
    pub text: Style,
    /// Placeholder hints and unfilled mask slots.
    pub hint: Style,
    pub cursor: Style,
    pub header: Style,
    /// Calendar days outside the displayed month.
    pub outside: Style,
    pub today: Style,
    pub selected: Style,
    pub in_range: Style,
    pub popup: Style,
}

impl Default for Theme {
    fn default() -> Self {
        use ratatui::style::Modifier;
        use ratatui::style::Stylize;

        Self {
            text: Style::default(),
            hint: Style::default().dark_gray(),
            cursor: Style::default().add_modifier(Modifier::REVERSED),
            header: Style::default().bold(),
            outside: Style::default().dark_gray(),
            today: Style::default().underlined(),
            selected: Style::default().add_modifier(Modifier::REVERSED),
            in_range: Style::default().on_dark_gray(),
            popup: Style::default(),
        }
    }
}
