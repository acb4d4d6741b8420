//! `ratatui-forms` provides form input widgets for ratatui: masked text,
//! numbers, dates, date ranges, times, and selects.
//!
//! Every widget follows the same shape: it owns its editing state, consumes
//! [`input::InputEvent`]s, returns a widget-specific action enum from
//! `handle_event`, and draws itself with `render_ref`. Value-change actions
//! carry the validated value plus a completeness flag; keystrokes that do
//! not fit the configured format are silently dropped.
//!
//! Useful entry points:
//! - [`masked_input::MaskedInput`]: format-mask text field.
//! - [`number_input::NumberInput`]: grouped, clamped numeric field.
//! - [`date_picker::DatePicker`] / [`date_range_picker::DateRangePicker`]:
//!   masked date entry with a calendar popup.
//! - [`time_picker::TimePicker`]: `##:##` field with a suggestion list.
//! - [`select_input::SelectInput`]: dropdown over a fixed option list.
//! - [`registry::Registry`]: name → factory map for schema-driven hosts.
//!
//! The editing engine (mask grammar, numeric formatting, calendar/range
//! state) lives in `ratatui-forms-core` and is re-exported here.

pub mod calendar_popup;
pub mod date_picker;
pub mod date_range_picker;
pub mod masked_input;
pub mod number_input;
pub mod registry;
pub mod select_input;
pub mod text_input;
pub mod theme;
pub mod time_picker;

pub use ratatui_forms_core::calendar;
pub use ratatui_forms_core::input;
pub use ratatui_forms_core::mask;
pub use ratatui_forms_core::masked;
pub use ratatui_forms_core::numeric;
pub use ratatui_forms_core::popup;
pub use ratatui_forms_core::range;
pub use ratatui_forms_core::render;

#[cfg(feature = "crossterm")]
pub use ratatui_forms_core::crossterm_input;
