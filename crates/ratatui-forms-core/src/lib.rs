//! `ratatui-forms-core` is the editing engine behind the `ratatui-forms`
//! widgets.
//!
//! Everything here is plain state plus pure transition functions, so the
//! constrained-input behavior (mask grammar, cursor math, numeric
//! formatting, calendar/range selection) can be tested without a terminal.
//!
//! ## Design goals
//!
//! - Event-loop agnostic: you drive input + rendering from your app.
//! - No async runtime, no logging: all state transitions run synchronously
//!   inside one input event.
//! - Rejected input is a silent no-op, never an error; configuration
//!   mistakes ([`mask::MaskError`]) surface once, at descriptor parse time.
//!
//! ## Getting started
//!
//! Most users should depend on the facade crate `ratatui-forms`. Use this
//! crate directly if you only need the engine state types:
//!
//! - [`masked::MaskedState`]: slot storage + cursor for a format mask.
//! - [`numeric::NumberState`]: grouped numeric editing with clamping.
//! - [`calendar::month_grid`]: the 42-cell month projection.
//! - [`range::RangeSelection`]: the two-click range state machine.
//! - [`popup::PopupState`]: open/close/dismiss for transient overlays.

pub mod calendar;

#[cfg(feature = "crossterm")]
pub mod crossterm_input;

pub mod input;
pub mod mask;
pub mod masked;
pub mod numeric;
pub mod popup;
pub mod range;
pub mod render;
