//! Calendar model: month navigation and the 6×7 day grid.
//!
//! The grid is a pure projection. Selection state lives in the caller (a
//! single date or a [`RangeSpan`]) and is folded into the per-cell flags on
//! every call, so the grid can never desynchronize from it.

use chrono::Datelike;
use chrono::Days;
use chrono::NaiveDate;
use chrono::Weekday;

use crate::range::RangeSpan;

pub const GRID_WEEKS: usize = 6;
pub const GRID_COLS: usize = 7;
/// Grids always hold 6 full weeks so the popup height is stable across
/// months.
pub const GRID_CELLS: usize = GRID_WEEKS * GRID_COLS;

pub type DateRange = RangeSpan<NaiveDate>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn first_day(&self) -> NaiveDate {
        // month is validated at construction, day 1 always exists
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .unwrap_or(NaiveDate::MIN)
    }

    pub fn days(&self) -> u32 {
        let next = self.add_months(1).first_day();
        next.signed_duration_since(self.first_day()).num_days() as u32
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// Month arithmetic with year carry; `delta` may be negative.
    pub fn add_months(&self, delta: i32) -> Self {
        let total = self.year * 12 + self.month as i32 - 1 + delta;
        Self {
            year: total.div_euclid(12),
            month: (total.rem_euclid(12) + 1) as u32,
        }
    }

    pub fn add_years(&self, delta: i32) -> Self {
        Self {
            year: self.year + delta,
            month: self.month,
        }
    }
}

/// What the grid should mark as selected.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    None,
    Single(NaiveDate),
    Range(DateRange),
}

impl Selection {
    fn is_selected(&self, date: NaiveDate) -> bool {
        match self {
            Selection::None => false,
            Selection::Single(d) => *d == date,
            Selection::Range(range) => range.start == Some(date) || range.end == Some(date),
        }
    }

    fn is_in_range(&self, date: NaiveDate) -> bool {
        match self {
            Selection::Range(range) => range.contains(date),
            _ => false,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub in_current_month: bool,
    pub is_today: bool,
    pub is_selected: bool,
    pub is_in_range: bool,
}

/// First grid cell: the most recent `week_start` weekday on or before the
/// 1st of the month.
pub fn grid_origin(ym: YearMonth, week_start: Weekday) -> NaiveDate {
    let first = ym.first_day();
    let back = (first.weekday().num_days_from_monday() + 7
        - week_start.num_days_from_monday())
        % 7;
    first
        .checked_sub_days(Days::new(back as u64))
        .unwrap_or(first)
}

/// Produces the 42-cell month grid, row-major, starting at
/// [`grid_origin`]. Always exactly [`GRID_CELLS`] cells regardless of month
/// length.
pub fn month_grid(
    ym: YearMonth,
    week_start: Weekday,
    today: NaiveDate,
    selection: &Selection,
) -> Vec<CalendarDay> {
    let origin = grid_origin(ym, week_start);
    (0..GRID_CELLS as u64)
        .map(|i| {
            let date = origin.checked_add_days(Days::new(i)).unwrap_or(origin);
            CalendarDay {
                date,
                in_current_month: ym.contains(date),
                is_today: date == today,
                is_selected: selection.is_selected(date),
                is_in_range: selection.is_in_range(date),
            }
        })
        .collect()
}

/// Weekday labels for the grid header, in display order from `week_start`.
pub fn weekday_labels(week_start: Weekday) -> [&'static str; GRID_COLS] {
    const LABELS: [&str; 7] = ["Mo", "Tu", "We", "Th", "Fr", "Sa", "Su"];
    let mut out = [""; GRID_COLS];
    let offset = week_start.num_days_from_monday() as usize;
    for (i, slot) in out.iter_mut().enumerate() {
        *slot = LABELS[(offset + i) % 7];
    }
    out
}
