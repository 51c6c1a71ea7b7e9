//! Month grid computation.
//!
//! A month is always laid out as six weeks of seven days, starting on a
//! Sunday. Cells before the 1st are filled with the tail of the previous
//! month, cells after the last day count up from 1 again.

use chrono::{Datelike, Duration, Month, NaiveDate};
use itertools::Itertools;
use num_traits::FromPrimitive;
use std::fmt;
use std::ops::{Add, Sub};

pub const WEEK_DAYS: usize = 7;
pub const GRID_ROWS: usize = 6;
pub const GRID_CELLS: usize = WEEK_DAYS * GRID_ROWS;

pub fn days_of_month(month: &Month, year: i32) -> u32 {
    let index = MonthIndex::new(*month, year);

    index
        .succ()
        .first_day()
        .signed_duration_since(index.first_day())
        .num_days() as u32
}

fn month_from_index0(month0: u32) -> Month {
    Month::from_u32(month0 + 1).unwrap_or(Month::January)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthIndex {
    month: Month,
    year: i32,
}

impl MonthIndex {
    pub fn new(month: Month, year: i32) -> Self {
        MonthIndex { month, year }
    }

    /// Builds an index from a zero-based month (0 = January).
    pub fn from_month0(year: i32, month0: u32) -> Option<Self> {
        Month::from_u32(month0 + 1).map(|month| MonthIndex::new(month, year))
    }

    pub fn month(&self) -> Month {
        self.month
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month0(&self) -> u32 {
        self.month.number_from_month() - 1
    }

    pub fn number(&self) -> u32 {
        self.month.number_from_month()
    }

    /// Moves by `delta` months, rolling the year over in either direction.
    pub fn offset(&self, delta: i32) -> Self {
        let total = self.year as i64 * 12 + self.month0() as i64 + delta as i64;

        MonthIndex {
            month: month_from_index0(total.rem_euclid(12) as u32),
            year: total.div_euclid(12) as i32,
        }
    }

    pub fn succ(&self) -> Self {
        self.offset(1)
    }

    pub fn pred(&self) -> Self {
        self.offset(-1)
    }

    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.number(), 1)
            .expect("month index outside of the supported date range")
    }

    pub fn num_days(&self) -> u32 {
        days_of_month(&self.month, self.year)
    }
}

impl<T: Datelike> From<T> for MonthIndex {
    fn from(m: T) -> Self {
        MonthIndex::new(month_from_index0(m.month0()), m.year())
    }
}

impl Add<i32> for MonthIndex {
    type Output = MonthIndex;
    fn add(self, rhs: i32) -> Self::Output {
        self.offset(rhs)
    }
}

impl Sub<i32> for MonthIndex {
    type Output = MonthIndex;
    fn sub(self, rhs: i32) -> Self::Output {
        self.offset(-rhs)
    }
}

impl fmt::Display for MonthIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:02}", self.year, self.number())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonthRelation {
    Previous,
    Current,
    Next,
}

/// True for cells that can only hold a day of the previous month.
pub fn is_previous_month(position: usize, day_num: u8) -> bool {
    position <= 13 && day_num > 13
}

/// True for cells that can only hold a day of the next month.
pub fn is_next_month(position: usize, day_num: u8) -> bool {
    position > 28 && day_num <= 21
}

pub fn classify(position: usize, day_num: u8) -> MonthRelation {
    if is_previous_month(position, day_num) {
        MonthRelation::Previous
    } else if is_next_month(position, day_num) {
        MonthRelation::Next
    } else {
        MonthRelation::Current
    }
}

/// Month distance (-1, 0 or 1) of a cell relative to the displayed month.
pub fn month_delta(position: usize, day_num: u8) -> i32 {
    match classify(position, day_num) {
        MonthRelation::Previous => -1,
        MonthRelation::Current => 0,
        MonthRelation::Next => 1,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayCell {
    day_num: u8,
    relation: MonthRelation,
}

impl DayCell {
    pub fn new(day_num: u8, relation: MonthRelation) -> Self {
        DayCell { day_num, relation }
    }

    pub fn day_num(&self) -> u8 {
        self.day_num
    }

    pub fn relation(&self) -> MonthRelation {
        self.relation
    }

    pub fn is_current(&self) -> bool {
        self.relation == MonthRelation::Current
    }
}

impl fmt::Display for DayCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.day_num.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarGrid {
    cells: Vec<DayCell>,
    month: MonthIndex,
    leading: usize,
    today_position: Option<usize>,
    selected_position: Option<usize>,
}

impl CalendarGrid {
    /// Lays out `month` on a 42 cell grid.
    ///
    /// `offset_applied` is the distance of `month` from the real current
    /// month; today's cell is only marked when it is zero. `selected_day`
    /// is resolved to a grid position if it names a day of `month`.
    pub fn compute(
        month: MonthIndex,
        offset_applied: i32,
        today: NaiveDate,
        selected_day: Option<u32>,
    ) -> Self {
        let first = month.first_day();
        let leading = match first.weekday().num_days_from_sunday() as usize {
            // The grid never starts on the 1st, a whole week of the
            // previous month is shown instead.
            0 => WEEK_DAYS,
            n => n,
        };

        let mut cells = Vec::with_capacity(GRID_CELLS);

        let sunday = first - Duration::days(leading as i64);
        cells.extend((0..leading).map(|i| {
            DayCell::new((sunday.day() as usize + i) as u8, MonthRelation::Previous)
        }));

        let mut selected_position = None;
        for day in 1..=month.num_days() {
            if Some(day) == selected_day {
                selected_position = Some(cells.len());
            }
            cells.push(DayCell::new(day as u8, MonthRelation::Current));
        }

        // Plain counter, not derived from the following month's length.
        let mut next_day = 1;
        while cells.len() < GRID_CELLS {
            cells.push(DayCell::new(next_day, MonthRelation::Next));
            next_day += 1;
        }

        debug_assert!(cells
            .iter()
            .enumerate()
            .all(|(pos, cell)| classify(pos, cell.day_num) == cell.relation));

        let today_position = if offset_applied == 0 {
            Some(today.day0() as usize + leading)
        } else {
            None
        };

        log::trace!(
            "computed grid for {} (leading {}, today {:?}, selected {:?})",
            month,
            leading,
            today_position,
            selected_position
        );

        CalendarGrid {
            cells,
            month,
            leading,
            today_position,
            selected_position,
        }
    }

    pub fn cells(&self) -> &[DayCell] {
        &self.cells
    }

    pub fn cell(&self, position: usize) -> &DayCell {
        &self.cells[position]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[DayCell]> {
        self.cells.chunks(WEEK_DAYS)
    }

    pub fn month(&self) -> MonthIndex {
        self.month
    }

    pub fn year(&self) -> i32 {
        self.month.year()
    }

    pub fn month0(&self) -> u32 {
        self.month.month0()
    }

    /// Number of previous-month cells in front of the 1st (1..=7).
    pub fn leading_count(&self) -> usize {
        self.leading
    }

    pub fn today_position(&self) -> Option<usize> {
        self.today_position
    }

    pub fn selected_position(&self) -> Option<usize> {
        self.selected_position
    }

    pub fn title(&self) -> String {
        self.month.to_string()
    }
}

impl fmt::Display for CalendarGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title())?;
        for row in self.rows() {
            writeln!(f, "{}", row.iter().map(|c| format!("{:>2}", c)).join(" "))?;
        }
        Ok(())
    }
}
