//! Month navigation and date selection.
//!
//! The controller owns the displayed month offset, the current selection and
//! the grid computed for both. All state changes go through `handle_tap`,
//! `handle_long_press`, `handle_gesture` and `navigate`.

use std::fmt;

use crate::clock::{Clock, SystemClock};
use crate::gesture::Gesture;
use crate::grid::{self, CalendarGrid, MonthIndex, GRID_CELLS, WEEK_DAYS};
use crate::hit::{self, PanelGeometry, Region};

/// Largest distance in months from the current month that can be shown.
pub const MAX_MONTH_OFFSET: i32 = 12 * 10_000;

/// Parses a month offset, rejecting values beyond `MAX_MONTH_OFFSET`.
pub fn parse_month_offset(s: &str) -> Result<i32, String> {
    let offset: i32 = s.trim().parse().map_err(|e| format!("{}", e))?;
    if !(-MAX_MONTH_OFFSET..=MAX_MONTH_OFFSET).contains(&offset) {
        return Err(format!(
            "month offset {} outside of -{}..={}",
            offset, MAX_MONTH_OFFSET, MAX_MONTH_OFFSET
        ));
    }
    Ok(offset)
}

/// A day resolved to its calendar month, with a 1-based month number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl fmt::Display for ResolvedDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub position: usize,
    pub month_offset: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    GridChanged,
    DateClicked(ResolvedDate),
    DateLongPressed(ResolvedDate),
    Ignored,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::GridChanged => write!(f, "grid-changed"),
            Outcome::DateClicked(date) => write!(f, "date-click {}", date),
            Outcome::DateLongPressed(date) => write!(f, "date-long-click {}", date),
            Outcome::Ignored => write!(f, "ignored"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellStyle {
    Today,
    OtherMonth,
    Weekend,
    Normal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Press {
    Click,
    LongClick,
}

pub type DateListener = Box<dyn FnMut(ResolvedDate)>;

pub struct NavigationController<C: Clock = SystemClock> {
    clock: C,
    month_offset: i32,
    selection: Option<Selection>,
    grid: CalendarGrid,
    on_date_click: Option<DateListener>,
    on_date_long_click: Option<DateListener>,
}

impl<C: Clock> NavigationController<C> {
    pub fn new(clock: C) -> Self {
        Self::with_offset(clock, 0)
    }

    pub fn with_offset(clock: C, month_offset: i32) -> Self {
        let grid = Self::compute(&clock, month_offset, None);

        NavigationController {
            clock,
            month_offset,
            selection: None,
            grid,
            on_date_click: None,
            on_date_long_click: None,
        }
    }

    fn compute(clock: &C, month_offset: i32, selected_day: Option<u32>) -> CalendarGrid {
        let today = clock.today();
        let month = MonthIndex::from(today).offset(month_offset);

        CalendarGrid::compute(month, month_offset, today, selected_day)
    }

    fn recompute(&mut self, selected_day: Option<u32>) {
        self.grid = Self::compute(&self.clock, self.month_offset, selected_day);
    }

    pub fn set_on_date_click<F: FnMut(ResolvedDate) + 'static>(&mut self, listener: F) {
        self.on_date_click = Some(Box::new(listener));
    }

    pub fn set_on_date_long_click<F: FnMut(ResolvedDate) + 'static>(&mut self, listener: F) {
        self.on_date_long_click = Some(Box::new(listener));
    }

    pub fn grid(&self) -> &CalendarGrid {
        &self.grid
    }

    pub fn month_offset(&self) -> i32 {
        self.month_offset
    }

    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    pub fn navigate(&mut self, delta: i32) -> Outcome {
        self.month_offset += delta;
        self.recompute(None);
        log::debug!(
            "showing {} (offset {})",
            self.grid.month(),
            self.month_offset
        );

        Outcome::GridChanged
    }

    pub fn handle_tap(&mut self, region: Region) -> Outcome {
        self.dispatch(region, Press::Click)
    }

    /// Without a long click listener a long press is handled as a tap.
    pub fn handle_long_press(&mut self, region: Region) -> Outcome {
        if self.on_date_long_click.is_none() {
            self.dispatch(region, Press::Click)
        } else {
            self.dispatch(region, Press::LongClick)
        }
    }

    /// Resolves a classified gesture against the panel and handles it.
    pub fn handle_gesture(
        &mut self,
        gesture: Gesture,
        geometry: &PanelGeometry,
        panel_width: f32,
        panel_height: f32,
    ) -> Outcome {
        match gesture {
            Gesture::Tap { x, y } => {
                self.handle_tap(hit::hit_test(x, y, geometry, panel_width, panel_height))
            }
            Gesture::LongPress { x, y } => {
                self.handle_long_press(hit::hit_test(x, y, geometry, panel_width, panel_height))
            }
            Gesture::Cancelled => Outcome::Ignored,
        }
    }

    fn dispatch(&mut self, region: Region, press: Press) -> Outcome {
        match region {
            Region::PrevButton => self.navigate(-1),
            Region::NextButton => self.navigate(1),
            Region::DateCell(position) => self.press_cell(position, press),
            Region::None => Outcome::Ignored,
        }
    }

    fn press_cell(&mut self, position: usize, press: Press) -> Outcome {
        assert!(
            position < GRID_CELLS,
            "date cell position {} outside of the {} cell grid",
            position,
            GRID_CELLS
        );

        let day = self.grid.cell(position).day_num();
        let delta = grid::month_delta(position, day);
        let month = self.grid.month().offset(delta);
        let date = ResolvedDate {
            year: month.year(),
            month: month.number(),
            day: day as u32,
        };

        match press {
            Press::LongClick => {
                log::info!("date long clicked: {}", date);
                if let Some(listener) = self.on_date_long_click.as_mut() {
                    listener(date);
                }

                Outcome::DateLongPressed(date)
            }
            Press::Click => {
                log::info!("date clicked: {}", date);
                if let Some(listener) = self.on_date_click.as_mut() {
                    listener(date);
                }

                self.month_offset += delta;
                let mut selection = Selection {
                    position,
                    month_offset: self.month_offset,
                };

                if delta != 0 {
                    self.recompute(Some(date.day));
                    if let Some(resolved) = self.grid.selected_position() {
                        selection.position = resolved;
                    }
                    log::debug!(
                        "moved to {} (offset {})",
                        self.grid.month(),
                        self.month_offset
                    );
                } else {
                    self.recompute(None);
                }
                self.selection = Some(selection);

                Outcome::DateClicked(date)
            }
        }
    }

    /// Cell to draw highlighted: the selection if it belongs to the shown
    /// month, otherwise today while nothing was selected yet.
    pub fn highlighted_position(&self) -> Option<usize> {
        match self.selection {
            Some(selection) if selection.month_offset == self.month_offset => {
                Some(selection.position)
            }
            Some(_) => None,
            None if self.month_offset == 0 => self.grid.today_position(),
            None => None,
        }
    }

    pub fn cell_style(&self, position: usize) -> CellStyle {
        let day = self.grid.cell(position).day_num();
        let column = position % WEEK_DAYS;

        if self.grid.today_position() == Some(position) {
            CellStyle::Today
        } else if grid::is_previous_month(position, day) || grid::is_next_month(position, day) {
            CellStyle::OtherMonth
        } else if column == 0 || column == WEEK_DAYS - 1 {
            CellStyle::Weekend
        } else {
            CellStyle::Normal
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::gesture::{GestureClassifier, PointerKind, PointerSample};
    use crate::grid::MonthRelation;
    use chrono::NaiveDate;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn controller() -> NavigationController<FixedClock> {
        NavigationController::new(FixedClock(
            NaiveDate::from_ymd_opt(2016, 12, 2).unwrap(),
        ))
    }

    fn recorder() -> (Rc<RefCell<Vec<ResolvedDate>>>, impl FnMut(ResolvedDate)) {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = events.clone();
        (events, move |date| sink.borrow_mut().push(date))
    }

    fn date(year: i32, month: u32, day: u32) -> ResolvedDate {
        ResolvedDate { year, month, day }
    }

    #[test]
    fn month_offset_bounds() {
        assert_eq!(parse_month_offset("-3"), Ok(-3));
        assert_eq!(parse_month_offset("120000"), Ok(MAX_MONTH_OFFSET));
        assert!(parse_month_offset("120001").is_err());
        assert!(parse_month_offset("-2147483648").is_err());
        assert!(parse_month_offset("ten").is_err());

        let ctrl = NavigationController::with_offset(
            FixedClock(NaiveDate::from_ymd_opt(2016, 12, 2).unwrap()),
            -MAX_MONTH_OFFSET,
        );
        assert_eq!(ctrl.grid().title(), "-7984-12");
    }

    #[test]
    fn starts_at_current_month() {
        let ctrl = controller();

        assert_eq!(ctrl.month_offset(), 0);
        assert_eq!(ctrl.grid().title(), "2016-12");
        assert_eq!(ctrl.grid().today_position(), Some(5));
        assert_eq!(ctrl.highlighted_position(), Some(5));
        assert_eq!(ctrl.cell_style(5), CellStyle::Today);
    }

    #[test]
    fn tap_previous_month_cell() {
        let mut ctrl = controller();
        let (events, listener) = recorder();
        ctrl.set_on_date_click(listener);

        // Position 2 shows November 29th
        let outcome = ctrl.handle_tap(Region::DateCell(2));

        assert_eq!(outcome, Outcome::DateClicked(date(2016, 11, 29)));
        assert_eq!(*events.borrow(), vec![date(2016, 11, 29)]);
        assert_eq!(ctrl.month_offset(), -1);
        assert_eq!(ctrl.grid().title(), "2016-11");

        // November 2016 starts on a Tuesday
        let selection = ctrl.selection().unwrap();
        assert_eq!(selection.month_offset, -1);
        assert_eq!(selection.position, 2 + 28);
        assert_eq!(ctrl.grid().cell(selection.position).day_num(), 29);
        assert_eq!(ctrl.highlighted_position(), Some(30));
    }

    #[test]
    fn tap_next_month_cell_rolls_year_over() {
        let mut ctrl = controller();
        let (events, listener) = recorder();
        ctrl.set_on_date_click(listener);

        let outcome = ctrl.handle_tap(Region::DateCell(36));

        assert_eq!(outcome, Outcome::DateClicked(date(2017, 1, 2)));
        assert_eq!(*events.borrow(), vec![date(2017, 1, 2)]);
        assert_eq!(ctrl.month_offset(), 1);
        assert_eq!(ctrl.grid().title(), "2017-01");
        // January 2017 starts on a Sunday, a full week precedes it
        assert_eq!(ctrl.selection().unwrap().position, 8);
    }

    #[test]
    fn tap_current_month_cell_keeps_month() {
        let mut ctrl = controller();

        let outcome = ctrl.handle_tap(Region::DateCell(20));

        assert_eq!(outcome, Outcome::DateClicked(date(2016, 12, 17)));
        assert_eq!(ctrl.month_offset(), 0);
        assert_eq!(
            ctrl.selection(),
            Some(Selection {
                position: 20,
                month_offset: 0
            })
        );
        assert_eq!(ctrl.grid().selected_position(), None);
        assert_eq!(ctrl.highlighted_position(), Some(20));
    }

    #[test]
    fn selection_hidden_in_other_months() {
        let mut ctrl = controller();
        ctrl.handle_tap(Region::DateCell(20));

        ctrl.navigate(1);
        assert_eq!(ctrl.highlighted_position(), None);
        ctrl.navigate(-1);
        assert_eq!(ctrl.highlighted_position(), Some(20));
    }

    #[test]
    fn buttons_navigate() {
        let mut ctrl = controller();

        assert_eq!(ctrl.handle_tap(Region::NextButton), Outcome::GridChanged);
        assert_eq!(ctrl.grid().title(), "2017-01");
        assert_eq!(ctrl.grid().today_position(), None);

        assert_eq!(ctrl.handle_tap(Region::PrevButton), Outcome::GridChanged);
        assert_eq!(ctrl.grid(), controller().grid());
    }

    #[test]
    fn twelve_steps_back_is_one_year() {
        let mut ctrl = controller();

        for _ in 0..12 {
            ctrl.handle_tap(Region::PrevButton);
        }

        assert_eq!(ctrl.month_offset(), -12);
        assert_eq!(ctrl.grid().year(), 2015);
        assert_eq!(ctrl.grid().month0(), 11);
    }

    #[test]
    fn long_press_on_buttons_navigates() {
        let mut ctrl = controller();
        ctrl.set_on_date_long_click(|_| {});

        assert_eq!(ctrl.handle_long_press(Region::PrevButton), Outcome::GridChanged);
        assert_eq!(ctrl.month_offset(), -1);
    }

    #[test]
    fn long_press_reports_without_moving() {
        let mut ctrl = controller();
        let (clicks, click_listener) = recorder();
        let (long_clicks, long_listener) = recorder();
        ctrl.set_on_date_click(click_listener);
        ctrl.set_on_date_long_click(long_listener);

        let outcome = ctrl.handle_long_press(Region::DateCell(0));

        assert_eq!(outcome, Outcome::DateLongPressed(date(2016, 11, 27)));
        assert_eq!(*long_clicks.borrow(), vec![date(2016, 11, 27)]);
        assert!(clicks.borrow().is_empty());
        assert_eq!(ctrl.month_offset(), 0);
        assert_eq!(ctrl.selection(), None);
        assert_eq!(ctrl.grid().title(), "2016-12");
    }

    #[test]
    fn long_press_without_listener_is_a_tap() {
        let mut ctrl = controller();
        let (clicks, listener) = recorder();
        ctrl.set_on_date_click(listener);

        let outcome = ctrl.handle_long_press(Region::DateCell(0));

        assert_eq!(outcome, Outcome::DateClicked(date(2016, 11, 27)));
        assert_eq!(*clicks.borrow(), vec![date(2016, 11, 27)]);
        assert_eq!(ctrl.month_offset(), -1);
    }

    #[test]
    fn empty_region_is_ignored() {
        let mut ctrl = controller();
        assert_eq!(ctrl.handle_tap(Region::None), Outcome::Ignored);
        assert_eq!(ctrl.month_offset(), 0);
    }

    #[test]
    #[should_panic]
    fn out_of_range_cell_is_fatal() {
        controller().handle_tap(Region::DateCell(GRID_CELLS));
    }

    #[test]
    fn cell_styles() {
        let ctrl = controller();

        assert_eq!(ctrl.cell_style(0), CellStyle::OtherMonth);
        assert_eq!(ctrl.cell_style(40), CellStyle::OtherMonth);
        assert_eq!(ctrl.cell_style(6), CellStyle::Weekend);
        assert_eq!(ctrl.cell_style(7), CellStyle::Weekend);
        assert_eq!(ctrl.cell_style(8), CellStyle::Normal);
        assert_eq!(ctrl.grid().cell(8).relation(), MonthRelation::Current);
    }

    #[test]
    fn gestures_end_to_end() {
        let mut ctrl = controller();
        let geometry = PanelGeometry::default();
        let (width, height) = geometry.panel_size();
        let mut classifier = GestureClassifier::default();

        let samples = [
            PointerSample::new(PointerKind::Down, 10.0, 10.0, 0),
            PointerSample::new(PointerKind::Up, 10.0, 10.0, 120),
            PointerSample::new(PointerKind::Down, 300.0, 10.0, 1000),
            PointerSample::new(PointerKind::Move, 330.0, 10.0, 1100),
            PointerSample::new(PointerKind::Up, 330.0, 10.0, 1200),
        ];

        let outcomes: Vec<Outcome> = samples
            .iter()
            .filter_map(|s| classifier.feed(s, &geometry))
            .map(|g| ctrl.handle_gesture(g, &geometry, width, height))
            .collect();

        assert_eq!(outcomes, vec![Outcome::GridChanged, Outcome::Ignored]);
        assert_eq!(ctrl.month_offset(), -1);
    }

    #[test]
    fn outcome_display() {
        assert_eq!(
            Outcome::DateClicked(date(2016, 11, 29)).to_string(),
            "date-click 2016-11-29"
        );
        assert_eq!(Outcome::GridChanged.to_string(), "grid-changed");
    }
}
