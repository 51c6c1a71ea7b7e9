use std::fmt::{self, Display};
use std::io::{self, Write};

use termion::{cursor, style};

use super::Theme;
use crate::clock::Clock;
use crate::grid::{GRID_CELLS, WEEK_DAYS};
use crate::hit::PanelGeometry;
use crate::navigation::NavigationController;

pub struct DayCell<'a> {
    day_num: u8,
    selected: bool,
    is_today: bool,
    theme: &'a Theme,
}

impl<'a> DayCell<'a> {
    pub const CELL_WIDTH: u16 = 4;
    pub const CELL_HEIGHT: u16 = 2;

    fn new(day_num: u8, theme: &'a Theme) -> Self {
        DayCell {
            day_num,
            selected: false,
            is_today: false,
            theme,
        }
    }

    fn select(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    fn today(mut self, is_today: bool) -> Self {
        self.is_today = is_today;
        self
    }
}

impl Display for DayCell<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let arg_today = if self.is_today {
            self.theme.today_day_char.unwrap_or(' ')
        } else {
            ' '
        };

        let arg_focus = if self.selected {
            self.theme.focus_day_char.unwrap_or(' ')
        } else {
            ' '
        };

        write!(f, "{}{}{:>2}", arg_focus, arg_today, self.day_num)
    }
}

/// A month panel drawn on the terminal at a fixed origin.
///
/// Every day cell spans four columns and two rows, so the header and the
/// week label band take three rows each.
pub struct MonthPane<'a> {
    theme: &'a Theme,
    // 1-based terminal position of the top left corner
    origin: (u16, u16),
}

impl<'a> MonthPane<'a> {
    const HEADER: &'static [&'static str] = &["Su", "Mo", "Tu", "We", "Th", "Fr", "Sa"];

    pub fn new(theme: &'a Theme, origin: (u16, u16)) -> Self {
        MonthPane { theme, origin }
    }

    pub fn geometry() -> PanelGeometry {
        PanelGeometry {
            cell_width: DayCell::CELL_WIDTH as f32,
            cell_height: DayCell::CELL_HEIGHT as f32,
        }
    }

    pub fn size() -> (f32, f32) {
        Self::geometry().panel_size()
    }

    /// Maps a terminal position onto panel coordinates, aiming at the
    /// middle of the character cell.
    pub fn to_panel(&self, col: u16, row: u16) -> (f32, f32) {
        (
            col as f32 - self.origin.0 as f32 + 0.5,
            row as f32 - self.origin.1 as f32 + 0.5,
        )
    }

    fn label_style(&self, column: usize) -> &str {
        if column == 0 || column == WEEK_DAYS - 1 {
            &self.theme.weekend_day_style
        } else {
            ""
        }
    }

    fn goto(&self, col: f32, row: f32) -> cursor::Goto {
        cursor::Goto(self.origin.0 + col as u16, self.origin.1 + row as u16)
    }

    pub fn draw<W: Write, C: Clock>(
        &self,
        out: &mut W,
        controller: &NavigationController<C>,
    ) -> io::Result<()> {
        let geometry = Self::geometry();
        let (width, _) = Self::size();
        let grid = controller.grid();
        let header_row = geometry.header_height() / 2.0;

        let title = grid.title();
        write!(
            out,
            "{}{}<{}{}{}{}{}>{}",
            self.goto(1.0, header_row),
            self.theme.month_header_style,
            self.goto((width - title.len() as f32) / 2.0, header_row),
            title,
            style::Reset,
            self.goto(width - 2.0, header_row),
            self.theme.month_header_style,
            style::Reset,
        )?;

        let label_row = geometry.header_height() + geometry.week_row_height() / 2.0;
        write!(out, "{}", self.goto(0.0, label_row))?;
        for (column, &label) in Self::HEADER.iter().enumerate() {
            write!(
                out,
                "{}{}{:>width$}{}",
                self.theme.week_label_style,
                self.label_style(column),
                label,
                style::Reset,
                width = DayCell::CELL_WIDTH as usize
            )?;
        }

        let highlighted = controller.highlighted_position();
        for position in 0..GRID_CELLS {
            let column = (position % WEEK_DAYS) as f32;
            let row = (position / WEEK_DAYS) as f32;
            let cell = DayCell::new(grid.cell(position).day_num(), self.theme)
                .select(highlighted == Some(position))
                .today(grid.today_position() == Some(position));

            write!(
                out,
                "{}{}{}{}{}",
                self.goto(
                    column * geometry.cell_width,
                    geometry.grid_top() + row * geometry.cell_height
                ),
                self.theme.cell_style(controller.cell_style(position)),
                if highlighted == Some(position) {
                    self.theme.focus_day_style.as_str()
                } else {
                    ""
                },
                cell,
                style::Reset
            )?;
        }

        Ok(())
    }
}

/// Renders the controller's month as plain text, without escape sequences.
pub fn render_plain<C: Clock>(controller: &NavigationController<C>, theme: &Theme) -> String {
    let grid = controller.grid();
    let highlighted = controller.highlighted_position();
    let width = WEEK_DAYS * DayCell::CELL_WIDTH as usize;

    let mut text = format!("{:^width$}\n", grid.title(), width = width);
    for label in MonthPane::HEADER {
        text.push_str(&format!(
            "{:>width$}",
            label,
            width = DayCell::CELL_WIDTH as usize
        ));
    }
    text.push('\n');

    for (row, cells) in grid.rows().enumerate() {
        for (column, day) in cells.iter().enumerate() {
            let position = row * WEEK_DAYS + column;
            let cell = DayCell::new(day.day_num(), theme)
                .select(highlighted == Some(position))
                .today(grid.today_position() == Some(position));
            text.push_str(&cell.to_string());
        }
        text.push('\n');
    }

    text
}
