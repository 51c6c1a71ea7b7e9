use std::io::Write;
use std::time::Instant;

use termion::event::{Event as TermEvent, Key, MouseButton, MouseEvent};
use termion::{clear, cursor, style};

use super::{MonthPane, Theme};
use crate::clock::Clock;
use crate::config::Config;
use crate::events::{Dispatcher, Event};
use crate::gesture::{GestureClassifier, PointerKind, PointerSample};
use crate::navigation::{NavigationController, Outcome};

const PANE_ORIGIN: (u16, u16) = (3, 2);

pub struct App<C: Clock> {
    theme: Theme,
    controller: NavigationController<C>,
    classifier: GestureClassifier,
    started: Instant,
    status: Option<String>,
}

impl<C: Clock> App<C> {
    pub fn new(config: &Config, controller: NavigationController<C>) -> Self {
        App {
            theme: Theme::from_config(&config.theme),
            controller,
            classifier: GestureClassifier::new(config.long_press_ms),
            started: Instant::now(),
            status: None,
        }
    }

    pub fn controller(&self) -> &NavigationController<C> {
        &self.controller
    }

    fn timestamp(&self, at: Instant) -> u64 {
        at.saturating_duration_since(self.started).as_millis() as u64
    }

    fn pointer_sample(
        &self,
        pane: &MonthPane,
        mouse: MouseEvent,
        at: Instant,
    ) -> Option<PointerSample> {
        let (kind, col, row) = match mouse {
            MouseEvent::Press(MouseButton::Left, col, row) => (PointerKind::Down, col, row),
            MouseEvent::Hold(col, row) => (PointerKind::Move, col, row),
            MouseEvent::Release(col, row) => (PointerKind::Up, col, row),
            _ => return None,
        };
        let (x, y) = pane.to_panel(col, row);

        Some(PointerSample::new(kind, x, y, self.timestamp(at)))
    }

    /// Runs one pointer sample through gesture classification and
    /// navigation.
    pub fn handle_pointer(&mut self, sample: &PointerSample) -> Option<Outcome> {
        let geometry = MonthPane::geometry();
        let (width, height) = MonthPane::size();

        let gesture = self.classifier.feed(sample, &geometry)?;
        log::debug!("pointer gesture: {}", gesture);

        Some(
            self.controller
                .handle_gesture(gesture, &geometry, width, height),
        )
    }

    fn draw<W: Write>(&self, out: &mut W, pane: &MonthPane) -> std::io::Result<()> {
        write!(out, "{}", clear::All)?;
        pane.draw(out, &self.controller)?;

        let (_, height) = MonthPane::size();
        if let Some(status) = &self.status {
            write!(
                out,
                "{}{}{}{}",
                cursor::Goto(PANE_ORIGIN.0, PANE_ORIGIN.1 + height as u16 + 1),
                style::Italic,
                status,
                style::Reset
            )?;
        }

        out.flush()
    }

    pub fn run<W: Write>(
        &mut self,
        dispatcher: Dispatcher,
        out: &mut W,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let theme = self.theme.clone();
        let pane = MonthPane::new(&theme, PANE_ORIGIN);
        let mut run = true;

        write!(out, "{}", cursor::Hide)?;
        self.draw(out, &pane)?;

        while run {
            let outcome = match dispatcher.next()? {
                Event::Update => None,
                Event::Input(TermEvent::Key(Key::Char('q')), _)
                | Event::Input(TermEvent::Key(Key::Esc), _) => {
                    run = false;
                    None
                }
                Event::Input(TermEvent::Key(Key::Char('h')), _)
                | Event::Input(TermEvent::Key(Key::Left), _) => Some(self.controller.navigate(-1)),
                Event::Input(TermEvent::Key(Key::Char('l')), _)
                | Event::Input(TermEvent::Key(Key::Right), _) => Some(self.controller.navigate(1)),
                Event::Input(TermEvent::Mouse(mouse), at) => self
                    .pointer_sample(&pane, mouse, at)
                    .and_then(|sample| self.handle_pointer(&sample)),
                Event::Input(_, _) => None,
            };

            if let Some(outcome) = outcome {
                if outcome != Outcome::Ignored {
                    self.status = Some(outcome.to_string());
                }
            }

            if run {
                self.draw(out, &pane)?;
            }
        }

        write!(out, "{}{}", style::Reset, cursor::Show)?;
        out.flush()?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::navigation::ResolvedDate;
    use chrono::NaiveDate;

    fn app() -> App<FixedClock> {
        let clock = FixedClock(NaiveDate::from_ymd_opt(2016, 12, 2).unwrap());
        App::new(&Config::default(), NavigationController::new(clock))
    }

    #[test]
    fn mouse_events_become_samples() {
        let app = app();
        let theme = Theme::default();
        let pane = MonthPane::new(&theme, PANE_ORIGIN);
        let at = app.started;

        assert_eq!(
            app.pointer_sample(&pane, MouseEvent::Press(MouseButton::Left, 3, 2), at),
            Some(PointerSample::new(PointerKind::Down, 0.5, 0.5, 0))
        );
        assert_eq!(
            app.pointer_sample(&pane, MouseEvent::Release(4, 3), at),
            Some(PointerSample::new(PointerKind::Up, 1.5, 1.5, 0))
        );
        assert_eq!(
            app.pointer_sample(&pane, MouseEvent::Press(MouseButton::WheelUp, 3, 2), at),
            None
        );
    }

    #[test]
    fn click_on_spillover_day() {
        let mut app = app();

        // Panel cell 2 in the first grid row shows November 29th
        let down = PointerSample::new(PointerKind::Down, 9.5, 6.5, 0);
        let up = PointerSample::new(PointerKind::Up, 9.5, 6.5, 80);

        assert_eq!(app.handle_pointer(&down), None);
        assert_eq!(
            app.handle_pointer(&up),
            Some(Outcome::DateClicked(ResolvedDate {
                year: 2016,
                month: 11,
                day: 29
            }))
        );
        assert_eq!(app.controller().month_offset(), -1);
    }
}
