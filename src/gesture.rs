//! Classification of raw pointer samples into taps and long presses.
//!
//! Classification happens synchronously when the pointer is released. There
//! is no timer: a press that is never released never resolves.

use derive_more::Constructor;
use std::fmt;

use crate::hit::PanelGeometry;

pub const DEFAULT_LONG_PRESS_MS: u64 = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Down,
    Move,
    Up,
}

#[derive(Debug, Clone, Copy, PartialEq, Constructor)]
pub struct PointerSample {
    pub kind: PointerKind,
    pub x: f32,
    pub y: f32,
    pub timestamp_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
    /// Short press, located at the `Down` sample.
    Tap { x: f32, y: f32 },
    /// Press held longer than the threshold, located at the `Down` sample.
    LongPress { x: f32, y: f32 },
    /// The pointer travelled half a cell or more while pressed.
    Cancelled,
}

impl fmt::Display for Gesture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gesture::Tap { x, y } => write!(f, "tap at ({}, {})", x, y),
            Gesture::LongPress { x, y } => write!(f, "long press at ({}, {})", x, y),
            Gesture::Cancelled => write!(f, "cancelled"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum State {
    Idle,
    Pressed { x: f32, y: f32, at: u64 },
    Cancelled,
}

#[derive(Debug, Clone)]
pub struct GestureClassifier {
    state: State,
    long_press_ms: u64,
}

impl Default for GestureClassifier {
    fn default() -> Self {
        GestureClassifier::new(DEFAULT_LONG_PRESS_MS)
    }
}

impl GestureClassifier {
    pub fn new(long_press_ms: u64) -> Self {
        GestureClassifier {
            state: State::Idle,
            long_press_ms,
        }
    }

    pub fn long_press_ms(&self) -> u64 {
        self.long_press_ms
    }

    pub fn is_idle(&self) -> bool {
        self.state == State::Idle
    }

    /// Feeds one sample. Returns the resolved gesture on `Up`, after which
    /// the classifier is idle again.
    pub fn feed(&mut self, sample: &PointerSample, geometry: &PanelGeometry) -> Option<Gesture> {
        match (self.state, sample.kind) {
            (_, PointerKind::Down) => {
                self.state = State::Pressed {
                    x: sample.x,
                    y: sample.y,
                    at: sample.timestamp_ms,
                };
                None
            }
            (State::Pressed { x, y, .. }, PointerKind::Move) => {
                if (sample.x - x).abs() >= geometry.cell_width / 2.0
                    || (sample.y - y).abs() >= geometry.cell_height / 2.0
                {
                    log::trace!("pointer moved away from ({}, {}), cancelling", x, y);
                    self.state = State::Cancelled;
                }
                None
            }
            (State::Pressed { x, y, at }, PointerKind::Up) => {
                self.state = State::Idle;
                let held = sample.timestamp_ms.saturating_sub(at);

                if held <= self.long_press_ms {
                    Some(Gesture::Tap { x, y })
                } else {
                    Some(Gesture::LongPress { x, y })
                }
            }
            (State::Cancelled, PointerKind::Up) => {
                self.state = State::Idle;
                Some(Gesture::Cancelled)
            }
            (State::Idle, PointerKind::Move) | (State::Cancelled, PointerKind::Move) => None,
            (State::Idle, PointerKind::Up) => {
                log::debug!("ignoring pointer release without press");
                None
            }
        }
    }
}
