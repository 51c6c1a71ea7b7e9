use std::io;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use termion::input::TermRead;

use crate::config::Config;

pub enum Event {
    /// Terminal input together with the moment it was read.
    Input(termion::event::Event, Instant),
    Update,
}

pub struct Dispatcher {
    rx: mpsc::Receiver<Event>,
    _input_handle: thread::JoinHandle<()>,
    _update_handle: thread::JoinHandle<()>,
}

impl Default for Dispatcher {
    fn default() -> Dispatcher {
        Dispatcher::from_config(&Config::default())
    }
}

impl Dispatcher {
    pub fn from_config(config: &Config) -> Dispatcher {
        Dispatcher::with_tick_rate(config.tick_rate())
    }

    pub fn with_tick_rate(tick_rate: Duration) -> Dispatcher {
        let (tx, rx) = mpsc::channel();
        let input_handle = {
            let tx = tx.clone();
            thread::spawn(move || {
                let stdin = io::stdin();
                let stdin = stdin.lock();
                for evt in stdin.events() {
                    match evt {
                        Ok(evt) => {
                            if tx.send(Event::Input(evt, Instant::now())).is_err() {
                                return;
                            }
                        }
                        Err(err) => log::warn!("Error while reading input: {}", err),
                    }
                }
            })
        };
        let update_handle = thread::spawn(move || loop {
            if tx.send(Event::Update).is_err() {
                return;
            }
            thread::sleep(tick_rate);
        });
        Dispatcher {
            rx,
            _input_handle: input_handle,
            _update_handle: update_handle,
        }
    }

    pub fn next(&self) -> Result<Event, mpsc::RecvError> {
        self.rx.recv()
    }
}
