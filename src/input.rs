use std::sync::mpsc::{self, Receiver, RecvError};
use std::thread;

use crossterm::event::{self, Event as CtEvent, KeyCode, KeyEventKind, KeyModifiers};

use crate::drill::{Drill, Key, Signal};
use crate::report::{Record, Status};

/// One delivered input event: a key going down or coming back up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Down(Key),
    Up(Key),
}

/// Source of key events (terminal, OS hook, test channel). Events must be
/// delivered from a single logical thread; the drill is driven strictly
/// sequentially.
pub trait KeyEventSource {
    /// Blocks until the next event arrives, or errors once the source is
    /// disconnected.
    fn recv(&self) -> Result<InputEvent, RecvError>;
}

/// Production event source: a background thread pumps crossterm key events
/// over a channel.
///
/// crossterm reports the shifted glyph directly (`!` for shift+1) and, on
/// most terminals, no standalone shift key events. Glyphs therefore pass
/// through as-is and `Key::Shift` is never emitted here; that variant serves
/// input layers that report physical keys.
pub struct CrosstermKeySource {
    rx: Receiver<InputEvent>,
}

impl CrosstermKeySource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || loop {
            match event::read() {
                Ok(CtEvent::Key(key)) => {
                    if tx.send(map_key_event(key)).is_err() {
                        break;
                    }
                }
                Ok(_) => {}
                Err(_) => break,
            }
        });

        Self { rx }
    }
}

impl Default for CrosstermKeySource {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyEventSource for CrosstermKeySource {
    fn recv(&self) -> Result<InputEvent, RecvError> {
        self.rx.recv()
    }
}

fn map_key_event(key: event::KeyEvent) -> InputEvent {
    let mapped = match key.code {
        KeyCode::Esc => Key::Abort,
        // ctrl+c terminates like the abort key
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Key::Abort,
        KeyCode::Char(c) => Key::Char(c),
        _ => Key::Other,
    };

    match key.kind {
        KeyEventKind::Release => InputEvent::Up(mapped),
        // Most terminals never report releases, so the abort contract has
        // to fire from the press.
        KeyEventKind::Press | KeyEventKind::Repeat if mapped == Key::Abort => {
            InputEvent::Up(Key::Abort)
        }
        KeyEventKind::Press | KeyEventKind::Repeat => InputEvent::Down(mapped),
    }
}

/// Test event source fed from an mpsc channel.
pub struct TestKeySource {
    rx: Receiver<InputEvent>,
}

impl TestKeySource {
    pub fn new(rx: Receiver<InputEvent>) -> Self {
        Self { rx }
    }
}

impl KeyEventSource for TestKeySource {
    fn recv(&self) -> Result<InputEvent, RecvError> {
        self.rx.recv()
    }
}

/// What the caller should display after each step of the session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Feedback {
    /// Session start; show the first expected character.
    Start(char),
    /// Outcome of the previous keystroke plus the character to type next
    /// (the same one again after a miss).
    Graded(Status, char),
    /// The sequence is fully consumed.
    End,
}

/// How a session ended. Both variants carry the record log as accumulated;
/// the caller decides whether aborted records are worth keeping.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEnd {
    Completed(Vec<Record>),
    Aborted(Vec<Record>),
}

/// Drives one session to its end: pulls events from `source`, feeds them to
/// the drill and reports display updates through `feedback`. A disconnected
/// source counts as an abort.
pub fn run<S: KeyEventSource>(
    mut drill: Drill,
    source: &S,
    feedback: &mut dyn FnMut(Feedback),
) -> SessionEnd {
    match drill.begin_prompt() {
        Some(next) => feedback(Feedback::Start(next)),
        None => {
            // Nothing to practice; an empty pool completes immediately.
            feedback(Feedback::End);
            return SessionEnd::Completed(drill.into_records());
        }
    }

    loop {
        let event = match source.recv() {
            Ok(ev) => ev,
            Err(_) => return SessionEnd::Aborted(drill.into_records()),
        };

        match event {
            InputEvent::Down(key) => match drill.on_key_down(key) {
                Signal::Matched => {
                    if let Some(next) = drill.begin_prompt() {
                        feedback(Feedback::Graded(Status::Ok, next));
                    }
                }
                Signal::Mismatched => {
                    // Re-display restarts the timer for the retry.
                    if let Some(next) = drill.begin_prompt() {
                        feedback(Feedback::Graded(Status::Ng, next));
                    }
                }
                Signal::Finished => {
                    feedback(Feedback::End);
                    return SessionEnd::Completed(drill.into_records());
                }
                Signal::NoOp | Signal::Aborted => {}
            },
            InputEvent::Up(key) => {
                if drill.on_key_up(key) == Signal::Aborted {
                    return SessionEnd::Aborted(drill.into_records());
                }
            }
        }
    }
}
