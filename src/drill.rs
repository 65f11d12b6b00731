use std::collections::{HashSet, VecDeque};
use std::time::{Duration, SystemTime};

use crate::charset;
use crate::report::{Record, Status};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShiftSide {
    Left,
    Right,
}

/// A single delivered key identity, as the input layer reports it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// A key with a printable character representation.
    Char(char),
    /// One of the shift modifiers.
    Shift(ShiftSide),
    /// The designated abort key.
    Abort,
    /// Any other control key.
    Other,
}

/// Outcome of feeding one event into the drill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// Nothing happened: modifier bookkeeping, unmapped key, or the drill
    /// was already finished.
    NoOp,
    /// The keystroke matched; a character was consumed.
    Matched,
    /// The keystroke missed; the sequence is unchanged.
    Mismatched,
    /// The last character was consumed. Emitted exactly once.
    Finished,
    /// The abort key was released; the caller should stop the session.
    Aborted,
}

/// One typing session: the remaining characters, the held shift keys and the
/// log of everything typed so far. Purely reactive; the input layer calls
/// [`Drill::on_key_down`] / [`Drill::on_key_up`] once per delivered event and
/// performs all I/O itself.
#[derive(Debug)]
pub struct Drill {
    sequence: VecDeque<char>,
    held_shifts: HashSet<ShiftSide>,
    records: Vec<Record>,
    prompt_shown_at: Option<SystemTime>,
    keystroke_at: Option<SystemTime>,
}

impl Drill {
    pub fn new(sequence: &str) -> Self {
        Self {
            sequence: sequence.chars().collect(),
            held_shifts: HashSet::new(),
            records: Vec::new(),
            prompt_shown_at: None,
            keystroke_at: None,
        }
    }

    /// The character the next keystroke is compared against.
    pub fn expected(&self) -> Option<char> {
        self.sequence.front().copied()
    }

    pub fn remaining(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_finished(&self) -> bool {
        self.sequence.is_empty()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn into_records(self) -> Vec<Record> {
        self.records
    }

    /// Stamps the prompt-display time and returns the character to show.
    /// Call once at session start and again after every non-finishing
    /// keystroke; the elapsed time of the next record is measured from here.
    pub fn begin_prompt(&mut self) -> Option<char> {
        self.prompt_shown_at = Some(SystemTime::now());
        self.expected()
    }

    pub fn on_key_down(&mut self, key: Key) -> Signal {
        let raw = match key {
            Key::Shift(side) => {
                self.held_shifts.insert(side);
                return Signal::NoOp;
            }
            Key::Char(c) => c,
            Key::Abort | Key::Other => return Signal::NoOp,
        };

        let Some(expect) = self.expected() else {
            return Signal::NoOp;
        };

        self.keystroke_at = Some(SystemTime::now());

        let actual = match charset::resolve_shift(raw, !self.held_shifts.is_empty()) {
            Ok(c) => c,
            // Unmapped key: drop the keystroke, record nothing.
            Err(_) => return Signal::NoOp,
        };

        let time = self.elapsed_secs();
        if actual == expect {
            self.sequence.pop_front();
            self.records.push(Record {
                expect,
                actual,
                status: Status::Ok,
                time,
            });
            if self.sequence.is_empty() {
                Signal::Finished
            } else {
                Signal::Matched
            }
        } else {
            self.records.push(Record {
                expect,
                actual,
                status: Status::Ng,
                time,
            });
            Signal::Mismatched
        }
    }

    pub fn on_key_up(&mut self, key: Key) -> Signal {
        match key {
            Key::Abort => Signal::Aborted,
            Key::Shift(side) => {
                // Releasing a shift we never saw go down is fine.
                self.held_shifts.remove(&side);
                Signal::NoOp
            }
            Key::Char(_) | Key::Other => Signal::NoOp,
        }
    }

    fn elapsed_secs(&self) -> f64 {
        match (self.prompt_shown_at, self.keystroke_at) {
            (Some(shown), Some(pressed)) => pressed
                .duration_since(shown)
                .unwrap_or(Duration::ZERO)
                .as_secs_f64(),
            _ => 0.0,
        }
    }
}
