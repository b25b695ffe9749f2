//! Modal motion interpreter
//!
//! Reads a laser program line by line, tracking the beam state, spindle
//! value, feed rate, and position. Coordinate words only set a pending
//! target; at the end of each line a drawing move with a changed target is
//! handed to the [`MotionSink`] and the target becomes the new position.
//!
//! Unknown words and unreadable numbers are skipped. The only error that
//! stops a run comes from the sink.

use super::tokenizer::{strip_comments, words, Word};
use laserpreview_core::constants::{MAX_LINE_LENGTH, SPINDLE_MAX};
use laserpreview_core::{Error, Point2, RasterError};
use serde::Serialize;
use std::io::BufRead;
use tracing::{debug, trace, warn};

/// Receiver of the moves and feed changes produced by the interpreter
pub trait MotionSink {
    /// Feed rate in mm/min changed to a positive value
    fn set_feed_rate(&mut self, feed_rate: f64);

    /// Burn a straight move from `from` to `to`, both in pixels
    fn draw(&mut self, from: Point2, to: Point2, intensity: f32) -> Result<(), RasterError>;
}

/// Whether the beam is on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum BeamState {
    /// Moves travel without burning
    #[default]
    Idle,
    /// Moves burn
    Drawing,
}

/// Interpreter parameters supplied by the caller
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InterpreterSettings {
    /// Pixels per program unit
    pub zoom: f64,
    /// Sub-pixel steps coordinates are snapped to
    pub subdivisions: u32,
    /// Multiplier applied to every spindle-derived intensity
    pub power_multiplier: f64,
}

impl Default for InterpreterSettings {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            subdivisions: 1,
            power_multiplier: 1.0,
        }
    }
}

/// Counters collected while interpreting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct InterpreterStats {
    /// Lines read
    pub lines: u64,
    /// Drawing moves handed to the sink
    pub segments: u64,
}

/// Line-oriented G-code state machine
#[derive(Debug, Clone)]
pub struct MotionInterpreter {
    settings: InterpreterSettings,
    state: BeamState,
    position: Point2,
    target: Point2,
    spindle: Option<f64>,
    feed_rate: Option<f64>,
    stats: InterpreterStats,
}

impl MotionInterpreter {
    pub fn new(settings: InterpreterSettings) -> Self {
        Self {
            settings,
            state: BeamState::Idle,
            position: Point2::default(),
            target: Point2::default(),
            spindle: None,
            feed_rate: None,
            stats: InterpreterStats::default(),
        }
    }

    pub fn state(&self) -> BeamState {
        self.state
    }

    /// Committed position in pixels
    pub fn position(&self) -> Point2 {
        self.position
    }

    /// Last spindle value, if any was set
    pub fn spindle(&self) -> Option<f64> {
        self.spindle
    }

    /// Last positive feed rate seen, in mm/min
    pub fn feed_rate(&self) -> Option<f64> {
        self.feed_rate
    }

    pub fn stats(&self) -> InterpreterStats {
        self.stats
    }

    /// Intensity the beam burns at with the current spindle value
    pub fn intensity(&self) -> f32 {
        (self.spindle.unwrap_or(0.0) / SPINDLE_MAX * self.settings.power_multiplier) as f32
    }

    /// Interpret every line of `reader`. Invalid UTF-8 is replaced, not rejected.
    pub fn run<R, S>(&mut self, mut reader: R, sink: &mut S) -> Result<InterpreterStats, Error>
    where
        R: BufRead,
        S: MotionSink + ?Sized,
    {
        let mut buf = Vec::with_capacity(MAX_LINE_LENGTH);
        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            let line = String::from_utf8_lossy(&buf);
            self.process_line(&line, sink)?;
        }
        debug!(
            "Interpreted {} lines, {} drawing moves",
            self.stats.lines, self.stats.segments
        );
        Ok(self.stats)
    }

    /// Interpret a whole program held in memory
    pub fn run_str<S: MotionSink + ?Sized>(
        &mut self,
        program: &str,
        sink: &mut S,
    ) -> Result<InterpreterStats, RasterError> {
        for line in program.lines() {
            self.process_line(line, sink)?;
        }
        Ok(self.stats)
    }

    /// Interpret one line and commit its move
    pub fn process_line<S: MotionSink + ?Sized>(
        &mut self,
        line: &str,
        sink: &mut S,
    ) -> Result<(), RasterError> {
        self.stats.lines += 1;
        if line.len() > MAX_LINE_LENGTH {
            warn!(
                "Line {} is {} bytes long, longer than the expected {}",
                self.stats.lines,
                line.len(),
                MAX_LINE_LENGTH
            );
        }

        let code = strip_comments(line);
        for word in words(&code) {
            self.apply_word(word, sink);
        }

        if self.state == BeamState::Drawing && self.target != self.position {
            let intensity = self.intensity();
            trace!(
                "Line {}: draw {} -> {} at {:.3}",
                self.stats.lines,
                self.position,
                self.target,
                intensity
            );
            sink.draw(self.position, self.target, intensity)?;
            self.stats.segments += 1;
        }
        self.position = self.target;
        Ok(())
    }

    fn apply_word<S: MotionSink + ?Sized>(&mut self, word: Word, sink: &mut S) {
        let value = word.value;
        match word.letter {
            'G' => {
                if value == 0.0 {
                    self.state = BeamState::Idle;
                } else if (1.0..=3.0).contains(&value) {
                    self.state = BeamState::Drawing;
                }
            }
            'M' => {
                if value == 3.0 || value == 4.0 {
                    self.state = BeamState::Drawing;
                    if self.spindle.is_none() {
                        self.spindle = Some(SPINDLE_MAX);
                    }
                } else if value == 5.0 {
                    self.state = BeamState::Idle;
                }
            }
            'X' => {
                if let Some(x) = self.to_pixels(value) {
                    self.target.x = x;
                }
            }
            'Y' => {
                if let Some(y) = self.to_pixels(value) {
                    self.target.y = y;
                }
            }
            'S' => self.spindle = Some(value),
            'F' => {
                if value > 0.0 {
                    self.feed_rate = Some(value);
                    sink.set_feed_rate(value);
                }
            }
            _ => {}
        }
    }

    /// Scale a program coordinate to pixels and snap it to the sub-pixel grid.
    /// Coordinates that land outside the addressable cell range are dropped.
    fn to_pixels(&self, value: f64) -> Option<f64> {
        let steps = f64::from(self.settings.subdivisions.max(1));
        let pixels = (value * self.settings.zoom * steps).round() / steps;
        if !pixels.is_finite() || pixels.abs() > f64::from(i32::MAX) {
            warn!("Ignoring out of range coordinate {}", value);
            return None;
        }
        Some(pixels)
    }
}

impl Default for MotionInterpreter {
    fn default() -> Self {
        Self::new(InterpreterSettings::default())
    }
}
