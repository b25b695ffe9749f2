//! G-code motion interpretation
//!
//! This module provides:
//! - Comment stripping and word tokenizing
//! - The modal motion interpreter driving a `MotionSink`

pub mod interpreter;
pub mod tokenizer;

pub use interpreter::{BeamState, InterpreterSettings, InterpreterStats, MotionInterpreter, MotionSink};
pub use tokenizer::{parse_leading_f64, strip_comments, words, Word};
