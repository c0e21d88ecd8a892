//! Decision tracing primitives for the skirmish goal scheduler.
//!
//! Kept free of any scheduler types so hosts can record, replay and render decisions without
//! pulling in the world interfaces.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod trace;

pub use trace::{NullTraceSink, TraceEvent, TraceLog, TraceSink, VecTraceSink};
