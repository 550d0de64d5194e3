//! Tooling primitives for deterministic game AI.
//!
//! This crate is intentionally lightweight and engine-agnostic. A behaviour tree
//! can be handed a [`TraceSink`] and will report every node it visited on each
//! tick; higher-level tooling (inspectors, replays) consumes those events.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod trace;

pub use trace::{NullTraceSink, TraceEvent, TraceLog, TraceSink, TracingSink, VecTraceSink};
