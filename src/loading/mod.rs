//! Loading state module
//!
//! Wraps asynchronous work with a boolean "loading" signal.
//!
//! # Overview
//!
//! The loading module provides:
//! - `LoadingOwner` - Anything that exposes a settable loading flag
//! - `LoadingState` - Observable flag backed by a watch channel
//! - `LoadingGate` - Decorator that raises the flag while a future runs and
//!   lowers it on every exit path (completion, error or drop)

mod gate;

pub use gate::{Gated, LoadingGate, LoadingOwner, LoadingState};
