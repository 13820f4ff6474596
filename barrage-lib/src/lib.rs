//! # Barrage Library
//!
//! This library provides the lane-allocation and playback-scheduling engine
//! behind a scrolling bullet-comment overlay: a FIFO queue of pending items,
//! a fixed-interval dispatch loop, and reconciliation of in-flight traversals
//! when the layout changes. Rendering is delegated to a [`surface`]
//! collaborator.

pub mod channel;
pub mod constants;
pub mod engine;
pub mod error;
pub mod lane;
pub mod options;
pub mod queue;
pub mod surface;
