//! # ledstrand Controller
//!
//! Consumes a validated [`LedSettings`](ledstrand_common::settings::LedSettings)
//! by reference and turns topic/payload messages into per-channel PWM duty
//! values.
//!
//! - [`fade`] - Linear fade between two normalized levels
//! - [`controller`] - Channel state, command routing and rendering

pub mod controller;
pub mod fade;
