//! Interaction Engine - Controller, core state and listener registry.
//!
//! - [`InteractionController`]: Public entry point. Routes host events to the
//!   active mouse and touch strategies, owns lifecycle and runtime switching.
//! - [`Interaction`]: The state the strategies work on (canonical state,
//!   input latch, timers, layout source, projection).
//! - [`Listeners`]: Which event kinds are attached on the region and window.
//!
//! # Architecture
//!
//! ```text
//! host event → InteractionController ─┬─ fire due timers
//!                                     ├─ listener mask check
//!                                     └─ &'static dyn MouseHandlers / TouchHandlers
//!                                             │
//!                                             ▼
//!                                        Interaction::set_position → Projection
//! ```

mod controller;
pub mod interaction;
mod listeners;

pub use controller::InteractionController;
pub use interaction::{InputLatch, Interaction};
pub use listeners::Listeners;
