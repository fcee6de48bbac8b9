//! pomo - Pomodoro cycle timer for the terminal
//!
//! "Work, rest, repeat."
//!
//! A cycle alternates work stages with short rests, and every few work
//! stages takes a long rest instead:
//! - `cycle`: the state machine (start, rest, pause, tick)
//! - `interval`: the one-second tick scheduler
//! - `ui`: countdown display, buttons and the dashboard
//! - `app`: key bindings and glue between the three

pub mod app;
pub mod cycle;
pub mod interval;
pub mod ui;

pub use app::{App, Control};
pub use cycle::{CycleController, CycleState, Stage, StageChange};
pub use interval::IntervalScheduler;
