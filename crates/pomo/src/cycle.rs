//! Pomodoro cycle controller
//!
//! The state machine behind the timer. A cycle alternates work stages with
//! short rests; every `cycles` work stages the rest is a long one instead.
//! Resting stages resume work automatically when they run out.
//!
//! The controller never talks to a clock or a screen. Callers feed it
//! [`CycleController::tick`] once per second while
//! [`CycleController::interval_delay`] says it is running, and every
//! transition hands back a [`StageChange`] for the view to react to.

use pomo_core::CycleConfig;
use std::time::Duration;

/// Delay between countdown ticks while a stage is running
pub const TICK_DELAY: Duration = Duration::from_secs(1);

/// Current phase of the cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Nothing started yet
    Idle,
    Working,
    ShortResting,
    LongResting,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Idle => "idle",
            Stage::Working => "working",
            Stage::ShortResting => "short rest",
            Stage::LongResting => "long rest",
        }
    }

    /// Heading label: only working is distinguished from everything else
    pub fn label(&self) -> &'static str {
        match self {
            Stage::Working => "working",
            _ => "resting",
        }
    }

    pub fn is_resting(&self) -> bool {
        matches!(self, Stage::ShortResting | Stage::LongResting)
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Notification emitted on every stage transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageChange {
    pub from: Stage,
    pub to: Stage,
}

impl StageChange {
    pub fn entered_working(&self) -> bool {
        self.to == Stage::Working
    }

    pub fn left_working(&self) -> bool {
        self.from == Stage::Working && self.to != Stage::Working
    }
}

/// Mutable cycle state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleState {
    /// Seconds left in the current stage
    pub remaining: u32,
    /// Whether ticks are counting down (false when idle or paused)
    pub running: bool,
    pub stage: Stage,
    /// Short rests left before the next long rest
    pub short_cycles_remaining: u32,
    /// Long rests reached through the cycle
    pub completed_long_cycles: u32,
    /// Work stages run to zero
    pub completed_pomodoros: u32,
    /// Seconds counted down while working
    pub worked_seconds: u64,
}

impl CycleState {
    fn new(config: &CycleConfig) -> Self {
        Self {
            remaining: config.work(),
            running: false,
            stage: Stage::Idle,
            short_cycles_remaining: config.cycles() - 1,
            completed_long_cycles: 0,
            completed_pomodoros: 0,
            worked_seconds: 0,
        }
    }
}

/// Owns the cycle state and applies transitions to it
#[derive(Debug, Clone)]
pub struct CycleController {
    config: CycleConfig,
    state: CycleState,
}

impl CycleController {
    pub fn new(config: CycleConfig) -> Self {
        Self {
            state: CycleState::new(&config),
            config,
        }
    }

    pub fn state(&self) -> &CycleState {
        &self.state
    }

    pub fn stage(&self) -> Stage {
        self.state.stage
    }

    pub fn stage_label(&self) -> &'static str {
        self.state.stage.label()
    }

    pub fn remaining(&self) -> u32 {
        self.state.remaining
    }

    pub fn is_running(&self) -> bool {
        self.state.running
    }

    pub fn is_paused(&self) -> bool {
        !self.state.running && self.state.stage != Stage::Idle
    }

    pub fn short_cycles_remaining(&self) -> u32 {
        self.state.short_cycles_remaining
    }

    pub fn completed_long_cycles(&self) -> u32 {
        self.state.completed_long_cycles
    }

    pub fn completed_pomodoros(&self) -> u32 {
        self.state.completed_pomodoros
    }

    pub fn worked_seconds(&self) -> u64 {
        self.state.worked_seconds
    }

    /// The delay the interval scheduler should run at: one tick per second
    /// while counting down, nothing while idle or paused.
    pub fn interval_delay(&self) -> Option<Duration> {
        self.state.running.then_some(TICK_DELAY)
    }

    /// Begin a work stage with a full work duration, from any stage
    pub fn start(&mut self) -> StageChange {
        self.enter_working()
    }

    /// Jump straight into a long rest. Counters are left alone.
    pub fn rest(&mut self) -> StageChange {
        self.enter(Stage::LongResting, self.config.long_rest())
    }

    /// Pause or resume the countdown. Does nothing while idle.
    pub fn toggle_pause(&mut self) {
        if self.state.stage != Stage::Idle {
            self.state.running = !self.state.running;
        }
    }

    /// Count down one second.
    ///
    /// A tick that brings the countdown to zero also performs the stage
    /// transition, and at most one: work goes to a short or a long rest,
    /// a rest goes back to work. Ticks while idle or paused are ignored.
    pub fn tick(&mut self) -> Option<StageChange> {
        if !self.state.running {
            return None;
        }

        match self.state.stage {
            Stage::Idle => None,
            Stage::Working => {
                self.state.remaining = self.state.remaining.saturating_sub(1);
                self.state.worked_seconds += 1;

                if self.state.remaining > 0 {
                    return None;
                }

                self.state.completed_pomodoros += 1;
                if self.state.short_cycles_remaining > 0 {
                    self.state.short_cycles_remaining -= 1;
                    Some(self.enter(Stage::ShortResting, self.config.short_rest()))
                } else {
                    self.state.short_cycles_remaining = self.config.cycles() - 1;
                    self.state.completed_long_cycles += 1;
                    Some(self.enter(Stage::LongResting, self.config.long_rest()))
                }
            }
            Stage::ShortResting | Stage::LongResting => {
                self.state.remaining = self.state.remaining.saturating_sub(1);

                if self.state.remaining > 0 {
                    return None;
                }

                Some(self.enter_working())
            }
        }
    }

    fn enter_working(&mut self) -> StageChange {
        self.enter(Stage::Working, self.config.work())
    }

    fn enter(&mut self, stage: Stage, duration: u32) -> StageChange {
        let change = StageChange {
            from: self.state.stage,
            to: stage,
        };

        self.state.stage = stage;
        self.state.remaining = duration;
        self.state.running = true;

        change
    }
}
