//! Application state
//!
//! Ties the cycle controller to the interval scheduler and the controls.
//! After every user action or tick the scheduler is re-synced with the
//! controller, and stage changes drive the working marker.

use crossterm::event::KeyCode;
use pomo_core::CycleConfig;
use std::time::Instant;
use tracing::{debug, info};

use crate::cycle::{CycleController, Stage, StageChange};
use crate::interval::IntervalScheduler;
use crate::ui::Button;

/// The three dashboard controls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Start,
    Rest,
    TogglePause,
}

impl Control {
    pub fn all() -> &'static [Self] {
        &[Control::Start, Control::Rest, Control::TogglePause]
    }

    pub fn from_key(code: KeyCode) -> Option<Self> {
        match code {
            KeyCode::Char('s') => Some(Control::Start),
            KeyCode::Char('r') => Some(Control::Rest),
            KeyCode::Char('p') | KeyCode::Char(' ') => Some(Control::TogglePause),
            _ => None,
        }
    }
}

pub struct App {
    pub controller: CycleController,
    pub scheduler: IntervalScheduler,
    /// Set while working; the view tints the frame with it
    pub working_marker: bool,
    pub show_help: bool,
    pub should_quit: bool,
}

impl App {
    pub fn new(config: CycleConfig, now: Instant) -> Self {
        let controller = CycleController::new(config);
        let scheduler = IntervalScheduler::new(controller.interval_delay(), now);

        Self {
            controller,
            scheduler,
            working_marker: false,
            show_help: false,
            should_quit: false,
        }
    }

    /// The button for a control, labeled from current state
    pub fn button(&self, control: Control) -> Button {
        match control {
            Control::Start => Button::new("Start", 's'),
            Control::Rest => Button::new("Rest", 'r'),
            Control::TogglePause => {
                let label = if self.controller.is_running() {
                    "Pause"
                } else {
                    "Play"
                };
                let idle = self.controller.stage() == Stage::Idle;
                Button::new(label, 'p').hidden(idle)
            }
        }
    }

    /// Press a control through its button. Returns whether it was accepted.
    pub fn activate(&mut self, control: Control, now: Instant) -> bool {
        let button = self.button(control);
        button.activate(|| self.dispatch(control, now))
    }

    pub fn handle_key(&mut self, code: KeyCode, now: Instant) {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('?') => self.show_help = !self.show_help,
            code => {
                if let Some(control) = Control::from_key(code) {
                    self.activate(control, now);
                }
            }
        }
    }

    /// Run a countdown tick if one is due. Returns whether one ran.
    pub fn on_tick(&mut self, now: Instant) -> bool {
        let mut change = None;
        let controller = &mut self.controller;
        let fired = self.scheduler.poll(now, || change = controller.tick());

        if let Some(change) = change {
            self.apply(change);
        }
        if fired {
            self.sync_scheduler(now);
        }

        fired
    }

    fn dispatch(&mut self, control: Control, now: Instant) {
        debug!("Control activated: {:?}", control);

        match control {
            Control::Start => {
                let change = self.controller.start();
                self.apply(change);
            }
            Control::Rest => {
                let change = self.controller.rest();
                self.apply(change);
            }
            Control::TogglePause => {
                self.controller.toggle_pause();
                let action = if self.controller.is_paused() {
                    "Paused"
                } else {
                    "Resumed"
                };
                info!("{} {}", action, self.controller.stage());
            }
        }

        self.sync_scheduler(now);
    }

    fn apply(&mut self, change: StageChange) {
        info!(
            "Stage {} -> {} ({} pomodoros, {} long cycles)",
            change.from,
            change.to,
            self.controller.completed_pomodoros(),
            self.controller.completed_long_cycles()
        );

        if change.entered_working() {
            self.working_marker = true;
        } else if change.left_working() {
            self.working_marker = false;
        }
    }

    fn sync_scheduler(&mut self, now: Instant) {
        let delay = self.controller.interval_delay();
        self.scheduler.set_delay(delay, now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    const SECOND: Duration = Duration::from_secs(1);

    fn app(now: Instant) -> App {
        App::new(CycleConfig::new(2, 1, 3, 2).unwrap(), now)
    }

    #[test]
    fn test_starts_idle_and_disabled() {
        let now = Instant::now();
        let mut app = app(now);
        assert!(!app.scheduler.is_enabled());
        assert!(!app.working_marker);
        assert!(!app.on_tick(now + 10 * SECOND));
        assert_eq!(app.controller.remaining(), 2);
    }

    #[test]
    fn test_ticks_drive_the_cycle() {
        let start = Instant::now();
        let mut app = app(start);

        assert!(app.activate(Control::Start, start));
        assert!(app.scheduler.is_enabled());
        assert!(app.working_marker);

        assert!(!app.on_tick(start + Duration::from_millis(500)));
        assert!(app.on_tick(start + SECOND));
        assert!(app.on_tick(start + 2 * SECOND));
        assert_eq!(app.controller.stage(), Stage::ShortResting);
        assert!(!app.working_marker);

        assert!(app.on_tick(start + 3 * SECOND));
        assert_eq!(app.controller.stage(), Stage::Working);
        assert!(app.working_marker);
        assert_eq!(app.controller.remaining(), 2);
    }

    #[test]
    fn test_pause_disables_scheduler() {
        let start = Instant::now();
        let mut app = app(start);
        app.activate(Control::Start, start);
        app.on_tick(start + SECOND);

        app.activate(Control::TogglePause, start + SECOND);
        assert!(!app.scheduler.is_enabled());
        for s in 2..20 {
            assert!(!app.on_tick(start + s * SECOND));
        }
        assert_eq!(app.controller.remaining(), 1);
        assert!(app.working_marker);

        let resumed = start + 20 * SECOND;
        app.activate(Control::TogglePause, resumed);
        assert!(app.scheduler.is_enabled());
        assert!(app.on_tick(resumed + SECOND));
        assert_eq!(app.controller.stage(), Stage::ShortResting);
    }

    #[test]
    fn test_toggle_pause_twice_restores_scheduler() {
        let start = Instant::now();
        let mut app = app(start);
        app.activate(Control::Start, start);
        let delay = app.scheduler.delay();
        let remaining = app.controller.remaining();

        app.activate(Control::TogglePause, start);
        app.activate(Control::TogglePause, start);
        assert_eq!(app.scheduler.delay(), delay);
        assert_eq!(app.controller.remaining(), remaining);
    }

    #[test]
    fn test_pause_button_hidden_when_idle() {
        let now = Instant::now();
        let mut app = app(now);

        assert!(app.button(Control::TogglePause).hidden);
        assert!(!app.activate(Control::TogglePause, now));
        assert!(!app.controller.is_running());

        app.activate(Control::Rest, now);
        let button = app.button(Control::TogglePause);
        assert!(!button.hidden);
        assert_eq!(button.label, "Pause");

        app.activate(Control::TogglePause, now);
        assert_eq!(app.button(Control::TogglePause).label, "Play");
    }

    #[test]
    fn test_rest_clears_working_marker() {
        let now = Instant::now();
        let mut app = app(now);
        app.activate(Control::Start, now);
        assert!(app.working_marker);

        app.activate(Control::Rest, now);
        assert!(!app.working_marker);
        assert_eq!(app.controller.stage(), Stage::LongResting);
        assert_eq!(app.controller.remaining(), 3);
    }

    #[test]
    fn test_key_bindings() {
        let now = Instant::now();
        let mut app = app(now);

        app.handle_key(KeyCode::Char('s'), now);
        assert_eq!(app.controller.stage(), Stage::Working);

        app.handle_key(KeyCode::Char(' '), now);
        assert!(app.controller.is_paused());

        app.handle_key(KeyCode::Char('r'), now);
        assert_eq!(app.controller.stage(), Stage::LongResting);

        app.handle_key(KeyCode::Char('?'), now);
        assert!(app.show_help);

        app.handle_key(KeyCode::Char('x'), now);
        assert!(!app.should_quit);
        app.handle_key(KeyCode::Esc, now);
        assert!(app.should_quit);
    }
}
