//! UI rendering
//!
//! The dashboard is a heading with the stage label, the countdown, the three
//! controls and the session summary. [`TimerDisplay`] and [`Button`] are
//! stateless widgets; everything they show comes from the [`App`].

use pomo_core::seconds_to_time;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
    Frame,
};

use crate::app::{App, Control};

/// Countdown display
#[derive(Debug, Clone, Copy)]
pub struct TimerDisplay {
    remaining: u32,
    color: Color,
}

impl TimerDisplay {
    pub fn new(remaining: u32) -> Self {
        Self {
            remaining,
            color: Color::White,
        }
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// The text shown, e.g. `24:59`
    pub fn text(&self) -> String {
        seconds_to_time(self.remaining as f64)
    }
}

impl Widget for TimerDisplay {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Paragraph::new(Line::from(Span::styled(
            self.text(),
            Style::default().fg(self.color).add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL))
        .render(area, buf);
    }
}

/// A labeled control bound to a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Button {
    pub label: &'static str,
    pub key: char,
    pub hidden: bool,
}

impl Button {
    pub fn new(label: &'static str, key: char) -> Self {
        Self {
            label,
            key,
            hidden: false,
        }
    }

    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    /// Forward an activation to `handler`. Hidden buttons swallow it.
    pub fn activate<F: FnOnce()>(&self, handler: F) -> bool {
        if self.hidden {
            return false;
        }
        handler();
        true
    }
}

impl Widget for Button {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if self.hidden {
            return;
        }

        let key_style = Style::default().fg(Color::Cyan).bold();
        Paragraph::new(Line::from(vec![
            Span::styled(format!("{} ", self.key), key_style),
            Span::raw(self.label),
        ]))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .render(area, buf);
    }
}

struct Areas {
    heading: Rect,
    timer: Rect,
    controls: [Rect; 3],
    details: Rect,
    footer: Rect,
}

fn areas(area: Rect) -> Areas {
    let inner = Block::default().borders(Borders::ALL).inner(area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Heading
            Constraint::Length(3), // Timer
            Constraint::Length(3), // Controls
            Constraint::Length(5), // Details
            Constraint::Min(0),
            Constraint::Length(1), // Footer
        ])
        .split(inner);

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(rows[2]);

    Areas {
        heading: rows[0],
        timer: rows[1],
        controls: [cols[0], cols[1], cols[2]],
        details: rows[3],
        footer: rows[5],
    }
}

/// Which control, if any, sits under a terminal cell
pub fn control_at(area: Rect, column: u16, row: u16) -> Option<Control> {
    let position = ratatui::layout::Position::new(column, row);
    areas(area)
        .controls
        .iter()
        .zip(Control::all())
        .find(|(rect, _)| rect.contains(position))
        .map(|(_, control)| *control)
}

/// Frame color: red under the working marker, green while resting
fn accent(app: &App) -> Color {
    if app.working_marker {
        Color::Red
    } else if app.controller.stage().is_resting() {
        Color::Green
    } else {
        Color::DarkGray
    }
}

/// Main draw function
pub fn draw(f: &mut Frame, app: &App) {
    let area = f.area();
    let layout = areas(area);
    let controller = &app.controller;
    let accent = accent(app);

    let root = Block::default()
        .title(" pomo ")
        .title_style(Style::default().fg(accent).bold())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(accent));
    f.render_widget(root, area);

    let label_style = Style::default().fg(accent).bold();
    let mut heading = vec![
        Span::raw("You are: "),
        Span::styled(controller.stage_label(), label_style),
    ];
    if controller.is_paused() {
        let paused = Span::styled(" [PAUSED]", Style::default().fg(Color::Yellow));
        heading.push(paused);
    }
    let heading = Paragraph::new(Line::from(heading).centered());
    f.render_widget(heading, layout.heading);

    f.render_widget(
        TimerDisplay::new(controller.remaining()).color(accent),
        layout.timer,
    );

    for (rect, control) in layout.controls.iter().zip(Control::all()) {
        f.render_widget(app.button(*control), *rect);
    }

    let cycles = controller.completed_long_cycles().to_string();
    let worked = seconds_to_time(controller.worked_seconds() as f64);
    let pomodoros = controller.completed_pomodoros().to_string();
    let details = vec![
        detail_line("Completed cycles:", cycles),
        detail_line("Time worked:", worked),
        detail_line("Pomodoros completed:", pomodoros),
    ];
    f.render_widget(
        Paragraph::new(details).block(
            Block::default()
                .title(" Details ")
                .title_style(Style::default().fg(Color::Blue).bold())
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Blue)),
        ),
        layout.details,
    );

    draw_footer(f, layout.footer);

    if app.show_help {
        draw_help_overlay(f);
    }
}

fn detail_line(label: &'static str, value: String) -> Line<'static> {
    let label_style = Style::default().fg(Color::Cyan);
    Line::from(vec![
        Span::styled(format!(" {} ", label), label_style),
        Span::raw(value),
    ])
}

fn draw_footer(f: &mut Frame, area: Rect) {
    let help = Line::from(vec![
        Span::styled(" q", Style::default().fg(Color::Cyan).bold()),
        Span::raw(" quit  "),
        Span::styled("?", Style::default().fg(Color::Cyan).bold()),
        Span::raw(" help"),
    ]);

    let style = Style::default().fg(Color::DarkGray);
    let footer = Paragraph::new(help).style(style);
    f.render_widget(footer, area);
}

fn draw_help_overlay(f: &mut Frame) {
    let area = f.area();

    let popup_width = 40.min(area.width);
    let popup_height = 10.min(area.height);
    let x = (area.width.saturating_sub(popup_width)) / 2;
    let y = (area.height.saturating_sub(popup_height)) / 2;

    let popup_area = Rect::new(x, y, popup_width, popup_height);

    f.render_widget(Clear, popup_area);

    let help_text = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("  s        ", Style::default().fg(Color::Cyan)),
            Span::raw("Start a work stage"),
        ]),
        Line::from(vec![
            Span::styled("  r        ", Style::default().fg(Color::Cyan)),
            Span::raw("Take a long rest"),
        ]),
        Line::from(vec![
            Span::styled("  p / Space", Style::default().fg(Color::Cyan)),
            Span::raw(" Play/pause"),
        ]),
        Line::from(vec![
            Span::styled("  q / Esc  ", Style::default().fg(Color::Cyan)),
            Span::raw("Quit"),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "Press ? to close",
            Style::default().fg(Color::DarkGray),
        ))
        .centered(),
    ];

    let help_popup = Paragraph::new(help_text).block(
        Block::default()
            .title(" Keyboard Shortcuts ")
            .title_style(Style::default().fg(Color::Yellow).bold())
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow)),
    );

    f.render_widget(help_popup, popup_area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use pomo_core::CycleConfig;
    use ratatui::{backend::TestBackend, Terminal};
    use std::time::Instant;

    fn render(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(60, 20)).unwrap();
        terminal.draw(|f| draw(f, app)).unwrap();

        let buffer = terminal.backend().buffer();
        let mut screen = String::new();
        for row in buffer.content.chunks(buffer.area.width as usize) {
            for cell in row {
                screen.push_str(cell.symbol());
            }
            screen.push('\n');
        }
        screen
    }

    fn app() -> App {
        let config = CycleConfig::new(1500, 300, 900, 4).unwrap();
        App::new(config, Instant::now())
    }

    #[test]
    fn test_timer_text() {
        assert_eq!(TimerDisplay::new(1500).text(), "25:00");
        assert_eq!(TimerDisplay::new(42).text(), "42");
    }

    #[test]
    fn test_hidden_button_swallows_activation() {
        let mut pressed = 0;
        assert!(Button::new("Start", 's').activate(|| pressed += 1));
        let hidden = Button::new("Play", 'p').hidden(true);
        assert!(!hidden.activate(|| pressed += 1));
        assert_eq!(pressed, 1);
    }

    #[test]
    fn test_idle_screen() {
        let screen = render(&app());
        assert!(screen.contains("You are: resting"));
        assert!(screen.contains("25:00"));
        assert!(screen.contains("Start"));
        assert!(screen.contains("Rest"));
        assert!(!screen.contains("Pause"));
        assert!(!screen.contains("Play"));
        assert!(screen.contains("Completed cycles: 0"));
        assert!(screen.contains("Time worked: 00"));
        assert!(screen.contains("Pomodoros completed: 0"));
    }

    #[test]
    fn test_working_screen() {
        let mut app = app();
        let now = Instant::now();
        app.activate(Control::Start, now);

        let screen = render(&app);
        assert!(screen.contains("You are: working"));
        assert!(screen.contains("Pause"));

        app.activate(Control::TogglePause, now);
        let screen = render(&app);
        assert!(screen.contains("[PAUSED]"));
        assert!(screen.contains("Play"));
    }

    #[test]
    fn test_control_hit_testing() {
        let area = Rect::new(0, 0, 60, 20);
        let controls = areas(area).controls;

        let start = controls[0];
        let hit = control_at(area, start.x + 1, start.y + 1);
        assert_eq!(hit, Some(Control::Start));
        let pause = controls[2];
        let hit = control_at(area, pause.x + 1, pause.y + 1);
        assert_eq!(hit, Some(Control::TogglePause));
        assert_eq!(control_at(area, 0, 0), None);
    }

    #[test]
    fn test_accent_follows_stage() {
        let mut app = app();
        let now = Instant::now();
        assert_eq!(accent(&app), Color::DarkGray);

        app.activate(Control::Start, now);
        assert_eq!(accent(&app), Color::Red);

        app.activate(Control::Rest, now);
        assert_eq!(accent(&app), Color::Green);

        // Pausing a rest keeps the resting tint
        app.activate(Control::TogglePause, now);
        assert_eq!(accent(&app), Color::Green);
    }
}
