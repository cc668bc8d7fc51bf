//! Play command implementation - interactive TUI.

// Terminal cells and braille dots convert between u16 and f64 for layout
#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::needless_pass_by_value
)]

use super::{CliError, GameArgs};
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseButton,
        MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use geoquest::controller::{FactPanel, MarkerState, Visibility};
use geoquest::game::{GameComplete, Outcome};
use geoquest::{GameSession, InteractionController, ScreenPoint, ViewModel};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Circle, Line as Segment},
        Block, Borders, Clear, Paragraph, Wrap,
    },
    Frame, Terminal,
};
use std::io::stdout;
use std::time::{Duration, Instant};
use tracing::info;

/// Zoom factor per key press.
const KEY_ZOOM: f64 = 1.5;
/// Zoom factor per scroll notch.
const SCROLL_ZOOM: f64 = 1.2;
/// Pan distance per arrow key, in braille dots.
const KEY_PAN: f64 = 16.0;
/// Braille dots per terminal cell.
const DOTS_X: f64 = 2.0;
const DOTS_Y: f64 = 4.0;

/// Execute the play command.
///
/// # Errors
///
/// Returns an error if the game data cannot be loaded or the terminal fails.
pub(crate) fn execute(game: &GameArgs) -> Result<(), CliError> {
    let (config, dataset) = game.load()?;
    let seed = game.seed();
    info!(seed, "starting interactive game");
    let session = GameSession::new(dataset, &config, seed).with_mode(game.mode());

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).map_err(|e| CliError::new(e.to_string()))?;

    let result = run_tui(&mut terminal, session, config);

    // Restore terminal even if the loop failed
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;

    result
}

/// Screen regions of the TUI.
#[derive(Debug, Clone, Copy)]
struct Areas {
    header: Rect,
    map: Rect,
    map_inner: Rect,
    footer: Rect,
}

impl Areas {
    fn split(area: Rect) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4), // Prompt and score
                Constraint::Min(8),    // Map
                Constraint::Length(3), // Controls
            ])
            .split(area);
        let map_inner = Block::default().borders(Borders::ALL).inner(chunks[1]);
        Self {
            header: chunks[0],
            map: chunks[1],
            map_inner,
            footer: chunks[2],
        }
    }

    /// Map size in braille dots.
    fn map_dots(&self) -> (f64, f64) {
        (
            f64::from(self.map_inner.width) * DOTS_X,
            f64::from(self.map_inner.height) * DOTS_Y,
        )
    }

    /// Center of the map-area cell under a terminal position, in dots.
    fn to_dots(&self, column: u16, row: u16) -> Option<ScreenPoint> {
        let inner = self.map_inner;
        if column < inner.x
            || row < inner.y
            || column >= inner.x + inner.width
            || row >= inner.y + inner.height
        {
            return None;
        }
        Some(ScreenPoint::new(
            f64::from(column - inner.x) * DOTS_X + DOTS_X / 2.0,
            f64::from(row - inner.y) * DOTS_Y + DOTS_Y / 2.0,
        ))
    }
}

/// App state for the TUI.
struct App {
    ctl: InteractionController,
    clock: Instant,
    areas: Areas,
    drag_from: Option<(u16, u16)>,
    dragged: bool,
    last_game: Option<GameComplete>,
}

impl App {
    fn now(&self) -> Duration {
        self.clock.elapsed()
    }

    fn relayout(&mut self, area: Rect) {
        let areas = Areas::split(area);
        if areas.map_inner != self.areas.map_inner {
            let (w, h) = areas.map_dots();
            self.ctl.resize(w, h);
        }
        self.areas = areas;
    }

    fn next_round(&mut self) {
        let now = self.now();
        let start = self.ctl.start_round(now);
        if let Some(done) = start.completed {
            info!(final_score = done.final_score, "game complete");
            self.last_game = Some(done);
        }
    }

    fn acknowledge(&mut self) {
        let now = self.now();
        if let Some(done) = self.ctl.acknowledge(now).and_then(|start| start.completed) {
            self.last_game = Some(done);
        }
    }

    fn map_center(&self) -> ScreenPoint {
        let (w, h) = self.areas.map_dots();
        ScreenPoint::new(w / 2.0, h / 2.0)
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        let now = self.now();
        let point = self.areas.to_dots(mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.drag_from = Some((mouse.column, mouse.row));
                self.dragged = false;
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                if let Some((col, row)) = self.drag_from {
                    let dx = (f64::from(mouse.column) - f64::from(col)) * DOTS_X;
                    let dy = (f64::from(mouse.row) - f64::from(row)) * DOTS_Y;
                    self.ctl.pan(dx, dy, now);
                    self.drag_from = Some((mouse.column, mouse.row));
                    self.dragged = true;
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                let was_drag = self.dragged;
                self.drag_from = None;
                self.dragged = false;
                if self.ctl.panel().is_some() {
                    self.acknowledge();
                } else if let Some(p) = point.filter(|_| !was_drag) {
                    self.ctl.click(p, now);
                }
            }
            MouseEventKind::ScrollUp => {
                if let Some(p) = point {
                    self.ctl.zoom(SCROLL_ZOOM, p, now);
                }
            }
            MouseEventKind::ScrollDown => {
                if let Some(p) = point {
                    self.ctl.zoom(1.0 / SCROLL_ZOOM, p, now);
                }
            }
            MouseEventKind::Moved => {
                if let Some(p) = point {
                    self.ctl.hover(p, now);
                }
            }
            _ => {}
        }
    }
}

fn run_tui(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    session: GameSession,
    config: geoquest::GameConfig,
) -> Result<(), CliError> {
    let size = terminal.size().map_err(|e| CliError::new(e.to_string()))?;
    let areas = Areas::split(Rect::new(0, 0, size.width, size.height));
    let (w, h) = areas.map_dots();

    let mut app = App {
        ctl: InteractionController::new(session, config, w, h),
        clock: Instant::now(),
        areas,
        drag_from: None,
        dragged: false,
        last_game: None,
    };
    app.next_round();

    loop {
        let size = terminal.size().map_err(|e| CliError::new(e.to_string()))?;
        app.relayout(Rect::new(0, 0, size.width, size.height));

        let now = app.now();
        app.ctl.tick(now);
        let view = app.ctl.view(now);

        // Draw
        terminal
            .draw(|f| ui(f, &app, &view))
            .map_err(|e| CliError::new(e.to_string()))?;

        // Handle input with timeout
        if !event::poll(Duration::from_millis(33)).map_err(|e| CliError::new(e.to_string()))? {
            continue;
        }
        match event::read().map_err(|e| CliError::new(e.to_string()))? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                let now = app.now();
                let center = app.map_center();
                match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => break,
                    KeyCode::Char('m') => {
                        app.ctl.toggle_mode();
                    }
                    KeyCode::Enter | KeyCode::Char(' ') => app.acknowledge(),
                    KeyCode::Char('+' | '=') => app.ctl.zoom(KEY_ZOOM, center, now),
                    KeyCode::Char('-') => app.ctl.zoom(1.0 / KEY_ZOOM, center, now),
                    KeyCode::Left => app.ctl.pan(KEY_PAN, 0.0, now),
                    KeyCode::Right => app.ctl.pan(-KEY_PAN, 0.0, now),
                    KeyCode::Up => app.ctl.pan(0.0, KEY_PAN, now),
                    KeyCode::Down => app.ctl.pan(0.0, -KEY_PAN, now),
                    KeyCode::Char('0') => app.ctl.reset_view(now),
                    _ => {}
                }
            }
            Event::Mouse(mouse) => app.handle_mouse(mouse),
            _ => {}
        }
    }

    Ok(())
}

fn ui(f: &mut Frame, app: &App, view: &ViewModel) {
    render_header(f, app.areas.header, app, view);
    render_map(f, app.areas, app, view);
    render_footer(f, app.areas.footer, view);

    if let Some(panel) = &view.panel {
        render_panel(f, app.areas.map, panel);
    }
}

fn render_header(f: &mut Frame, area: Rect, app: &App, view: &ViewModel) {
    let prompt = &view.prompt;
    let mut lines = vec![Line::from(vec![
        Span::styled(
            format!("{} ", prompt.label),
            Style::default().fg(Color::Gray),
        ),
        Span::styled(
            prompt.main.clone(),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  [{}]", prompt.target),
            Style::default().fg(Color::DarkGray),
        ),
    ])];

    let feedback_style = match view.feedback_visibility {
        Visibility::Visible => Style::default().fg(Color::Red),
        Visibility::Fading => Style::default().fg(Color::DarkGray),
        Visibility::Hidden => Style::default(),
    };
    let second = match (&view.feedback, &app.last_game) {
        (Some(text), _) => Span::styled(text.clone(), feedback_style),
        (None, Some(done)) if app.ctl.session().visited_count() == 1 => Span::styled(
            format!(
                "Game complete! Final score {} over {} rounds",
                done.final_score, done.rounds
            ),
            Style::default().fg(Color::Green),
        ),
        _ => Span::raw(""),
    };
    lines.push(Line::from(second));

    let title = format!(
        " Geoquest | Score {} | Mode: {}{} | Seen {}/{} ",
        view.score,
        view.mode.label(),
        if view.mode_enabled { "" } else { " (locked)" },
        app.ctl.session().visited_count(),
        app.ctl.session().dataset().len(),
    );
    let header = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(Span::styled(title, Style::default().add_modifier(Modifier::BOLD))),
    );
    f.render_widget(header, area);
}

fn render_map(f: &mut Frame, areas: Areas, app: &App, view: &ViewModel) {
    let (w, h) = areas.map_dots();
    let transform = view.transform;
    let shapes = app.ctl.hit_tester().shapes();

    let canvas = Canvas::default()
        .block(Block::default().borders(Borders::ALL).title(" Map "))
        .marker(Marker::Braille)
        .x_bounds([0.0, w])
        .y_bounds([0.0, h])
        .paint(|ctx| {
            for (shape, style) in shapes.iter().zip(&view.regions) {
                let color = region_color(&style.group, style.flash, style.focused);
                let ring: Vec<ScreenPoint> =
                    shape.ring.iter().map(|p| transform.apply(*p)).collect();
                for (i, a) in ring.iter().enumerate() {
                    let b = ring[(i + 1) % ring.len()];
                    ctx.draw(&Segment {
                        x1: a.x,
                        y1: h - a.y,
                        x2: b.x,
                        y2: h - b.y,
                        color,
                    });
                }
            }
            ctx.layer();
            for marker in &view.markers {
                let center = transform.apply(marker.position);
                let radius = marker.radius * transform.k;
                if radius <= 0.0 {
                    continue;
                }
                ctx.draw(&Circle {
                    x: center.x,
                    y: h - center.y,
                    radius,
                    color: marker_color(marker.state),
                });
                if view.hovered.as_deref() == Some(marker.city.as_str()) {
                    ctx.print(
                        center.x + radius + DOTS_X,
                        h - center.y,
                        Span::styled(marker.city.clone(), Style::default().fg(Color::White)),
                    );
                }
            }
        });

    f.render_widget(canvas, areas.map);
}

fn region_color(group: &str, flash: Option<Outcome>, focused: bool) -> Color {
    match flash {
        Some(Outcome::Correct) => return Color::LightGreen,
        Some(Outcome::Wrong) => return Color::LightRed,
        None => {}
    }
    if focused {
        return Color::White;
    }
    match group {
        "west" => Color::Cyan,
        "mountain" => Color::Yellow,
        "southwest" => Color::Magenta,
        "midwest" => Color::Green,
        _ => Color::DarkGray,
    }
}

fn marker_color(state: MarkerState) -> Color {
    match state {
        MarkerState::Open => Color::LightYellow,
        MarkerState::Correct => Color::LightGreen,
        MarkerState::Wrong => Color::Red,
    }
}

fn render_panel(f: &mut Frame, map: Rect, panel: &FactPanel) {
    let width = map.width.saturating_sub(8).min(60);
    let height = 9.min(map.height);
    let area = Rect::new(
        map.x + (map.width - width) / 2,
        map.y + (map.height - height) / 2,
        width,
        height,
    );

    let status_color = if panel.outcome.is_correct() {
        Color::Green
    } else {
        Color::Red
    };
    let lines = vec![
        Line::from(Span::styled(
            panel.status(),
            Style::default().fg(status_color).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            panel.city.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(panel.fact.clone()),
        Line::from(""),
        Line::from(Span::styled(
            format!("[Enter] {}", panel.action_label()),
            Style::default().fg(Color::Cyan),
        )),
    ];

    let widget = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Fact "))
        .wrap(Wrap { trim: true });
    f.render_widget(Clear, area);
    f.render_widget(widget, area);
}

fn render_footer(f: &mut Frame, area: Rect, view: &ViewModel) {
    let controls = if view.panel.is_some() {
        " [Enter/Click] Continue  [q] Quit "
    } else {
        " [Click] Select  [Scroll/+/-] Zoom  [Drag/Arrows] Pan  [0] Reset view  [m] Mode  [q] Quit "
    };

    let footer = Paragraph::new(controls)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));

    f.render_widget(footer, area);
}
