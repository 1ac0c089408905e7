use std::io;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Bar, BarChart, BarGroup, Block, Borders, Clear, Paragraph};

use ipl_terminal::perf_model::{self, PerformanceClass, Prediction};
use ipl_terminal::player_stats::PlayerStatistics;
use ipl_terminal::state::{
    AppContext, AppState, Screen, league_averages, role_filter_label, sort_label,
};

struct App {
    ctx: AppContext,
    state: AppState,
    should_quit: bool,
}

impl App {
    fn new(ctx: AppContext) -> Self {
        let mut state = AppState::new();
        state.push_log(format!(
            "[INFO] Loaded {} players from {}",
            ctx.players.len(),
            ctx.stats_path.display()
        ));
        match (&ctx.model, &ctx.model_error) {
            (Some(model), _) => state.push_log(format!(
                "[INFO] Performance model v{} ready",
                model.artifact().version
            )),
            (None, Some(err)) => state.push_log(format!("[WARN] No performance model: {err}")),
            (None, None) => {}
        }
        Self {
            ctx,
            state,
            should_quit: false,
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('d') | KeyCode::Enter => {
                if self.state.selected_player(&self.ctx).is_some() {
                    self.state.screen = Screen::Player;
                }
            }
            KeyCode::Char('b') | KeyCode::Esc => self.state.screen = Screen::Roster,
            KeyCode::Char('j') | KeyCode::Down => self.state.select_next(&self.ctx),
            KeyCode::Char('k') | KeyCode::Up => self.state.select_prev(&self.ctx),
            KeyCode::Char('r') | KeyCode::Char('R') => {
                self.state.cycle_role_filter();
                self.state.push_log(format!(
                    "[INFO] Role filter: {}",
                    role_filter_label(self.state.role_filter)
                ));
            }
            KeyCode::Char('s') => self.state.cycle_sort(),
            KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
            _ => {}
        }
    }
}

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let ctx = AppContext::load()?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let mut app = App::new(ctx);
    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    res.context("terminal loop")?;
    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let header =
        Paragraph::new(header_text(app)).block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    match app.state.screen {
        Screen::Roster => render_roster(frame, chunks[1], app),
        Screen::Player => render_player(frame, chunks[1], app),
    }

    let footer =
        Paragraph::new(footer_text(&app.state)).block(Block::default().borders(Borders::TOP));
    frame.render_widget(footer, chunks[2]);

    if app.state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(app: &App) -> String {
    let title = match app.state.screen {
        Screen::Roster => format!(
            "IPL ROSTER | {} | Sort: {} | {} players",
            role_filter_label(app.state.role_filter),
            sort_label(app.state.sort),
            app.state.filtered_players(&app.ctx).len()
        ),
        Screen::Player => "IPL PLAYER".to_string(),
    };
    let line1 = format!("  .-.  {}", title);
    let line2 = " /___\\".to_string();
    let line3 = "  |_|".to_string();
    format!("{line1}\n{line2}\n{line3}")
}

fn footer_text(state: &AppState) -> String {
    match state.screen {
        Screen::Roster => {
            "Enter/d Player | j/k/↑/↓ Move | r Role filter | s Sort | ? Help | q Quit".to_string()
        }
        Screen::Player => {
            "b/Esc Back | j/k/↑/↓ Next/Prev player | r Role filter | ? Help | q Quit".to_string()
        }
    }
}

fn render_roster(frame: &mut Frame, area: Rect, app: &App) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(area);

    let widths = roster_columns();
    render_roster_header(frame, sections[0], &widths);

    let list_area = sections[1];
    let players = app.state.filtered_players(&app.ctx);
    if players.is_empty() {
        let empty = Paragraph::new("No players for this role filter")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, list_area);
        return;
    }

    if list_area.height == 0 {
        return;
    }

    let visible = list_area.height as usize;
    let (start, end) = visible_range(app.state.selected, players.len(), visible);

    for (i, idx) in (start..end).enumerate() {
        let row_area = Rect {
            x: list_area.x,
            y: list_area.y + i as u16,
            width: list_area.width,
            height: 1,
        };

        let selected = idx == app.state.selected;
        let row_style = if selected {
            Style::default().fg(Color::White).bg(Color::DarkGray)
        } else {
            Style::default()
        };

        if selected {
            frame.render_widget(Block::default().style(row_style), row_area);
        }

        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(widths)
            .split(row_area);

        let p = players[idx];
        render_cell_text(frame, cols[0], &p.player, row_style);
        render_cell_text(frame, cols[1], p.role.label(), row_style);
        render_cell_text(frame, cols[2], &p.total_matches.to_string(), row_style);
        render_cell_text(frame, cols[3], &p.total_runs.to_string(), row_style);
        render_cell_text(frame, cols[4], &fmt_rate(p.batting_average), row_style);
        render_cell_text(frame, cols[5], &fmt_rate(p.strike_rate), row_style);
        render_cell_text(frame, cols[6], &p.fours.to_string(), row_style);
        render_cell_text(frame, cols[7], &p.sixes.to_string(), row_style);
        render_cell_text(frame, cols[8], &p.wickets.to_string(), row_style);
        render_cell_text(frame, cols[9], &fmt_rate(p.economy_rate), row_style);
    }
}

fn roster_columns() -> [Constraint; 10] {
    [
        Constraint::Min(18),
        Constraint::Length(12),
        Constraint::Length(5),
        Constraint::Length(7),
        Constraint::Length(8),
        Constraint::Length(8),
        Constraint::Length(5),
        Constraint::Length(5),
        Constraint::Length(6),
        Constraint::Length(7),
    ]
}

fn render_roster_header(frame: &mut Frame, area: Rect, widths: &[Constraint]) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(widths)
        .split(area);
    let style = Style::default().add_modifier(Modifier::BOLD);

    render_cell_text(frame, cols[0], "Player", style);
    render_cell_text(frame, cols[1], "Role", style);
    render_cell_text(frame, cols[2], "M", style);
    render_cell_text(frame, cols[3], "Runs", style);
    render_cell_text(frame, cols[4], "Avg", style);
    render_cell_text(frame, cols[5], "SR", style);
    render_cell_text(frame, cols[6], "4s", style);
    render_cell_text(frame, cols[7], "6s", style);
    render_cell_text(frame, cols[8], "Wkts", style);
    render_cell_text(frame, cols[9], "Econ", style);
}

fn render_player(frame: &mut Frame, area: Rect, app: &App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(3)])
        .split(area);

    let Some(player) = app.state.selected_player(&app.ctx) else {
        let empty = Paragraph::new("No player selected")
            .block(Block::default().title("Player").borders(Borders::ALL));
        frame.render_widget(empty, rows[0]);
        render_console(frame, rows[1], &app.state);
        return;
    };

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(30),
            Constraint::Min(30),
            Constraint::Length(34),
        ])
        .split(rows[0]);

    let left_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Min(1)])
        .split(columns[0]);

    let middle_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(9), Constraint::Min(1)])
        .split(columns[1]);

    let profile = Paragraph::new(profile_text(player))
        .block(Block::default().title("Profile").borders(Borders::ALL));
    frame.render_widget(profile, left_chunks[0]);

    let batting = Paragraph::new(batting_text(player))
        .block(Block::default().title("Batting").borders(Borders::ALL));
    frame.render_widget(batting, left_chunks[1]);

    let bowling = Paragraph::new(bowling_text(player))
        .block(Block::default().title("Bowling").borders(Borders::ALL));
    frame.render_widget(bowling, middle_chunks[0]);

    let comparison = Paragraph::new(comparison_text(app, player))
        .block(Block::default().title("vs League Avg").borders(Borders::ALL));
    frame.render_widget(comparison, middle_chunks[1]);

    render_prediction(frame, columns[2], app, player);
    render_console(frame, rows[1], &app.state);
}

fn profile_text(p: &PlayerStatistics) -> String {
    format!(
        "{}\nRole: {}\nMatches: {}",
        p.player,
        p.role.label(),
        p.total_matches
    )
}

fn batting_text(p: &PlayerStatistics) -> String {
    [
        format!("Runs: {}", p.total_runs),
        format!("Balls: {}", p.balls_faced),
        format!("Outs: {}", p.times_out),
        format!("Matches: {}", p.matches_played),
        format!("Average: {}", fmt_rate(p.batting_average)),
        format!("Strike rate: {}", fmt_rate(p.strike_rate)),
        format!("Fours: {}", p.fours),
        format!("Sixes: {}", p.sixes),
    ]
    .join("\n")
}

fn bowling_text(p: &PlayerStatistics) -> String {
    if p.balls_bowled == 0 {
        return "Has not bowled".to_string();
    }
    [
        format!("Wickets: {}", p.wickets),
        format!("Conceded: {}", p.runs_conceded),
        format!("Balls: {}", p.balls_bowled),
        format!("Matches: {}", p.matches_bowled),
        format!("Economy: {}", fmt_rate(p.economy_rate)),
        format!("Average: {}", fmt_rate(p.bowling_average)),
        format!("Strike rate: {}", fmt_rate(p.bowling_strike_rate)),
    ]
    .join("\n")
}

fn comparison_text(app: &App, p: &PlayerStatistics) -> String {
    let filtered = app.state.filtered_players(&app.ctx);
    let Some(avg) = league_averages(&filtered) else {
        return "No comparison data".to_string();
    };
    let runs_per_match = if p.matches_played > 0 {
        p.total_runs as f64 / p.matches_played as f64
    } else {
        0.0
    };
    [
        format!("{:<16} {:>8} {:>8}", "Metric", "Player", "League"),
        format!(
            "{:<16} {:>8} {:>8}",
            "Batting avg",
            fmt_rate(p.batting_average),
            fmt_rate(avg.batting_average)
        ),
        format!(
            "{:<16} {:>8} {:>8}",
            "Strike rate",
            fmt_rate(p.strike_rate),
            fmt_rate(avg.strike_rate)
        ),
        format!(
            "{:<16} {:>8} {:>8}",
            "Runs/match",
            fmt_rate(runs_per_match),
            fmt_rate(avg.runs_per_match)
        ),
    ]
    .join("\n")
}

fn render_prediction(frame: &mut Frame, area: Rect, app: &App, player: &PlayerStatistics) {
    let block = Block::default().title("Prediction").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.height == 0 || inner.width == 0 {
        return;
    }

    if !perf_model::prediction_eligible(player) {
        let empty = Paragraph::new(format!(
            "Not scored\n\nScoring needs a batting\nrole and more than {} runs",
            perf_model::PREDICTION_MIN_RUNS
        ))
        .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, inner);
        return;
    }

    let Some(model) = &app.ctx.model else {
        let text = match &app.ctx.model_error {
            Some(err) => format!("Model unavailable\n\n{err}"),
            None => "Model unavailable".to_string(),
        };
        let empty = Paragraph::new(text).style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, inner);
        return;
    };

    let pred = model.predict_player(player);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(1)])
        .split(inner);

    let color = match pred.class {
        PerformanceClass::High => Color::Green,
        PerformanceClass::Regular => Color::Yellow,
    };
    let summary = Paragraph::new(format!(
        "{}\nConfidence: {:.1}%\nHigh prob: {:.1}%",
        pred.class.label(),
        pred.confidence(),
        pred.p_high * 100.0
    ))
    .style(Style::default().fg(color).add_modifier(Modifier::BOLD));
    frame.render_widget(summary, chunks[0]);

    frame.render_widget(prediction_bar_chart(&pred), chunks[1]);
}

fn prediction_bar_chart(pred: &Prediction) -> BarChart<'static> {
    let high = Bar::default()
        .value((pred.p_high * 100.0).round() as u64)
        .label("High".into())
        .style(Style::default().fg(Color::Green));
    let regular = Bar::default()
        .value((pred.p_regular * 100.0).round() as u64)
        .label("Reg".into())
        .style(Style::default().fg(Color::Yellow));

    BarChart::default()
        .data(BarGroup::default().bars(&[high, regular]))
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(1)
        .group_gap(0)
        .max(100)
}

fn render_console(frame: &mut Frame, area: Rect, state: &AppState) {
    let console = Paragraph::new(console_text(state))
        .block(Block::default().title("Console").borders(Borders::ALL));
    frame.render_widget(console, area);
}

fn console_text(state: &AppState) -> String {
    if state.logs.is_empty() {
        return "No alerts yet".to_string();
    }
    state
        .logs
        .iter()
        .rev()
        .take(1)
        .cloned()
        .collect::<Vec<_>>()
        .join("\n")
}

fn fmt_rate(v: f64) -> String {
    if v.is_finite() {
        format!("{v:.2}")
    } else {
        "-".to_string()
    }
}

fn visible_range(selected: usize, total: usize, visible: usize) -> (usize, usize) {
    if total == 0 || visible == 0 {
        return (0, 0);
    }
    if total <= visible {
        return (0, total);
    }

    let mut start = selected.saturating_sub(visible / 2);
    if start + visible > total {
        start = total - visible;
    }
    (start, start + visible)
}

fn render_cell_text(frame: &mut Frame, area: Rect, text: &str, style: Style) {
    if area.height == 0 {
        return;
    }
    let text_area = Rect {
        x: area.x,
        y: area.y + (area.height / 2),
        width: area.width,
        height: 1,
    };
    let paragraph = Paragraph::new(text).style(style);
    frame.render_widget(paragraph, text_area);
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "IPL Terminal - Help",
        "",
        "Global:",
        "  Enter / d    Player screen",
        "  b / Esc      Back to roster",
        "  r            Cycle role filter",
        "  s            Cycle sort mode",
        "  ?            Toggle help",
        "  q            Quit",
        "",
        "Roster:",
        "  j/k or ↑/↓   Move selection",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
