use std::io;
use std::sync::mpsc;
use std::time::{Duration, Instant};

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
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use mlfootball_terminal::predict_api::{MatchPrediction, api_base_url};
use mlfootball_terminal::provider::spawn_provider;
use mlfootball_terminal::state::{self, AppState, FormField, apply_delta};

struct App {
    state: AppState,
    should_quit: bool,
    cmd_tx: Option<mpsc::Sender<state::ProviderCommand>>,
}

impl App {
    fn new(cmd_tx: Option<mpsc::Sender<state::ProviderCommand>>) -> Self {
        Self {
            state: AppState::new(),
            should_quit: false,
            cmd_tx,
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
            KeyCode::Esc => self.state.help_overlay = false,
            KeyCode::Tab | KeyCode::Down => self.state.focus_next(),
            KeyCode::BackTab | KeyCode::Up => self.state.focus_prev(),
            KeyCode::Left => self.state.select_prev_team(),
            KeyCode::Right => self.state.select_next_team(),
            KeyCode::Enter => self.submit(),
            KeyCode::Char('r') => self.retry_teams(),
            KeyCode::Backspace => {
                if self.state.focus == FormField::Date {
                    self.state.date_pop();
                }
            }
            KeyCode::Char(ch) => {
                if self.state.focus == FormField::Date {
                    self.state.date_push(ch);
                }
            }
            _ => {}
        }
    }

    fn submit(&mut self) {
        let query = match self.state.build_query() {
            Ok(query) => query,
            Err(err) => {
                self.state.error = Some(err.message().to_string());
                return;
            }
        };

        let Some(tx) = &self.cmd_tx else {
            self.state.push_log("[INFO] Prediction fetch unavailable");
            return;
        };

        let seq = self.state.begin_request();
        self.state.push_log(format!(
            "[INFO] Requesting {} vs {} on {}",
            query.home_team, query.away_team, query.date
        ));
        if tx
            .send(state::ProviderCommand::FetchPrediction { seq, query })
            .is_err()
        {
            self.state.push_log("[WARN] Prediction request failed");
            self.state.abort_request(seq);
        }
    }

    fn retry_teams(&mut self) {
        if !self.state.teams_failed {
            return;
        }
        let Some(tx) = &self.cmd_tx else {
            self.state.push_log("[INFO] Teams fetch unavailable");
            return;
        };
        if tx.send(state::ProviderCommand::FetchTeams).is_err() {
            self.state.push_log("[WARN] Teams request failed");
        } else {
            self.state.begin_teams_load();
            self.state.push_log("[INFO] Teams request sent");
        }
    }
}

fn main() -> io::Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let (tx, rx) = mpsc::channel();
    let (cmd_tx, cmd_rx) = mpsc::channel();
    spawn_provider(tx, cmd_rx);

    let mut app = App::new(Some(cmd_tx));
    let res = run_app(&mut terminal, &mut app, rx);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: mpsc::Receiver<state::Delta>,
) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        while let Ok(delta) = rx.try_recv() {
            apply_delta(&mut app.state, delta);
        }

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
            Constraint::Length(5),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let header =
        Paragraph::new(header_text(&app.state)).block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(44), Constraint::Min(30)])
        .split(chunks[1]);

    render_form(frame, columns[0], &app.state);
    render_result(frame, columns[1], &app.state);

    let console = Paragraph::new(console_text(&app.state))
        .block(Block::default().title("Console").borders(Borders::ALL));
    frame.render_widget(console, chunks[2]);

    let footer = Paragraph::new(footer_text()).block(Block::default().borders(Borders::TOP));
    frame.render_widget(footer, chunks[3]);

    if app.state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(state: &AppState) -> String {
    let status = if state.teams_loading {
        "loading teams".to_string()
    } else if state.teams_failed {
        "teams unavailable".to_string()
    } else {
        format!("{} teams", state.teams.len())
    };
    let line1 = format!("  _o_  ML FOOTBALL PREDICTOR | {} | {}", api_base_url(), status);
    let line2 = " /___\\".to_string();
    format!("{line1}\n{line2}")
}

fn footer_text() -> &'static str {
    "Tab/↑/↓ Field | ←/→ Team | Enter Predict | r Retry teams | ? Help | q Quit"
}

fn render_form(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default()
        .title("Fixture")
        .borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines = vec![
        field_line("Home team", selector_text(state, state.home_team()), state, FormField::HomeTeam),
        Line::raw(""),
        field_line("Away team", selector_text(state, state.away_team()), state, FormField::AwayTeam),
        Line::raw(""),
        field_line("Match date", date_text(state), state, FormField::Date),
        Line::raw(""),
        submit_line(state),
    ];

    if let Some(error) = &state.error {
        lines.push(Line::raw(""));
        lines.push(Line::styled(
            error.clone(),
            Style::default().fg(Color::Red),
        ));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}

fn field_line<'a>(label: &'a str, value: String, state: &AppState, field: FormField) -> Line<'a> {
    let focused = state.focus == field;
    let marker = if focused { "> " } else { "  " };
    let label_style = if focused {
        Style::default().add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    let value_style = if state.teams_loading && field != FormField::Date {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default().fg(Color::Cyan)
    };
    Line::from(vec![
        Span::raw(marker),
        Span::styled(format!("{label:<11}"), label_style),
        Span::styled(value, value_style),
    ])
}

fn selector_text(state: &AppState, team: Option<&str>) -> String {
    if state.teams_loading {
        return "Loading teams...".to_string();
    }
    match team {
        Some(team) => format!("< {team} >"),
        None => "Select team".to_string(),
    }
}

fn date_text(state: &AppState) -> String {
    if state.focus == FormField::Date {
        format!("{}_", state.date)
    } else {
        state.date.clone()
    }
}

fn submit_line(state: &AppState) -> Line<'static> {
    let focused = state.focus == FormField::Submit;
    let marker = if focused { "> " } else { "  " };
    let label = if state.loading {
        "Generating prediction..."
    } else {
        "[ Predict match statistics ]"
    };
    let style = if state.loading || state.teams_loading {
        Style::default().fg(Color::DarkGray)
    } else if focused {
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Green)
    };
    Line::from(vec![Span::raw(marker), Span::styled(label, style)])
}

fn render_result(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default()
        .title("Prediction")
        .borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if state.loading {
        let waiting = Paragraph::new("Generating prediction...")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(waiting, inner);
        return;
    }

    let Some(prediction) = &state.prediction else {
        let empty = Paragraph::new("No prediction yet")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, inner);
        return;
    };

    let lines = prediction_lines(prediction);
    frame.render_widget(Paragraph::new(lines), inner);
}

fn prediction_lines(prediction: &MatchPrediction) -> Vec<Line<'static>> {
    vec![
        Line::styled(
            "Expected goals",
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Line::raw(format!("  Home: {:.1}", prediction.predicted_home_goals)),
        Line::raw(format!("  Away: {:.1}", prediction.predicted_away_goals)),
        Line::raw(""),
        Line::styled(
            "Total goals",
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Line::raw(format!(
            "  {:.1} ({})",
            prediction.predicted_total_goals, prediction.predicted_goals_classification
        )),
        Line::raw(""),
        Line::styled("Markets", Style::default().add_modifier(Modifier::BOLD)),
        market_line("Over 2.5", &prediction.predicted_over_2_5),
        market_line("BTTS", &prediction.predicted_btts),
    ]
}

fn market_line(label: &str, value: &str) -> Line<'static> {
    let color = if value == "Yes" {
        Color::Green
    } else {
        Color::Red
    };
    Line::from(vec![
        Span::raw(format!("  {label:<9}")),
        Span::styled(value.to_string(), Style::default().fg(color)),
    ])
}

fn console_text(state: &AppState) -> String {
    if state.logs.is_empty() {
        return "No alerts yet".to_string();
    }
    state
        .logs
        .iter()
        .rev()
        .take(3)
        .cloned()
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "ML Football Predictor - Help",
        "",
        "  Tab / ↓      Next field",
        "  Shift-Tab/↑  Previous field",
        "  ← / →        Cycle team in focused selector",
        "  0-9 and -    Edit the date field",
        "  Enter        Predict match statistics",
        "  r            Retry team load after a failure",
        "  ?            Toggle help",
        "  q            Quit",
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
