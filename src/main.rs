use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use chrono::Datelike;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::{event, execute, terminal};
use ratatui::prelude::*;
use ratatui::widgets::*;
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use health_compass::app::{Phase, Shell};
use health_compass::assess::{self, AssessmentProvider};
use health_compass::config::Config;
use health_compass::error::CompassError;
use health_compass::form::{Field, SymptomForm};
use health_compass::gauge;
use health_compass::schemas::HealthAssessmentResponse;

const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];

#[tokio::main]
async fn main() -> Result<()> {
    health_compass::load_env();
    let config = Config::load().context("Failed to load configuration")?;

    // Diagnostics go to a file; stdout/stderr belong to the TUI.
    let log_file = std::fs::File::create(&config.ui.log_file)
        .with_context(|| format!("Failed to open log file {}", config.ui.log_file))?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.runtime.log_level))
        .with_writer(std::sync::Mutex::new(log_file))
        .with_ansi(false)
        .init();

    // A missing credential is fatal here: an assessment tool with no provider
    // has nothing to do. The error stays on stderr, before the TUI starts.
    let provider = assess::create_provider(&config).map_err(|e| anyhow::anyhow!("{e}"))?;

    info!(provider = %config.assessment.provider, model = %config.assessment.model,
          "starting health-compass");

    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut term = Terminal::new(backend)?;

    let res = run(&mut term, provider, &config).await;

    terminal::disable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::LeaveAlternateScreen)?;
    res
}

struct Ui {
    form: SymptomForm,
    shell: Shell,
    /// Scroll offset for the result view
    scroll: u16,
    /// Transient hint shown when a submit is refused by the required-field gate
    hint: Option<String>,
    started: Instant,
}

impl Ui {
    fn new() -> Self {
        Self {
            form: SymptomForm::new(),
            shell: Shell::new(),
            scroll: 0,
            hint: None,
            started: Instant::now(),
        }
    }
}

async fn run(
    term: &mut Terminal<ratatui::backend::CrosstermBackend<io::Stdout>>,
    provider: Arc<dyn AssessmentProvider>,
    config: &Config,
) -> Result<()> {
    let mut ui = Ui::new();
    let (tx, mut rx) = mpsc::channel::<Result<HealthAssessmentResponse, CompassError>>(1);
    let tick = Duration::from_millis(config.ui.tick_ms);

    loop {
        term.draw(|f| draw(f, &ui))?;

        // Outcome of the in-flight call, if any
        if let Ok(outcome) = rx.try_recv() {
            ui.shell.complete(outcome);
        }

        if !event::poll(tick)? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind == KeyEventKind::Release {
            continue;
        }
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            break;
        }

        match ui.shell.phase {
            // Input disabled while the request is in flight; no concurrent
            // submissions, no cancellation.
            Phase::Submitting => {}
            Phase::Ready(_) => match key.code {
                KeyCode::Char('q') | KeyCode::Esc => break,
                KeyCode::Char('n') | KeyCode::Enter => {
                    ui.shell.reset();
                    ui.form = SymptomForm::new();
                    ui.scroll = 0;
                }
                KeyCode::PageUp => ui.scroll = ui.scroll.saturating_sub(5),
                KeyCode::PageDown => ui.scroll = ui.scroll.saturating_add(5),
                KeyCode::Up => ui.scroll = ui.scroll.saturating_sub(1),
                KeyCode::Down => ui.scroll = ui.scroll.saturating_add(1),
                _ => {}
            },
            Phase::Idle | Phase::Failed(_) => {
                if handle_form_key(&mut ui, key, &provider, &tx) {
                    break;
                }
            }
        }
    }

    Ok(())
}

/// Returns true when the user asked to quit.
fn handle_form_key(
    ui: &mut Ui,
    key: KeyEvent,
    provider: &Arc<dyn AssessmentProvider>,
    tx: &mpsc::Sender<Result<HealthAssessmentResponse, CompassError>>,
) -> bool {
    match key.code {
        KeyCode::Esc => {
            // First Esc dismisses an error banner, Esc from Idle quits.
            if matches!(ui.shell.phase, Phase::Failed(_)) {
                ui.shell.reset();
            } else {
                return true;
            }
        }
        KeyCode::Enter => {
            // A failed attempt resets first, then resubmits; form values are
            // retained for resubmission.
            if matches!(ui.shell.phase, Phase::Failed(_)) {
                ui.shell.reset();
            }
            if !ui.form.is_complete() {
                let missing: Vec<&str> = ui
                    .form
                    .missing_fields()
                    .into_iter()
                    .map(Field::label)
                    .collect();
                ui.hint = Some(format!("Required: {}", missing.join(", ")));
                return false;
            }
            ui.hint = None;
            let data = ui.form.data();
            if ui.shell.submit(&data) {
                let provider = provider.clone();
                let tx = tx.clone();
                ui.started = Instant::now();
                tokio::spawn(async move {
                    let outcome = provider.analyze(&data).await;
                    let _ = tx.send(outcome).await;
                });
            }
        }
        _ => {
            ui.hint = None;
            ui.form.handle_key(key);
        }
    }
    false
}

fn draw(f: &mut Frame, ui: &Ui) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(10),
            Constraint::Length(3),
        ])
        .split(f.size());

    draw_header(f, chunks[0]);

    match &ui.shell.phase {
        Phase::Idle => draw_form(f, chunks[1], ui, None),
        Phase::Failed(message) => draw_form(f, chunks[1], ui, Some(message.as_str())),
        Phase::Submitting => draw_submitting(f, chunks[1], ui),
        Phase::Ready(response) => draw_result(f, chunks[1], response, ui.scroll),
    }

    draw_footer(f, chunks[2], ui);
}

fn draw_header(f: &mut Frame, area: Rect) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            "HealthCompass AI",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  |  Check your symptoms with AI"),
    ]))
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(header, area);
}

fn draw_footer(f: &mut Frame, area: Rect, ui: &Ui) {
    let keys = match ui.shell.phase {
        Phase::Idle | Phase::Failed(_) => {
            "Tab/↑↓ move • ←/→ gender • Enter submit • Ctrl-C quit"
        }
        Phase::Submitting => "Analyzing… input disabled • Ctrl-C quit",
        Phase::Ready(_) => "n/Enter new assessment • PgUp/PgDn scroll • q quit",
    };
    let year = chrono::Utc::now().year();
    let footer = Paragraph::new(vec![Line::raw(format!(
        "{keys}  |  © {year} HealthCompass AI — informational only; in an emergency call your local emergency number."
    ))])
    .style(Style::default().fg(Color::DarkGray))
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(footer, area);
}

fn draw_form(f: &mut Frame, area: Rect, ui: &Ui, error: Option<&str>) {
    let mut constraints = vec![Constraint::Length(2)];
    if error.is_some() {
        constraints.push(Constraint::Length(3));
    }
    constraints.extend([
        Constraint::Length(3), // age
        Constraint::Length(3), // gender
        Constraint::Length(4), // symptoms
        Constraint::Length(3), // duration
        Constraint::Length(4), // history
        Constraint::Length(1), // hint
        Constraint::Min(0),
    ]);
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    let mut idx = 0;
    let intro = Paragraph::new(vec![
        Line::styled(
            "Tell us how you're feeling",
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Line::styled(
            "Provide as much detail as possible for an accurate assessment.",
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    f.render_widget(intro, rows[idx]);
    idx += 1;

    if let Some(message) = error {
        let banner = Paragraph::new(Line::raw(message))
            .style(Style::default().fg(Color::Red))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Red)),
            )
            .wrap(Wrap { trim: true });
        f.render_widget(banner, rows[idx]);
        idx += 1;
    }

    for field in Field::ALL {
        draw_field(f, rows[idx], &ui.form, field);
        idx += 1;
    }

    if let Some(hint) = &ui.hint {
        let hint_line = Paragraph::new(Line::raw(hint.as_str()))
            .style(Style::default().fg(Color::Yellow));
        f.render_widget(hint_line, rows[idx]);
    }
}

fn draw_field(f: &mut Frame, area: Rect, form: &SymptomForm, field: Field) {
    let focused = form.focus == field;
    let border_style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let title = if field.required() {
        format!("{} *", field.label())
    } else {
        field.label().to_string()
    };

    let value = form.value(field);
    let content = if value.is_empty() && field != Field::Gender {
        Line::styled(field.placeholder(), Style::default().fg(Color::DarkGray))
    } else if field == Field::Gender {
        Line::from(vec![
            Span::raw("< "),
            Span::styled(value, Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" >"),
        ])
    } else {
        let cursor = if focused { "█" } else { "" };
        Line::raw(format!("{value}{cursor}"))
    };

    let widget = Paragraph::new(content)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style)
                .title(title),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(widget, area);
}

fn draw_submitting(f: &mut Frame, area: Rect, ui: &Ui) {
    let frame = (ui.started.elapsed().as_millis() / 250) as usize % SPINNER.len();
    let body = Paragraph::new(vec![
        Line::raw(""),
        Line::styled(
            format!("{} Analyzing your symptoms…", SPINNER[frame]),
            Style::default().fg(Color::Cyan),
        ),
        Line::raw(""),
        Line::styled(
            "This usually takes a few seconds.",
            Style::default().fg(Color::DarkGray),
        ),
    ])
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL).title("Assessment"));
    f.render_widget(body, area);
}

fn draw_result(f: &mut Frame, area: Rect, response: &HealthAssessmentResponse, scroll: u16) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Min(4)])
        .split(area);

    let urgency = Some(response.urgency);
    let color = gauge::display_color(urgency);
    let score = gauge::severity_score(urgency);

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(30), Constraint::Min(10)])
        .split(rows[0]);

    let meter = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Estimated Urgency"),
        )
        .gauge_style(Style::default().fg(color))
        .percent(score)
        .label(format!("{} ({})", response.urgency, score));
    f.render_widget(meter, cols[0]);

    let summary = Paragraph::new(Line::raw(response.summary.as_str()))
        .style(Style::default().fg(color))
        .block(Block::default().borders(Borders::ALL).title("Summary"))
        .wrap(Wrap { trim: true });
    f.render_widget(summary, cols[1]);

    let body = Paragraph::new(result_lines(response))
        .block(Block::default().borders(Borders::ALL).title("Assessment"))
        .wrap(Wrap { trim: true })
        .scroll((scroll, 0));
    f.render_widget(body, rows[1]);
}

/// Build the scrollable result body. Lists render in the exact order the
/// service delivered them.
fn result_lines(response: &HealthAssessmentResponse) -> Vec<Line<'_>> {
    let section = |title: &str| {
        Line::styled(
            title.to_string(),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
    };

    let mut lines = Vec::new();

    lines.push(section("Potential Conditions"));
    if response.potential_conditions.is_empty() {
        lines.push(Line::styled(
            "  (none suggested)",
            Style::default().fg(Color::DarkGray),
        ));
    }
    for condition in &response.potential_conditions {
        lines.push(Line::from(vec![
            Span::styled(
                format!("  {}", condition.name),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  [{} Probability]", condition.probability),
                Style::default().fg(Color::Blue),
            ),
        ]));
        lines.push(Line::raw(format!("    {}", condition.description)));
        lines.push(Line::styled(
            format!("    Why: {}", condition.reasoning),
            Style::default().fg(Color::DarkGray),
        ));
        lines.push(Line::raw(""));
    }

    lines.push(section("Recommended Actions"));
    for action in &response.recommended_actions {
        lines.push(Line::raw(format!("  • {}", action)));
    }
    lines.push(Line::raw(""));

    lines.push(section("Lifestyle & Care"));
    for tip in &response.lifestyle_tips {
        lines.push(Line::raw(format!("  • {}", tip)));
    }
    lines.push(Line::raw(""));

    lines.push(section("Medical Disclaimer"));
    lines.push(Line::raw(format!("  {}", response.disclaimer)));
    lines.push(Line::styled(
        format!("  {}", gauge::EMERGENCY_REMINDER),
        Style::default().fg(Color::DarkGray),
    ));

    lines
}
