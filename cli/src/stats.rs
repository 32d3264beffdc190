use std::{io, time::Duration};

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use miernik_core::model::category::CategoryBreakdown;
use miernik_core::CategoryAggregate;
use ratatui::{
    prelude::*,
    widgets::{Bar, BarChart, BarGroup, Block, BorderType, Borders, Gauge, Padding, Paragraph},
};

// --- THEME ---
struct Theme {
    primary: Color,
    muted: Color,
    text: Color,
    people: Color,
    actions: Color,
}

const THEME: Theme = Theme {
    primary: Color::Cyan,
    muted: Color::DarkGray,
    text: Color::White,
    people: Color::Green,
    actions: Color::Blue,
};

const LABEL_CHARS: usize = 10;

pub struct StatsApp<'a> {
    pub categories: &'a CategoryAggregate,
    /// `None` shows the five-bucket overview, `Some(i)` one category's groups.
    pub current: Option<usize>,
}

impl<'a> StatsApp<'a> {
    pub fn new(categories: &'a CategoryAggregate) -> Self {
        Self {
            categories,
            current: None,
        }
    }

    pub fn next(&mut self) {
        let last = self.categories.categories.len().saturating_sub(1);
        self.current = match self.current {
            None => Some(0),
            Some(i) if i < last => Some(i + 1),
            Some(i) => Some(i),
        };
    }

    pub fn previous(&mut self) {
        self.current = match self.current {
            Some(0) | None => None,
            Some(i) => Some(i - 1),
        };
    }

    pub fn current_breakdown(&self) -> Option<&'a CategoryBreakdown> {
        self.current.and_then(|i| self.categories.categories.get(i))
    }
}

pub fn run(categories: &CategoryAggregate) -> Result<()> {
    if categories.total_people == 0 && categories.total_actions == 0 {
        println!("Brak danych do wyświetlenia.");
        return Ok(());
    }

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = StatsApp::new(categories);

    // Main loop
    loop {
        terminal.draw(|f| ui(f, &app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Char('q') | KeyCode::Esc => break,
                        KeyCode::Left | KeyCode::Char('h') => app.previous(),
                        KeyCode::Right | KeyCode::Char('l') => app.next(),
                        _ => {}
                    }
                }
            }
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    Ok(())
}

fn ui(frame: &mut Frame, app: &StatsApp) {
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(10),   // Chart + sidebar
            Constraint::Length(1), // Help
        ])
        .split(frame.area());

    // --- Header ---
    let title = match app.current_breakdown() {
        Some(b) => format!(" {} ", b.label),
        None => " Wszystkie kategorie ".to_string(),
    };
    let header_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(24), Constraint::Min(1), Constraint::Length(40)])
        .split(main_layout[0]);

    let app_title = Paragraph::new(Span::styled(
        "MIERNIK BUDŻETOWY",
        Style::default().fg(THEME.primary).add_modifier(Modifier::BOLD),
    ))
    .block(Block::default().padding(Padding::new(0, 0, 1, 0)));
    frame.render_widget(app_title, header_layout[0]);

    let at_start = app.current.is_none();
    let at_end = app.current == Some(app.categories.categories.len().saturating_sub(1));
    let nav_text = Line::from(vec![
        Span::styled(" < ", Style::default().fg(if at_start { THEME.muted } else { THEME.text })),
        Span::styled(title, Style::default().fg(THEME.text).add_modifier(Modifier::BOLD)),
        Span::styled(" > ", Style::default().fg(if at_end { THEME.muted } else { THEME.text })),
    ]);
    let nav = Paragraph::new(nav_text)
        .alignment(Alignment::Right)
        .block(Block::default().padding(Padding::new(0, 0, 1, 0)));
    frame.render_widget(nav, header_layout[2]);
    frame.render_widget(
        Block::default().borders(Borders::BOTTOM).border_style(Style::default().fg(THEME.muted)),
        main_layout[0],
    );

    // --- Content ---
    let content_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(75),
            Constraint::Length(1),
            Constraint::Percentage(25),
        ])
        .split(main_layout[1]);

    let bars = chart_bars(app);
    draw_chart(frame, &bars, content_chunks[0]);
    draw_info_panel(frame, app, content_chunks[2]);

    // --- Footer ---
    let help = Line::from(vec![
        Span::styled("NAV: ", Style::default().fg(THEME.muted)),
        Span::styled("←/→ ", Style::default().fg(THEME.text)),
        Span::raw("  "),
        Span::styled("QUIT: ", Style::default().fg(THEME.muted)),
        Span::styled("q", Style::default().fg(THEME.text)),
    ]);
    frame.render_widget(Paragraph::new(help).alignment(Alignment::Center), main_layout[2]);
}

/// (label, people, actions) per bar pair.
fn chart_bars(app: &StatsApp) -> Vec<(String, u64, u64)> {
    match app.current_breakdown() {
        None => app
            .categories
            .categories
            .iter()
            .map(|b| (short_label(&b.label), b.total_people, b.total_actions))
            .collect(),
        Some(breakdown) => breakdown
            .groups
            .iter()
            .map(|g| (short_label(&g.key.display_name()), g.total_people, g.total_actions))
            .collect(),
    }
}

fn short_label(label: &str) -> String {
    label.chars().take(LABEL_CHARS).collect()
}

fn draw_chart(frame: &mut Frame, data: &[(String, u64, u64)], area: Rect) {
    let mut bar_items = Vec::new();
    for (label, people, actions) in data {
        bar_items.push(
            Bar::default()
                .label(Line::from(label.as_str()))
                .value(*people)
                .style(Style::default().fg(THEME.people)),
        );
        bar_items.push(
            Bar::default()
                .value(*actions)
                .style(Style::default().fg(THEME.actions)),
        );
        // Spacer
        bar_items.push(Bar::default().value(0).text_value(String::new()));
    }

    let chart_block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(THEME.muted))
        .title(" Osoby / działania ");

    let chart = BarChart::default()
        .block(chart_block)
        .bar_width(LABEL_CHARS as u16)
        .bar_gap(0)
        .data(BarGroup::default().bars(&bar_items));

    frame.render_widget(chart, area);
}

fn draw_info_panel(frame: &mut Frame, app: &StatsApp, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(10), Constraint::Min(1)])
        .split(area);

    let (people, actions, groups) = match app.current_breakdown() {
        Some(b) => (b.total_people, b.total_actions, b.groups.len()),
        None => (
            app.categories.total_people,
            app.categories.total_actions,
            app.categories.categories.iter().map(|b| b.groups.len()).sum(),
        ),
    };

    let info_text = vec![
        Line::from(vec![Span::styled("Podsumowanie", Style::default().add_modifier(Modifier::BOLD))]),
        Line::from(""),
        Line::from(vec![
            Span::styled("Osoby:    ", Style::default().fg(THEME.muted)),
            Span::styled(people.to_string(), Style::default().fg(THEME.people).add_modifier(Modifier::BOLD)),
        ]),
        Line::from(vec![
            Span::styled("Działania: ", Style::default().fg(THEME.muted)),
            Span::styled(actions.to_string(), Style::default().fg(THEME.actions).add_modifier(Modifier::BOLD)),
        ]),
        Line::from(vec![
            Span::styled("Grupy:    ", Style::default().fg(THEME.muted)),
            Span::styled(groups.to_string(), Style::default().fg(THEME.text)),
        ]),
    ];
    let info_block = Paragraph::new(info_text).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(THEME.muted))
            .title(" Suma "),
    );
    frame.render_widget(info_block, chunks[0]);

    // Share of all people reached by the current view
    let ratio = if app.categories.total_people > 0 {
        people as f64 / app.categories.total_people as f64
    } else {
        0.0
    };
    let gauge = Gauge::default()
        .block(
            Block::default()
                .title(" Udział w osobach ")
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(THEME.muted)),
        )
        .gauge_style(Style::default().fg(THEME.people))
        .ratio(ratio.clamp(0.0, 1.0))
        .label(format!("{:.0}%", ratio * 100.0));
    frame.render_widget(gauge, chunks[1]);
}
