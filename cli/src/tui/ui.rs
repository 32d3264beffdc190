use miernik_core::model::months::month_name;
use miernik_core::{ActionRow, CategoryRow};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Row, Table},
    Frame,
};

use crate::tui::app::{App, InputMode, ResultView};

pub fn draw(f: &mut Frame, app: &mut App) {
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(0)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(1),    // Content
            Constraint::Length(3), // Status / input
            Constraint::Length(1), // Footer/Help
        ])
        .split(f.area());

    // Header
    let file = app.session.file_name.as_deref().unwrap_or("brak pliku");
    let header = Paragraph::new(format!("MIERNIK BUDŻETOWY  |  {}", file))
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).border_type(BorderType::Rounded));
    f.render_widget(header, main_chunks[0]);

    let content_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(24), Constraint::Min(10)])
        .split(main_chunks[1]);

    draw_months(f, app, content_chunks[0]);
    match app.view {
        ResultView::Programs => draw_programs(f, app, content_chunks[1]),
        ResultView::Categories => draw_categories(f, app, content_chunks[1]),
    }
    draw_status(f, app, main_chunks[2]);

    let help = match app.input_mode {
        InputMode::Normal => {
            "j/k: miesiąc | spacja: zaznacz | a/n: wszystkie/żaden | o: otwórz | p: przetwórz | e: eksport | tab: widok | q: wyjście"
        }
        InputMode::OpeningFile => "Enter: wczytaj | Esc: anuluj",
    };
    let footer = Paragraph::new(help)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    f.render_widget(footer, main_chunks[3]);
}

fn draw_months(f: &mut Frame, app: &mut App, area: Rect) {
    let rows: Vec<Row> = app
        .session
        .months
        .entries()
        .iter()
        .map(|entry| {
            let mark = if entry.selected { "[x]" } else { "[ ]" };
            let style = if entry.selected {
                Style::default().fg(Color::Green)
            } else {
                Style::default()
            };
            Row::new(vec![Span::styled(mark, style), Span::raw(month_name(entry.month))])
        })
        .collect();

    let table = Table::new(rows, [Constraint::Length(3), Constraint::Min(10)])
        .block(Block::default().title(" Miesiące ").borders(Borders::ALL).border_type(BorderType::Rounded))
        .row_highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
        .highlight_symbol(">> ");

    f.render_stateful_widget(table, area, &mut app.months_state);
}

fn draw_programs(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().title(" Programy ").borders(Borders::ALL).border_type(BorderType::Rounded);

    let Some(agg) = &app.session.aggregate else {
        let hint = if app.session.has_data() {
            "Zaznacz miesiące i naciśnij p"
        } else {
            "Naciśnij o, aby wczytać plik"
        };
        f.render_widget(Paragraph::new(hint).block(block), area);
        return;
    };

    let mut rows: Vec<Row> = vec![Row::new(vec![
        Span::styled("Razem", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(""),
        Span::raw(""),
        Span::styled(agg.all_people.to_string(), Style::default().add_modifier(Modifier::BOLD)),
        Span::styled(agg.all_actions.to_string(), Style::default().add_modifier(Modifier::BOLD)),
    ])];
    rows.extend(ActionRow::from_aggregate(agg).into_iter().map(|r| {
        Row::new(vec![
            r.program_type,
            r.program_name,
            r.action_name,
            r.people.to_string(),
            r.actions.to_string(),
        ])
    }));

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(20),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Length(8),
            Constraint::Length(10),
        ],
    )
    .header(Row::new(vec!["Typ", "Program", "Działanie", "Osoby", "Działania"]).style(Style::default().fg(Color::Yellow)))
    .block(block);

    f.render_widget(table, area);
}

fn draw_categories(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().title(" Kategorie ").borders(Borders::ALL).border_type(BorderType::Rounded);

    let Some(categories) = &app.session.categories else {
        f.render_widget(Paragraph::new("Brak wyników").block(block), area);
        return;
    };

    let rows: Vec<Row> = CategoryRow::from_aggregate(categories)
        .into_iter()
        .map(|r| {
            Row::new(vec![
                r.category,
                r.group,
                r.program_count.to_string(),
                r.people.to_string(),
                r.actions.to_string(),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(25),
            Constraint::Percentage(35),
            Constraint::Length(9),
            Constraint::Length(8),
            Constraint::Length(10),
        ],
    )
    .header(Row::new(vec!["Kategoria", "Grupa", "Programy", "Osoby", "Działania"]).style(Style::default().fg(Color::Yellow)))
    .block(block);

    f.render_widget(table, area);
}

fn draw_status(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().borders(Borders::ALL).border_type(BorderType::Rounded);

    let line = match app.input_mode {
        InputMode::OpeningFile => Line::from(vec![
            Span::styled("Plik: ", Style::default().fg(Color::Blue)),
            Span::raw(app.input.as_str()),
        ]),
        InputMode::Normal => match (&app.session.error, &app.status) {
            (Some(err), _) => Line::from(Span::styled(err.as_str(), Style::default().fg(Color::Red))),
            (None, Some(status)) => Line::from(Span::styled(status.as_str(), Style::default().fg(Color::Green))),
            (None, None) => Line::from(""),
        },
    };
    f.render_widget(Paragraph::new(line).block(block), area);

    if let InputMode::OpeningFile = app.input_mode {
        // "Plik: " is 6 columns wide, plus the border
        let x = area.x + 1 + 6 + app.input.chars().take(app.cursor_position).count() as u16;
        f.set_cursor_position((x, area.y + 1));
    }
}
