use super::app_logic::{GRID_COLUMNS, TuiApp};
use super::app_state::AppMode;
use crate::view::presentation::{CREATE_DEPARTMENT_ROUTE, SortDirection, TABLE_COLUMNS};
use crate::view::{DeletionState, RenderState, ViewMode};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap},
};

const CARD_HEIGHT: u16 = 7;
const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];

fn draw_header_block(f: &mut Frame, app: &TuiApp, area: Rect) {
    let view_label = format!("view: {}", app.view.mode().label());
    let search = if app.filter_input.is_empty() {
        "Search".to_string()
    } else {
        app.filter_input.clone()
    };
    let summary_line = Line::from(vec![
        Span::styled(
            format!("Departments ({})", app.summary_count),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!("   /{search}   {view_label}   ")),
        Span::styled(
            format!("+ Create Department ({CREATE_DEPARTMENT_ROUTE})"),
            Style::default().fg(Color::Blue),
        ),
    ]);
    let status = match app.view.deletion_state() {
        DeletionState::Deleting(target) => Some(format!("Deleting {}...", target.name)),
        _ => app.status.clone(),
    };
    let help_line = match status {
        Some(status) => Line::from(Span::styled(status, Style::default().fg(Color::Yellow))),
        None => Line::from(
            "/: Search | g/l/Tab: View | Arrows/jk: Nav | d: Delete | 1-7: Sort | Enter: Open | r: Reload | c: Create | q: Quit",
        ),
    };
    let header = Paragraph::new(vec![summary_line, help_line])
        .block(Block::default().borders(Borders::ALL).title("Department List"));
    f.render_widget(header, area);
}

fn draw_filter_input_block(f: &mut Frame, app: &TuiApp, area: Rect) {
    let input_text = format!("/{}", app.filter_input);
    let filter_paragraph = Paragraph::new(input_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Search name or tags (Esc to clear, Enter to keep)"),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(filter_paragraph, area);
    f.set_cursor_position((area.x + 1 + app.filter_cursor_pos as u16 + 1, area.y + 1));
}

fn draw_centered_message(f: &mut Frame, message: String, area: Rect) {
    let [_, line_area, _] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(1),
        Constraint::Fill(1),
    ])
    .areas(area);
    f.render_widget(Paragraph::new(message).alignment(Alignment::Center), line_area);
}

fn draw_grid_block(f: &mut Frame, app: &mut TuiApp, area: Rect) {
    let cards = app.view.cards();
    let footer_height = if app.page_pending() { 1 } else { 0 };
    let [cards_area, footer_area] =
        Layout::vertical([Constraint::Min(0), Constraint::Length(footer_height)]).areas(area);

    let rows_fit = (cards_area.height / CARD_HEIGHT).max(1) as usize;
    app.list_viewport_height = rows_fit;
    let selected_row = app.current_selection_idx / GRID_COLUMNS;
    if selected_row < app.scroll_offset {
        app.scroll_offset = selected_row;
    } else if selected_row >= app.scroll_offset + rows_fit {
        app.scroll_offset = selected_row + 1 - rows_fit;
    }

    let row_areas = Layout::vertical(vec![Constraint::Length(CARD_HEIGHT); rows_fit]).split(cards_area);
    for (slot, row_area) in row_areas.iter().enumerate() {
        let card_row = app.scroll_offset + slot;
        let column_areas = Layout::horizontal(vec![
            Constraint::Ratio(1, GRID_COLUMNS as u32);
            GRID_COLUMNS
        ])
        .split(*row_area);

        for (column, card_area) in column_areas.iter().enumerate() {
            let idx = card_row * GRID_COLUMNS + column;
            let Some(card) = cards.get(idx) else {
                continue;
            };
            let border_style = if idx == app.current_selection_idx {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            let mut lines = vec![
                Line::from(format!("{} · {}", card.country, card.location)),
                Line::from(card.owner_name.clone()),
                Line::from(format!("{}  {}", card.owner_email, card.owner_mobile)),
                Line::from(Span::styled(
                    card.tags.clone(),
                    Style::default().fg(Color::DarkGray),
                )),
            ];
            if card.delete.is_some() {
                lines.push(Line::from(Span::styled(
                    "[d] delete",
                    Style::default().fg(Color::Red),
                )));
            }
            let card_widget = Paragraph::new(lines).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(border_style)
                    .title(card.name.clone()),
            );
            f.render_widget(card_widget, *card_area);
        }
    }

    if footer_height > 0 {
        f.render_widget(
            Paragraph::new("Loading...").alignment(Alignment::Center),
            footer_area,
        );
    }
}

fn draw_table_block(f: &mut Frame, app: &mut TuiApp, area: Rect) {
    app.list_viewport_height = area.height.saturating_sub(3) as usize;
    let rows = app.view.rows(app.table_sort);

    let header_cells = TABLE_COLUMNS.iter().enumerate().map(|(column, title)| {
        let marker = match app.table_sort {
            Some(sort) if sort.column == column => match sort.direction {
                SortDirection::Ascending => " ▲",
                SortDirection::Descending => " ▼",
            },
            _ => "",
        };
        Cell::from(format!("{title}{marker}"))
    });
    let header = Row::new(header_cells).style(Style::default().add_modifier(Modifier::BOLD));

    let body = rows.iter().map(|row| {
        let mut cells: Vec<Cell> = row.cells.iter().map(|text| Cell::from(text.clone())).collect();
        cells.push(Cell::from(if row.delete.is_some() { "[d]" } else { "" }));
        Row::new(cells)
    });

    let widths = [
        Constraint::Fill(2),
        Constraint::Fill(1),
        Constraint::Fill(1),
        Constraint::Fill(2),
        Constraint::Fill(2),
        Constraint::Fill(1),
        Constraint::Fill(2),
        Constraint::Length(7),
    ];

    let title = if app.filter_input.is_empty() {
        "Departments".to_string()
    } else {
        format!("Departments (Filter: '{}')", app.filter_input)
    };

    let table = Table::new(body, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(title))
        .row_highlight_style(
            Style::default()
                .add_modifier(Modifier::BOLD)
                .bg(Color::DarkGray),
        )
        .highlight_symbol("❯ ");

    let mut table_state = TableState::default();
    if !rows.is_empty() {
        table_state.select(Some(app.current_selection_idx));
    }
    f.render_stateful_widget(table, area, &mut table_state);
}

fn draw_confirm_dialog(f: &mut Frame, app: &TuiApp) {
    let Some(prompt) = app.view.prompt() else {
        return;
    };
    let [_, middle, _] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(7),
        Constraint::Fill(1),
    ])
    .areas(f.area());
    let [_, dialog_area, _] = Layout::horizontal([
        Constraint::Percentage(20),
        Constraint::Percentage(60),
        Constraint::Percentage(20),
    ])
    .areas(middle);

    let dialog = Paragraph::new(vec![
        Line::from(prompt.description),
        Line::from(""),
        Line::from("y/Enter: Delete | n/Esc: Cancel"),
    ])
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red))
            .title(prompt.title),
    );
    f.render_widget(Clear, dialog_area);
    f.render_widget(dialog, dialog_area);
}

pub(super) fn ui_frame(frame: &mut Frame, app: &mut TuiApp) {
    let header_height = 4;
    let filter_input_height = if app.mode == AppMode::Filtering { 3 } else { 0 };

    let [header_area, filter_area, main_area] = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(header_height),
            Constraint::Length(filter_input_height),
            Constraint::Min(0),
        ])
        .areas(frame.area());

    draw_header_block(frame, app, header_area);
    if app.mode == AppMode::Filtering {
        draw_filter_input_block(frame, app, filter_area);
    }

    match app.view.render_state() {
        RenderState::Loading => {
            let spinner = SPINNER[(app.tick / 4) % SPINNER.len()];
            draw_centered_message(frame, format!("{spinner} Loading departments..."), main_area);
        }
        RenderState::Empty => {
            draw_centered_message(frame, "No Departments!".to_string(), main_area);
        }
        RenderState::Content => match app.view.mode() {
            ViewMode::Grid => draw_grid_block(frame, app, main_area),
            ViewMode::List => draw_table_block(frame, app, main_area),
        },
    }

    draw_confirm_dialog(frame, app);
}
