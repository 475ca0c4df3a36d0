use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
};

use crate::store::Store;
use crate::types::NodeKind;

use super::app::{App, Focus, InputMode};
use super::tree::{TreeNode, TreeNodeKind, flatten_tree};

const COLLAPSED_ICON: &str = "\u{25b6}"; // ▶
const EXPANDED_ICON: &str = "\u{25bc}"; // ▼
const EMPTY_ICON: &str = "\u{25bd}"; // ▽
const DOOR_ICON: &str = "\u{25cb}"; // ○

pub fn draw<S: Store>(frame: &mut Frame, app: &App<S>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(8),    // Panes
            Constraint::Length(3), // Status bar
            Constraint::Length(1), // Help bar
        ])
        .split(frame.area());

    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(chunks[1]);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(panes[1]);

    draw_header(frame, app, chunks[0]);
    draw_tree(frame, app, panes[0]);
    draw_doors(frame, app, right[0]);
    draw_detail(frame, app, right[1]);
    draw_status(frame, app, chunks[2]);
    draw_help(frame, app, chunks[3]);

    match &app.mode {
        InputMode::EditingName => draw_input_dialog(frame, app, "Door Name"),
        InputMode::EditingNotes => draw_input_dialog(frame, app, "Notes"),
        InputMode::Message {
            title,
            text,
            is_error,
        } => draw_message_dialog(frame, title, text, *is_error),
        InputMode::Normal => {}
    }
}

fn pane_block(title: &str, focused: bool) -> Block<'_> {
    let border = if focused { Color::Cyan } else { Color::DarkGray };
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title(format!(" {} ", title))
}

fn draw_header<S: Store>(frame: &mut Frame, app: &App<S>, area: Rect) {
    let filter = match app.door_filter {
        Some(room_id) => app
            .room_choices
            .iter()
            .find(|c| c.room_id == Some(room_id))
            .map(|c| format!(" Doors in: {} ", c.label))
            .unwrap_or_else(|| format!(" Doors in room {} ", room_id)),
        None => " All doors ".to_string(),
    };

    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " Access Control Inventory ",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::styled(filter, Style::default().fg(Color::DarkGray)),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    );

    frame.render_widget(header, area);
}

fn draw_tree<S: Store>(frame: &mut Frame, app: &App<S>, area: Rect) {
    let block = pane_block("Locations", app.focus == Focus::Tree);
    let flat_nodes = flatten_tree(&app.tree);

    if flat_nodes.is_empty() {
        let empty = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                "No buildings",
                Style::default().fg(Color::DarkGray),
            )),
        ])
        .block(block)
        .alignment(Alignment::Center);

        frame.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = flat_nodes
        .iter()
        .enumerate()
        .map(|(idx, node)| create_tree_item(node, idx == app.selected_index))
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}

fn create_tree_item(node: &TreeNode, is_selected: bool) -> ListItem<'static> {
    let indent = "  ".repeat(node.depth);

    let icon = match &node.kind {
        TreeNodeKind::Location {
            kind: NodeKind::Door,
            ..
        } => format!("  {} ", DOOR_ICON),
        _ if node.children.is_empty() => format!("{} ", EMPTY_ICON),
        _ if node.expanded => format!("{} ", EXPANDED_ICON),
        _ => format!("{} ", COLLAPSED_ICON),
    };

    let style = if is_selected {
        Style::default()
            .bg(Color::Blue)
            .fg(Color::White)
            .add_modifier(Modifier::BOLD)
    } else if matches!(node.kind, TreeNodeKind::Unassigned) {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };

    let content = format!("{}{}{}", indent, icon, node.name());
    ListItem::new(Line::from(Span::styled(content, style)))
}

fn draw_doors<S: Store>(frame: &mut Frame, app: &App<S>, area: Rect) {
    let focused = app.focus == Focus::Doors;
    let block = pane_block("Doors", focused);

    if app.doors.is_empty() {
        let empty = Paragraph::new(Line::from(Span::styled(
            "No doors",
            Style::default().fg(Color::DarkGray),
        )))
        .block(block)
        .alignment(Alignment::Center);
        frame.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = app
        .doors
        .iter()
        .enumerate()
        .map(|(idx, door)| {
            let style = if focused && idx == app.door_index {
                Style::default()
                    .bg(Color::Blue)
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD)
            } else if app.form.as_ref().is_some_and(|f| f.door_id == door.id) {
                Style::default().fg(Color::Cyan)
            } else {
                Style::default()
            };
            ListItem::new(Line::from(Span::styled(door.name.clone(), style)))
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}

fn field_line(label: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!("{:<10}", label),
            Style::default().fg(Color::DarkGray),
        ),
        Span::raw(value),
    ])
}

fn draw_detail<S: Store>(frame: &mut Frame, app: &App<S>, area: Rect) {
    let Some(form) = &app.form else {
        let empty = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                "Select a door",
                Style::default().fg(Color::DarkGray),
            )),
        ])
        .block(pane_block("Door", app.focus == Focus::Detail))
        .alignment(Alignment::Center);
        frame.render_widget(empty, area);
        return;
    };

    let title = if form.is_dirty() {
        format!("Door #{} (modified)", form.door_id)
    } else {
        format!("Door #{}", form.door_id)
    };

    let room_label = app
        .room_choices
        .iter()
        .find(|c| c.room_id == form.room_id)
        .map(|c| c.label.clone())
        .unwrap_or_else(|| "None".to_string());

    let mut lines = vec![
        field_line("Name", form.name.clone()),
        field_line("Room", format!("< {} >", room_label)),
        field_line("Location", form.location.clone()),
        field_line("Notes", form.notes.clone()),
        Line::from(""),
        Line::from(Span::styled(
            "Devices",
            Style::default().add_modifier(Modifier::BOLD),
        )),
    ];

    if form.devices.is_empty() {
        lines.push(Line::from(Span::styled(
            "  none",
            Style::default().fg(Color::DarkGray),
        )));
    }
    lines.extend(
        form.devices
            .iter()
            .map(|device| Line::from(format!("  {}", device))),
    );

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Interconnections",
        Style::default().add_modifier(Modifier::BOLD),
    )));
    if form.interconnections.is_empty() {
        lines.push(Line::from(Span::styled(
            "  none",
            Style::default().fg(Color::DarkGray),
        )));
    }
    lines.extend(
        form.interconnections
            .iter()
            .map(|link| Line::from(format!("  {}", link))),
    );

    let detail = Paragraph::new(lines)
        .block(pane_block(&title, app.focus == Focus::Detail))
        .wrap(Wrap { trim: false });

    frame.render_widget(detail, area);
}

fn draw_status<S: Store>(frame: &mut Frame, app: &App<S>, area: Rect) {
    let (message, style) = match &app.status {
        Some(status) => (status.message.clone(), Style::default().fg(Color::Green)),
        None if app.form.as_ref().is_some_and(|f| f.is_dirty()) => (
            "Unsaved changes (s to save)".to_string(),
            Style::default().fg(Color::Yellow),
        ),
        None => ("Ready".to_string(), Style::default().fg(Color::DarkGray)),
    };

    let status = Paragraph::new(Line::from(Span::styled(message, style))).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Status "),
    );

    frame.render_widget(status, area);
}

fn draw_help<S: Store>(frame: &mut Frame, app: &App<S>, area: Rect) {
    let help_text = match &app.mode {
        InputMode::Normal => match app.focus {
            Focus::Tree => {
                "j/k:move  l/h:expand/collapse  e:expand all  Tab:pane  i:name  o:notes  [/]:room  s:save  r:refresh  q:quit"
            }
            Focus::Doors => "j/k:move  Enter:open  Tab:pane  i:name  o:notes  [/]:room  s:save  q:quit",
            Focus::Detail => "</>:room  i:name  o:notes  s:save  Tab:pane  q:quit",
        },
        InputMode::EditingName | InputMode::EditingNotes => "Enter:confirm  Esc:cancel",
        InputMode::Message { .. } => "Enter/Esc:close",
    };

    let help = Paragraph::new(Line::from(Span::styled(
        help_text,
        Style::default().fg(Color::DarkGray),
    )));

    frame.render_widget(help, area);
}

fn draw_input_dialog<S: Store>(frame: &mut Frame, app: &App<S>, title: &str) {
    let area = centered_rect(50, 3, frame.area());

    frame.render_widget(Clear, area);

    let input = &app.input_buffer;
    let dialog = Paragraph::new(Line::from(Span::raw(input.as_str()))).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(format!(" {} ", title)),
    );

    frame.render_widget(dialog, area);

    frame.set_cursor_position((
        area.x + 1 + input.chars().count() as u16,
        area.y + 1,
    ));
}

pub(super) fn draw_message_dialog(frame: &mut Frame, title: &str, text: &str, is_error: bool) {
    let area = centered_rect(60, 7, frame.area());

    frame.render_widget(Clear, area);

    let color = if is_error { Color::Red } else { Color::Green };
    let dialog = Paragraph::new(vec![
        Line::from(Span::styled(text.to_string(), Style::default().fg(color))),
        Line::from(""),
        Line::from(Span::styled(
            "Press Enter to close",
            Style::default().fg(Color::DarkGray),
        )),
    ])
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color))
            .title(format!(" {} ", title)),
    );

    frame.render_widget(dialog, area);
}

fn centered_rect(percent_x: u16, height: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length((area.height.saturating_sub(height)) / 2),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
