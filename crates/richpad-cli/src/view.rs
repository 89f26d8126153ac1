use ratatui::{
    Frame,
    layout::{Constraint, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};
use richpad_engine::{Editor, KeyValueStore, Rgb, StyleMap, VisualStyle};

pub const SAVE_BUTTON_LABEL: &str = "[ Save ]";

/// A blocking message box, dismissed by any key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: &'static str,
    pub message: String,
    pub is_error: bool,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            title: "Saved",
            message: message.into(),
            is_error: false,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            title: "Error",
            message: message.into(),
            is_error: true,
        }
    }
}

/// Screen areas the event loop needs after a draw
#[derive(Debug, Clone, Copy, Default)]
pub struct Hitboxes {
    pub save_button: Rect,
}

pub fn terminal_style(visual: &VisualStyle) -> Style {
    let mut style = Style::default();
    if let Some(Rgb(r, g, b)) = visual.color {
        style = style.fg(Color::Rgb(r, g, b));
    }
    // No font sizes in a terminal; larger text is shown bold
    if visual.is_bold() || visual.font_size_em.is_some_and(|size| size > 1.0) {
        style = style.add_modifier(Modifier::BOLD);
    }
    if visual.is_italic() {
        style = style.add_modifier(Modifier::ITALIC);
    }
    if visual.is_underlined() {
        style = style.add_modifier(Modifier::UNDERLINED);
    }
    if visual.is_monospace() {
        style = style.bg(Color::DarkGray);
    }
    style
}

fn document_lines<S: KeyValueStore>(editor: &Editor<S>, style_map: &StyleMap) -> Vec<Line<'static>> {
    editor
        .document()
        .blocks()
        .iter()
        .map(|block| {
            let spans: Vec<Span<'static>> = block
                .style_runs()
                .into_iter()
                .map(|run| {
                    Span::styled(
                        run.text.to_string(),
                        terminal_style(&style_map.resolve(run.styles)),
                    )
                })
                .collect();
            Line::from(spans)
        })
        .collect()
}

/// Cursor cell relative to the top-left of the text, in display columns
fn cursor_cell<S: KeyValueStore>(editor: &Editor<S>) -> (u16, u16) {
    let doc = editor.document();
    let start = doc.selection().start();
    let row = doc.block_index(&start.key).unwrap_or(0);
    let col = doc
        .block_for_key(&start.key)
        .map(|block| {
            let before: String = block.text().chars().take(start.offset).collect();
            Span::raw(before).width()
        })
        .unwrap_or(0);
    (
        u16::try_from(col).unwrap_or(u16::MAX),
        u16::try_from(row).unwrap_or(u16::MAX),
    )
}

/// Keep the cursor inside a viewport of `size` cells
fn scroll_for(cursor: u16, size: u16) -> u16 {
    if size == 0 {
        0
    } else {
        cursor.saturating_sub(size - 1)
    }
}

pub fn ui<S: KeyValueStore>(
    f: &mut Frame,
    editor: &Editor<S>,
    storage_label: &str,
    notice: Option<&Notice>,
) -> Hitboxes {
    let [editor_area, status_area] =
        Layout::vertical([Constraint::Min(3), Constraint::Length(1)]).areas(f.area());

    let title = if editor.is_dirty() {
        " richpad (modified) "
    } else {
        " richpad "
    };
    let frame = Block::default().borders(Borders::ALL).title(title);
    let text_area = frame.inner(editor_area);
    f.render_widget(frame, editor_area);

    if editor.show_placeholder() {
        let placeholder = Paragraph::new(Line::from(Span::styled(
            editor.settings().placeholder.clone(),
            Style::default().fg(Color::DarkGray),
        )));
        f.render_widget(placeholder, text_area);
    } else {
        let (col, row) = cursor_cell(editor);
        let scroll = (
            scroll_for(row, text_area.height),
            scroll_for(col, text_area.width),
        );
        let text = Paragraph::new(document_lines(editor, &editor.settings().style_map))
            .scroll(scroll);
        f.render_widget(text, text_area);
    }

    if notice.is_none() {
        let (col, row) = cursor_cell(editor);
        let x = col.min(text_area.width.saturating_sub(1));
        let y = row.min(text_area.height.saturating_sub(1));
        f.set_cursor_position(Position::new(text_area.x + x, text_area.y + y));
    }

    let button_width = u16::try_from(SAVE_BUTTON_LABEL.len()).unwrap_or(u16::MAX);
    let [save_button, _, status_text] = Layout::horizontal([
        Constraint::Length(button_width),
        Constraint::Length(1),
        Constraint::Min(0),
    ])
    .areas(status_area);

    f.render_widget(
        Paragraph::new(Span::styled(
            SAVE_BUTTON_LABEL,
            Style::default()
                .fg(Color::Black)
                .bg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )),
        save_button,
    );

    let help = Line::from(vec![
        Span::raw("Ctrl+Enter/Ctrl+S: Save | "),
        Span::raw("# * ** *** + Enter: Style line | "),
        Span::raw("Ctrl+Z/Y: Undo/Redo | "),
        Span::raw("Esc: Quit | "),
        Span::styled(storage_label.to_string(), Style::default().fg(Color::DarkGray)),
    ]);
    f.render_widget(Paragraph::new(help), status_text);

    if let Some(notice) = notice {
        render_notice(f, notice);
    }

    Hitboxes { save_button }
}

fn render_notice(f: &mut Frame, notice: &Notice) {
    let area = centered(f.area(), 60, 7);
    let border_color = if notice.is_error {
        Color::Red
    } else {
        Color::Green
    };

    let body = vec![
        Line::from(notice.message.clone()),
        Line::from(""),
        Line::from(Span::styled(
            "Press any key to continue",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    let popup = Paragraph::new(body)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border_color))
                .title(notice.title),
        );

    f.render_widget(Clear, area);
    f.render_widget(popup, area);
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
