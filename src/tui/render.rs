use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};

use crate::layout::LayoutSnapshot;
use crate::model::TilingMode;
use crate::util::unicode::{display_width, truncate_to_width};

use super::app::App;
use super::panes::TuiPane;
use super::theme::Theme;

const KEY_HINTS: &str = "C-n notes  C-t clock  C-f files  C-x close  C-l mode  C-q quit";

/// Main render function: panes, then the status row
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();
    frame.render_widget(
        Block::default().style(Style::default().bg(app.theme.background)),
        area,
    );

    let [content, status] =
        Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(area);

    // The engine lays out against whatever area the terminal gives us this frame
    app.manager.set_area(content);
    let snapshot = app.manager.snapshot();

    if snapshot.is_empty() {
        render_empty(frame, &app.theme, content);
    }
    for placement in &snapshot.placements {
        if let Some(pane) = app.manager.pane(placement.pane) {
            let active = app.manager.is_active(placement.pane);
            render_pane(frame, pane, placement.rect, &app.theme, active);
        }
    }

    render_status_row(frame, app, &snapshot, status);
}

fn render_pane(frame: &mut Frame, pane: &dyn TuiPane, rect: Rect, theme: &Theme, active: bool) {
    if rect.width < 3 || rect.height < 3 {
        return;
    }
    let title = truncate_to_width(&pane.title(), rect.width.saturating_sub(4) as usize);
    let mut title_style = Style::default().fg(theme.border_color(active));
    if active {
        title_style = title_style.add_modifier(Modifier::BOLD);
    }
    let block = Block::bordered()
        .border_style(Style::default().fg(theme.border_color(active)))
        .title(Span::styled(format!(" {title} "), title_style));
    let inner = block.inner(rect);
    frame.render_widget(block, rect);
    pane.render(frame, inner, theme);
}

fn render_empty(frame: &mut Frame, theme: &Theme, area: Rect) {
    let top = area.height.saturating_sub(2) / 2;
    let mut lines: Vec<Line> = (0..top).map(|_| Line::default()).collect();
    lines.push(Line::styled("no panes open", Style::default().fg(theme.text)));
    lines.push(Line::styled(
        "Ctrl+n notes  Ctrl+t clock  Ctrl+f files",
        Style::default().fg(theme.dim),
    ));
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
}

fn mode_label(snapshot: &LayoutSnapshot) -> String {
    if snapshot.requested_mode == TilingMode::Auto {
        format!("auto:{}", snapshot.mode)
    } else {
        snapshot.mode.to_string()
    }
}

/// Render the status row (bottom of screen)
fn render_status_row(frame: &mut Frame, app: &App, snapshot: &LayoutSnapshot, area: Rect) {
    let bg = app.theme.status_bg;
    let width = area.width as usize;

    let count = snapshot.placements.len();
    let mut spans = vec![
        Span::styled(
            format!(" {} ", mode_label(snapshot)),
            Style::default().fg(app.theme.accent).bg(bg),
        ),
        Span::styled(
            format!(" {count} pane{} ", if count == 1 { "" } else { "s" }),
            Style::default().fg(app.theme.dim).bg(bg),
        ),
    ];
    if let Some(message) = &app.status {
        spans.push(Span::styled(
            format!(" {message}"),
            Style::default().fg(app.theme.text_bright).bg(bg),
        ));
    }

    if app.config.ui.show_key_hints {
        let used: usize = spans.iter().map(|s| display_width(&s.content)).sum();
        let hint_width = display_width(KEY_HINTS);
        if used + hint_width < width {
            spans.push(Span::styled(
                " ".repeat(width - used - hint_width),
                Style::default().bg(bg),
            ));
            spans.push(Span::styled(KEY_HINTS, Style::default().fg(app.theme.dim).bg(bg)));
        }
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}
