use serde::Serialize;

use crate::layout::LayoutSnapshot;
use crate::model::{PaneManagerState, TilingMode};

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct LayoutJson {
    pub requested_mode: TilingMode,
    pub mode: TilingMode,
    pub rows: usize,
    pub columns: usize,
    pub column_sizes: Vec<u16>,
    pub row_sizes: Vec<u16>,
    pub panes: Vec<PlacementJson>,
}

#[derive(Serialize)]
pub struct PlacementJson {
    pub pane: u64,
    pub row: usize,
    pub column: usize,
    #[serde(skip_serializing_if = "is_one")]
    pub row_span: usize,
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

fn is_one(n: &usize) -> bool {
    *n == 1
}

#[derive(Serialize)]
pub struct StateJson {
    pub saved_at: Option<String>,
    pub mode: TilingMode,
    pub panes: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub focused: Option<usize>,
    pub size_overrides: usize,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

pub fn layout_json(snapshot: &LayoutSnapshot) -> LayoutJson {
    LayoutJson {
        requested_mode: snapshot.requested_mode,
        mode: snapshot.mode,
        rows: snapshot.rows,
        columns: snapshot.columns,
        column_sizes: snapshot.column_sizes.clone(),
        row_sizes: snapshot.row_sizes.clone(),
        panes: snapshot
            .placements
            .iter()
            .map(|p| PlacementJson {
                pane: p.pane.0,
                row: p.position.row,
                column: p.position.column,
                row_span: p.row_span,
                x: p.rect.x,
                y: p.rect.y,
                width: p.rect.width,
                height: p.rect.height,
            })
            .collect(),
    }
}

pub fn state_json(state: &PaneManagerState) -> StateJson {
    StateJson {
        saved_at: state.saved_at.map(|t| t.to_rfc3339()),
        mode: state.mode,
        panes: state.panes.iter().map(|p| p.kind.clone()).collect(),
        focused: state.focused,
        size_overrides: state.size_overrides.len(),
    }
}

// ---------------------------------------------------------------------------
// Text output
// ---------------------------------------------------------------------------

fn join_sizes(sizes: &[u16]) -> String {
    sizes
        .iter()
        .map(u16::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

pub fn format_layout(snapshot: &LayoutSnapshot) -> String {
    let mut lines = Vec::new();
    if snapshot.requested_mode == TilingMode::Auto {
        lines.push(format!("mode: {} (auto)", snapshot.mode));
    } else {
        lines.push(format!("mode: {}", snapshot.mode));
    }
    if snapshot.is_empty() {
        lines.push("no panes".to_string());
        return lines.join("\n");
    }
    lines.push(format!(
        "tracks: {} x {}",
        plural(snapshot.columns, "column"),
        plural(snapshot.rows, "row")
    ));
    lines.push(format!("column sizes: {}", join_sizes(&snapshot.column_sizes)));
    lines.push(format!("row sizes: {}", join_sizes(&snapshot.row_sizes)));
    for p in &snapshot.placements {
        let mut line = format!(
            "{} {} at {},{} size {}x{}",
            p.pane, p.position, p.rect.x, p.rect.y, p.rect.width, p.rect.height
        );
        if p.row_span > 1 {
            line.push_str(&format!(" spans {} rows", p.row_span));
        }
        lines.push(line);
    }
    lines.join("\n")
}

pub fn format_state(state: &PaneManagerState) -> String {
    let mut lines = Vec::new();
    let saved = state
        .saved_at
        .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| "unknown".to_string());
    lines.push(format!("saved: {saved}"));
    lines.push(format!("mode: {}", state.mode));
    lines.push(format!("panes: {}", state.panes.len()));
    for (i, pane) in state.panes.iter().enumerate() {
        let marker = if state.focused == Some(i) { " (focused)" } else { "" };
        lines.push(format!("  {}. {}{}", i + 1, pane.kind, marker));
    }
    if !state.size_overrides.is_empty() {
        let overrides: Vec<String> = state
            .size_overrides
            .iter()
            .map(|o| format!("{}={:.2}", o.region, o.size))
            .collect();
        lines.push(format!("size overrides: {}", overrides.join(" ")));
    }
    lines.join("\n")
}
