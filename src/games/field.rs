use ratatui::prelude::*;

use crate::engine::{Entity, Vec2};

/// Field units per terminal row. Cells are about twice as tall as they are
/// wide, so one row spans two units and entities come out roughly square.
pub const UNITS_PER_ROW: f32 = 2.0;

pub const BACKGROUND: Color = Color::Rgb(10, 10, 20);

pub type Grid = Vec<Vec<(char, Style)>>;

/// Size of the field drawn into `area`, in field units.
pub fn field_size(area: Rect) -> Vec2 {
    Vec2::new(area.width as f32, area.height as f32 * UNITS_PER_ROW)
}

/// Centre of the terminal cell at (`column`, `row`) in field units, or `None`
/// when the cell lies outside `area`.
pub fn cell_to_point(area: Rect, column: u16, row: u16) -> Option<Vec2> {
    let inside = column >= area.x
        && column < area.x + area.width
        && row >= area.y
        && row < area.y + area.height;
    inside.then(|| {
        Vec2::new(
            (column - area.x) as f32 + 0.5,
            ((row - area.y) as f32 + 0.5) * UNITS_PER_ROW,
        )
    })
}

pub fn blank_grid(width: usize, height: usize, bg: Color) -> Grid {
    vec![vec![(' ', Style::default().bg(bg)); width]; height]
}

/// Fill the cells covered by an entity's bounding box, rounding the corners
/// off so it reads as a blob rather than a rectangle.
pub fn paint_entity<K>(grid: &mut Grid, entity: &Entity<K>, glyph: char, style: Style) {
    let Some(first_row) = grid.first() else { return };
    let (w, h) = (first_row.len() as i32, grid.len() as i32);
    let half = entity.size / 2.0;

    let x0 = (entity.position.x - half).floor() as i32;
    let x1 = (entity.position.x + half).ceil() as i32;
    let y0 = ((entity.position.y - half) / UNITS_PER_ROW).floor() as i32;
    let y1 = ((entity.position.y + half) / UNITS_PER_ROW).ceil() as i32;

    for row in y0.max(0)..y1.min(h) {
        for col in x0.max(0)..x1.min(w) {
            let dx = (col as f32 + 0.5 - entity.position.x) / half.max(0.5);
            let dy = ((row as f32 + 0.5) * UNITS_PER_ROW - entity.position.y) / half.max(0.5);
            if dx.abs() <= 1.0 && dy.abs() <= 1.0 && dx * dx + dy * dy <= 1.3 {
                grid[row as usize][col as usize] = (glyph, style);
            }
        }
    }
}

/// Write `text` centred on the entity's middle row.
pub fn label_entity<K>(grid: &mut Grid, entity: &Entity<K>, text: &str, style: Style) {
    let Some(first_row) = grid.first() else { return };
    let (w, h) = (first_row.len() as i32, grid.len() as i32);
    let row = (entity.position.y / UNITS_PER_ROW) as i32;
    if row < 0 || row >= h {
        return;
    }
    let len = text.chars().count() as i32;
    let start = entity.position.x.round() as i32 - len / 2;
    for (i, ch) in text.chars().enumerate() {
        let col = start + i as i32;
        if col >= 0 && col < w {
            grid[row as usize][col as usize] = (ch, style);
        }
    }
}

pub fn grid_to_lines(grid: Grid) -> Vec<Line<'static>> {
    grid.into_iter()
        .map(|row| {
            let spans: Vec<Span<'static>> = row
                .into_iter()
                .map(|(ch, style)| Span::styled(String::from(ch), style))
                .collect();
            Line::from(spans)
        })
        .collect()
}

/// Cells on the straight line between two points, endpoints included.
pub fn line_cells(x0: i32, y0: i32, x1: i32, y1: i32) -> Vec<(i32, i32)> {
    let mut cells = Vec::new();
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    let (mut cx, mut cy) = (x0, y0);
    loop {
        cells.push((cx, cy));
        if cx == x1 && cy == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            cx += sx;
        }
        if e2 <= dx {
            err += dx;
            cy += sy;
        }
    }
    cells
}
