//! Plain-text renderer for terminals and logs

use super::Renderer;
use super::shapes::{Layer, draw_list, score_lines};
use crate::sim::{MatchState, Rect};

const EMPTY: char = ' ';
const BORDER: char = '|';

fn glyph(layer: Layer) -> char {
    match layer {
        Layer::Block => '#',
        Layer::Paddle => '=',
        Layer::Ball => 'o',
    }
}

/// Rasterizes the field onto a fixed character grid
#[derive(Debug, Clone)]
pub struct TextRenderer {
    cols: usize,
    rows: usize,
    frame: String,
}

impl TextRenderer {
    pub fn new(cols: usize, rows: usize) -> Self {
        Self {
            cols: cols.max(1),
            rows: rows.max(1),
            frame: String::new(),
        }
    }

    /// Last frame drawn
    pub fn frame(&self) -> &str {
        &self.frame
    }

    /// Grid cells covered by `rect`, as half-open column and row ranges
    fn cells(&self, rect: &Rect, sx: f32, sy: f32) -> Option<(usize, usize, usize, usize)> {
        let c0 = (rect.left() / sx).floor();
        let c1 = (rect.right() / sx).ceil().max(c0 + 1.0);
        let r0 = (rect.top() / sy).floor();
        let r1 = (rect.bottom() / sy).ceil().max(r0 + 1.0);

        let clamp = |v: f32, max: usize| v.clamp(0.0, max as f32) as usize;
        let (c0, c1) = (clamp(c0, self.cols), clamp(c1, self.cols));
        let (r0, r1) = (clamp(r0, self.rows), clamp(r1, self.rows));
        (c0 < c1 && r0 < r1).then_some((c0, c1, r0, r1))
    }
}

impl Renderer for TextRenderer {
    fn draw(&mut self, state: &MatchState) {
        let sx = state.field.width / self.cols as f32;
        let sy = state.field.height / self.rows as f32;
        let mut grid = vec![vec![EMPTY; self.cols]; self.rows];

        for cmd in draw_list(state) {
            if let Some((c0, c1, r0, r1)) = self.cells(&cmd.rect, sx, sy) {
                for row in &mut grid[r0..r1] {
                    row[c0..c1].fill(glyph(cmd.layer));
                }
            }
        }

        let mut frame = String::with_capacity((self.cols + 3) * (self.rows + 2));
        let scores: Vec<String> = score_lines(state).into_iter().map(|(s, _)| s).collect();
        frame.push_str(&scores.join("  "));
        frame.push('\n');
        for row in grid {
            frame.push(BORDER);
            frame.extend(row);
            frame.push(BORDER);
            frame.push('\n');
        }
        self.frame = frame;
    }
}
