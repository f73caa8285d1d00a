//! Rendering contract
//!
//! The simulation never draws. A renderer reads the match once per tick,
//! after it has advanced, and has no way to write back. `shapes` flattens a
//! match into plain draw commands; `text` is a terminal rasterizer used by
//! the headless runner.

pub mod shapes;
pub mod text;

pub use shapes::{DrawCmd, Layer, draw_list, score_lines};
pub use text::TextRenderer;

use crate::sim::MatchState;

/// Anything that can present a match frame
pub trait Renderer {
    fn draw(&mut self, state: &MatchState);
}
