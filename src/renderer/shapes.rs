//! Draw command generation for 2D primitives

use serde::{Deserialize, Serialize};

use crate::Color;
use crate::sim::{MatchState, Rect};

/// Paint layer, drawn back to front
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Layer {
    Block,
    Paddle,
    Ball,
}

/// One filled rectangle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawCmd {
    pub layer: Layer,
    pub rect: Rect,
    pub color: Color,
}

/// Every visible entity in paint order: blocks, then paddles, then balls
pub fn draw_list(state: &MatchState) -> Vec<DrawCmd> {
    let mut cmds =
        Vec::with_capacity(state.blocks.len() + state.players.len() + state.balls.len());

    cmds.extend(state.blocks.iter().map(|b| DrawCmd {
        layer: Layer::Block,
        rect: b.rect,
        color: b.color,
    }));
    cmds.extend(state.players.iter().map(|p| DrawCmd {
        layer: Layer::Paddle,
        rect: p.paddle.rect,
        color: p.paddle.color,
    }));
    cmds.extend(state.balls.iter().map(|b| DrawCmd {
        layer: Layer::Ball,
        rect: b.rect,
        color: b.color,
    }));
    cmds
}

/// Score text per player, tinted with the player's paddle color
pub fn score_lines(state: &MatchState) -> Vec<(String, Color)> {
    state
        .players
        .iter()
        .map(|p| (format!("{}: {}", p.id, p.score), p.paddle.color))
        .collect()
}
