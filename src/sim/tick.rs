//! Fixed-step simulation tick
//!
//! Advances a match by exactly one step. Per tick: queued input is applied,
//! then every ball (in id order) moves and resolves walls, paddles, blocks and
//! other balls, in that order. Lost balls are removed last.

use super::collision::{Field, bounce_off_walls, impact_factor, is_below_field, reflect};
use super::rect::{Rect, classify};
use super::state::{
    Ball, Block, Direction, GameEvent, InputEvent, MatchPhase, MatchState, MoveOutcome, Player,
    PlayerId,
};
use crate::settings::{ConfigError, MatchConfig, block_count};

/// Advance the match by one tick. Total: never fails, no-op once over.
pub fn tick(state: &mut MatchState) {
    if state.is_over() {
        return;
    }
    state.events.clear();

    apply_inputs(state);
    if state.phase == MatchPhase::Paused {
        return;
    }

    state.time_ticks += 1;
    let field = state.field;

    for idx in 0..state.balls.len() {
        let others: Vec<(u32, Rect)> = state
            .balls
            .iter()
            .enumerate()
            .filter(|(other, _)| *other != idx)
            .map(|(_, b)| (b.id, b.rect))
            .collect();

        let ball = &mut state.balls[idx];
        update_ball(
            ball,
            &others,
            &mut state.players,
            &mut state.blocks,
            &state.config,
            field,
            &mut state.events,
        );
    }

    let events = &mut state.events;
    state.balls.retain(|ball| {
        if is_below_field(&ball.rect, field) {
            log::debug!("Ball {} lost at x={:.1}", ball.id, ball.rect.x);
            events.push(GameEvent::BallLost { ball: ball.id });
            false
        } else {
            true
        }
    });

    if state.balls.is_empty() {
        state.finish();
    }
}

/// Drain the input queue in arrival order
fn apply_inputs(state: &mut MatchState) {
    let field = state.field;
    while let Some(input) = state.inputs.pop_front() {
        match input {
            InputEvent::TogglePause => {
                state.phase = match state.phase {
                    MatchPhase::Playing => MatchPhase::Paused,
                    MatchPhase::Paused => MatchPhase::Playing,
                    other => other,
                };
                log::info!("Match {:?}", state.phase);
            }
            InputEvent::Move { player, direction } => {
                if state.phase != MatchPhase::Playing {
                    log::debug!("Dropping {direction:?} for {player} while paused");
                    continue;
                }
                let Some(p) = state.players.get_mut(player.0) else {
                    continue;
                };
                if p.paddle.slide(direction, field) == MoveOutcome::Blocked {
                    state
                        .events
                        .push(GameEvent::PaddleBlocked { player, direction });
                }
            }
        }
    }
}

/// Full per-tick pipeline for one ball
pub fn update_ball(
    ball: &mut Ball,
    others: &[(u32, Rect)],
    players: &mut [Player],
    blocks: &mut Vec<Block>,
    config: &MatchConfig,
    field: Field,
    events: &mut Vec<GameEvent>,
) {
    ball.step();
    check_wall_collisions(ball, field, events);
    check_paddle_collisions(ball, players, config, events);
    check_block_collisions(ball, players, blocks, config, events);
    if config.ball_collisions {
        check_ball_collisions(ball, others, events);
    }
}

/// Bounce off the left, right and top walls; the bottom stays open
pub fn check_wall_collisions(ball: &mut Ball, field: Field, events: &mut Vec<GameEvent>) {
    if bounce_off_walls(&mut ball.rect, &mut ball.vel, field).any() {
        events.push(GameEvent::WallBounce { ball: ball.id });
    }
}

/// Resolve at most one paddle, first in player order.
///
/// Top/bottom hits re-aim the ball from the impact offset; side hits reverse
/// the horizontal direction (or leave it alone under `legacy_side_bounce`).
pub fn check_paddle_collisions(
    ball: &mut Ball,
    players: &[Player],
    config: &MatchConfig,
    events: &mut Vec<GameEvent>,
) {
    let hit = players.iter().find_map(|player| {
        classify(&ball.rect, &player.paddle.rect).map(|side| (player, side))
    });
    let Some((player, side)) = hit else {
        return;
    };

    ball.last_touched_by = Some(player.id);
    if side.is_vertical() {
        let impact = impact_factor(&ball.rect, &player.paddle.rect, config.min_impact);
        ball.vel.x = ball.initial_vel.x.abs() * impact;
        ball.vel.y = -ball.vel.y;
    } else if !config.legacy_side_bounce {
        ball.vel.x = -ball.vel.x;
    }

    log::debug!("Ball {} hit {} on {:?}", ball.id, player.id, side);
    events.push(GameEvent::PaddleHit {
        ball: ball.id,
        player: player.id,
        side,
    });
}

/// Destroy at most one block, first in block order, and score it
pub fn check_block_collisions(
    ball: &mut Ball,
    players: &mut [Player],
    blocks: &mut Vec<Block>,
    config: &MatchConfig,
    events: &mut Vec<GameEvent>,
) {
    let hit = blocks
        .iter()
        .enumerate()
        .find_map(|(i, block)| classify(&ball.rect, &block.rect).map(|side| (i, side)));
    let Some((index, side)) = hit else {
        return;
    };

    let block = blocks.remove(index);
    let award = ball.add_point(players, config.speed_multiplier);
    ball.vel = reflect(ball.vel, side);

    log::debug!(
        "Ball {} destroyed block {} ({:?}), {} left, speed {:.2}",
        ball.id,
        block.id,
        award,
        blocks.len(),
        ball.speed()
    );
    events.push(GameEvent::BlockDestroyed {
        ball: ball.id,
        block: block.id,
        side,
        award,
    });
}

/// Bounce off the first other ball in contact
pub fn check_ball_collisions(ball: &mut Ball, others: &[(u32, Rect)], events: &mut Vec<GameEvent>) {
    let hit = others
        .iter()
        .find_map(|(id, rect)| classify(&ball.rect, rect).map(|side| (*id, side)));
    if let Some((other, side)) = hit {
        ball.vel = reflect(ball.vel, side);
        events.push(GameEvent::BallBounce {
            ball: ball.id,
            other,
            side,
        });
    }
}

/// Replace the blocks with a `columns` x `rows` grid.
///
/// Cell (row i, column j), both counted from 1, sits at
/// `((margin + width) * j, (margin + height) * i)`; the grid keeps one empty
/// cell of inset on the top-left.
pub fn generate_blocks(state: &mut MatchState, columns: u32, rows: u32) -> Result<(), ConfigError> {
    let width = state.config.block_width;
    let height = state.config.block_height;
    let margin = state.config.block_margin;
    let color = state.config.block_color;

    let count = block_count(columns, rows)?;
    state.blocks.clear();
    state.blocks.reserve(count);
    for i in 1..=rows {
        for j in 1..=columns {
            let rect = Rect::new(
                (margin + width) * j as f32,
                (margin + height) * i as f32,
                width,
                height,
            )?;
            let id = state.next_entity_id();
            state.blocks.push(Block { id, rect, color });
        }
    }

    log::info!("Generated {}x{} block grid ({} blocks)", columns, rows, state.blocks.len());
    Ok(())
}

/// Demo-mode paddle steering.
///
/// Tracks the closest descending ball (or any ball if none descend) with a
/// slowly oscillating aim offset so rebounds vary.
pub fn autopilot(state: &MatchState, player: PlayerId) -> Option<Direction> {
    let paddle = &state.player(player)?.paddle;
    let center = paddle.rect.center();

    let target = state
        .balls
        .iter()
        .filter(|b| b.vel.y > 0.0)
        .min_by(|a, b| {
            let da = (center.y - a.rect.center().y).abs();
            let db = (center.y - b.rect.center().y).abs();
            da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
        })
        .or_else(|| state.balls.first())?;

    let time_factor = state.time_ticks as f32 * 0.01;
    let offset = (time_factor.sin() * 0.3 + (time_factor * 0.7).sin() * 0.15) * paddle.rect.w;
    let dx = target.rect.center().x - offset - center.x;
    if dx.abs() < paddle.step / 2.0 {
        None
    } else if dx < 0.0 {
        Some(Direction::Left)
    } else {
        Some(Direction::Right)
    }
}
