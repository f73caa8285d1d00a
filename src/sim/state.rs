//! Match state and core simulation types
//!
//! The match owns every player, ball and block. Nothing outside
//! [`MatchState`] holds a reference into these collections; balls refer to
//! players by [`PlayerId`] only.

use std::collections::VecDeque;
use std::fmt;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Field;
use super::rect::{GeometryError, Rect, Side};
use crate::Color;
use crate::settings::{ConfigError, MatchConfig};

/// Index of a player in the match's player list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(pub usize);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Players are numbered from 1 on screen
        write!(f, "Player {}", self.0 + 1)
    }
}

/// Horizontal paddle input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            Direction::Left => -1.0,
            Direction::Right => 1.0,
        }
    }
}

/// Result of a paddle move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveOutcome {
    Moved,
    /// The step would leave the field; the paddle was parked on the edge
    Blocked,
}

/// A player's paddle ("braket")
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paddle {
    pub rect: Rect,
    /// Horizontal displacement per input
    pub step: f32,
    pub color: Color,
}

impl Paddle {
    /// Move one step left or right, clamped to the field.
    ///
    /// If the step would cross a side wall the paddle is snapped flush to that
    /// wall instead and `Blocked` is reported.
    pub fn slide(&mut self, direction: Direction, field: Field) -> MoveOutcome {
        let next_x = self.rect.x + direction.sign() * self.step;

        if next_x < 0.0 {
            self.rect.x = 0.0;
            MoveOutcome::Blocked
        } else if next_x + self.rect.w > field.width {
            self.rect.x = field.width - self.rect.w;
            MoveOutcome::Blocked
        } else {
            self.rect.x = next_x;
            MoveOutcome::Moved
        }
    }
}

/// A participant: one paddle and a running score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub paddle: Paddle,
    pub score: u64,
}

/// A destructible block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub id: u32,
    pub rect: Rect,
    pub color: Color,
}

/// Who received points for a destroyed block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Award {
    Player(PlayerId),
    /// Nobody had touched the ball yet, so every player scores
    Everyone,
}

/// A ball entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub id: u32,
    pub rect: Rect,
    /// Displacement per tick
    pub vel: Vec2,
    /// Launch velocity, scaled along with `vel` on every point. Paddle hits
    /// steer using its horizontal magnitude.
    pub initial_vel: Vec2,
    pub color: Color,
    /// Last player whose paddle touched this ball
    pub last_touched_by: Option<PlayerId>,
}

impl Ball {
    pub fn new(id: u32, rect: Rect, vel: Vec2, color: Color) -> Self {
        Self {
            id,
            rect,
            vel,
            initial_vel: vel,
            color,
            last_touched_by: None,
        }
    }

    /// Advance one tick along the current velocity
    #[inline]
    pub fn step(&mut self) {
        self.rect.translate(self.vel);
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.vel.length()
    }

    /// Credit a point and speed the ball up.
    ///
    /// The point goes to the last paddle that touched the ball, or to every
    /// player when no paddle has touched it yet.
    pub fn add_point(&mut self, players: &mut [Player], multiplier: f32) -> Award {
        let award = match self.last_touched_by {
            Some(id) => match players.get_mut(id.0) {
                Some(player) => {
                    player.score += 1;
                    Award::Player(id)
                }
                None => award_everyone(players),
            },
            None => award_everyone(players),
        };
        self.scale_speed(multiplier);
        award
    }

    /// Scale both the live and the launch velocity
    pub fn scale_speed(&mut self, multiplier: f32) {
        self.vel *= multiplier;
        self.initial_vel *= multiplier;
    }
}

fn award_everyone(players: &mut [Player]) -> Award {
    for player in players.iter_mut() {
        player.score += 1;
    }
    Award::Everyone
}

/// Current phase of the match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchPhase {
    Playing,
    Paused,
    /// Every ball is gone; the match no longer advances
    GameOver,
}

/// Host input, applied at the start of the next tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputEvent {
    Move {
        player: PlayerId,
        direction: Direction,
    },
    TogglePause,
}

/// Something that happened during the last tick (for renderers and hosts)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    WallBounce {
        ball: u32,
    },
    PaddleHit {
        ball: u32,
        player: PlayerId,
        side: Side,
    },
    PaddleBlocked {
        player: PlayerId,
        direction: Direction,
    },
    BlockDestroyed {
        ball: u32,
        block: u32,
        side: Side,
        award: Award,
    },
    BallBounce {
        ball: u32,
        other: u32,
        side: Side,
    },
    BallLost {
        ball: u32,
    },
    GameOver,
}

/// Final score line for one player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerScore {
    pub player: PlayerId,
    pub score: u64,
}

/// End-of-match report, scores ordered by player index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSummary {
    pub scores: Vec<PlayerScore>,
    pub ticks: u64,
}

impl MatchSummary {
    /// Highest score (ties resolve to the lowest player index)
    pub fn leader(&self) -> Option<PlayerScore> {
        self.scores
            .iter()
            .copied()
            .reduce(|best, s| if s.score > best.score { s } else { best })
    }
}

impl fmt::Display for MatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Game over")?;
        write!(f, "Scores:")?;
        for entry in &self.scores {
            write!(f, "\n  {}: {}", entry.player, entry.score)?;
        }
        Ok(())
    }
}

/// Errors from host-facing match calls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchError {
    UnknownPlayer { player: PlayerId, players: usize },
}

impl fmt::Display for MatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownPlayer { player, players } => {
                write!(f, "unknown player index {} (match has {players})", player.0)
            }
        }
    }
}

impl std::error::Error for MatchError {}

/// Complete match state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchState {
    pub config: MatchConfig,
    /// Field bounds, updated by the host on resize
    pub field: Field,
    pub phase: MatchPhase,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub players: Vec<Player>,
    /// Active balls (stable order by id)
    pub balls: Vec<Ball>,
    /// Active blocks (stable order by id)
    pub blocks: Vec<Block>,
    /// Inputs waiting for the next tick
    pub inputs: VecDeque<InputEvent>,
    /// Events raised by the last tick
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    pub summary: Option<MatchSummary>,
    next_id: u32,
}

impl MatchState {
    /// Lay out a fresh match: paddles, balls and the block grid
    pub fn new(config: MatchConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let field = Field::new(config.field_width, config.field_height);
        let mut state = Self {
            field,
            phase: MatchPhase::Playing,
            time_ticks: 0,
            players: Vec::with_capacity(config.players as usize),
            balls: Vec::with_capacity(config.balls as usize),
            blocks: Vec::new(),
            inputs: VecDeque::new(),
            events: Vec::new(),
            summary: None,
            next_id: 1,
            config,
        };

        state.spawn_players()?;
        state.spawn_balls()?;
        let (columns, rows) = (state.config.columns, state.config.rows);
        super::tick::generate_blocks(&mut state, columns, rows)?;

        log::info!(
            "Match started: {} player(s), {} ball(s), {} blocks on a {}x{} field",
            state.players.len(),
            state.balls.len(),
            state.blocks.len(),
            field.width,
            field.height
        );
        Ok(state)
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// One paddle per player, each centred in an equal-width lane
    fn spawn_players(&mut self) -> Result<(), ConfigError> {
        let count = self.config.players as usize;
        let lane = self.field.width / count as f32;
        let y = self.config.paddle_top();

        for i in 0..count {
            let x = lane * (i as f32 + 0.5) - self.config.paddle_width / 2.0;
            let rect = Rect::new(x, y, self.config.paddle_width, self.config.paddle_height)?;
            self.players.push(Player {
                id: PlayerId(i),
                paddle: Paddle {
                    rect,
                    step: self.config.paddle_step,
                    color: self.config.paddle_color,
                },
                score: 0,
            });
        }
        Ok(())
    }

    /// Balls start side by side at mid-field
    fn spawn_balls(&mut self) -> Result<(), ConfigError> {
        let count = self.config.balls;
        let size = self.config.ball_size;
        let spacing = self.config.ball_spacing();
        let [vx, vy] = self.config.ball_velocity;
        let mut rng = Pcg32::seed_from_u64(self.config.seed);

        for i in 0..count {
            let offset = (i as f32 - (count - 1) as f32 / 2.0) * spacing;
            let x = self.field.width / 2.0 + offset - size / 2.0;
            let y = self.field.height / 2.0;
            let vx = if self.config.random_launch && rng.random_bool(0.5) {
                -vx
            } else {
                vx
            };
            self.add_ball(Rect::new(x, y, size, size)?, Vec2::new(vx, vy));
        }
        Ok(())
    }

    /// Put another ball into play; returns its id
    pub fn add_ball(&mut self, rect: Rect, vel: Vec2) -> u32 {
        let id = self.next_entity_id();
        self.balls
            .push(Ball::new(id, rect, vel, self.config.ball_color));
        id
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(id.0)
    }

    /// Current `(player, score)` pairs in player order
    pub fn scores(&self) -> Vec<PlayerScore> {
        self.players
            .iter()
            .map(|p| PlayerScore {
                player: p.id,
                score: p.score,
            })
            .collect()
    }

    /// Queue a paddle move for the next tick
    pub fn queue_move(&mut self, player: PlayerId, direction: Direction) -> Result<(), MatchError> {
        if player.0 >= self.players.len() {
            return Err(MatchError::UnknownPlayer {
                player,
                players: self.players.len(),
            });
        }
        self.queue_input(InputEvent::Move { player, direction });
        Ok(())
    }

    /// Queue a pause toggle for the next tick
    pub fn toggle_pause(&mut self) {
        self.queue_input(InputEvent::TogglePause);
    }

    fn queue_input(&mut self, event: InputEvent) {
        if self.is_over() {
            log::warn!("Ignoring {:?}: match is over", event);
            return;
        }
        self.inputs.push_back(event);
    }

    /// Host resized the play area.
    ///
    /// Paddles are pulled back inside the new width. Balls are left alone;
    /// the next wall check clamps them.
    pub fn set_field(&mut self, field: Field) -> Result<(), GeometryError> {
        let field = Field::checked(field.width, field.height)?;
        self.field = field;
        for player in &mut self.players {
            let rect = &mut player.paddle.rect;
            rect.x = rect.x.min(field.width - rect.w).max(0.0);
        }
        log::debug!("Field resized to {}x{}", field.width, field.height);
        Ok(())
    }

    /// Advance the simulation by one tick
    pub fn advance(&mut self) {
        super::tick::tick(self);
    }

    pub fn is_over(&self) -> bool {
        self.phase == MatchPhase::GameOver
    }

    pub fn summary(&self) -> Option<&MatchSummary> {
        self.summary.as_ref()
    }

    /// Stop the match now, discarding any balls still in play
    pub fn end(&mut self) -> &MatchSummary {
        self.balls.clear();
        self.finish()
    }

    /// Enter game over and record the final scores (idempotent)
    pub(crate) fn finish(&mut self) -> &MatchSummary {
        let summary = match self.summary.take() {
            Some(summary) => summary,
            None => {
                self.phase = MatchPhase::GameOver;
                self.inputs.clear();
                self.events.push(GameEvent::GameOver);
                let summary = MatchSummary {
                    scores: self.scores(),
                    ticks: self.time_ticks,
                };
                log::info!("Match over after {} ticks: {:?}", summary.ticks, summary.scores);
                summary
            }
        };
        self.summary.insert(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn paddle_at(x: f32) -> Paddle {
        Paddle {
            rect: Rect::new(x, 500.0, 200.0, 30.0).unwrap(),
            step: 25.0,
            color: Color::PADDLE,
        }
    }

    const FIELD: Field = Field {
        width: 800.0,
        height: 600.0,
    };

    #[test]
    fn test_new_match_layout() {
        let state = MatchState::new(MatchConfig::default()).unwrap();
        assert_eq!(state.phase, MatchPhase::Playing);
        assert_eq!(state.players.len(), 1);
        assert_eq!(state.balls.len(), 1);
        assert_eq!(state.blocks.len(), 18);

        let paddle = &state.players[0].paddle.rect;
        assert_eq!((paddle.x, paddle.y), (300.0, 500.0));

        let ball = &state.balls[0];
        assert_eq!((ball.rect.x, ball.rect.y), (375.0, 300.0));
        assert_eq!(ball.vel, Vec2::new(2.0, -2.0));
        assert_eq!(ball.initial_vel, ball.vel);
        assert_eq!(ball.last_touched_by, None);
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = MatchConfig {
            paddle_width: -1.0,
            ..Default::default()
        };
        assert!(MatchState::new(config).is_err());
    }

    #[test]
    fn test_two_players_split_the_field() {
        let config = MatchConfig {
            players: 2,
            ..Default::default()
        };
        let state = MatchState::new(config).unwrap();
        assert_eq!(state.players[0].paddle.rect.x, 100.0);
        assert_eq!(state.players[1].paddle.rect.x, 500.0);
    }

    #[test]
    fn test_random_launch_is_seeded() {
        let config = MatchConfig {
            balls: 4,
            random_launch: true,
            seed: 7,
            ..Default::default()
        };
        let a = MatchState::new(config.clone()).unwrap();
        let b = MatchState::new(config).unwrap();
        let dirs = |s: &MatchState| s.balls.iter().map(|b| b.vel.x).collect::<Vec<_>>();
        assert_eq!(dirs(&a), dirs(&b));
        assert!(a.balls.iter().all(|b| b.vel.x.abs() == 2.0));
    }

    #[test]
    fn test_paddle_slide_and_block() {
        let mut paddle = paddle_at(10.0);
        assert_eq!(paddle.slide(Direction::Left, FIELD), MoveOutcome::Blocked);
        assert_eq!(paddle.rect.x, 0.0);
        assert_eq!(paddle.slide(Direction::Right, FIELD), MoveOutcome::Moved);
        assert_eq!(paddle.rect.x, 25.0);
        // Vertical position never changes
        assert_eq!(paddle.rect.y, 500.0);
    }

    #[test]
    fn test_add_point_to_last_toucher() {
        let mut state = MatchState::new(MatchConfig {
            players: 2,
            ..Default::default()
        })
        .unwrap();
        let mut ball = state.balls[0].clone();
        ball.last_touched_by = Some(PlayerId(1));

        let award = ball.add_point(&mut state.players, 1.02);
        assert_eq!(award, Award::Player(PlayerId(1)));
        assert_eq!(state.players[0].score, 0);
        assert_eq!(state.players[1].score, 1);
        assert!((ball.vel.x - 2.04).abs() < 1e-6);
        assert!((ball.initial_vel.y + 2.04).abs() < 1e-6);
    }

    #[test]
    fn test_add_point_untouched_awards_everyone() {
        let mut state = MatchState::new(MatchConfig {
            players: 3,
            ..Default::default()
        })
        .unwrap();
        let mut ball = state.balls[0].clone();
        assert_eq!(ball.add_point(&mut state.players, 1.02), Award::Everyone);
        assert!(state.players.iter().all(|p| p.score == 1));
    }

    #[test]
    fn test_queue_move_unknown_player() {
        let mut state = MatchState::new(MatchConfig::default()).unwrap();
        assert_eq!(
            state.queue_move(PlayerId(3), Direction::Left),
            Err(MatchError::UnknownPlayer {
                player: PlayerId(3),
                players: 1
            })
        );
        assert!(state.inputs.is_empty());
    }

    #[test]
    fn test_end_reports_scores() {
        let mut state = MatchState::new(MatchConfig::default()).unwrap();
        state.players[0].score = 4;
        let summary = state.end().clone();
        assert!(state.is_over());
        assert!(state.balls.is_empty());
        assert_eq!(
            summary.scores,
            vec![PlayerScore {
                player: PlayerId(0),
                score: 4
            }]
        );
        assert_eq!(summary.to_string(), "Game over\nScores:\n  Player 1: 4");

        // Inputs after the end are dropped
        state.queue_move(PlayerId(0), Direction::Left).unwrap();
        assert!(state.inputs.is_empty());
    }

    #[test]
    fn test_set_field_clamps_paddles() {
        let mut state = MatchState::new(MatchConfig {
            players: 2,
            ..Default::default()
        })
        .unwrap();
        state.set_field(Field::new(400.0, 600.0)).unwrap();
        for _ in 0..5 {
            state.advance();
        }

        assert_eq!(state.field.width, 400.0);
        assert_eq!(state.players[0].paddle.rect.x, 100.0);
        for player in &state.players {
            assert!(player.paddle.rect.x >= 0.0);
            assert!(player.paddle.rect.right() <= 400.0);
        }
        assert_eq!(state.players[1].paddle.rect.x, 200.0);
    }

    #[test]
    fn test_set_field_rejects_bad_sizes() {
        let mut state = MatchState::new(MatchConfig::default()).unwrap();
        assert!(state.set_field(Field::new(f32::NAN, 600.0)).is_err());
        assert!(state.set_field(Field::new(800.0, 0.0)).is_err());
        assert_eq!(state.field, Field::new(800.0, 600.0));
    }

    #[test]
    fn test_summary_leader() {
        let summary = MatchSummary {
            scores: vec![
                PlayerScore { player: PlayerId(0), score: 3 },
                PlayerScore { player: PlayerId(1), score: 5 },
                PlayerScore { player: PlayerId(2), score: 5 },
            ],
            ticks: 10,
        };
        assert_eq!(summary.leader().map(|s| s.player), Some(PlayerId(1)));
    }

    #[test]
    fn test_state_serializes() {
        let state = MatchState::new(MatchConfig::default()).unwrap();
        let json = serde_json::to_string(&state).unwrap();
        let back: MatchState = serde_json::from_str(&json).unwrap();
        assert_eq!(back.blocks, state.blocks);
        assert_eq!(back.balls, state.balls);
    }

    proptest! {
        #[test]
        fn prop_paddle_converges_to_wall(start in 0.0f32..600.0, right in any::<bool>(), presses in 1usize..60) {
            let mut paddle = paddle_at(start);
            let direction = if right { Direction::Right } else { Direction::Left };
            let wall = if right { FIELD.width - paddle.rect.w } else { 0.0 };

            // Enough presses to cross the whole field
            for _ in 0..(FIELD.width / paddle.step) as usize + 1 {
                paddle.slide(direction, FIELD);
            }
            prop_assert_eq!(paddle.rect.x, wall);

            for _ in 0..presses {
                prop_assert_eq!(paddle.slide(direction, FIELD), MoveOutcome::Blocked);
                prop_assert_eq!(paddle.rect.x, wall);
            }
        }
    }
}
