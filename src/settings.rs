//! Match configuration
//!
//! Loaded from JSON (missing keys fall back to the classic layout) and
//! validated once, before any state is built from it.

use std::fmt;
#[cfg(not(target_arch = "wasm32"))]
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::Color;
use crate::consts::*;
use crate::sim::GeometryError;

/// Reasons a configuration (or a rectangle built from it) is rejected
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A width, height or step that must be strictly positive
    NonPositive { what: &'static str, value: f32 },
    NoPlayers,
    NoBalls,
    /// Speed ramp must make the ball faster
    SpeedMultiplier { value: f32 },
    /// Minimum impact must be inside (0, 1]
    MinImpact { value: f32 },
    /// Something is larger than the play field
    DoesNotFit { what: &'static str, size: f32, field: f32 },
    /// Block grid spills past the field edge
    GridOverflow { right: f32, bottom: f32 },
    /// More blocks than one match will hold
    TooManyBlocks { columns: u32, rows: u32, max: usize },
    Parse(String),
    Io(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositive { what, value } => {
                write!(f, "{what} must be positive, got {value}")
            }
            Self::NoPlayers => write!(f, "at least one player is required"),
            Self::NoBalls => write!(f, "at least one ball is required"),
            Self::SpeedMultiplier { value } => {
                write!(f, "speed multiplier must be greater than 1, got {value}")
            }
            Self::MinImpact { value } => {
                write!(f, "minimum impact must be in (0, 1], got {value}")
            }
            Self::DoesNotFit { what, size, field } => {
                write!(f, "{what} ({size}) does not fit the field ({field})")
            }
            Self::GridOverflow { right, bottom } => write!(
                f,
                "block grid overflows the field: right edge {right}, bottom edge {bottom}"
            ),
            Self::TooManyBlocks { columns, rows, max } => write!(
                f,
                "block grid {columns}x{rows} exceeds the limit of {max} blocks"
            ),
            Self::Parse(msg) => write!(f, "invalid config: {msg}"),
            Self::Io(msg) => write!(f, "cannot read config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<GeometryError> for ConfigError {
    fn from(err: GeometryError) -> Self {
        match err {
            GeometryError::NonPositive { what, value } => Self::NonPositive { what, value },
        }
    }
}

/// Everything needed to lay out and run a match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    // === Field ===
    pub field_width: f32,
    pub field_height: f32,

    // === Blocks ===
    pub columns: u32,
    pub rows: u32,
    pub block_width: f32,
    pub block_height: f32,
    pub block_margin: f32,
    pub block_color: Color,

    // === Players ===
    pub players: u32,
    pub paddle_width: f32,
    pub paddle_height: f32,
    /// Gap between the paddle's top edge and the field bottom
    pub paddle_bottom_offset: f32,
    pub paddle_step: f32,
    pub paddle_color: Color,

    // === Balls ===
    pub balls: u32,
    pub ball_size: f32,
    pub ball_velocity: [f32; 2],
    pub ball_color: Color,
    /// Pick each ball's horizontal launch direction from the seeded RNG
    pub random_launch: bool,
    pub seed: u64,

    // === Rules ===
    pub speed_multiplier: f32,
    pub min_impact: f32,
    /// Side hits on a paddle leave the ball's velocity untouched (classic quirk)
    pub legacy_side_bounce: bool,
    /// Balls bounce off each other
    pub ball_collisions: bool,

    // === Timing ===
    pub tick_rate: f32,
    pub max_substeps: u32,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            field_width: FIELD_WIDTH,
            field_height: FIELD_HEIGHT,

            columns: GRID_COLUMNS,
            rows: GRID_ROWS,
            block_width: BLOCK_WIDTH,
            block_height: BLOCK_HEIGHT,
            block_margin: BLOCK_MARGIN,
            block_color: Color::BLOCK,

            players: 1,
            paddle_width: PADDLE_WIDTH,
            paddle_height: PADDLE_HEIGHT,
            paddle_bottom_offset: PADDLE_BOTTOM_OFFSET,
            paddle_step: PADDLE_STEP,
            paddle_color: Color::PADDLE,

            balls: 1,
            ball_size: BALL_SIZE,
            ball_velocity: [BALL_START_VEL.0, BALL_START_VEL.1],
            ball_color: Color::BALL,
            random_launch: false,
            seed: 0,

            speed_multiplier: SPEED_MULTIPLIER,
            min_impact: MIN_IMPACT,
            legacy_side_bounce: false,
            ball_collisions: true,

            tick_rate: TICK_RATE,
            max_substeps: MAX_SUBSTEPS,
        }
    }
}

impl MatchConfig {
    /// Parse from JSON; absent keys keep their defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> String {
        // Plain data with string-keyed fields only, serialization cannot fail
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Read and validate a JSON config file
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {e}", path.display())))?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded match config from {}", path.display());
        Ok(config)
    }

    /// Simulation timestep in seconds
    pub fn tick_dt(&self) -> f32 {
        1.0 / self.tick_rate
    }

    /// Reject layouts the simulation cannot run
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("field width", self.field_width),
            ("field height", self.field_height),
            ("block width", self.block_width),
            ("block height", self.block_height),
            ("paddle width", self.paddle_width),
            ("paddle height", self.paddle_height),
            ("paddle step", self.paddle_step),
            ("ball size", self.ball_size),
            ("tick rate", self.tick_rate),
        ];
        for (what, value) in positive {
            // `!(v > 0)` also catches NaN
            if !(value > 0.0) {
                return Err(ConfigError::NonPositive { what, value });
            }
        }
        if self.block_margin < 0.0 {
            return Err(ConfigError::NonPositive {
                what: "block margin",
                value: self.block_margin,
            });
        }
        if self.max_substeps == 0 {
            return Err(ConfigError::NonPositive {
                what: "max substeps",
                value: 0.0,
            });
        }
        if self.players == 0 {
            return Err(ConfigError::NoPlayers);
        }
        if self.balls == 0 {
            return Err(ConfigError::NoBalls);
        }
        if !(self.speed_multiplier > 1.0) {
            return Err(ConfigError::SpeedMultiplier {
                value: self.speed_multiplier,
            });
        }
        if !(self.min_impact > 0.0 && self.min_impact <= 1.0) {
            return Err(ConfigError::MinImpact {
                value: self.min_impact,
            });
        }

        let paddles_width = self.paddle_width * self.players as f32;
        if paddles_width > self.field_width {
            return Err(ConfigError::DoesNotFit {
                what: "paddles",
                size: paddles_width,
                field: self.field_width,
            });
        }
        let paddle_top = self.paddle_top();
        if paddle_top < 0.0 || paddle_top + self.paddle_height > self.field_height {
            return Err(ConfigError::DoesNotFit {
                what: "paddle row",
                size: self.paddle_bottom_offset,
                field: self.field_height,
            });
        }
        let balls_width = self.ball_spacing() * self.balls as f32;
        if balls_width > self.field_width || self.ball_size > self.field_height / 2.0 {
            return Err(ConfigError::DoesNotFit {
                what: "balls",
                size: balls_width,
                field: self.field_width,
            });
        }

        self.block_count()?;
        let (right, bottom) = self.grid_extent();
        if right > self.field_width || bottom > self.field_height {
            return Err(ConfigError::GridOverflow { right, bottom });
        }
        Ok(())
    }

    /// Number of blocks in the grid, capped at `MAX_BLOCKS`
    pub fn block_count(&self) -> Result<usize, ConfigError> {
        block_count(self.columns, self.rows)
    }

    /// Top edge of every paddle
    pub fn paddle_top(&self) -> f32 {
        self.field_height - self.paddle_bottom_offset
    }

    /// Horizontal distance between neighbouring ball spawns
    pub fn ball_spacing(&self) -> f32 {
        self.ball_size * 2.0
    }

    /// Right and bottom edge of the block grid
    pub fn grid_extent(&self) -> (f32, f32) {
        let right = (self.block_margin + self.block_width) * self.columns as f32 + self.block_width;
        let bottom = (self.block_margin + self.block_height) * self.rows as f32 + self.block_height;
        (right, bottom)
    }
}

/// `columns * rows`, rejected above `MAX_BLOCKS`
pub fn block_count(columns: u32, rows: u32) -> Result<usize, ConfigError> {
    (columns as usize)
        .checked_mul(rows as usize)
        .filter(|&count| count <= MAX_BLOCKS)
        .ok_or(ConfigError::TooManyBlocks {
            columns,
            rows,
            max: MAX_BLOCKS,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::MatchState;

    #[test]
    fn test_default_config_is_valid() {
        let config = MatchConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.columns * config.rows, 18);
        assert!((config.tick_dt() - 0.01).abs() < 1e-6);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = MatchConfig::from_json(r##"{"columns": 4, "paddle_color": "#112233"}"##)
            .expect("valid config");
        assert_eq!(config.columns, 4);
        assert_eq!(config.rows, GRID_ROWS);
        assert_eq!(config.paddle_color, Color(0x112233));
        assert_eq!(config.field_width, FIELD_WIDTH);
    }

    #[test]
    fn test_json_roundtrip() {
        let config = MatchConfig {
            players: 2,
            seed: 42,
            random_launch: true,
            ..Default::default()
        };
        let back = MatchConfig::from_json(&config.to_json()).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_rejects_non_positive_sizes() {
        let config = MatchConfig {
            ball_size: 0.0,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::NonPositive {
                what: "ball size",
                value: 0.0
            })
        );

        let config = MatchConfig {
            field_height: f32::NAN,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositive { what: "field height", .. })
        ));
    }

    #[test]
    fn test_rejects_bad_rules() {
        let config = MatchConfig {
            speed_multiplier: 1.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::SpeedMultiplier { .. })
        ));

        let config = MatchConfig {
            min_impact: 1.5,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::MinImpact { .. })));

        let config = MatchConfig {
            players: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::NoPlayers));
    }

    #[test]
    fn test_rejects_overflowing_layouts() {
        let config = MatchConfig {
            columns: 12,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::GridOverflow { .. })
        ));

        let config = MatchConfig {
            players: 5,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::DoesNotFit { what: "paddles", .. })
        ));
    }

    #[test]
    fn test_rejects_huge_block_grid() {
        // Tiny blocks keep the pixel extent inside the field
        let config = MatchConfig {
            columns: 70_000,
            rows: 70_000,
            block_width: 0.001,
            block_height: 0.001,
            block_margin: 0.0,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::TooManyBlocks {
                columns: 70_000,
                rows: 70_000,
                max: MAX_BLOCKS
            })
        );
        assert!(MatchState::new(config).is_err());

        assert_eq!(block_count(6, 3), Ok(18));
        assert_eq!(block_count(0, 3), Ok(0));
        assert!(block_count(u32::MAX, u32::MAX).is_err());
    }

    #[test]
    fn test_parse_error_is_reported() {
        let err = MatchConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().starts_with("invalid config"));
    }
}
