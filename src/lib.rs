//! Braket - a Breakout/Pong hybrid
//!
//! Core modules:
//! - `sim`: Deterministic simulation (geometry, collisions, match state)
//! - `settings`: Match configuration loaded from JSON
//! - `renderer`: Renderer contract plus a plain-text renderer
//! - `wasm`: Browser host bindings (wasm32 only)

pub mod renderer;
pub mod settings;
pub mod sim;
#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use settings::{ConfigError, MatchConfig};

/// Game configuration constants
pub mod consts {
    /// Target simulation rate (ticks per second)
    pub const TICK_RATE: f32 = 100.0;
    /// Maximum ticks run for a single host frame
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest host frame the scheduler will account for (seconds)
    pub const MAX_FRAME_TIME: f32 = 0.1;

    /// Play field dimensions
    pub const FIELD_WIDTH: f32 = 800.0;
    pub const FIELD_HEIGHT: f32 = 600.0;

    /// Block grid defaults
    pub const GRID_COLUMNS: u32 = 6;
    pub const GRID_ROWS: u32 = 3;
    pub const BLOCK_WIDTH: f32 = 100.0;
    pub const BLOCK_HEIGHT: f32 = 40.0;
    pub const BLOCK_MARGIN: f32 = 10.0;
    /// Upper bound on blocks in one grid
    pub const MAX_BLOCKS: usize = 4096;

    /// Paddle defaults
    pub const PADDLE_WIDTH: f32 = 200.0;
    pub const PADDLE_HEIGHT: f32 = 30.0;
    /// Distance from the field bottom to the paddle's top edge
    pub const PADDLE_BOTTOM_OFFSET: f32 = 100.0;
    /// Horizontal displacement per directional input
    pub const PADDLE_STEP: f32 = 25.0;

    /// Ball defaults
    pub const BALL_SIZE: f32 = 50.0;
    pub const BALL_START_VEL: (f32, f32) = (2.0, -2.0);

    /// Velocity multiplier applied on every scored point
    pub const SPEED_MULTIPLIER: f32 = 1.02;
    /// Smallest magnitude of the paddle impact factor
    pub const MIN_IMPACT: f32 = 0.5;
}

/// Packed 0xRRGGBB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color(pub u32);

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Color::from_hex(&s).ok_or_else(|| format!("invalid color '{s}', expected #rrggbb"))
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

impl Color {
    pub const BLOCK: Color = Color(0xff0000);
    pub const PADDLE: Color = Color(0x800869);
    pub const BALL: Color = Color(0x069420);

    /// CSS-style hex string (`#rrggbb`)
    pub fn to_hex(self) -> String {
        format!("#{:06x}", self.0 & 0x00ff_ffff)
    }

    /// Parse `#rrggbb` or `rrggbb`
    pub fn from_hex(s: &str) -> Option<Self> {
        let s = s.strip_prefix('#').unwrap_or(s);
        if s.len() != 6 || !s.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        u32::from_str_radix(s, 16).ok().map(Color)
    }
}
