//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - First-free-slot allocation so slot order replays identically
//! - No rendering, audio or platform dependencies (hosts drain events)

pub mod ai;
pub mod bonus;
pub mod color;
pub mod craft;
pub mod effects;
pub mod input;
pub mod pool;
pub mod projectile;
pub mod state;
pub mod station;
pub mod tick;
pub mod view;

pub use ai::{AiProfile, Perception, decide, get_profile};
pub use bonus::{Bonus, BonusKind, BonusPool, Recipient};
pub use color::{Rgba, player_color};
pub use craft::{Craft, CraftContext, CraftPool};
pub use effects::{Burst, Marker, TimedEffectPool};
pub use input::{Buttons, ControlInput, TickInput};
pub use pool::SlotPool;
pub use projectile::{FireOrder, ImpactContext, Projectile, ProjectileKind, ProjectilePool};
pub use state::{GameEvent, GameState, RoundPhase, ScoreTable, Sound};
pub use station::{Loadout, Station};
pub use tick::tick;
pub use view::{PinholeView, ScreenProjector};
