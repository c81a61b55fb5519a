//! Deterministic game logic
//!
//! All gameplay rules live here. This module must stay pure:
//! - Time only enters through `Session::advance`
//! - Seeded RNG only
//! - No rendering, audio or platform dependencies

pub mod lifecycle;
pub mod session;
pub mod spawn;
pub mod state;
pub mod target;
pub mod timer;

pub use lifecycle::{LifecycleEvent, TargetLifecycle};
pub use session::Session;
pub use spawn::{SpawnBounds, SpawnGenerator};
pub use state::{GameEvent, GameState, SessionSnapshot};
pub use target::Target;
pub use timer::{Delay, Interval};
