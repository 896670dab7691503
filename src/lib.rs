//! Software-rendered fireworks with a phosphor-style afterglow.
//!
//! The engine lives here; `main.rs` only wires it to a window.

pub mod clock;
pub mod color;
pub mod colorset;
pub mod compositor;
pub mod config;
pub mod decay;
pub mod draw;
pub mod error;
pub mod fader;
pub mod fireworks;
pub mod input;
pub mod params;
pub mod pool;
pub mod scene;
pub mod sim;
pub mod simd;
pub mod spark;
pub mod stats;

pub use error::{Error, Result};
pub use fireworks::Fireworks;
