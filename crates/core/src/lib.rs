//! Round logic for the crop-matching game. Keep this crate free of IO and platform concerns.

pub mod album;
pub mod cards;
pub mod catalog;
pub mod config;
pub mod engine;
pub mod events;
pub mod resolver;
pub mod rng;
pub mod scoring;
pub mod session;
pub mod state;
pub mod timer;

pub use album::*;
pub use cards::*;
pub use catalog::*;
pub use config::*;
pub use engine::*;
pub use events::*;
pub use resolver::*;
pub use rng::*;
pub use scoring::*;
pub use session::*;
pub use state::*;
pub use timer::*;
