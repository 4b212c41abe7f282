pub mod color;
pub mod config;
pub mod constants;
pub mod error;
pub mod evaluator;
pub mod kernel;
pub mod layout;
pub mod noise;
pub mod partition;
pub mod random;
pub mod reaction;
pub mod render;
pub mod system;

pub static CROWD_WGSL: &str = include_str!("../shaders/crowd.wgsl");

pub use color::*;
pub use config::*;
pub use constants::*;
pub use error::*;
pub use evaluator::*;
pub use kernel::*;
pub use layout::*;
pub use noise::*;
pub use partition::*;
pub use random::*;
pub use reaction::*;
pub use render::*;
pub use system::*;
