mod category;
mod player;
mod stats;

pub use category::*;
pub use player::*;
pub use stats::*;
pub(crate) use stats::normalize_key;
