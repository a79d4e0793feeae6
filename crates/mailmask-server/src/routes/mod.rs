// HTTP routes
pub mod classify;
pub mod health;

pub use classify::*;
pub use health::*;
