//! Request handlers.

pub mod generate;
pub mod health;
pub mod tasks;
pub mod videos;

pub use generate::*;
pub use health::*;
pub use tasks::*;
pub use videos::*;
