//! src/routes/mod.rs

mod activation_confirm;
mod health_check;

pub use activation_confirm::*;
pub use health_check::*;
