//! lib.rs

pub mod activation;
pub mod configuration;
pub mod domain;
pub mod routes;
pub mod startup;
pub mod telemetry;
pub mod users;
mod utils;

#[cfg(test)] extern crate proptest;
