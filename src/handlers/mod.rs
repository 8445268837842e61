// src/handlers/mod.rs

pub mod quiz;
pub mod results;
pub mod session;
