// src/quiz/mod.rs

pub mod comparison;
pub mod controller;
pub mod demo;
pub mod scoring;
pub mod session;
