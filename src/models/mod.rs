// src/models/mod.rs

pub mod category;
pub mod identity;
pub mod question;
pub mod result;
pub mod session;
