// src/commands/mod.rs
pub mod destroy;
pub mod global;
pub mod registry;
