//! `Kandan` — task board library with an optimistic-update engine.

pub mod app;
pub mod board;
pub mod config;
pub mod notify;
pub mod remote;
pub mod session;
