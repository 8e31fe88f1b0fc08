//! Ratatui front-end: a menu scene for table settings and a table scene
//! where one human seat plays against bots.

pub mod app;
pub mod controller;
mod ui;
