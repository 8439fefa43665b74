//! Geometry and stacking engine for floating windows composited inside one
//! host surface, plus a terminal host that drives it with crossterm and
//! renders it with ratatui.

pub mod constants;
pub mod drivers;
pub mod event_loop;
pub mod fullscreen;
pub mod host;
pub mod runner;
pub mod tracing_sub;
pub mod viewport;
pub mod window;
