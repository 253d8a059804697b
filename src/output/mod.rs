//! Progress reporting and table rendering for the command line.

pub mod progress;
mod render;

pub use render::{OutputFormat, emit, render_sections, render_table, text_table};
