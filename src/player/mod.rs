pub mod tui;

pub use tui::{spawn_input_task, translate};
