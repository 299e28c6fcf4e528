//! Output module - Front files and renderers.

mod front_file;
mod render;

pub use front_file::{FrontFileError, read_front, write_function_values, write_variables};
pub use render::{FrontRenderer, JsonFrontRenderer};
