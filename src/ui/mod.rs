pub mod console;
pub mod style;

pub use console::Console;
