pub mod blocking;
pub mod console;
