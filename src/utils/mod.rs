pub mod command;
pub mod system;
