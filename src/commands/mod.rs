// Slash and prefix commands
pub mod help;
pub mod settings;
