// Settings features
pub mod guild_init;
pub mod settings_ui;
