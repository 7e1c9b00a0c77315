pub mod config;
pub mod editor;
pub mod input;
pub mod key_help;
pub mod keybinds;
pub mod logging;
pub mod textarea;
pub mod ui;
