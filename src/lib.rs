pub mod assets;
pub mod brick_list;
pub mod commands;
pub mod config;
pub mod formats;
pub mod logging;
pub mod verify;
