pub mod app;
pub mod cli;
pub mod config;
pub mod extras;
pub mod gear;
pub mod i18n;
pub mod shortcuts;
pub mod storage;
pub mod ui;
pub mod utils;
