pub mod analytics;
pub mod binance;
pub mod buffer;
pub mod config;
pub mod error;
pub mod event;
pub mod input;
pub mod model;
pub mod pipeline;
pub mod ui;
pub mod ui_handlers;
