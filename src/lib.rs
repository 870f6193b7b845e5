pub mod app;
pub mod command;
pub mod config;
pub mod error;
pub mod event;
pub mod input;
pub mod logging;
pub mod notify;
pub mod palette;
pub mod portal;
pub mod router;
pub mod storage;
pub mod ui;
pub mod util;
