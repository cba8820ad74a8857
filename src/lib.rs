pub mod api_defaults;
pub mod api_traits;
pub mod cache;
pub mod cli;
pub mod cmds;
pub mod config;
pub mod connectivity;
pub mod dialog;
pub mod display;
pub mod error;
pub mod http;
pub mod init;
pub mod io;
pub mod keys;
pub mod logging;
pub mod recipe;
pub mod service;
pub mod storage;
pub mod test;
pub mod time;
pub type Result<T> = anyhow::Result<T>;
pub type Error = anyhow::Error;

#[macro_use]
extern crate log;

#[macro_use]
extern crate lazy_static;

#[macro_use]
extern crate derive_builder;
