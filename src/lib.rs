pub mod app;
pub mod config;
pub mod controller;
pub mod dispatch;
pub mod http;
pub mod manager;
pub mod middleware;
pub mod process;
pub mod registry;
pub mod shutdown;
