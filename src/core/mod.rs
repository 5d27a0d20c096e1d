//! Configuration and wire models shared by the proxy and the widget

pub mod config;
pub mod models;
