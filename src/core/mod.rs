//! Configuration and data model shared by the clients and the worker

pub mod config;
pub mod models;
