#![deny(clippy::all)]

pub mod api;
pub mod common;
pub mod config;
pub mod db;
pub mod engine;
pub mod store;
