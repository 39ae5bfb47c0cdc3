pub mod arena;
pub mod config;
pub mod controller;
pub mod error;
pub mod history;
pub mod models;
pub mod strategy;
