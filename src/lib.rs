// src/lib.rs

pub mod cache;
pub mod config;
pub mod emotion;
pub mod engine;
pub mod recommend;
pub mod reply;
pub mod store;
pub mod temporal;
pub mod weather;
