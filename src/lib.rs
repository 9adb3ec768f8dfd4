// src/lib.rs

//! booktrack: reading tracker over a Notion book database

pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod utils;
