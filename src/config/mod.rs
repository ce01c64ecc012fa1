//! Configuration module

pub mod environment;
