//! Controllers module

pub mod risk_controller;
