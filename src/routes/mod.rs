//! Routes module

pub mod risk_routes;
