//! DTOs de la API

pub mod risk_dto;

pub use risk_dto::*;
