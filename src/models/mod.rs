//! Models module
//!
//! Structs que mapean a las tablas PostgreSQL del sistema de monitoreo
//! de cadena de frío (vehículos, viajes, telemetría y snapshots de riesgo).

pub mod risk;
pub mod telemetry;
pub mod trip;
pub mod vehicle;

pub use risk::*;
pub use telemetry::*;
pub use trip::*;
pub use vehicle::*;
