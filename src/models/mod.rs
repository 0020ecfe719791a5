//! Modelos del sistema
//!
//! Este módulo contiene todos los modelos de datos que mapean
//! al schema PostgreSQL (ver `migrations/`).

pub mod dashboard;
pub mod driver;
pub mod place;
pub mod trip;

pub use dashboard::*;
pub use driver::*;
pub use place::*;
pub use trip::*;
