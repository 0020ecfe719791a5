//! Gestión de viajes
//!
//! Planificación de viajes con rutas ordenadas de lugares, seguimiento de
//! visitas por punto de ruta y panel de resumen para administración.

pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;
