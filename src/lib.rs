//! FleetMadox API
//!
//! Backend REST para la operación de una flota de buses: personal y
//! conductores, asignaciones, odómetro, combustible, revisiones técnicas
//! y repuestos.

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

pub use routes::create_app;
pub use state::AppState;
