//! Utilidades del sistema
//!
//! Este módulo contiene utilidades para manejo de errores, validación,
//! JWT, contraseñas, conversión numérica y otras funcionalidades comunes.

pub mod errors;
pub mod jwt;
pub mod numeric;
pub mod password;
pub mod validation;
