//! Modelo de usuario
//!
//! Usuarios del sistema con su rol (administrador, contador o conductor).

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Rol de un usuario, mapea el enum `user_role` de PostgreSQL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Accountant,
    Driver,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Accountant => "accountant",
            Role::Driver => "driver",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    /// Acepta mayúsculas y espacios alrededor (`" Driver "` -> `Driver`)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "accountant" => Ok(Role::Accountant),
            "driver" => Ok(Role::Driver),
            other => Err(format!("Unknown role '{}'", other)),
        }
    }
}

/// Fila completa de la tabla `users`, incluye el hash de la contraseña
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub address: Option<String>,
    pub mobile: Option<String>,
    pub role: Role,
    pub nic: Option<String>,
    pub employee_number: Option<String>,
    pub email: String,
    pub password: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub update_at: DateTime<Utc>,
}

/// Usuario sin credenciales, lo que devuelve la API
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: i32,
    pub name: String,
    pub address: Option<String>,
    pub mobile: Option<String>,
    pub role: Role,
    pub nic: Option<String>,
    pub employee_number: Option<String>,
    pub email: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub update_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            address: user.address,
            mobile: user.mobile,
            role: user.role,
            nic: user.nic,
            employee_number: user.employee_number,
            email: user.email,
            is_active: user.is_active,
            created_at: user.created_at,
            update_at: user.update_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_from_str_is_case_insensitive() {
        assert_eq!("Driver".parse::<Role>(), Ok(Role::Driver));
        assert_eq!(" ADMIN ".parse::<Role>(), Ok(Role::Admin));
        assert_eq!("accountant".parse::<Role>(), Ok(Role::Accountant));
        assert!("mechanic".parse::<Role>().is_err());
    }

    #[test]
    fn test_role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Accountant).unwrap(), "\"accountant\"");
    }
}
