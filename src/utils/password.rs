//! Hash de contraseñas con bcrypt

use bcrypt::{hash, verify};

use crate::utils::errors::AppError;

/// Costo de bcrypt usado para todas las contraseñas
pub const BCRYPT_COST: u32 = 10;

pub fn hash_password(plain: &str) -> Result<String, AppError> {
    hash(plain, BCRYPT_COST).map_err(|e| AppError::Hash(e.to_string()))
}

pub fn verify_password(plain: &str, hashed: &str) -> Result<bool, AppError> {
    verify(plain, hashed).map_err(|e| AppError::Hash(e.to_string()))
}

/// Detectar valores que ya son un hash bcrypt (`$2a$`, `$2b$`, `$2y$`)
pub fn is_bcrypt_hash(value: &str) -> bool {
    value.len() == 60
        && (value.starts_with("$2b$") || value.starts_with("$2a$") || value.starts_with("$2y$"))
}

/// Hashear salvo que el valor ya venga hasheado
pub fn ensure_hashed(value: &str) -> Result<String, AppError> {
    if is_bcrypt_hash(value) {
        Ok(value.to_string())
    } else {
        hash_password(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hashed = hash_password("Drv@123").unwrap();
        assert!(is_bcrypt_hash(&hashed));
        assert!(verify_password("Drv@123", &hashed).unwrap());
        assert!(!verify_password("wrong", &hashed).unwrap());
    }

    #[test]
    fn test_ensure_hashed_keeps_existing_hash() {
        let hashed = hash_password("Acc@123").unwrap();
        assert_eq!(ensure_hashed(&hashed).unwrap(), hashed);
        assert_ne!(ensure_hashed("Acc@123").unwrap(), "Acc@123");
    }
}
