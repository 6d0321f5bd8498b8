//! Numeración de empleados (`EMP-DRV-001`, `EMP-ACC-002`, ...)

use crate::models::user::Role;

pub fn employee_prefix(role: Role) -> &'static str {
    match role {
        Role::Driver => "EMP-DRV-",
        Role::Admin => "EMP-ADM-",
        Role::Accountant => "EMP-ACC-",
    }
}

/// Siguiente número a partir del último emitido para el rol.
/// Un sufijo ilegible se trata como si no hubiera números previos.
pub fn next_employee_number(role: Role, last: Option<&str>) -> String {
    let prefix = employee_prefix(role);
    let last_seq = last
        .and_then(|value| value.rsplit('-').next())
        .and_then(|suffix| suffix.trim().parse::<u32>().ok())
        .unwrap_or(0);

    format!("{}{:03}", prefix, last_seq + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_number_per_role() {
        assert_eq!(next_employee_number(Role::Driver, None), "EMP-DRV-001");
        assert_eq!(next_employee_number(Role::Accountant, None), "EMP-ACC-001");
        assert_eq!(next_employee_number(Role::Admin, None), "EMP-ADM-001");
    }

    #[test]
    fn test_increments_last_number() {
        assert_eq!(next_employee_number(Role::Driver, Some("EMP-DRV-009")), "EMP-DRV-010");
        assert_eq!(next_employee_number(Role::Accountant, Some("EMP-ACC-123")), "EMP-ACC-124");
        assert_eq!(next_employee_number(Role::Driver, Some("EMP-DRV-999")), "EMP-DRV-1000");
    }

    #[test]
    fn test_unreadable_suffix_restarts_sequence() {
        assert_eq!(next_employee_number(Role::Driver, Some("legacy")), "EMP-DRV-001");
    }
}
