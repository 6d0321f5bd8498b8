//! Acceso a la tabla `users`

use chrono::Utc;
use sqlx::PgPool;

use crate::models::user::{Role, User};
use crate::utils::errors::AppError;

const USER_COLUMNS: &str = "id, name, address, mobile, role, nic, employee_number, email, password, is_active, created_at, update_at";

/// Datos para insertar un usuario; la contraseña ya viene hasheada
#[derive(Debug)]
pub struct NewUser {
    pub name: String,
    pub address: Option<String>,
    pub mobile: Option<String>,
    pub role: Role,
    pub nic: Option<String>,
    pub employee_number: Option<String>,
    pub email: String,
    pub password_hash: String,
    pub is_active: bool,
}

/// Cambios parciales; `None` conserva el valor actual
#[derive(Debug, Default)]
pub struct UserChanges {
    pub name: Option<String>,
    pub address: Option<String>,
    pub mobile: Option<String>,
    pub role: Option<Role>,
    pub nic: Option<String>,
    pub employee_number: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub is_active: Option<bool>,
}

pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        log::debug!("🔍 Buscando usuario por email");
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE LOWER(email) = LOWER($1)",
            USER_COLUMNS
        ))
        .bind(email.trim())
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE id = $1",
            USER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn list(&self) -> Result<Vec<User>, AppError> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users ORDER BY id",
            USER_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    /// Conductores y contadores, los más recientes primero
    pub async fn list_staff(&self) -> Result<Vec<User>, AppError> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE role IN ('driver', 'accountant') ORDER BY id DESC",
            USER_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    pub async fn create(&self, user: NewUser) -> Result<User, AppError> {
        let now = Utc::now();
        let created = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (name, address, mobile, role, nic, employee_number, email, password, is_active, created_at, update_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $10)
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(user.name)
        .bind(user.address)
        .bind(user.mobile)
        .bind(user.role)
        .bind(user.nic)
        .bind(user.employee_number)
        .bind(user.email)
        .bind(user.password_hash)
        .bind(user.is_active)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        log::info!("👤 Usuario {} creado con rol {}", created.id, created.role);
        Ok(created)
    }

    pub async fn update(&self, id: i32, changes: UserChanges) -> Result<Option<User>, AppError> {
        let updated = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users SET
                name = COALESCE($2, name),
                address = COALESCE($3, address),
                mobile = COALESCE($4, mobile),
                role = COALESCE($5, role),
                nic = COALESCE($6, nic),
                employee_number = COALESCE($7, employee_number),
                email = COALESCE($8, email),
                password = COALESCE($9, password),
                is_active = COALESCE($10, is_active),
                update_at = $11
            WHERE id = $1
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(id)
        .bind(changes.name)
        .bind(changes.address)
        .bind(changes.mobile)
        .bind(changes.role)
        .bind(changes.nic)
        .bind(changes.employee_number)
        .bind(changes.email)
        .bind(changes.password_hash)
        .bind(changes.is_active)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        Ok(updated)
    }

    /// Reemplazo de los datos del personal; la contraseña solo cambia si llega una nueva
    #[allow(clippy::too_many_arguments)]
    pub async fn update_staff(
        &self,
        id: i32,
        name: String,
        address: Option<String>,
        mobile: Option<String>,
        nic: Option<String>,
        email: String,
        password_hash: Option<String>,
        is_active: bool,
    ) -> Result<Option<User>, AppError> {
        let updated = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users SET
                name = $2,
                address = $3,
                mobile = $4,
                nic = $5,
                email = $6,
                password = COALESCE($7, password),
                is_active = $8,
                update_at = $9
            WHERE id = $1
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(id)
        .bind(name)
        .bind(address)
        .bind(mobile)
        .bind(nic)
        .bind(email)
        .bind(password_hash)
        .bind(is_active)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        Ok(updated)
    }

    /// Último número de empleado emitido con el prefijo dado
    pub async fn last_employee_number(&self, prefix: &str) -> Result<Option<String>, AppError> {
        let last: Option<(String,)> = sqlx::query_as(
            r#"
            SELECT employee_number FROM users
            WHERE employee_number LIKE $1
            ORDER BY LENGTH(employee_number) DESC, employee_number DESC
            LIMIT 1
            "#,
        )
        .bind(format!("{}%", prefix))
        .fetch_optional(&self.pool)
        .await?;

        Ok(last.map(|(number,)| number))
    }

    /// Devuelve `true` si existía la fila
    pub async fn delete(&self, id: i32) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
