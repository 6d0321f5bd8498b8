//! Configuración de conexión a PostgreSQL
//!
//! Este módulo maneja el pool de conexiones y la aplicación de migraciones.

use anyhow::Result;
use sqlx::PgPool;
use tracing::info;

use crate::config::database::{mask_database_url, DatabaseConfig};

/// Conexión compartida a la base de datos
pub struct DatabaseConnection {
    pool: PgPool,
}

impl DatabaseConnection {
    /// Crear el pool con la configuración indicada
    pub async fn new(config: &DatabaseConfig) -> Result<Self> {
        info!("🗄️ Conectando a {}", mask_database_url(&config.url));
        let pool = config.create_pool().await?;
        info!("✅ Base de datos conectada");
        Ok(Self { pool })
    }

    /// Crear el pool leyendo la configuración del entorno
    pub async fn new_default() -> Result<Self> {
        let config = DatabaseConfig::from_env()?;
        Self::new(&config).await
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Aplicar las migraciones pendientes de `migrations/`
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        info!("✅ Migraciones aplicadas");
        Ok(())
    }
}
