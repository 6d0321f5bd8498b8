//! Crear las cuentas iniciales (admin, contador y conductor).
//! Las cuentas cuyo email ya existe se dejan intactas.

use anyhow::Result;
use dotenvy::dotenv;
use tracing::info;
use tracing_subscriber::EnvFilter;

use fleetmadox_api::database::DatabaseConnection;
use fleetmadox_api::models::user::Role;
use fleetmadox_api::repositories::user_repository::{NewUser, UserRepository};
use fleetmadox_api::utils::password::hash_password;

struct SeedAccount {
    name: &'static str,
    email: &'static str,
    password: &'static str,
    role: Role,
    employee_number: &'static str,
}

const ACCOUNTS: &[SeedAccount] = &[
    SeedAccount {
        name: "System Admin",
        email: "admin@fleetmadox.com",
        password: "Admin@123",
        role: Role::Admin,
        employee_number: "EMP-ADM-001",
    },
    SeedAccount {
        name: "Fleet Accountant",
        email: "acc@fleetmadox.com",
        password: "Acc@123",
        role: Role::Accountant,
        employee_number: "EMP-ACC-001",
    },
    SeedAccount {
        name: "Default Driver",
        email: "driver@fleetmadox.com",
        password: "Drv@123",
        role: Role::Driver,
        employee_number: "EMP-DRV-001",
    },
];

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let db_connection = DatabaseConnection::new_default().await?;
    db_connection.run_migrations().await?;
    let users = UserRepository::new(db_connection.pool().clone());

    for account in ACCOUNTS {
        if users.find_by_email(account.email).await?.is_some() {
            info!("⏭️ {} ya existe, se omite", account.email);
            continue;
        }

        users
            .create(NewUser {
                name: account.name.to_string(),
                address: None,
                mobile: None,
                role: account.role,
                nic: None,
                employee_number: Some(account.employee_number.to_string()),
                email: account.email.to_string(),
                password_hash: hash_password(account.password)?,
                is_active: true,
            })
            .await?;
        info!("🌱 Cuenta {} creada ({})", account.email, account.role.as_str());
    }

    info!("✅ Seed completado");
    Ok(())
}
