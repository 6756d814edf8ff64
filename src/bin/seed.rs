//! Seed script for development — populates a fresh database with sample data.
//!
//! Usage: `cargo run --bin seed`
//!
//! Requires `DATABASE_URL` (reads .env).

use chrono::{Days, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use pesagem::models::user::{CreateUser, WorkType};
use pesagem::models::weight_record::CreateWeightRecord;
use pesagem::services::{user as user_service, weight as weight_service};

const ADMIN_CPF: &str = "12345678901";
const ADMIN_PASSWORD: &str = "Admin123!";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let db_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&db_url)
        .await?;

    // Run migrations first
    sqlx::migrate!("./migrations").run(&pool).await?;

    println!("=== pesagem Seed Script ===");

    let admin_id = seed_admin(&pool).await?;
    let worker_ids = seed_workers(&pool).await?;
    seed_records(&pool, admin_id, &worker_ids).await?;

    println!("\n=== Seed complete! ===");
    println!("Admin login: {ADMIN_CPF} / {ADMIN_PASSWORD}");

    Ok(())
}

async fn seed_admin(pool: &PgPool) -> anyhow::Result<i64> {
    if let Some(existing) = user_service::find_by_cpf(pool, ADMIN_CPF).await? {
        println!("[skip] Admin already exists (id {})", existing.id);
        return Ok(existing.id);
    }

    let admin = user_service::create(
        pool,
        &CreateUser {
            cpf: ADMIN_CPF.to_string(),
            password: ADMIN_PASSWORD.to_string(),
            first_name: "Ana".to_string(),
            last_name: "Gerente".to_string(),
            is_admin: true,
            work_type: None,
        },
    )
    .await?;

    println!("[done] Created admin user (id {})", admin.id);
    Ok(admin.id)
}

async fn seed_workers(pool: &PgPool) -> anyhow::Result<Vec<i64>> {
    let workers = [
        ("98765432100", "Maria", "Silva", WorkType::Filetagem),
        ("45678912300", "Joao", "Santos", WorkType::Descascamento),
    ];

    let mut ids = Vec::new();
    for (cpf, first_name, last_name, work_type) in workers {
        if let Some(existing) = user_service::find_by_cpf(pool, cpf).await? {
            println!("[skip] Worker {first_name} already exists (id {})", existing.id);
            ids.push(existing.id);
            continue;
        }

        let worker = user_service::create(
            pool,
            &CreateUser {
                cpf: cpf.to_string(),
                password: "trabalho123".to_string(),
                first_name: first_name.to_string(),
                last_name: last_name.to_string(),
                is_admin: false,
                work_type: Some(work_type),
            },
        )
        .await?;
        println!("[done] Created worker {first_name} (id {})", worker.id);
        ids.push(worker.id);
    }

    Ok(ids)
}

async fn seed_records(pool: &PgPool, admin_id: i64, worker_ids: &[i64]) -> anyhow::Result<()> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM weight_records")
        .fetch_one(pool)
        .await?;

    if count > 0 {
        println!("[skip] Weight records already exist ({count})");
        return Ok(());
    }

    let today = Utc::now().date_naive();
    let mut created = 0usize;

    for (w, &worker_id) in worker_ids.iter().enumerate() {
        for day_offset in 0..5u64 {
            let date = today
                .checked_sub_days(Days::new(day_offset))
                .unwrap_or(today);

            // Two entries per day with small deterministic variation.
            for entry in 0..2i64 {
                let weight = Decimal::new(850 + (w as i64) * 125 + day_offset as i64 * 40 + entry * 15, 2);
                weight_service::create(
                    pool,
                    &CreateWeightRecord {
                        user_id: worker_id,
                        weight,
                        date,
                        notes: (entry == 0).then(|| "turno da manha".to_string()),
                    },
                    admin_id,
                )
                .await?;
                created += 1;
            }
        }
    }

    println!("[done] Created {created} weight records across 5 days");
    Ok(())
}
