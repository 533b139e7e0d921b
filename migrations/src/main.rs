use sea_orm_migration::prelude::*;
use std::env;

use migration::Migrator;

#[tokio::main]
async fn main() -> Result<(), DbErr> {
    dotenv::dotenv().ok();

    let Ok(db_url) = env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL must be set");
        std::process::exit(1);
    };

    let args: Vec<String> = env::args().collect();
    let command = args.get(1).map(|s| s.as_str()).unwrap_or("up");

    let db = sea_orm::Database::connect(&db_url).await?;

    match command {
        "up" => {
            Migrator::up(&db, None).await?;
            println!("✓ Migrations applied (users, tasks)");
        }
        "down" => {
            Migrator::down(&db, Some(1)).await?;
            println!("✓ Rolled back the latest migration");
        }
        "fresh" => {
            Migrator::fresh(&db).await?;
            println!("✓ Dropped all tables and re-applied migrations");
        }
        "status" => {
            Migrator::status(&db).await?;
        }
        _ => {
            eprintln!("Unknown command: {}. Use: up, down, fresh, or status", command);
            std::process::exit(1);
        }
    }

    db.close().await
}
