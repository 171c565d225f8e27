use colored::*;
use sea_orm_migration::prelude::*;
use std::io::{self, Write};
use std::time::Instant;

const STATUS_COLUMN: usize = 72;

pub async fn run_all_migrations(url: &str) {
    let db = sea_orm::Database::connect(url)
        .await
        .expect("DB connection failed");

    println!("Running migrations...");
    let schema_manager = SchemaManager::new(&db);

    for migration in <migration::Migrator as MigratorTrait>::migrations() {
        let label = format!("Applying {}", migration.name().bold());
        let dots = ".".repeat(STATUS_COLUMN.saturating_sub(label.len()));
        print!("{label}{dots} ");
        io::stdout().flush().ok();

        let start = Instant::now();
        match migration.up(&schema_manager).await {
            Ok(()) => {
                let elapsed = format!("({:.2?})", start.elapsed()).dimmed();
                println!("{} {elapsed}", "done".green());
            }
            Err(err) => {
                println!("{}", "failed".red());
                eprintln!("{err}");
                std::process::exit(1);
            }
        }
    }
}
