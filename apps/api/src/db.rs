use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

/// Creates and returns a PostgreSQL connection pool.
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<PgPool> {
    info!("Connecting to PostgreSQL...");

    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
        .context("Failed to connect to PostgreSQL")?;

    info!("PostgreSQL connection pool established");
    Ok(pool)
}

/// Applies the embedded schema migrations.
pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .context("Failed to apply database migrations")?;
    info!("Database migrations applied");
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::models::interview::{InterviewDuration, InterviewType};

    const INIT: &str = include_str!("../migrations/20240101000000_init.sql");
    const INTERVIEW_TYPE_CHECK: &str =
        include_str!("../migrations/20240102000000_interview_type_check.sql");

    #[test]
    fn test_interview_type_constraint_lists_every_type() {
        for kind in [
            InterviewType::Technical,
            InterviewType::Behavioral,
            InterviewType::SystemDesign,
            InterviewType::Hr,
        ] {
            assert!(
                INTERVIEW_TYPE_CHECK.contains(&format!("'{}'", kind.as_str())),
                "missing {kind} in interview_type constraint"
            );
        }
        assert!(INTERVIEW_TYPE_CHECK.contains("CHECK (interview_type IN"));
    }

    #[test]
    fn test_duration_constraint_lists_every_duration() {
        let line = INIT
            .lines()
            .find(|line| line.contains("duration_minutes") && line.contains("CHECK"))
            .unwrap();
        for duration in [
            InterviewDuration::Minutes30,
            InterviewDuration::Minutes45,
            InterviewDuration::Minutes60,
            InterviewDuration::Minutes90,
        ] {
            assert!(line.contains(&duration.minutes().to_string()));
        }
    }
}
