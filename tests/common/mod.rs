#![allow(dead_code)]

use std::process::{Child, Command, Stdio};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

static SERVER: OnceLock<TestServer> = OnceLock::new();

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    child: Child,
}

impl TestServer {
    fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        // Spawn the already-built binary to keep start fast during tests
        // Assumes debug profile; adjust if you run tests with --release
        let mut cmd = Command::new("target/debug/projecthub-api");
        cmd.env("PROJECTHUB_API_PORT", port.to_string())
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        // Inherit environment so the server sees the same DATABASE_URL as the tests
        let child = cmd.spawn().context("failed to spawn server binary")?;

        Ok(Self { port, base_url, child })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/health", self.base_url);
            match client.get(&url).send().await {
                Ok(resp) => {
                    // Consider server ready on any non-404 response
                    if resp.status() == StatusCode::OK
                        || resp.status() == StatusCode::SERVICE_UNAVAILABLE
                    {
                        return Ok(());
                    }
                }
                Err(_) => {}
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }
}

pub async fn ensure_server() -> Result<&'static TestServer> {
    let server = SERVER.get_or_init(|| TestServer::spawn().expect("failed to spawn server binary"));
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(server)
}

/// DATABASE_URL if configured; DB-backed tests skip when it is absent.
pub fn database_url() -> Option<String> {
    match std::env::var("DATABASE_URL") {
        Ok(url) if !url.is_empty() => Some(url),
        _ => {
            eprintln!("skipping: DATABASE_URL not set");
            None
        }
    }
}

const SCHEMA_SQL: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS users (
        id UUID PRIMARY KEY,
        email TEXT NOT NULL UNIQUE,
        name TEXT NOT NULL,
        role TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )",
    "CREATE TABLE IF NOT EXISTS students (
        id UUID PRIMARY KEY,
        user_id UUID NOT NULL REFERENCES users(id),
        major TEXT,
        graduation_year INT,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )",
    "CREATE TABLE IF NOT EXISTS projects (
        id UUID PRIMARY KEY,
        name TEXT NOT NULL,
        description TEXT,
        enrollment_cap INT NOT NULL DEFAULT 1,
        created_by UUID NOT NULL REFERENCES users(id),
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )",
    "CREATE TABLE IF NOT EXISTS project_requests (
        id UUID PRIMARY KEY,
        project_id UUID NOT NULL REFERENCES projects(id),
        student_id UUID NOT NULL REFERENCES students(id),
        status TEXT NOT NULL DEFAULT 'PENDING',
        message TEXT,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )",
    "CREATE TABLE IF NOT EXISTS project_submissions (
        id UUID PRIMARY KEY,
        project_id UUID NOT NULL REFERENCES projects(id),
        student_id UUID NOT NULL REFERENCES students(id),
        title TEXT NOT NULL,
        content_url TEXT,
        submitted_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )",
];

/// Connect to DATABASE_URL and make sure the tables the service expects
/// exist.
pub async fn test_pool(url: &str) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(url)
        .await
        .context("failed to connect to DATABASE_URL")?;

    // Tests run concurrently; serialize the idempotent DDL on one
    // connection behind an advisory lock
    let mut conn = pool.acquire().await?;
    sqlx::query("SELECT pg_advisory_lock(727274)").execute(&mut *conn).await?;
    for ddl in SCHEMA_SQL {
        sqlx::query(ddl).execute(&mut *conn).await?;
    }
    sqlx::query("SELECT pg_advisory_unlock(727274)").execute(&mut *conn).await?;
    drop(conn);

    Ok(pool)
}

/// Insert a user with the given role; unique email per call.
pub async fn seed_user(pool: &PgPool, role: &str) -> Result<Uuid> {
    let id = Uuid::new_v4();
    sqlx::query("INSERT INTO users (id, email, name, role) VALUES ($1, $2, $3, $4)")
        .bind(id)
        .bind(format!("{}@test.example.edu", id))
        .bind(format!("Test {}", &id.to_string()[..8]))
        .bind(role)
        .execute(pool)
        .await?;
    Ok(id)
}

pub async fn seed_faculty(pool: &PgPool) -> Result<Uuid> {
    seed_user(pool, "FACULTY").await
}

/// Insert a STUDENT user plus its students row; returns the student id.
pub async fn seed_student(pool: &PgPool) -> Result<Uuid> {
    let user_id = seed_user(pool, "STUDENT").await?;
    let student_id = Uuid::new_v4();
    sqlx::query(
        "INSERT INTO students (id, user_id, major, graduation_year) VALUES ($1, $2, $3, $4)",
    )
    .bind(student_id)
    .bind(user_id)
    .bind("Computer Science")
    .bind(2027)
    .execute(pool)
    .await?;
    Ok(student_id)
}

/// The user id behind a students row.
pub async fn student_user_id(pool: &PgPool, student_id: Uuid) -> Result<Uuid> {
    let (user_id,): (Uuid,) = sqlx::query_as("SELECT user_id FROM students WHERE id = $1")
        .bind(student_id)
        .fetch_one(pool)
        .await?;
    Ok(user_id)
}

pub async fn seed_project(pool: &PgPool, owner: Uuid, name: &str) -> Result<Uuid> {
    let id = Uuid::new_v4();
    sqlx::query(
        "INSERT INTO projects (id, name, description, enrollment_cap, created_by) \
         VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(id)
    .bind(name)
    .bind("seeded project")
    .bind(4)
    .bind(owner)
    .execute(pool)
    .await?;
    Ok(id)
}

pub async fn seed_request(pool: &PgPool, project_id: Uuid, student_id: Uuid) -> Result<Uuid> {
    let id = Uuid::new_v4();
    sqlx::query(
        "INSERT INTO project_requests (id, project_id, student_id, status, message) \
         VALUES ($1, $2, $3, 'PENDING', 'please let me in')",
    )
    .bind(id)
    .bind(project_id)
    .bind(student_id)
    .execute(pool)
    .await?;
    Ok(id)
}

pub async fn seed_submission(pool: &PgPool, project_id: Uuid, student_id: Uuid) -> Result<Uuid> {
    let id = Uuid::new_v4();
    sqlx::query(
        "INSERT INTO project_submissions (id, project_id, student_id, title, content_url) \
         VALUES ($1, $2, $3, 'Midterm report', 'https://example.edu/report.pdf')",
    )
    .bind(id)
    .bind(project_id)
    .bind(student_id)
    .execute(pool)
    .await?;
    Ok(id)
}

pub async fn count_rows(pool: &PgPool, table: &str, id_column: &str, id: Uuid) -> Result<i64> {
    let sql = format!("SELECT COUNT(*) FROM {} WHERE {} = $1", table, id_column);
    let (count,): (i64,) = sqlx::query_as(&sql).bind(id).fetch_one(pool).await?;
    Ok(count)
}
