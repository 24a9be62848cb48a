use std::collections::HashMap;
use std::time::Instant;

use serde::Serialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::config;
use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::{
    NewProject, Project, ProjectRequest, ProjectSubmission, Student, UpdateProjectFields, User,
};

#[derive(Debug, thiserror::Error)]
pub enum ProjectError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Database manager error: {0}")]
    Manager(#[from] DatabaseError),
    #[error("Project not found: {0}")]
    NotFound(Uuid),
}

/// Student profile joined with its user account.
#[derive(Debug, Serialize)]
pub struct StudentWithUser {
    #[serde(flatten)]
    pub student: Student,
    pub user: User,
}

/// Project request expanded with the requesting student and that
/// student's user account.
#[derive(Debug, Serialize)]
pub struct ExpandedRequest {
    #[serde(flatten)]
    pub request: ProjectRequest,
    pub student: Option<StudentWithUser>,
}

/// A project with its requests and submissions, as the show/update
/// responses return it.
#[derive(Debug, Serialize)]
pub struct ProjectWithRelations {
    #[serde(flatten)]
    pub project: Project,
    pub project_requests: Vec<ExpandedRequest>,
    pub submissions: Vec<ProjectSubmission>,
}

/// List row: project columns plus dependent-row counts.
#[derive(Debug, Serialize, FromRow)]
pub struct ProjectSummary {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub project: Project,
    pub request_count: i64,
    pub submission_count: i64,
}

const PROJECT_COLUMNS: &str =
    "id, name, description, enrollment_cap, created_by, created_at, updated_at";

pub struct ProjectService {
    pool: PgPool,
}

impl ProjectService {
    pub async fn new() -> Result<Self, ProjectError> {
        let pool = DatabaseManager::pool().await?;
        Ok(Self { pool })
    }

    /// Fetch a bare project row.
    pub async fn fetch(&self, id: Uuid) -> Result<Option<Project>, ProjectError> {
        let sql = format!("SELECT {} FROM projects WHERE id = $1", PROJECT_COLUMNS);
        let project = sqlx::query_as::<_, Project>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(project)
    }

    /// Fetch a project with its requests (each expanded with student and
    /// user) and submissions.
    pub async fn fetch_with_relations(
        &self,
        id: Uuid,
    ) -> Result<Option<ProjectWithRelations>, ProjectError> {
        let started = Instant::now();

        let Some(project) = self.fetch(id).await? else {
            return Ok(None);
        };

        let requests = sqlx::query_as::<_, ProjectRequest>(
            "SELECT id, project_id, student_id, status, message, created_at \
             FROM project_requests WHERE project_id = $1 ORDER BY created_at",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        let submissions = sqlx::query_as::<_, ProjectSubmission>(
            "SELECT id, project_id, student_id, title, content_url, submitted_at \
             FROM project_submissions WHERE project_id = $1 ORDER BY submitted_at",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        let student_ids: Vec<Uuid> = requests.iter().map(|r| r.student_id).collect();
        let students = self.students_with_users(&student_ids).await?;

        let project_requests = requests
            .into_iter()
            .map(|request| {
                let student = students.get(&request.student_id).cloned();
                ExpandedRequest {
                    student: student.map(|(student, user)| StudentWithUser { student, user }),
                    request,
                }
            })
            .collect();

        self.warn_if_slow("fetch_with_relations", started);

        Ok(Some(ProjectWithRelations {
            project,
            project_requests,
            submissions,
        }))
    }

    /// List a faculty member's own projects with dependent-row counts,
    /// newest first.
    pub async fn list_owned(&self, owner: Uuid) -> Result<Vec<ProjectSummary>, ProjectError> {
        let sql = "SELECT p.id, p.name, p.description, p.enrollment_cap, p.created_by, \
             p.created_at, p.updated_at, \
             (SELECT COUNT(*) FROM project_requests r WHERE r.project_id = p.id) AS request_count, \
             (SELECT COUNT(*) FROM project_submissions s WHERE s.project_id = p.id) AS submission_count \
             FROM projects p WHERE p.created_by = $1 ORDER BY p.created_at DESC";
        let summaries = sqlx::query_as::<_, ProjectSummary>(sql)
            .bind(owner)
            .fetch_all(&self.pool)
            .await?;
        Ok(summaries)
    }

    /// Insert a project owned by the given user.
    pub async fn create(&self, owner: Uuid, new: NewProject) -> Result<Project, ProjectError> {
        let sql = format!(
            "INSERT INTO projects (id, name, description, enrollment_cap, created_by) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {}",
            PROJECT_COLUMNS
        );
        let project = sqlx::query_as::<_, Project>(&sql)
            .bind(Uuid::new_v4())
            .bind(&new.name)
            .bind(&new.description)
            .bind(new.enrollment_cap.unwrap_or(1))
            .bind(owner)
            .fetch_one(&self.pool)
            .await?;
        Ok(project)
    }

    /// Apply a partial update: only the fields present in `fields` are
    /// written, and `updated_at` is refreshed. An empty update returns
    /// the current row unchanged.
    pub async fn update_fields(
        &self,
        id: Uuid,
        fields: &UpdateProjectFields,
    ) -> Result<Project, ProjectError> {
        if fields.is_empty() {
            return self.fetch(id).await?.ok_or(ProjectError::NotFound(id));
        }

        let sql = Self::update_sql(fields);
        let mut query = sqlx::query_as::<_, Project>(&sql);
        if let Some(name) = &fields.name {
            query = query.bind(name);
        }
        if let Some(description) = &fields.description {
            query = query.bind(description);
        }
        if let Some(cap) = fields.enrollment_cap {
            query = query.bind(cap);
        }
        query = query.bind(id);

        query
            .fetch_optional(&self.pool)
            .await?
            .ok_or(ProjectError::NotFound(id))
    }

    /// Build the UPDATE statement for the provided fields. Placeholders
    /// are numbered in field order, with the id last.
    fn update_sql(fields: &UpdateProjectFields) -> String {
        let mut set_clauses = Vec::new();
        let mut placeholder = 1;
        if fields.name.is_some() {
            set_clauses.push(format!("name = ${}", placeholder));
            placeholder += 1;
        }
        if fields.description.is_some() {
            set_clauses.push(format!("description = ${}", placeholder));
            placeholder += 1;
        }
        if fields.enrollment_cap.is_some() {
            set_clauses.push(format!("enrollment_cap = ${}", placeholder));
            placeholder += 1;
        }
        set_clauses.push("updated_at = NOW()".to_string());

        format!(
            "UPDATE projects SET {} WHERE id = ${} RETURNING {}",
            set_clauses.join(", "),
            placeholder,
            PROJECT_COLUMNS
        )
    }

    /// Delete a project and its dependent rows in one transaction.
    /// Requests and submissions go first, then the project itself; any
    /// failure rolls back the whole cascade. Deleting an id with no rows
    /// anywhere is a no-op that still succeeds.
    pub async fn delete_cascade(&self, id: Uuid) -> Result<(), ProjectError> {
        let started = Instant::now();
        let mut tx = self.pool.begin().await?;

        let requests = sqlx::query("DELETE FROM project_requests WHERE project_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let submissions = sqlx::query("DELETE FROM project_submissions WHERE project_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let projects = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        tx.commit().await?;

        tracing::debug!(
            "Deleted project {} ({} row(s)) with {} request(s) and {} submission(s)",
            id,
            projects,
            requests,
            submissions
        );
        self.warn_if_slow("delete_cascade", started);
        Ok(())
    }

    /// Batch-load students and their user accounts for the given ids.
    async fn students_with_users(
        &self,
        student_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, (Student, User)>, ProjectError> {
        if student_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let students = sqlx::query_as::<_, Student>(
            "SELECT id, user_id, major, graduation_year, created_at \
             FROM students WHERE id = ANY($1)",
        )
        .bind(student_ids)
        .fetch_all(&self.pool)
        .await?;

        let user_ids: Vec<Uuid> = students.iter().map(|s| s.user_id).collect();
        let users = sqlx::query_as::<_, User>(
            "SELECT id, email, name, role, created_at, updated_at \
             FROM users WHERE id = ANY($1)",
        )
        .bind(&user_ids)
        .fetch_all(&self.pool)
        .await?;

        let users_by_id: HashMap<Uuid, User> = users.into_iter().map(|u| (u.id, u)).collect();

        Ok(students
            .into_iter()
            .filter_map(|student| {
                let user = users_by_id.get(&student.user_id)?.clone();
                Some((student.id, (student, user)))
            })
            .collect())
    }

    fn warn_if_slow(&self, label: &str, started: Instant) {
        let db_config = &config::config().database;
        if !db_config.enable_slow_query_warning {
            return;
        }
        let elapsed_ms = started.elapsed().as_millis() as u64;
        if elapsed_ms > db_config.slow_query_threshold_ms {
            tracing::warn!("Slow query: {} took {}ms", label, elapsed_ms);
        }
    }
}
