pub mod project;
pub mod project_request;
pub mod project_submission;
pub mod student;
pub mod user;

pub use project::{NewProject, Project, UpdateProjectFields};
pub use project_request::ProjectRequest;
pub use project_submission::ProjectSubmission;
pub use student::Student;
pub use user::User;
