pub mod create;
pub mod delete;
pub mod list;
pub mod show;
pub mod update;

// Re-export handler functions for use in routing
pub use create::create as project_create;
pub use delete::delete as project_delete;
pub use list::list as project_list;
pub use show::show as project_show;
pub use update::update as project_update;
