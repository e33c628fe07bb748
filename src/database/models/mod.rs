pub mod project;
pub mod task;

pub use project::{Project, ProjectStatus};
pub use task::{Task, TaskStatus};
