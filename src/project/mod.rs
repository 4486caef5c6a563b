/// Project management layer
///
/// Persistence for automation projects: the flow JSON blob, the seeding
/// prompt, and lifecycle status, stored in SQLite behind CRUD operations
/// keyed by opaque project ids.

pub mod storage;
pub mod types;

pub use storage::ProjectStorage;
pub use types::{CreateProject, Project, ProjectStatus, UpdateProject};
