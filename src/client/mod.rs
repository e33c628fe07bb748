//! Client-side plumbing: session token access, HTTP calls, and the
//! view-state synchronization that keeps list views consistent after
//! create/update/delete actions.

pub mod api;
pub mod session;
pub mod view;

pub use api::{ApiClient, ClientError, ProjectApi, ProjectDraft, TaskApi, TaskEdit};
pub use session::{EnvSession, SessionSource, StaticSession};
pub use view::{LoadState, ProjectList, StatusCounts, SyncOutcome, TaskBoard};
