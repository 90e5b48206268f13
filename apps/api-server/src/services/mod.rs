//! Application services. Handlers stay thin and delegate here; every
//! operation that needs a caller takes the [`Identity`](crate::middleware::auth::Identity)
//! explicitly.

mod posts;
mod users;

pub use posts::{PostService, PostView};
pub use users::{LoginOutcome, UserService};
