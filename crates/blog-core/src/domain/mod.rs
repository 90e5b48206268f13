//! Domain entities - the core business objects.

pub mod lifecycle;
mod post;
mod role;
mod status;
mod taxonomy;
mod user;

pub use lifecycle::{PublishedAtChange, Transition};
pub use post::{Post, PostContent, slugify};
pub use role::{Policy, Role};
pub use status::PostStatus;
pub use taxonomy::{Category, Tag};
pub use user::{NewUser, User};
