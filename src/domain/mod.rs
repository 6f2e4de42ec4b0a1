//! Domain layer - Business types and abstractions
//!
//! Payload types, validation and repository traits. Storage and HTTP
//! concerns stay in the infrastructure and api layers.

pub mod errors;
pub mod favorite;
pub mod product;
pub mod repositories;
pub mod review;
pub mod subscription;
pub mod tag;
pub mod user;
pub mod validation;

pub use errors::{DomainError, ErrorKind};
pub use favorite::*;
pub use product::*;
pub use repositories::*;
pub use review::*;
pub use subscription::*;
pub use tag::*;
pub use user::*;
