pub mod buyer;
pub mod enums;
pub mod favorite;
pub mod product;
pub mod product_image;
pub mod product_tag;
pub mod review;
pub mod seller;
pub mod subscription;
pub mod tag;
pub mod user;

pub use enums::{Rating, SubscriptionLevel, UserType};
