mod bulbs;
mod error;


pub use bulbs::BulbService;
pub use error::{ServiceError, ServiceResult};
