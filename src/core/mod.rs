pub mod draw;
pub mod pool;
pub mod results;

pub use crate::domain::model::{DrawRequest, DrawResponse, DrawResults};
pub use crate::domain::ports::{ConfigProvider, Storage};
pub use crate::utils::error::Result;
