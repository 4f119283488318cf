pub mod commit;
pub mod error;
pub mod hash;
pub mod index;
pub mod repository;
pub mod store;
pub mod tree;

pub mod utils;
pub use utils::*;

pub use error::{Error, Result};
