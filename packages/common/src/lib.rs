pub mod error;
pub mod result;
pub mod storage;
pub mod visitor;

pub use error::*;
pub use result::*;
pub use storage::*;
pub use visitor::*;
