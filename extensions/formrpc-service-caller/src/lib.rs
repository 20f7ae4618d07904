mod caller_interface;
pub use caller_interface::*;

mod error;
pub use error::*;
