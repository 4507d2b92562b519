mod file;
mod traits;

pub use file::*;
pub use traits::*;
