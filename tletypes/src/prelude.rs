pub use crate::observer::*;
pub use crate::position::*;
pub use crate::time::*;
pub use crate::tle::*;
