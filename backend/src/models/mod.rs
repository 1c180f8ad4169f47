//! Domain types shared by the repository layer, the conflict engine and the
//! HTTP surface.

pub mod fleet;
pub mod macros;
pub mod schedule;
pub mod time;

pub use fleet::*;
pub use schedule::*;
pub use time::*;
