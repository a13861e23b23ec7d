mod elements;
mod sync;

pub use elements::*;
pub use sync::*;
