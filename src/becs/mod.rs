pub mod client;
pub mod sync;
pub mod types;

pub use sync::run_sync;
