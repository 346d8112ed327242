mod tracing;

pub use tracing::{init, try_init};
