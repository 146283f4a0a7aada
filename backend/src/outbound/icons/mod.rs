//! Icon blob store adapters.

mod fs;
mod memory;

pub use fs::FsIconStore;
pub use memory::InMemoryIconStore;
