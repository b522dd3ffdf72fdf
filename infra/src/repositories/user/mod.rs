//! User store implementations

mod in_memory;


pub use in_memory::{InMemoryUserStore, DEMO_PASSWORD};
