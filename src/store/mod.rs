// src/store/mod.rs
pub mod fixtures;
pub mod memory;
pub mod traits;

pub use fixtures::{load_fixtures, FixtureError};
pub use memory::MemoryConditionStore;
pub use traits::{ConditionStore, KeyScheme, PartyKind};
