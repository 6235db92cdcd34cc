pub mod atomic_writer;
pub mod memory_store;
pub mod vault_store;

pub use atomic_writer::AtomicWriter;
pub use memory_store::{MemoryVault, RecordedWrite};
pub use vault_store::VaultStore;
