//! Storage adapters implementing the domain's driven ports.

mod memory;

pub use memory::MemoryQuestionRepository;
