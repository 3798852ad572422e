//! Persistence adapters.
//!
//! The relational store is an external collaborator; these in-memory
//! adapters are the reference implementation of the port contracts,
//! including optimistic-concurrency detection, and back the binary and
//! the integration tests.

mod memory_request_repository;
mod memory_viewer_directory;

pub use memory_request_repository::MemoryRequestRepository;
pub use memory_viewer_directory::MemoryViewerDirectory;
