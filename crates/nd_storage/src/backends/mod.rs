pub mod github;
pub mod memory;

pub use github::GithubStore;
pub use memory::MemoryStore;
