pub mod registry;
pub mod traits;

// Suggestion provider implementations
pub mod keyword;
pub mod llm;
