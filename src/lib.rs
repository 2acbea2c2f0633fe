//*** START FILE: src/lib.rs ***//

// Declare all modules that are part of this library
pub mod config;
pub mod error;
pub mod types {
    pub mod text_data;
}
pub mod parsing;
pub mod rewriting;
pub mod annotation;
pub mod generation;
pub mod similarity;
pub mod humanizer;

// Re-export the items the binary and integration tests reach for
pub use config::Config;
pub use error::HumanizeError;
pub use humanizer::Humanizer;
pub use types::text_data::HumanizedResult;

//*** END FILE: src/lib.rs ***//
