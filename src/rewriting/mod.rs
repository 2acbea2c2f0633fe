//*** START FILE: src/rewriting/mod.rs ***//
pub mod chunker;
pub mod dictionary;
pub mod entity;
pub mod length;
pub mod lexical;
pub mod noise;
pub mod pipeline;
pub mod preprocessor;

// Re-export the pieces the orchestrator and the binary put together
pub use chunker::{chunk_text, join_chunks, join_outputs};
pub use dictionary::SubstitutionTable;
pub use entity::EntityRewriter;
pub use length::{LengthReconciler, ReconcileAction, Reconciled};
pub use lexical::LexicalRewriter;
pub use noise::{NoiseInjector, RandomSource};
pub use pipeline::{apply_casing, PostprocessPipeline};
pub use preprocessor::{remove_equations_and_graphs, remove_subheadings};
//*** END FILE: src/rewriting/mod.rs ***//
