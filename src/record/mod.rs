pub mod catalog;
pub mod synthesizer;
pub mod types;

pub use catalog::{Application, Catalog, SeverityProfile};
pub use synthesizer::Synthesizer;
pub use types::*;
