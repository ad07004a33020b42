//! The run pipeline: resolve, aggregate, download, tag.

mod aggregator;
mod executor;
mod job;
mod orchestrator;
mod resolver;
mod tagger;

pub use orchestrator::Pipeline;
pub use tagger::ShelfTagger;
