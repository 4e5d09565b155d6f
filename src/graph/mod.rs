mod build;
mod document;
mod store;

pub use build::build_knowledge_graph;
pub use document::{GraphLink, GraphNode, KnowledgeGraph, load_document, write_document};
pub use store::{ArticleRecord, EmbeddingStore, Neighbor, NeighborSource};
