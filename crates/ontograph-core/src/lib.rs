//! Ontograph Core — relation parsing, entity resolution, graph building and layout

pub mod config;
pub mod embedding;
pub mod error;
pub mod graph;
pub mod layout;
pub mod model;
pub mod parser;
pub mod partition;
pub mod pipeline;
pub mod planarity;
pub mod render;
pub mod resolver;
pub mod segment;

#[cfg(test)]
mod tests;

pub use config::{ComponentPolicy, KamadaKawaiConfig, LayoutConfig, PipelineConfig};
pub use error::{PipelineError, PipelineResult};
pub use graph::{build_graph, EdgeRecord, KnowledgeEdge, KnowledgeGraph, KnowledgeNode};
pub use layout::{layout_graph, layout_with, Layout, LayoutAlgorithm, NodePosition};
pub use model::{MergeMap, Point, Resolution, Segment, Triple, UpdatedEdge, DEFAULT_EDGE_COLOR};
pub use parser::{parse_line, parse_lines};
pub use partition::{connected_components, partition, ComponentView, Partition};
pub use pipeline::{process_bytes, process_file, process_lines, process_segment, ComponentScene, SegmentReport, SegmentView};
pub use planarity::{is_planar, planar_embedding};
pub use render::{scene, Scene};
pub use resolver::resolve;
pub use segment::{split_segments, split_segments_bytes, RawSegment};
