//! Segment → triples → resolution → graph → partition

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::PipelineConfig;
use crate::error::{PipelineError, PipelineResult};
use crate::graph::{build_graph, EdgeRecord, KnowledgeGraph};
use crate::model::{Resolution, Segment};
use crate::parser::parse_lines;
use crate::partition::{partition, Partition};
use crate::render::{scene, Scene};
use crate::resolver::resolve;
use crate::segment::{split_segments, split_segments_bytes};

/// Everything computed for one segment.
#[derive(Debug)]
pub struct SegmentReport {
    pub index: usize,
    /// "Part i/N" when the stream has more than one segment.
    pub title: Option<String>,
    /// Number of well-formed triples parsed from the segment.
    pub triples: usize,
    pub resolution: Resolution,
    pub graph: KnowledgeGraph,
    pub partition: Partition,
}

/// Drawable geometry for one connected component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentScene {
    pub nodes: Vec<String>,
    pub scene: Scene,
}

/// Serialisable summary of a [`SegmentReport`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentView {
    pub index: usize,
    pub title: Option<String>,
    pub triples: usize,
    pub canonical_nodes: Vec<String>,
    pub nodes: Vec<String>,
    pub edges: Vec<EdgeRecord>,
    pub planar: bool,
    pub scene: Scene,
    pub components: Vec<ComponentScene>,
}

impl SegmentReport {
    pub fn view(&self) -> SegmentView {
        let components = self
            .partition
            .components()
            .iter()
            .map(|c| ComponentScene {
                nodes: c.nodes.clone(),
                scene: scene(&c.graph, &c.layout),
            })
            .collect();

        SegmentView {
            index: self.index,
            title: self.title.clone(),
            triples: self.triples,
            canonical_nodes: self.resolution.canonical_nodes.iter().cloned().collect(),
            nodes: self.graph.nodes().into_iter().map(str::to_string).collect(),
            edges: self.graph.edges(),
            planar: self.partition.is_planar(),
            scene: scene(&self.graph, self.partition.full_layout()),
            components,
        }
    }
}

/// Run one decoded segment through parsing, resolution, graph building and
/// partitioning.
pub fn process_segment(segment: &Segment, config: &PipelineConfig) -> SegmentReport {
    let span = tracing::info_span!("segment", index = segment.index, total = segment.total);
    let _guard = span.enter();

    let triples = parse_lines(&segment.lines);
    let resolution = resolve(&triples);
    let graph = build_graph(&resolution);
    let partition = partition(&graph, &config.layout);

    tracing::info!(
        triples = triples.len(),
        merged = resolution.merge_map.len(),
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        planar = partition.is_planar(),
        "Processed segment"
    );

    SegmentReport {
        index: segment.index,
        title: segment.title(),
        triples: triples.len(),
        resolution,
        graph,
        partition,
    }
}

/// Process an in-memory relations stream, one report per segment.
pub fn process_lines<I, S>(lines: I, config: &PipelineConfig) -> Vec<SegmentReport>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    split_segments(lines)
        .iter()
        .map(|segment| process_segment(segment, config))
        .collect()
}

/// Process raw file contents.
///
/// A segment containing bytes that are not UTF-8 fails alone; every other
/// segment is still processed.
pub fn process_bytes(content: &[u8], config: &PipelineConfig) -> Vec<PipelineResult<SegmentReport>> {
    split_segments_bytes(content)
        .into_iter()
        .map(|raw| {
            let index = raw.index;
            match raw.decode() {
                Ok(segment) => Ok(process_segment(&segment, config)),
                Err(line) => {
                    tracing::warn!(segment = index, line, "Segment is not text, skipping");
                    Err(PipelineError::NonText {
                        segment: index,
                        line,
                    })
                }
            }
        })
        .collect()
}

/// Read a persisted relations file and process it.
pub fn process_file(path: &Path, config: &PipelineConfig) -> PipelineResult<Vec<PipelineResult<SegmentReport>>> {
    let content = std::fs::read(path)?;
    tracing::debug!(path = %path.display(), bytes = content.len(), "Read relations file");
    Ok(process_bytes(&content, config))
}
