//! Entity resolution by substring containment
//!
//! Two labels refer to the same entity when one contains the other
//! (case-insensitive). The longer label is merged into the shorter one and the
//! text it loses is moved into the predicate, tagged `(s)` when it came from
//! the subject, so the full statement can still be read off the edge.

use std::collections::BTreeSet;

use crate::model::{DEFAULT_EDGE_COLOR, MergeMap, Resolution, Triple, UpdatedEdge};

/// Distinct, lower-cased, non-empty subject and object labels.
pub fn collect_labels(triples: &[Triple]) -> BTreeSet<String> {
    triples
        .iter()
        .flat_map(|t| [normalize(&t.subject), normalize(&t.object)])
        .filter(|label| !label.is_empty())
        .collect()
}

/// Map every label that contains another label to its representative.
///
/// A label maps to the shortest label it contains; labels of equal length are
/// ordered lexically. Because of that choice no representative contains
/// another representative, so resolving a set of representatives again
/// produces an empty map.
pub fn build_merge_map(labels: &BTreeSet<String>) -> MergeMap {
    let mut by_length: Vec<&String> = labels.iter().filter(|l| !l.is_empty()).collect();
    by_length.sort_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)));

    let mut merge_map = MergeMap::new();
    for (position, longer) in by_length.iter().enumerate() {
        let representative = by_length[..position]
            .iter()
            .find(|shorter| shorter.len() < longer.len() && longer.contains(shorter.as_str()));
        if let Some(shorter) = representative {
            merge_map.insert((*longer).clone(), (*shorter).clone());
        }
    }
    merge_map
}

/// Rewrite one triple against the merge map.
///
/// Sides that are not in the map pass through unchanged. A merged object
/// appends its prefix, representative and suffix after the predicate. There
/// is no `(o)` marker: it would require the representative to contain the
/// object label, and a representative is always strictly shorter than the
/// labels merged into it.
pub fn rewrite_edge(triple: &Triple, merge_map: &MergeMap) -> UpdatedEdge {
    let mut subject = normalize(&triple.subject);
    let mut predicate = triple.predicate.trim().to_lowercase();
    let mut object = normalize(&triple.object);

    if let Some(canonical) = merge_map.get(&subject) {
        let (prefix, suffix) = split_fragments(&subject, canonical);
        predicate = format!("{prefix} (s) {suffix} {predicate}");
        subject = canonical.to_string();
    }

    if let Some(canonical) = merge_map.get(&object) {
        let (prefix, suffix) = split_fragments(&object, canonical);
        predicate = format!("{predicate} {prefix}");
        if !suffix.is_empty() {
            predicate.push_str(canonical);
            predicate.push(' ');
            predicate.push_str(suffix);
        }
        object = canonical.to_string();
    }

    UpdatedEdge {
        subject,
        predicate,
        object,
        color: DEFAULT_EDGE_COLOR.to_string(),
    }
}

/// Run entity resolution over the triples of one segment.
pub fn resolve(triples: &[Triple]) -> Resolution {
    let labels = collect_labels(triples);
    let merge_map = build_merge_map(&labels);
    let canonical_nodes = merge_map.canonical_nodes();

    let mut edges = Vec::with_capacity(triples.len());
    for triple in triples {
        if normalize(&triple.subject).is_empty() || normalize(&triple.object).is_empty() {
            tracing::debug!(?triple, "Skipping triple with an empty side");
            continue;
        }
        edges.push(rewrite_edge(triple, &merge_map));
    }

    tracing::debug!(
        labels = labels.len(),
        merged = merge_map.len(),
        canonical = canonical_nodes.len(),
        "Resolved entities"
    );

    Resolution {
        merge_map,
        canonical_nodes,
        edges,
    }
}

fn normalize(label: &str) -> String {
    label.trim().to_lowercase()
}

/// Text before the first occurrence of `canonical` and everything after it.
fn split_fragments<'a>(label: &'a str, canonical: &str) -> (&'a str, &'a str) {
    label.split_once(canonical).unwrap_or((label, ""))
}
