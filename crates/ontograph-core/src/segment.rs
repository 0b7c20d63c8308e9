//! Splitting a multi-part relations stream into segments

use crate::model::Segment;

/// Line separating the parts of a decomposed document.
pub const SEGMENT_DELIMITER: &str = "---";

fn is_delimiter(line: &str) -> bool {
    line.trim() == SEGMENT_DELIMITER
}

/// Split lines on `---` delimiter lines.
///
/// Every part is kept, including an empty leading or trailing one, so the
/// number of segments is always the number of delimiters plus one.
pub fn split_segments<I, S>(lines: I) -> Vec<Segment>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut parts: Vec<Vec<String>> = vec![Vec::new()];
    for line in lines {
        let line = line.as_ref();
        if is_delimiter(line) {
            parts.push(Vec::new());
            continue;
        }
        if let Some(current) = parts.last_mut() {
            current.push(line.trim_end_matches(['\r', '\n']).to_string());
        }
    }
    number(parts)
}

/// A segment whose bytes have not been decoded yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSegment {
    pub index: usize,
    pub total: usize,
    pub lines: Vec<Vec<u8>>,
}

impl RawSegment {
    /// Decode every line as UTF-8.
    ///
    /// On failure, returns the zero-based line number that is not text.
    pub fn decode(self) -> Result<Segment, usize> {
        let mut lines = Vec::with_capacity(self.lines.len());
        for (number, bytes) in self.lines.into_iter().enumerate() {
            match String::from_utf8(bytes) {
                Ok(line) => lines.push(line),
                Err(_) => return Err(number),
            }
        }
        Ok(Segment {
            index: self.index,
            total: self.total,
            lines,
        })
    }
}

/// Split raw file contents into segments without decoding them.
pub fn split_segments_bytes(content: &[u8]) -> Vec<RawSegment> {
    let mut parts: Vec<Vec<Vec<u8>>> = vec![Vec::new()];
    let body = content.strip_suffix(b"\n").unwrap_or(content);
    if !body.is_empty() {
        for line in body.split(|&b| b == b'\n') {
            let line = line.strip_suffix(b"\r").unwrap_or(line);
            if line.trim_ascii() == SEGMENT_DELIMITER.as_bytes() {
                parts.push(Vec::new());
                continue;
            }
            if let Some(current) = parts.last_mut() {
                current.push(line.to_vec());
            }
        }
    }
    let total = parts.len();
    parts
        .into_iter()
        .enumerate()
        .map(|(index, lines)| RawSegment { index, total, lines })
        .collect()
}

fn number(parts: Vec<Vec<String>>) -> Vec<Segment> {
    let total = parts.len();
    parts
        .into_iter()
        .enumerate()
        .map(|(index, lines)| Segment { index, total, lines })
        .collect()
}
