//! Raw relation line parsing

use crate::model::Triple;

/// Field separator between subject, predicate and object.
pub const TRIPLE_DELIMITER: &str = " -> ";

/// Parse one `subject -> predicate -> object` line.
///
/// Returns `None` unless the line splits into exactly three fields.
pub fn parse_line(line: &str) -> Option<Triple> {
    let mut fields = line.split(TRIPLE_DELIMITER);
    let subject = fields.next()?;
    let predicate = fields.next()?;
    let object = fields.next()?;
    if fields.next().is_some() {
        return None;
    }
    Some(Triple::new(subject.trim(), predicate.trim(), object.trim()))
}

/// Parse a sequence of lines, silently dropping malformed ones.
pub fn parse_lines<I, S>(lines: I) -> Vec<Triple>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut triples = Vec::new();
    let mut dropped = 0usize;
    for line in lines {
        match parse_line(line.as_ref()) {
            Some(triple) => triples.push(triple),
            None => dropped += 1,
        }
    }
    if dropped > 0 {
        tracing::trace!("Dropped {} lines that are not triples", dropped);
    }
    triples
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_triple() {
        let triple = parse_line("A -> likes -> B").unwrap();
        assert_eq!(triple, Triple::new("A", "likes", "B"));
    }

    #[test]
    fn test_fields_are_trimmed() {
        let triple = parse_line("  the cat  ->  sat on ->  the mat \n").unwrap();
        assert_eq!(triple.subject, "the cat");
        assert_eq!(triple.predicate, "sat on");
        assert_eq!(triple.object, "the mat");
    }

    #[test]
    fn test_wrong_field_count_is_dropped() {
        assert!(parse_line("A -> B").is_none());
        assert!(parse_line("A -> B -> C -> D").is_none());
        assert!(parse_line("no delimiter here").is_none());
        // The arrow must be surrounded by spaces.
        assert!(parse_line("A->B->C").is_none());
    }

    #[test]
    fn test_order_kept_without_dedup() {
        let lines = ["x -> r -> y", "garbage", "x -> r -> y", "---", "p -> q -> s"];
        let triples = parse_lines(lines);
        assert_eq!(triples.len(), 3);
        assert_eq!(triples[0], triples[1]);
        assert_eq!(triples[2].subject, "p");
    }
}
