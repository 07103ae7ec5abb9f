// ABOUTME: Placement of ASCII thumbnail blocks inside G-code text
// ABOUTME: Inserts after the generator header, strips previous blocks, and lists what is embedded

use crate::constants::gcode::HEADER_PREFIXES;
use base64::{Engine, engine::general_purpose::STANDARD};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedThumbnail {
    pub tag: String,
    pub width: u32,
    pub height: u32,
    /// Length announced in the begin marker
    pub encoded_len: usize,
    /// Length of the base64 text actually present
    pub actual_len: usize,
    pub lines: usize,
    /// `None` when the payload is not valid base64
    pub decoded_len: Option<usize>,
}

impl EmbeddedThumbnail {
    pub fn is_consistent(&self) -> bool {
        self.encoded_len == self.actual_len && self.decoded_len.is_some()
    }
}

/// Parse `; <tag> begin <w>x<h> <len>` into its fields
fn parse_begin(line: &str) -> Option<(&str, u32, u32, usize)> {
    let rest = line.trim_end().strip_prefix("; ")?;
    let mut parts = rest.split(' ');
    let tag = parts.next()?;
    if parts.next()? != "begin" {
        return None;
    }
    let (w, h) = parts.next()?.split_once('x')?;
    let len = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some((tag, w.parse().ok()?, h.parse().ok()?, len))
}

fn is_header_line(line: &str) -> bool {
    let lower = line.to_ascii_lowercase();
    HEADER_PREFIXES
        .iter()
        .any(|prefix| lower.starts_with(&prefix.to_ascii_lowercase()))
}

/// Remove every embedded thumbnail block together with its `;` framing lines
pub fn strip_thumbnails(gcode: &str) -> String {
    let mut out: Vec<&str> = Vec::new();
    let mut lines = gcode.split_inclusive('\n');

    while let Some(line) = lines.next() {
        let Some((tag, ..)) = parse_begin(line) else {
            out.push(line);
            continue;
        };

        // Leading "\n;\n" written before the begin marker
        if out.last().is_some_and(|l| l.trim_end() == ";") {
            out.pop();
            if out.last().is_some_and(|l| l.trim().is_empty()) {
                out.pop();
            }
        }

        let end = format!("; {} end", tag);
        for inner in lines.by_ref() {
            if inner.trim_end() == end {
                break;
            }
        }

        // Trailing ";" after the end marker
        let mut peek = lines.clone();
        if peek.next().is_some_and(|l| l.trim_end() == ";") {
            lines = peek;
        }
    }

    out.concat()
}

/// Place `thumbnails` after the generator header, replacing any existing blocks
pub fn insert_thumbnails(gcode: &str, thumbnails: &str) -> String {
    let stripped = strip_thumbnails(gcode);
    let header_len: usize = stripped
        .split_inclusive('\n')
        .take_while(|line| is_header_line(line))
        .map(str::len)
        .sum();

    let (header, body) = stripped.split_at(header_len);
    let mut out = String::with_capacity(stripped.len() + thumbnails.len() + 1);
    out.push_str(header);
    if !header.is_empty() && !header.ends_with('\n') {
        out.push('\n');
    }
    out.push_str(thumbnails);
    out.push_str(body);
    out
}

/// Every embedded thumbnail block, in file order
pub fn list_thumbnails(gcode: &str) -> Vec<EmbeddedThumbnail> {
    let mut found = Vec::new();
    let mut lines = gcode.lines();

    while let Some(line) = lines.next() {
        let Some((tag, width, height, encoded_len)) = parse_begin(line) else {
            continue;
        };

        let end = format!("; {} end", tag);
        let mut payload = String::new();
        let mut count = 0;
        for inner in lines.by_ref() {
            let inner = inner.trim_end();
            if inner == end {
                break;
            }
            payload.push_str(inner.strip_prefix("; ").unwrap_or(inner));
            count += 1;
        }

        found.push(EmbeddedThumbnail {
            tag: tag.to_string(),
            width,
            height,
            encoded_len,
            actual_len: payload.len(),
            lines: count,
            decoded_len: STANDARD.decode(&payload).ok().map(|bytes| bytes.len()),
        });
    }

    found
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLOCK: &str = "\n;\n; png begin 2x2 8\n; aGVsbG8=\n; png end\n;\n";

    #[test]
    fn test_parse_begin() {
        assert_eq!(
            parse_begin("; qoi begin 220x124 1234"),
            Some(("qoi", 220, 124, 1234))
        );
        assert_eq!(parse_begin("; png end"), None);
        assert_eq!(parse_begin("; png begin 2x2"), None);
        assert_eq!(parse_begin("G1 X10"), None);
    }

    #[test]
    fn test_insert_after_header() {
        let gcode = "; generated by PrusaSlicer 2.7.0\nG28\nG1 X10\n";
        let out = insert_thumbnails(gcode, BLOCK);
        assert_eq!(
            out,
            "; generated by PrusaSlicer 2.7.0\n\n;\n; png begin 2x2 8\n; aGVsbG8=\n; png end\n;\nG28\nG1 X10\n"
        );
    }

    #[test]
    fn test_insert_without_header() {
        let out = insert_thumbnails("G28\n", BLOCK);
        assert_eq!(out, format!("{}G28\n", BLOCK));
    }

    #[test]
    fn test_insert_is_idempotent() {
        let gcode = "; generated by test\nG28\n";
        let once = insert_thumbnails(gcode, BLOCK);
        let twice = insert_thumbnails(&once, BLOCK);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_strip_restores_original() {
        let gcode = "; generated by test\nG28\n";
        let with = insert_thumbnails(gcode, BLOCK);
        assert_eq!(strip_thumbnails(&with), gcode);
    }

    #[test]
    fn test_list_thumbnails() {
        let list = list_thumbnails(&format!("G28\n{}G1\n", BLOCK));
        assert_eq!(list.len(), 1);
        let t = &list[0];
        assert_eq!((t.tag.as_str(), t.width, t.height), ("png", 2, 2));
        assert_eq!(t.encoded_len, 8);
        assert_eq!(t.actual_len, 8);
        assert_eq!(t.lines, 1);
        assert_eq!(t.decoded_len, Some(5));
        assert!(t.is_consistent());
    }

    #[test]
    fn test_list_detects_truncated_payload() {
        let broken = "; jpg begin 4x4 12\n; aGVs\n; jpg end\n";
        let list = list_thumbnails(broken);
        assert_eq!(list.len(), 1);
        assert!(!list[0].is_consistent());
    }
}
