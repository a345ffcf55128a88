//! Text grid map loader.
//!
//! # Format
//!
//! The MovingAI benchmark format:
//!
//! ```text
//! type octile
//! height 4
//! width 5
//! map
//! ..@..
//! .T...
//! .....
//! ...@.
//! ```
//!
//! Header lines before `map` may appear in any order; only `height` and
//! `width` are required.  `T` and `@` cells are obstacles, every other
//! character is passable.  CRLF line endings are accepted.
//!
//! A missing file, a missing header field, a non-numeric dimension, or fewer
//! rows/columns than declared is an error, never an empty graph.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::{Graph, GraphError, GraphResult};

/// Load a map file from disk.
pub fn load_map(path: &Path) -> GraphResult<Graph> {
    let file = File::open(path)?;
    parse_map(BufReader::new(file))
}

/// Like [`load_map`] but accepts any `BufRead` source.
///
/// Useful for testing (pass a `std::io::Cursor`) or embedding maps in a
/// binary.
pub fn parse_map<R: BufRead>(reader: R) -> GraphResult<Graph> {
    let mut lines = reader.lines().enumerate();

    // ── Header ────────────────────────────────────────────────────────────
    let mut height: Option<u32> = None;
    let mut width:  Option<u32> = None;
    let mut saw_map = false;

    for (n, line) in lines.by_ref() {
        let line = line?;
        let line = line.trim_end_matches('\r');
        let mut words = line.split_whitespace();
        match words.next() {
            Some("height") => height = Some(parse_dimension(words.next(), n + 1)?),
            Some("width")  => width  = Some(parse_dimension(words.next(), n + 1)?),
            Some("map") => {
                saw_map = true;
                break;
            }
            _ => {}
        }
    }

    let height = height.ok_or(GraphError::MissingHeader("height"))?;
    let width  = width.ok_or(GraphError::MissingHeader("width"))?;
    if !saw_map {
        return Err(GraphError::MissingHeader("map"));
    }

    // ── Rows ──────────────────────────────────────────────────────────────
    let mut passable = vec![false; (width as usize) * (height as usize)];
    let mut last_line = 0;
    for y in 0..height {
        let Some((n, line)) = lines.next() else {
            return Err(GraphError::MalformedMap {
                line:   last_line + 1,
                reason: format!("expected {height} rows, found {y}"),
            });
        };
        last_line = n + 1;
        let line = line?;
        let row = line.trim_end_matches('\r').as_bytes();
        if row.len() < width as usize {
            return Err(GraphError::MalformedMap {
                line:   n + 1,
                reason: format!("row has {} cells, expected {width}", row.len()),
            });
        }
        for x in 0..width {
            let cell = row[x as usize];
            passable[(width * y + x) as usize] = cell != b'T' && cell != b'@';
        }
    }

    Ok(Graph::grid(width, height, |x, y| passable[(width * y + x) as usize]))
}

fn parse_dimension(word: Option<&str>, line: usize) -> GraphResult<u32> {
    let word = word.ok_or_else(|| GraphError::MalformedMap {
        line,
        reason: "dimension without a value".to_string(),
    })?;
    word.parse::<u32>().map_err(|_| GraphError::MalformedMap {
        line,
        reason: format!("invalid dimension {word:?}"),
    })
}
