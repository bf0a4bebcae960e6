//! Per-line change status against the text as it was opened.
//!
//! Greedy forward scan: each current line is looked up in the not yet
//! consumed suffix of the original lines. A hit marks it `Unmodified` and
//! consumes everything up to and including the match; a miss marks it
//! `Modified` and consumes nothing. Insertions and edits come out right;
//! moved lines do not (this is not an LCS).

use core_syntax::{DocumentLine, LineStatus};

pub fn diff_lines<S: AsRef<str>>(lines: &[S], original: &[String]) -> Vec<LineStatus> {
    let mut next = 0;
    lines
        .iter()
        .map(|line| {
            let line = line.as_ref();
            match original[next..].iter().position(|o| o == line) {
                Some(offset) => {
                    next += offset + 1;
                    LineStatus::Unmodified
                }
                None => LineStatus::Modified,
            }
        })
        .collect()
}

/// Write `statuses` onto the matching document lines.
pub fn apply_statuses(doc: &mut [DocumentLine], statuses: &[LineStatus]) {
    for (line, status) in doc.iter_mut().zip(statuses) {
        line.status = *status;
    }
}
