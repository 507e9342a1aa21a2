//! Parser for the trial range mini-language
//!
//! The range description is a single string of whitespace-separated tokens
//! alternating between a trial name and its frame range, e.g.
//! `"A 1:32 B 33:47"`. Ranges are written 1-based and inclusive on both
//! ends, and are converted here into 0-based half-open spans over the
//! sorted file list.

use crate::io::error::{Result, StackError};
use std::ops::Range;

/// A named half-open span of frame indices over the sorted file list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrialRange {
    /// Trial name, used as the output stack's file stem
    pub name: String,
    /// 0-based half-open index interval into the file list
    pub span: Range<usize>,
}

impl TrialRange {
    /// Select the sub-sequence of `files` covered by this trial's span
    ///
    /// Both ends are clamped to the list length, so spans reaching past the
    /// end select a truncated sub-sequence and reversed or fully
    /// out-of-range spans select nothing. Bounds are never an error.
    pub fn select<'a, T>(&self, files: &'a [T]) -> &'a [T] {
        let start = self.span.start.min(files.len());
        let end = self.span.end.min(files.len());
        files.get(start..end).unwrap_or(&[])
    }
}

/// Parse a range description into an ordered list of trials
///
/// An empty or all-whitespace description yields an empty list. Trial
/// names may repeat; later trials simply overwrite earlier output files
/// of the same name.
///
/// # Errors
///
/// Returns an error if:
/// - A trial name is not followed by a range token (odd token count)
/// - A range token does not contain a `:` separator
/// - Either side of the `:` is not an unsigned integer
pub fn parse_trial_ranges(description: &str) -> Result<Vec<TrialRange>> {
    let mut trials = Vec::new();
    let mut tokens = description.split_whitespace();

    while let Some(name) = tokens.next() {
        let Some(range_token) = tokens.next() else {
            return Err(StackError::UnpairedTrialName {
                name: name.to_string(),
            });
        };
        trials.push(parse_trial(name, range_token)?);
    }

    Ok(trials)
}

fn parse_trial(name: &str, range_token: &str) -> Result<TrialRange> {
    let (start_text, end_text) =
        range_token
            .split_once(':')
            .ok_or_else(|| StackError::MalformedRange {
                token: range_token.to_string(),
            })?;

    let start: usize = parse_bound(range_token, start_text)?;
    let end: usize = parse_bound(range_token, end_text)?;

    // User ranges are 1-based inclusive; a start of 0 saturates rather
    // than wrapping around the sequence.
    Ok(TrialRange {
        name: name.to_string(),
        span: start.saturating_sub(1)..end,
    })
}

fn parse_bound(range_token: &str, bound_text: &str) -> Result<usize> {
    bound_text
        .parse()
        .map_err(|source| StackError::InvalidRangeBound {
            token: range_token.to_string(),
            source,
        })
}
