//! Numeric field derivations: CPU idle% and memory free%.
//!
//! Both fields need arithmetic over matched raw tokens rather than a
//! plain token slice. Every parse is explicit and fallible — a
//! malformed number on a matching line yields nothing for that line and
//! scanning continues, so corrupted output degrades to `"unknown"`
//! instead of aborting the record.

use super::corpus::Corpus;

/// Derive idle% from the five-second busy% on the `CPU utilization`
/// header of `show processes cpu`:
///
/// ```text
/// CPU utilization for five seconds: 12%/0%; one minute: 10%; five minutes: 9%
/// ```
///
/// The busy value is the first token after the first `:`, truncated at
/// the process/interrupt `/` split; `idle = 100 - busy`, re-encoded as
/// decimal text.
pub(crate) fn cpu_idle_percent(corpus: &Corpus) -> Option<String> {
    corpus.lines().find_map(|line| {
        if !line.contains("CPU utilization") {
            return None;
        }
        let busy = busy_percent(line)?;
        Some((100 - busy).to_string())
    })
}

/// Busy values outside 0–100 are treated as malformed.
fn busy_percent(line: &str) -> Option<i64> {
    let (_, rest) = line.split_once(':')?;
    let token = rest.split_whitespace().next()?;
    let busy = token.split('/').next()?.trim_end_matches('%');
    busy.parse::<i64>().ok().filter(|b| (0..=100).contains(b))
}

/// Derive free% from the processor-pool summary of `show processes mem`:
///
/// ```text
/// Processor Pool Total: 100000 Used: 40000 Free: 60000
/// ```
///
/// After whitespace collapse, total bytes are the fifth-from-last token
/// (trailing comma trimmed) and free bytes the last token;
/// `free% = floor(free / total * 100)`. Division by zero and
/// non-numeric tokens yield nothing.
pub(crate) fn mem_free_percent(corpus: &Corpus) -> Option<String> {
    corpus.lines().find_map(|line| {
        if !(line.contains("Processor Pool Total:") || line.starts_with("Total:")) {
            return None;
        }
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let total_idx = tokens.len().checked_sub(5)?;
        let total: u64 = tokens[total_idx].trim_end_matches(',').parse().ok()?;
        let free: u64 = tokens.last()?.parse().ok()?;
        if total == 0 {
            return None;
        }
        Some((free as u128 * 100 / total as u128).to_string())
    })
}
