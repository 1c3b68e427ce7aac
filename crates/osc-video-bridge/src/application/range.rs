//! Range planning for `GET /video`.
//!
//! Browsers seek inside a video by requesting byte ranges.  [`plan_range`]
//! turns the raw `Range` header and the file size into one of three plans; the
//! HTTP layer maps them to 200, 206 or 416.
//!
//! Supported forms (both ends inclusive):
//!
//! - `bytes=START-END`
//! - `bytes=START-` (to the end of the file)
//! - `bytes=-N` (the last `N` bytes)
//!
//! Anything else, including multi-range requests and other units, is ignored
//! and the whole file is served.

/// How to answer a media request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangePlan {
    /// No usable range: 200 with the whole file.
    Full,
    /// 206 with bytes `start..=end`.
    Partial { start: u64, end: u64 },
    /// 416 with `Content-Range: bytes */size`.
    Unsatisfiable,
}

impl RangePlan {
    /// Number of body bytes this plan sends for a file of `file_size` bytes.
    pub fn content_length(&self, file_size: u64) -> u64 {
        match *self {
            RangePlan::Full => file_size,
            RangePlan::Partial { start, end } => end - start + 1,
            RangePlan::Unsatisfiable => 0,
        }
    }
}

/// Decides how to answer a request with the given `Range` header.
pub fn plan_range(header: Option<&str>, file_size: u64) -> RangePlan {
    let Some(spec) = header.and_then(parse_single_range) else {
        return RangePlan::Full;
    };

    match spec {
        RangeSpec::FromStart { start, end } => {
            let end = end.unwrap_or_else(|| file_size.saturating_sub(1));
            if start >= file_size || end >= file_size || start > end {
                RangePlan::Unsatisfiable
            } else {
                RangePlan::Partial { start, end }
            }
        }
        RangeSpec::Suffix(len) => {
            if len == 0 || file_size == 0 {
                RangePlan::Unsatisfiable
            } else {
                RangePlan::Partial {
                    start: file_size.saturating_sub(len),
                    end: file_size - 1,
                }
            }
        }
    }
}

#[derive(Debug, PartialEq)]
enum RangeSpec {
    FromStart { start: u64, end: Option<u64> },
    Suffix(u64),
}

fn parse_single_range(header: &str) -> Option<RangeSpec> {
    let ranges = header.trim().strip_prefix("bytes=")?;
    if ranges.contains(',') {
        return None;
    }
    let (start_raw, end_raw) = ranges.split_once('-')?;
    let (start_raw, end_raw) = (start_raw.trim(), end_raw.trim());

    if start_raw.is_empty() {
        return end_raw.parse().ok().map(RangeSpec::Suffix);
    }
    let start = start_raw.parse().ok()?;
    let end = if end_raw.is_empty() {
        None
    } else {
        Some(end_raw.parse().ok()?)
    };
    Some(RangeSpec::FromStart { start, end })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
