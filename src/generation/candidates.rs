use regex::Regex;
use std::sync::LazyLock;

/// Marker the prompt asks the engine to put between candidates.
pub const CANDIDATE_DELIMITER: &str = "|||";

pub const DEFAULT_CANDIDATE_COUNT: usize = 3;

/// Used when the response contains nothing usable at all.
pub const FALLBACK_CANDIDATE: &str =
    "Sorry, I couldn't come up with a reply this time. Please try again.";

/// Opener-split segments this short are stray fragments, not replies.
const MIN_OPENER_SEGMENT_CHARS: usize = 15;

static BLANK_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\r?\n[ \t]*\r?\n\s*").unwrap());

// English only. Responses in other languages fall through to padding.
static OPENER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(?:hi|hello|hey|dear|greetings|thanks|thank you|good (?:morning|afternoon|evening)|absolutely|of course|sure|great|appreciate)\b",
    )
    .unwrap()
});

/// `Reply 1:`, `**Option 2:**`, `Response #3 -`, `1.`, `2)` at the start of a candidate.
static LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^\s*(?:\*\*|__)?\s*(?:(?:reply|response|option|version|candidate|draft)\s*#?\s*\d+\s*(?:\*\*|__)?\s*[:.)\-]?|\d+[.):](?:\s|$))\s*(?:\*\*|__)?\s*",
    )
    .unwrap()
});

/// Split a generation response into exactly `n` non-empty candidates.
///
/// Delimited segments are preferred. When there are too few, paragraphs that
/// open with a greeting or acknowledgement are tried instead. Enumeration
/// labels are stripped, surplus candidates dropped, and shortfalls padded by
/// repeating the first candidate (or [`FALLBACK_CANDIDATE`]). Never fails.
pub fn parse_candidates(raw: &str, n: usize) -> Vec<String> {
    let mut segments = split_on_delimiter(raw);

    if segments.len() < n {
        // Keep the delimiter split unless the opener split actually finds more replies.
        let by_opener = split_before_openers(raw);
        if by_opener.len() > segments.len() {
            segments = by_opener;
        }
    }

    let mut candidates: Vec<String> = segments
        .iter()
        .map(|segment| strip_label(segment))
        .filter(|candidate| !candidate.is_empty())
        .map(str::to_string)
        .collect();

    candidates.truncate(n);
    let filler = candidates
        .first()
        .cloned()
        .unwrap_or_else(|| FALLBACK_CANDIDATE.to_string());
    candidates.resize(n, filler);
    candidates
}

fn split_on_delimiter(raw: &str) -> Vec<&str> {
    raw.split(CANDIDATE_DELIMITER)
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .collect()
}

/// Split at blank lines that are immediately followed by an opener word.
fn split_before_openers(raw: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut start = 0;

    for blank in BLANK_LINE.find_iter(raw) {
        if OPENER.is_match(&raw[blank.end()..]) {
            segments.push(&raw[start..blank.start()]);
            start = blank.end();
        }
    }
    segments.push(&raw[start..]);

    segments
        .into_iter()
        .map(str::trim)
        .filter(|segment| segment.chars().count() > MIN_OPENER_SEGMENT_CHARS)
        .collect()
}

fn strip_label(segment: &str) -> &str {
    match LABEL.find(segment) {
        Some(label) => segment[label.end()..].trim(),
        None => segment.trim(),
    }
}
