//! Block reference fragments: `<blockId>`, `<blockId>+` and `<blockId>[start:end]`.
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

static FRAGMENT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<block_id>\S{8})(?:(?P<expanded>\+)|\[(?P<start>[0-9]+):(?P<end>[0-9]+)\])?$")
        .expect("fragment pattern is a valid regex")
});

/// The part of a block reference that qualifies the block itself.
///
/// Serializes untagged, so JSON shapes are `{"start":2,"end":5}` or `{"expanded":true}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, uniffi::Enum)]
#[serde(untagged)]
pub enum BlockRange {
    Range { start: u32, end: u32 },
    Expanded { expanded: bool },
}

impl BlockRange {
    pub fn range(start: u32, end: u32) -> BlockRange {
        BlockRange::Range { start, end }
    }

    pub fn expanded() -> BlockRange {
        BlockRange::Expanded { expanded: true }
    }
}

/// Writes the fragment suffix that follows a block id. `{expanded: false}` writes nothing.
impl Display for BlockRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            BlockRange::Range { start, end } => write!(f, "[{start}:{end}]"),
            BlockRange::Expanded { expanded: true } => write!(f, "+"),
            BlockRange::Expanded { expanded: false } => Ok(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedFragment {
    pub block_id: String,
    #[serde(flatten)]
    pub range: Option<BlockRange>,
}

impl ParsedFragment {
    pub fn new(block_id: impl Into<String>, range: Option<BlockRange>) -> ParsedFragment {
        ParsedFragment {
            block_id: block_id.into(),
            range,
        }
    }
}

impl Display for ParsedFragment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.block_id, serialize_block_range(self.range.as_ref()))
    }
}

/// Parse a URL fragment (without the leading `#`) into a block id and optional range.
///
/// Text that does not fit the 8-character block id grammar is kept whole as the block id.
/// Returns `None` only for empty input.
pub fn parse_fragment(input: &str) -> Option<ParsedFragment> {
    if input.is_empty() {
        return None;
    }
    let Some(caps) = FRAGMENT_RE.captures(input) else {
        tracing::debug!("[parse_fragment] '{input}' is not a block reference, keeping raw id");
        return Some(ParsedFragment::new(input, None));
    };
    let block_id = caps["block_id"].to_string();
    if caps.name("expanded").is_some() {
        return Some(ParsedFragment::new(block_id, Some(BlockRange::expanded())));
    }
    let (Some(start), Some(end)) = (caps.name("start"), caps.name("end")) else {
        return Some(ParsedFragment::new(block_id, None));
    };
    match (start.as_str().parse::<u32>(), end.as_str().parse::<u32>()) {
        (Ok(start), Ok(end)) => Some(ParsedFragment::new(
            block_id,
            Some(BlockRange::range(start, end)),
        )),
        _ => {
            tracing::debug!("[parse_fragment] range in '{input}' is out of bounds, keeping raw id");
            Some(ParsedFragment::new(input, None))
        }
    }
}

/// Serialize the range-only part of a fragment: `+`, `[start:end]`, or nothing.
pub fn serialize_block_range(range: Option<&BlockRange>) -> String {
    range.map(|r| r.to_string()).unwrap_or_default()
}

/// Fragment text of any link: everything after its first `#`.
fn fragment_of(url: &str) -> Option<&str> {
    url.split_once('#').map(|(_, fragment)| fragment)
}

/// The block id referenced by the fragment of `url`, if any.
pub fn extract_block_ref_of_url(url: &str) -> Option<String> {
    fragment_of(url)
        .and_then(parse_fragment)
        .map(|fragment| fragment.block_id)
}

/// The block range referenced by the fragment of `url`, if any.
pub fn extract_block_range_of_url(url: &str) -> Option<BlockRange> {
    fragment_of(url)
        .and_then(parse_fragment)
        .and_then(|fragment| fragment.range)
}
