//! Generic `scheme://path?query#fragment` splitting with no knowledge of hypermedia ids.
use std::collections::BTreeMap;

/// A URL-ish string split into its raw parts. All parts borrow from the input.
///
/// Nothing is percent-decoded: callers receive exactly the text between separators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedUrl<'a> {
    pub scheme: &'a str,
    /// `/`-separated path segments, empty segments included (`a/` -> `["a", ""]`).
    pub path: Vec<&'a str>,
    /// Last occurrence of a key wins. Bare keys map to an empty string.
    pub query: BTreeMap<&'a str, &'a str>,
    pub fragment: Option<&'a str>,
}

impl<'a> ParsedUrl<'a> {
    /// Split `url` into scheme, path, query and fragment.
    ///
    /// Returns `None` when there is no `://` separator or nothing follows it.
    pub fn parse(url: &'a str) -> Option<ParsedUrl<'a>> {
        let (scheme, rest) = url.split_once("://")?;
        if rest.is_empty() {
            return None;
        }
        let (path_and_query, fragment) = match rest.split_once('#') {
            Some((pq, fragment)) => (pq, Some(fragment)),
            None => (rest, None),
        };
        let (path, query_string) = match path_and_query.split_once('?') {
            Some((path, query)) => (path, query),
            None => (path_and_query, ""),
        };
        Some(ParsedUrl {
            scheme,
            path: path.split('/').collect(),
            query: parse_query(query_string),
            fragment,
        })
    }

    pub fn segment(&self, idx: usize) -> Option<&'a str> {
        self.path.get(idx).copied()
    }

    pub fn has_query_key(&self, key: &str) -> bool {
        self.query.contains_key(key)
    }

    /// Query value for `key`, treating a bare or empty value as absent.
    pub fn query_value(&self, key: &str) -> Option<&'a str> {
        self.query.get(key).copied().filter(|v| !v.is_empty())
    }
}

fn parse_query(query: &str) -> BTreeMap<&str, &str> {
    let mut map = BTreeMap::new();
    for pair in query.split('&').filter(|pair| !pair.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        map.insert(key, value);
    }
    map
}
