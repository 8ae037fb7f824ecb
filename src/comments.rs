//! Rebuild reply threads from a flat comment list.
//!
//! Comments only know the id of the comment they reply to. [comment_groups] turns that into
//! the conversation groups shown under a document or under a single comment, and
//! [comment_replies] walks from one comment back up to the start of its thread.
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, VecDeque};

use crate::hmid::{unpack_hm_id, UnpackedHmId};

/// Anything that can take part in a reply chain.
pub trait ReplyNode {
    fn id(&self) -> &str;
    /// Id of the comment this one replies to. Empty for top-level comments.
    fn replied_comment(&self) -> &str;
}

/// A comment as delivered by the comment store.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HmComment {
    pub id: String,
    /// Packed link of the commented document.
    #[serde(default)]
    pub target: String,
    #[serde(default)]
    pub replied_comment: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub content: serde_json::Value,
    #[serde(default)]
    pub create_time: Option<String>,
}

impl HmComment {
    pub fn target_id(&self) -> Option<UnpackedHmId> {
        unpack_hm_id(&self.target)
    }
}

impl ReplyNode for HmComment {
    fn id(&self) -> &str {
        &self.id
    }

    fn replied_comment(&self) -> &str {
        &self.replied_comment
    }
}

/// A straight run of replies starting at `id`, plus how many replies hang below its last
/// comment.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentGroup<C> {
    pub id: String,
    pub comments: Vec<C>,
    pub more_comments_count: usize,
}

/// Lookup tables over a comment slice. The first comment with a given id wins.
struct ReplyIndex<'a, C> {
    comments: &'a [C],
    by_id: BTreeMap<&'a str, usize>,
    children: BTreeMap<&'a str, Vec<usize>>,
}

impl<'a, C: ReplyNode> ReplyIndex<'a, C> {
    fn new(comments: &'a [C]) -> Self {
        let mut by_id = BTreeMap::new();
        let mut children: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
        for (idx, comment) in comments.iter().enumerate() {
            by_id.entry(comment.id()).or_insert(idx);
            if !comment.replied_comment().is_empty() {
                children
                    .entry(comment.replied_comment())
                    .or_default()
                    .push(idx);
            }
        }
        ReplyIndex {
            comments,
            by_id,
            children,
        }
    }

    fn get(&self, id: &str) -> Option<&'a C> {
        self.by_id.get(id).map(|idx| &self.comments[*idx])
    }

    fn replies_to(&self, id: &str) -> &[usize] {
        self.children.get(id).map(Vec::as_slice).unwrap_or_default()
    }

    /// Indices of the single-reply chain starting at `head`.
    fn chain_from(&self, head: usize) -> Vec<usize> {
        let mut chain = vec![head];
        let mut seen = BTreeSet::from([self.comments[head].id()]);
        loop {
            let tail = &self.comments[chain[chain.len() - 1]];
            let [next] = self.replies_to(tail.id()) else {
                break;
            };
            if !seen.insert(self.comments[*next].id()) {
                tracing::warn!(
                    "[comment_groups] reply cycle through comment '{}'",
                    self.comments[*next].id()
                );
                break;
            }
            chain.push(*next);
        }
        chain
    }

    /// Number of distinct comments below `id`, at any depth.
    fn descendant_count(&self, id: &'a str) -> usize {
        let mut reached = BTreeSet::from([id]);
        let mut queue = VecDeque::from([id]);
        while let Some(current) = queue.pop_front() {
            for idx in self.replies_to(current) {
                let reply_id = self.comments[*idx].id();
                if reached.insert(reply_id) {
                    queue.push_back(reply_id);
                }
            }
        }
        reached.len() - 1
    }
}

/// Group the replies to `target_comment_id` (or top-level comments when `None`) into straight
/// reply chains.
///
/// Each reply to the anchor starts a group, in input order. A group grows while its last
/// comment has exactly one reply; a comment with several replies ends the group. Replies
/// below the last comment of a group are counted in `more_comments_count`.
pub fn comment_groups<C: ReplyNode + Clone>(
    comments: &[C],
    target_comment_id: Option<&str>,
) -> Vec<CommentGroup<C>> {
    let anchor = target_comment_id.unwrap_or_default();
    let index = ReplyIndex::new(comments);
    comments
        .iter()
        .enumerate()
        .filter(|(_, comment)| comment.replied_comment() == anchor)
        .map(|(head, comment)| {
            let chain = index.chain_from(head);
            let last = comments[chain[chain.len() - 1]].id();
            CommentGroup {
                id: comment.id().to_string(),
                more_comments_count: index.descendant_count(last),
                comments: chain.into_iter().map(|idx| comments[idx].clone()).collect(),
            }
        })
        .collect()
}

/// The thread leading to `target_comment_id`, root first and the target last.
///
/// The first element is always `None`: it marks the point where the walk found no further
/// parent. If the target itself is unknown the result is `[None]`.
pub fn comment_replies<C: ReplyNode + Clone>(
    comments: &[C],
    target_comment_id: &str,
) -> Vec<Option<C>> {
    let index = ReplyIndex::new(comments);
    let mut current = index.get(target_comment_id);
    let mut thread = VecDeque::from([current.cloned()]);
    let mut visited = BTreeSet::new();
    while let Some(comment) = current {
        visited.insert(comment.id());
        current = index
            .get(comment.replied_comment())
            .filter(|parent| {
                let fresh = !visited.contains(parent.id());
                if !fresh {
                    tracing::warn!(
                        "[comment_replies] reply cycle through comment '{}'",
                        parent.id()
                    );
                }
                fresh
            });
        thread.push_front(current.cloned());
    }
    thread.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    fn comment(id: &str, replied: &str) -> HmComment {
        HmComment {
            id: id.to_string(),
            replied_comment: replied.to_string(),
            ..Default::default()
        }
    }

    fn ids<C: ReplyNode>(comments: &[C]) -> Vec<&str> {
        comments.iter().map(|c| c.id()).collect()
    }

    #[test]
    fn test_chain_stops_at_branch() {
        let comments = vec![
            comment("a", ""),
            comment("b", "a"),
            comment("c", "b"),
            comment("d", "c"),
            comment("e", "c"),
        ];
        let groups = comment_groups(&comments, None);
        assert_eq!(groups.len(), 1);
        assert_eq!(ids(&groups[0].comments), vec!["a", "b", "c"]);
        assert_eq!(groups[0].more_comments_count, 2);
    }

    #[test]
    fn test_descendants_counted_once() {
        let index_comments = vec![
            comment("a", ""),
            comment("b", "a"),
            comment("c", "a"),
            comment("d", "b"),
            comment("e", "d"),
            comment("f", "c"),
        ];
        let index = ReplyIndex::new(&index_comments);
        assert_eq!(index.descendant_count("a"), 5);
        assert_eq!(index.descendant_count("f"), 0);
        assert_eq!(index.descendant_count("missing"), 0);
    }

    #[test]
    fn test_cycle_terminates() {
        let comments = vec![comment("a", "b"), comment("b", "a")];
        let groups = comment_groups(&comments, Some("a"));
        assert_eq!(groups.len(), 1);
        assert_eq!(ids(&groups[0].comments), vec!["b", "a"]);
        assert_eq!(groups[0].more_comments_count, 1);

        let thread = comment_replies(&comments, "a");
        assert_eq!(thread.len(), 3);
        assert!(thread[0].is_none());
        assert_eq!(thread[1].as_ref().map(|c| c.id()), Some("b"));
        assert_eq!(thread[2].as_ref().map(|c| c.id()), Some("a"));
    }

    #[test]
    fn test_comment_json() {
        let comment: HmComment = serde_json::from_str(
            r#"{"id":"c1","target":"hm://abc?v=v1","repliedComment":"c0","author":"alice"}"#,
        )
        .unwrap();
        assert_eq!(comment.replied_comment(), "c0");
        let target = comment.target_id().unwrap();
        assert_eq!(target.uid, "abc");
        assert_eq!(target.version.as_deref(), Some("v1"));
    }
}
