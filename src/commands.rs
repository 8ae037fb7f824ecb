use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

use crate::{
    comments::{comment_groups, comment_replies, CommentGroup, HmComment},
    error::HmError,
    fragment::BlockRange,
    hmid::{
        create_web_hm_url, hm_id_with_version, normalize_hm_id, unpack_hm_id, UnpackedHmId,
        WebHost,
    },
};

/// Command interface between embedders (CLI, app shells) and the hypermedia link codec.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Op {
    /// Parse a compact or web link.
    Unpack(String),
    /// Pack an identifier into its compact link.
    Pack(UnpackedHmId),
    /// Web URL of an identifier. `None` host means the public gateway, `Some("")` a path-only
    /// URL.
    WebUrl(UnpackedHmId, Option<String>),
    /// Canonicalize a link against the configured gateway.
    Normalize(String),
    /// Pin a link to a version and block.
    WithVersion {
        id: String,
        version: Option<String>,
        block_ref: Option<String>,
        block_range: Option<BlockRange>,
    },
    /// Conversation groups below `target` (top level when `None`).
    Groups {
        comments: Vec<HmComment>,
        target: Option<String>,
    },
    /// Thread leading up to `target`.
    Replies {
        comments: Vec<HmComment>,
        target: String,
    },
}

impl Op {
    /// Execute the command. `gateway_url` is only consulted by [Op::Normalize].
    pub fn run(&self, gateway_url: &str) -> Result<OpResult, HmError> {
        tracing::debug!("[Op::run] {self}");
        let res = match self {
            Op::Unpack(link) => OpResult::Id(
                unpack_hm_id(link)
                    .ok_or_else(|| HmError::InvalidId(format!("'{link}' is not a hypermedia link")))?,
            ),
            Op::Pack(hm_id) => OpResult::Link(hm_id.pack()),
            Op::WebUrl(hm_id, host) => OpResult::Link(create_web_hm_url(
                hm_id,
                WebHost::from_override(host.as_deref()),
            )),
            Op::Normalize(link) => OpResult::Link(normalize_hm_id(link, gateway_url).ok_or_else(
                || HmError::NotFound(format!("'{link}' is not a link on {gateway_url}")),
            )?),
            Op::WithVersion {
                id,
                version,
                block_ref,
                block_range,
            } => OpResult::Link(
                hm_id_with_version(
                    Some(id.as_str()),
                    version.as_deref(),
                    block_ref.as_deref(),
                    *block_range,
                )
                .ok_or_else(|| HmError::InvalidId(format!("'{id}' is not a hypermedia link")))?,
            ),
            Op::Groups { comments, target } => {
                OpResult::Groups(comment_groups(comments, target.as_deref()))
            }
            Op::Replies { comments, target } => {
                OpResult::Replies(comment_replies(comments, target))
            }
        };
        Ok(res)
    }
}

impl Display for Op {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            Op::Unpack(link) => write!(f, "Unpack({link})"),
            Op::Pack(hm_id) => write!(f, "Pack({})", hm_id.id),
            Op::WebUrl(hm_id, host) => write!(
                f,
                "WebUrl({}, host: {})",
                hm_id.id,
                host.as_deref().unwrap_or("<gateway>")
            ),
            Op::Normalize(link) => write!(f, "Normalize({link})"),
            Op::WithVersion { id, version, .. } => write!(
                f,
                "WithVersion({id}, version: {})",
                version.as_deref().unwrap_or("<unchanged>")
            ),
            Op::Groups { comments, target } => write!(
                f,
                "Groups({} comments, target: {})",
                comments.len(),
                target.as_deref().unwrap_or("<top level>")
            ),
            Op::Replies { comments, target } => {
                write!(f, "Replies({} comments, target: {target})", comments.len())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum OpResult {
    Id(UnpackedHmId),
    Link(String),
    Groups(Vec<CommentGroup<HmComment>>),
    Replies(Vec<Option<HmComment>>),
}

impl Display for OpResult {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            OpResult::Id(hm_id) => write!(f, "Id({})", hm_id.id),
            OpResult::Link(link) => write!(f, "Link({link})"),
            OpResult::Groups(groups) => write!(
                f,
                "Groups({})",
                groups
                    .iter()
                    .map(|g| format!("{}+{}", g.id, g.more_comments_count))
                    .collect::<Vec<String>>()
                    .join(", ")
            ),
            OpResult::Replies(thread) => write!(
                f,
                "Replies({})",
                thread
                    .iter()
                    .map(|c| c.as_ref().map(|c| c.id.as_str()).unwrap_or("-"))
                    .collect::<Vec<&str>>()
                    .join(" > ")
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hmid::HYPERMEDIA_PUBLIC_WEB_GATEWAY;
    use test_log::test;

    #[test]
    fn test_op_unpack_and_pack() -> Result<(), HmError> {
        let OpResult::Id(hm_id) = Op::Unpack("hm://comment/xyz?v=1".to_string())
            .run(HYPERMEDIA_PUBLIC_WEB_GATEWAY)?
        else {
            panic!("expected an id");
        };
        assert_eq!(hm_id.id, "hm://comment/xyz");
        let res = Op::Pack(hm_id).run(HYPERMEDIA_PUBLIC_WEB_GATEWAY)?;
        assert_eq!(res, OpResult::Link("hm://comment/xyz?v=1".to_string()));
        assert_eq!(res.to_string(), "Link(hm://comment/xyz?v=1)");
        Ok(())
    }

    #[test]
    fn test_op_errors() {
        assert!(matches!(
            Op::Unpack("ftp://x/hm/abc".to_string()).run(HYPERMEDIA_PUBLIC_WEB_GATEWAY),
            Err(HmError::InvalidId(_))
        ));
        assert!(matches!(
            Op::Normalize("https://elsewhere.org/hm/abc".to_string())
                .run(HYPERMEDIA_PUBLIC_WEB_GATEWAY),
            Err(HmError::NotFound(_))
        ));
    }

    #[test]
    fn test_op_web_url_hosts() -> Result<(), HmError> {
        let hm_id = unpack_hm_id("hm://abc").unwrap();
        let relative = Op::WebUrl(hm_id.clone(), Some(String::new())).run("")?;
        assert_eq!(relative, OpResult::Link("/hm/abc".to_string()));
        let gateway = Op::WebUrl(hm_id, None).run("")?;
        assert_eq!(gateway, OpResult::Link("https://hyper.media/hm/abc".to_string()));
        Ok(())
    }
}
