//! [crate::hmid] contains [UnpackedHmId], the structured form of a hypermedia identifier, and the
//! codecs converting it to and from `hm://` links and public web gateway URLs.
//!
//! Compact form:
//!
//! ```text
//! hm://[<type>/]<uid>[/<path...>][?v=<version>][&l][#<blockId>[<range>]]
//! ```
//!
//! Web form:
//!
//! ```text
//! <hostname>/hm/[<type>/]<uid>[/<path...>][?v=<version>][&l][#<blockId>[<range>]]
//! ```
//!
//! The `type` segment is omitted for documents in both forms.
use serde::{Deserialize, Serialize};
use std::{
    fmt::{Display, Formatter},
    str::FromStr,
};

use crate::{
    error::HmError,
    fragment::{parse_fragment, serialize_block_range, BlockRange},
    parsed_url::ParsedUrl,
};

pub const HYPERMEDIA_PUBLIC_WEB_GATEWAY: &str = "https://hyper.media";

pub const HYPERMEDIA_SCHEME: &str = "hm";

/// Path segment marking a hypermedia resource inside a web URL.
pub const WEB_PATH_MARKER: &str = "hm";

/// Kinds of entity an identifier can point at.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    uniffi::Enum,
)]
pub enum EntityType {
    #[default]
    #[serde(rename = "d")]
    Document,
    #[serde(rename = "comment")]
    Comment,
    #[serde(rename = "draft")]
    Draft,
}

impl EntityType {
    pub const ALL: [EntityType; 3] = [EntityType::Document, EntityType::Comment, EntityType::Draft];

    /// The key used for this type in link paths.
    pub fn key(&self) -> &'static str {
        match self {
            EntityType::Document => "d",
            EntityType::Comment => "comment",
            EntityType::Draft => "draft",
        }
    }

    pub fn from_key(key: &str) -> Option<EntityType> {
        EntityType::ALL.into_iter().find(|t| t.key() == key)
    }

    pub fn is_default(&self) -> bool {
        *self == EntityType::Document
    }
}

impl Display for EntityType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl FromStr for EntityType {
    type Err = HmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EntityType::from_key(s)
            .ok_or_else(|| HmError::InvalidId(format!("unknown entity type '{s}'")))
    }
}

/// Human readable label for an entity type.
pub fn label_of_entity_type(entity_type: EntityType) -> &'static str {
    match entity_type {
        EntityType::Document => "Document",
        EntityType::Comment => "Comment",
        EntityType::Draft => "Local Draft",
    }
}

/// Identifies the URL scheme of a candidate link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HmScheme {
    /// `hm://`
    Hypermedia,
    Http,
    Https,
    Unknown,
}

impl HmScheme {
    pub fn is_web(&self) -> bool {
        matches!(self, HmScheme::Http | HmScheme::Https)
    }
}

impl From<&str> for HmScheme {
    fn from(scheme_str: &str) -> Self {
        match scheme_str.to_lowercase().trim() {
            HYPERMEDIA_SCHEME => HmScheme::Hypermedia,
            "http" => HmScheme::Http,
            "https" => HmScheme::Https,
            _ => HmScheme::Unknown,
        }
    }
}

/// Optional parts of an identifier, used when constructing one with [UnpackedHmId::new].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct HmIdOptions {
    pub path: Option<Vec<String>>,
    pub version: Option<String>,
    pub latest: bool,
    pub block_ref: Option<String>,
    pub block_range: Option<BlockRange>,
    pub hostname: Option<String>,
}

/// The structured form of a hypermedia identifier.
///
/// `id` is the compact link built from `entity_type`, `uid` and `path` only. It leaves out
/// version, block and host, so it is a stable key for the entity regardless of view state.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, uniffi::Record)]
#[serde(rename_all = "camelCase")]
pub struct UnpackedHmId {
    pub id: String,
    #[serde(rename = "type")]
    pub entity_type: EntityType,
    pub uid: String,
    pub path: Option<Vec<String>>,
    pub version: Option<String>,
    #[serde(default)]
    pub latest: bool,
    pub block_ref: Option<String>,
    pub block_range: Option<BlockRange>,
    pub hostname: Option<String>,
    pub scheme: Option<String>,
}

impl UnpackedHmId {
    /// Build an identifier.
    ///
    /// # Panics
    ///
    /// Panics if `uid` is empty. Use [UnpackedHmId::try_new] for uids of unknown origin.
    pub fn new(entity_type: EntityType, uid: impl Into<String>, opts: HmIdOptions) -> UnpackedHmId {
        let uid = uid.into();
        assert!(!uid.is_empty(), "uid is required");
        let path = normalize_path(opts.path);
        let block_ref = opts.block_ref.filter(|b| !b.is_empty());
        // Packed links only carry a range after a block id, and `{expanded: false}` packs to
        // nothing.
        let block_range = opts
            .block_range
            .filter(|range| {
                block_ref.is_some() && !matches!(range, BlockRange::Expanded { expanded: false })
            });
        UnpackedHmId {
            id: pack_base_id(entity_type, &uid, path.as_deref()),
            entity_type,
            uid,
            path,
            version: opts.version.filter(|v| !v.is_empty()),
            latest: opts.latest,
            block_ref,
            block_range,
            hostname: opts.hostname.filter(|h| !h.is_empty()),
            scheme: None,
        }
    }

    pub fn try_new(
        entity_type: EntityType,
        uid: impl Into<String>,
        opts: HmIdOptions,
    ) -> Result<UnpackedHmId, HmError> {
        let uid = uid.into();
        if uid.is_empty() {
            return Err(HmError::InvalidId("uid is required".to_string()));
        }
        Ok(UnpackedHmId::new(entity_type, uid, opts))
    }

    /// The compact `hm://` link with version, latest flag and block reference.
    pub fn pack(&self) -> String {
        let mut res = pack_base_id(self.entity_type, &self.uid, self.path.as_deref());
        res.push_str(&self.view_suffix());
        res
    }

    /// Query and fragment suffix shared by every packed form.
    fn view_suffix(&self) -> String {
        view_suffix(
            self.version.as_deref(),
            self.latest,
            self.block_ref.as_deref(),
            self.block_range.as_ref(),
        )
    }

    /// The same identifier pinned to another version and block.
    ///
    /// A missing `version` keeps the current one. Block fields are always replaced. Path is
    /// kept. Host and the latest flag are dropped.
    pub fn with_version(
        &self,
        version: Option<&str>,
        block_ref: Option<&str>,
        block_range: Option<BlockRange>,
    ) -> UnpackedHmId {
        let version = version
            .filter(|v| !v.is_empty())
            .or(self.version.as_deref());
        UnpackedHmId::new(
            self.entity_type,
            self.uid.clone(),
            HmIdOptions {
                path: self.path.clone(),
                version: version.map(str::to_string),
                block_ref: block_ref.map(str::to_string),
                block_range,
                ..Default::default()
            },
        )
    }
}

/// Display writes the compact `hm://` link, see [UnpackedHmId::pack].
impl Display for UnpackedHmId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.pack())
    }
}

impl FromStr for UnpackedHmId {
    type Err = HmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        unpack_hm_id(s).ok_or_else(|| HmError::InvalidId(format!("'{s}' is not a hypermedia link")))
    }
}

/// Shorthand for a document identifier.
pub fn hm_doc_id(uid: impl Into<String>, opts: HmIdOptions) -> UnpackedHmId {
    UnpackedHmId::new(EntityType::Document, uid, opts)
}

/// Drop empty leading and trailing segments; an empty result means "no path".
fn normalize_path(path: Option<Vec<String>>) -> Option<Vec<String>> {
    let path = path?;
    let start = path.iter().position(|s| !s.is_empty())?;
    let end = path.iter().rposition(|s| !s.is_empty()).map_or(start, |idx| idx + 1);
    Some(path[start..end].to_vec())
}

fn pack_base_id(entity_type: EntityType, uid: &str, path: Option<&[String]>) -> String {
    let rest_path = match path {
        Some(path) if !path.is_empty() => format!("/{}", path.join("/")),
        _ => String::new(),
    };
    if entity_type.is_default() {
        format!("{HYPERMEDIA_SCHEME}://{uid}{rest_path}")
    } else {
        format!("{HYPERMEDIA_SCHEME}://{entity_type}/{uid}{rest_path}")
    }
}

fn view_suffix(
    version: Option<&str>,
    latest: bool,
    block_ref: Option<&str>,
    block_range: Option<&BlockRange>,
) -> String {
    let mut query = Vec::new();
    if let Some(version) = version.filter(|v| !v.is_empty()) {
        query.push(format!("v={version}"));
    }
    if latest {
        query.push("l".to_string());
    }
    let mut res = String::new();
    if !query.is_empty() {
        res.push('?');
        res.push_str(&query.join("&"));
    }
    if let Some(block_ref) = block_ref.filter(|b| !b.is_empty()) {
        res.push('#');
        res.push_str(block_ref);
        res.push_str(&serialize_block_range(block_range));
    }
    res
}

/// Pack an identifier into its compact `hm://` link.
pub fn pack_hm_id(hm_id: &UnpackedHmId) -> String {
    hm_id.pack()
}

/// Host prefix for [create_web_hm_url].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum WebHost<'a> {
    /// [HYPERMEDIA_PUBLIC_WEB_GATEWAY]
    #[default]
    Gateway,
    /// No host at all, producing a path-only URL.
    Relative,
    /// A caller supplied origin, used verbatim.
    Origin(&'a str),
}

impl<'a> WebHost<'a> {
    /// Map an optional host override: `None` is the gateway, `Some("")` a path-only URL.
    pub fn from_override(host: Option<&'a str>) -> WebHost<'a> {
        match host {
            None => WebHost::Gateway,
            Some("") => WebHost::Relative,
            Some(origin) => WebHost::Origin(origin),
        }
    }

    fn prefix(&self) -> &str {
        match self {
            WebHost::Gateway => HYPERMEDIA_PUBLIC_WEB_GATEWAY,
            WebHost::Relative => "",
            WebHost::Origin(origin) => origin,
        }
    }
}

/// Build the public web URL of an identifier: `<host>/hm/[<type>/]<uid>[/<path>]...`.
pub fn create_web_hm_url(hm_id: &UnpackedHmId, host: WebHost<'_>) -> String {
    let web_path = if hm_id.entity_type.is_default() {
        format!("/{WEB_PATH_MARKER}/{}", hm_id.uid)
    } else {
        format!("/{WEB_PATH_MARKER}/{}/{}", hm_id.entity_type, hm_id.uid)
    };
    let mut res = format!("{}{web_path}", host.prefix());
    if let Some(path) = hm_id.path.as_ref().filter(|p| !p.is_empty()) {
        res.push('/');
        res.push_str(&path.join("/"));
    }
    res.push_str(&hm_id.view_suffix());
    res
}

/// Parts of a site-relative URL, see [create_site_url].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SiteUrlParts<'a> {
    pub hostname: &'a str,
    pub path: Option<&'a [String]>,
    pub version: Option<&'a str>,
    pub latest: bool,
    pub block_ref: Option<&'a str>,
    pub block_range: Option<BlockRange>,
}

/// Build a URL on a site that serves documents at their plain path (no `/hm/` marker).
pub fn create_site_url(parts: &SiteUrlParts<'_>) -> String {
    let mut res = format!("{}/", parts.hostname);
    if let Some(path) = parts.path.filter(|p| !p.is_empty()) {
        res.push_str(&path.join("/"));
    }
    res.push_str(&view_suffix(
        parts.version,
        parts.latest,
        parts.block_ref,
        parts.block_range.as_ref(),
    ));
    res
}

/// Web URL of an identifier on the host it was unpacked from.
///
/// Identifiers without a host (compact links, freshly built ids) give a path-only URL. Web
/// links record their host without the scheme, so the recorded scheme is put back in front
/// of it.
pub fn id_to_url(hm_id: &UnpackedHmId) -> String {
    let Some(hostname) = hm_id.hostname.as_deref() else {
        return create_web_hm_url(hm_id, WebHost::Relative);
    };
    match hm_id.scheme.as_deref() {
        Some(scheme) if HmScheme::from(scheme).is_web() && !hostname.contains("://") => {
            let origin = format!("{scheme}://{hostname}");
            create_web_hm_url(hm_id, WebHost::Origin(&origin))
        }
        _ => create_web_hm_url(hm_id, WebHost::Origin(hostname)),
    }
}

/// Parse an `hm://` link or a `http(s)://<host>/hm/...` web URL.
///
/// Returns `None` for anything else, including web URLs without the `/hm/` marker.
pub fn unpack_hm_id(hypermedia_id: &str) -> Option<UnpackedHmId> {
    let parsed = ParsedUrl::parse(hypermedia_id)?;
    let (hostname, uid_or_type, rest) = match HmScheme::from(parsed.scheme) {
        HmScheme::Http | HmScheme::Https => {
            if parsed.segment(1) != Some(WEB_PATH_MARKER) {
                tracing::debug!("[unpack_hm_id] '{hypermedia_id}' has no /hm/ path marker");
                return None;
            }
            (parsed.segment(0), parsed.segment(2)?, parsed.path.get(3..)?)
        }
        HmScheme::Hypermedia => (None, parsed.segment(0)?, &parsed.path[1..]),
        HmScheme::Unknown => {
            tracing::debug!("[unpack_hm_id] unsupported scheme '{}'", parsed.scheme);
            return None;
        }
    };

    let (entity_type, uid, rest_path) = match EntityType::from_key(uid_or_type) {
        Some(entity_type) => (entity_type, *rest.first()?, rest.get(1..).unwrap_or_default()),
        None => (EntityType::Document, uid_or_type, rest),
    };
    if uid.is_empty() {
        return None;
    }

    let fragment = parsed.fragment.and_then(parse_fragment);
    let (block_ref, block_range) = match fragment {
        Some(fragment) => (Some(fragment.block_id), fragment.range),
        None => (None, None),
    };

    let mut hm_id = UnpackedHmId::new(
        entity_type,
        uid,
        HmIdOptions {
            path: Some(rest_path.iter().map(|s| s.to_string()).collect()),
            version: parsed.query_value("v").map(str::to_string),
            latest: parsed.has_query_key("l"),
            block_ref,
            block_range,
            hostname: hostname.map(str::to_string),
        },
    );
    hm_id.scheme = Some(parsed.scheme.to_string());
    Some(hm_id)
}

/// Whether `url` uses the `hm://` scheme. Case-insensitive, like [unpack_hm_id].
pub fn is_hypermedia_scheme(url: &str) -> bool {
    url.split_once("://")
        .is_some_and(|(scheme, _)| HmScheme::from(scheme) == HmScheme::Hypermedia)
}

/// Whether `text` points at the configured gateway. A plain prefix test.
pub fn is_public_gateway_link(text: &str, gateway_url: &str) -> bool {
    text.starts_with(gateway_url)
}

/// Canonicalize a pasted or typed link to its compact `hm://` form.
///
/// `hm://` links are returned as-is. Links on `gateway_url` are unpacked and re-packed
/// keeping type, uid, version and block reference. Anything else yields `None`.
pub fn normalize_hm_id(url_maybe: &str, gateway_url: &str) -> Option<String> {
    if is_hypermedia_scheme(url_maybe) {
        return Some(url_maybe.to_string());
    }
    if !is_public_gateway_link(url_maybe, gateway_url) {
        return None;
    }
    let unpacked = unpack_hm_id(url_maybe)?;
    let normalized = UnpackedHmId::new(
        unpacked.entity_type,
        unpacked.uid,
        HmIdOptions {
            version: unpacked.version,
            block_ref: unpacked.block_ref,
            block_range: unpacked.block_range,
            ..Default::default()
        },
    );
    Some(normalized.pack())
}

/// Re-pack the link `id` pinned to `version` and the given block reference.
///
/// Returns `None` when `id` is missing or does not unpack.
pub fn hm_id_with_version(
    id: Option<&str>,
    version: Option<&str>,
    block_ref: Option<&str>,
    block_range: Option<BlockRange>,
) -> Option<String> {
    let unpacked = unpack_hm_id(id.filter(|id| !id.is_empty())?)?;
    Some(unpacked.with_version(version, block_ref, block_range).pack())
}

/// Append view parameters to an already packed document link.
///
/// `block_ref` may carry its own leading `#`.
pub fn append_view_params(
    document_link: &str,
    version: Option<&str>,
    latest: bool,
    block_ref: Option<&str>,
    block_range: Option<BlockRange>,
) -> String {
    let block_ref = block_ref.map(|b| b.strip_prefix('#').unwrap_or(b));
    format!(
        "{document_link}{}",
        view_suffix(version, latest, block_ref, block_range.as_ref())
    )
}
