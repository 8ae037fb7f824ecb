//! # hm-core
//!
//! A Rust library for reading and writing hypermedia links and for rebuilding comment threads
//! around them.
//!
//! ## Overview
//!
//! Every published document, comment and local draft is addressed by an identifier that has
//! three interchangeable surface forms:
//!
//! - the structured [`hmid::UnpackedHmId`],
//! - the compact custom-scheme link `hm://[<type>/]<uid>[/<path>]`,
//! - the public web URL `https://hyper.media/hm/[<type>/]<uid>[/<path>]`.
//!
//! Both string forms can carry a version (`?v=`), a "latest" flag (`&l`) and a reference to a
//! block inside the document (`#<blockId>`), optionally narrowed to a character range
//! (`#<blockId>[2:5]`) or marked as expanded (`#<blockId>+`).
//!
//! ## Architecture
//!
//! - **[`parsed_url`]**: Generic `scheme://path?query#fragment` splitting
//! - **[`fragment`]**: Block reference fragment grammar (`BlockRange`, `parse_fragment`)
//! - **[`hmid`]**: Identifier model, packing to `hm://` and web URLs, unpacking, link
//!   normalization
//! - **[`comments`]**: Reply chain grouping (`comment_groups`) and thread walks
//!   (`comment_replies`)
//! - **[`config`]**: Gateway configuration stored as TOML
//! - **[`commands`]**: `Op`/`OpResult` command surface used by the `hm` CLI
//! - **[`ffi`]**: uniffi bindings for app shells in other languages
//!
//! ## Quick Start
//!
//! ```rust
//! use hm_core::hmid::{create_web_hm_url, unpack_hm_id, WebHost};
//!
//! let id = unpack_hm_id("https://hyper.media/hm/comment/xyz?v=v1#BLOCKID1[2:5]").unwrap();
//! assert_eq!(id.id, "hm://comment/xyz");
//! assert_eq!(id.pack(), "hm://comment/xyz?v=v1#BLOCKID1[2:5]");
//! assert_eq!(
//!     create_web_hm_url(&id, WebHost::Relative),
//!     "/hm/comment/xyz?v=v1#BLOCKID1[2:5]"
//! );
//! ```
//!
//! ### Canonicalizing pasted links
//!
//! ```rust
//! use hm_core::hmid::normalize_hm_id;
//!
//! let gateway = "https://hyper.media";
//! assert_eq!(
//!     normalize_hm_id("https://hyper.media/hm/abc?v=v2", gateway).as_deref(),
//!     Some("hm://abc?v=v2")
//! );
//! assert_eq!(normalize_hm_id("https://example.com/page", gateway), None);
//! ```
//!
//! ### Comment threads
//!
//! ```rust
//! use hm_core::comments::{comment_groups, HmComment};
//!
//! let comment = |id: &str, replied: &str| HmComment {
//!     id: id.to_string(),
//!     replied_comment: replied.to_string(),
//!     ..Default::default()
//! };
//! let comments = vec![comment("a", ""), comment("b", "a"), comment("c", "b")];
//! let groups = comment_groups(&comments, None);
//! assert_eq!(groups.len(), 1);
//! assert_eq!(groups[0].comments.len(), 3);
//! assert_eq!(groups[0].more_comments_count, 0);
//! ```
//!
//! ## Error Handling
//!
//! Parsing never fails loudly: anything that is not a hypermedia link unpacks to `None`, and a
//! fragment outside the block grammar is kept as a raw block id. Only building an identifier
//! without a uid is treated as a bug and panics ([`hmid::UnpackedHmId::new`]); fallible
//! surfaces (config files, the CLI, FFI) report [`HmError`].
//!
//! ## Features
//!
//! - **default**: Library only
//! - **bin**: The `hm` command line tool

pub mod commands;
pub mod comments;
pub mod config;
pub mod error;
pub mod ffi;
pub mod fragment;
pub mod hmid;
pub mod parsed_url;
#[cfg(test)]
mod tests;

pub use error::*;

uniffi::setup_scaffolding!();
