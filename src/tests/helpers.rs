//! Shared test utilities for identifier and comment tests

use crate::{
    comments::HmComment,
    fragment::BlockRange,
    hmid::{EntityType, HmIdOptions, UnpackedHmId},
};

/// Initialize logging for tests
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init()
        .ok();
}

/// Helper function to create a comment replying to `replied` ("" for top level)
pub fn create_test_comment(id: &str, replied: &str) -> HmComment {
    HmComment {
        id: id.to_string(),
        target: "hm://doc-uid".to_string(),
        replied_comment: replied.to_string(),
        author: "author-uid".to_string(),
        content: serde_json::json!([{ "type": "paragraph", "text": id }]),
        ..Default::default()
    }
}

/// The reply layout used across grouping tests:
///
/// ```text
/// a ── b ── d
///  └── c
/// ```
pub fn create_branching_comments() -> Vec<HmComment> {
    vec![
        create_test_comment("a", ""),
        create_test_comment("b", "a"),
        create_test_comment("c", "a"),
        create_test_comment("d", "b"),
    ]
}

pub fn comment_ids(comments: &[HmComment]) -> Vec<&str> {
    comments.iter().map(|c| c.id.as_str()).collect()
}

/// Identifiers covering every entity type and every optional field combination worth
/// round-tripping.
pub fn create_test_ids() -> Vec<UnpackedHmId> {
    init_logging();
    let mut ids = Vec::new();
    let paths = [None, Some(vec!["sub".to_string()]), Some(vec!["a".to_string(), "b".to_string()])];
    let views = [
        HmIdOptions::default(),
        HmIdOptions {
            version: Some("bafy2bzace".to_string()),
            ..Default::default()
        },
        HmIdOptions {
            latest: true,
            ..Default::default()
        },
        HmIdOptions {
            version: Some("v7".to_string()),
            latest: true,
            block_ref: Some("BLOCKID1".to_string()),
            ..Default::default()
        },
        HmIdOptions {
            block_ref: Some("BLOCKID2".to_string()),
            block_range: Some(BlockRange::expanded()),
            ..Default::default()
        },
        HmIdOptions {
            block_ref: Some("BLOCKID4".to_string()),
            block_range: Some(BlockRange::Expanded { expanded: false }),
            ..Default::default()
        },
        HmIdOptions {
            version: Some("v1".to_string()),
            block_ref: Some("BLOCKID3".to_string()),
            block_range: Some(BlockRange::range(2, 17)),
            ..Default::default()
        },
    ];
    for entity_type in EntityType::ALL {
        for path in paths.iter() {
            for view in views.iter() {
                ids.push(UnpackedHmId::new(
                    entity_type,
                    "z6MkuBbsB1HbSNXLvJCRCrPhimY6g7tzhr",
                    HmIdOptions {
                        path: path.clone(),
                        ..view.clone()
                    },
                ));
            }
        }
    }
    ids
}

/// Assert the fields carried by a packed link survived a round trip.
pub fn assert_same_link_fields(expected: &UnpackedHmId, actual: &UnpackedHmId) {
    assert_eq!(expected.id, actual.id);
    assert_eq!(expected.entity_type, actual.entity_type);
    assert_eq!(expected.uid, actual.uid);
    assert_eq!(expected.path, actual.path);
    assert_eq!(expected.version, actual.version);
    assert_eq!(expected.latest, actual.latest);
    assert_eq!(expected.block_ref, actual.block_ref);
    assert_eq!(expected.block_range, actual.block_range);
}
