//! Reply grouping over a realistic comment dump.

mod common;

use common::{init_logging, load_fixture_comments};
use hm_core::{
    commands::{Op, OpResult},
    comments::{comment_groups, comment_replies, HmComment},
    hmid::{EntityType, HYPERMEDIA_PUBLIC_WEB_GATEWAY},
};
use test_log::test;

fn ids(comments: &[HmComment]) -> Vec<&str> {
    comments.iter().map(|c| c.id.as_str()).collect()
}

#[test]
fn test_document_level_groups() {
    init_logging();
    let comments = load_fixture_comments();
    let groups = comment_groups(&comments, None);

    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].id, "z6Mk/c1");
    assert_eq!(ids(&groups[0].comments), vec!["z6Mk/c1", "z6Mk/c2"]);
    assert_eq!(groups[0].more_comments_count, 3);
    assert_eq!(groups[1].id, "z6Mk/c3");
    assert_eq!(ids(&groups[1].comments), vec!["z6Mk/c3"]);
    assert_eq!(groups[1].more_comments_count, 0);
}

#[test]
fn test_replies_to_branching_comment() {
    let comments = load_fixture_comments();
    let groups = comment_groups(&comments, Some("z6Mk/c2"));

    assert_eq!(groups.len(), 2);
    assert_eq!(ids(&groups[0].comments), vec!["z6Mk/c4"]);
    assert_eq!(ids(&groups[1].comments), vec!["z6Mk/c5", "z6Mk/c6"]);
    assert!(groups.iter().all(|g| g.more_comments_count == 0));
}

#[test]
fn test_thread_to_deepest_reply() {
    let comments = load_fixture_comments();
    let thread = comment_replies(&comments, "z6Mk/c6");

    let ids: Vec<Option<&str>> = thread
        .iter()
        .map(|c| c.as_ref().map(|c| c.id.as_str()))
        .collect();
    assert_eq!(
        ids,
        vec![
            None,
            Some("z6Mk/c1"),
            Some("z6Mk/c2"),
            Some("z6Mk/c5"),
            Some("z6Mk/c6")
        ]
    );
}

#[test]
fn test_comment_targets_unpack() {
    let comments = load_fixture_comments();
    let target = comments[2].target_id().unwrap();
    assert_eq!(target.entity_type, EntityType::Document);
    assert_eq!(target.version.as_deref(), Some("bafy1"));
    assert_eq!(target.block_ref.as_deref(), Some("BLOCKID1"));
    assert!(comments[5].content.is_null());
    assert_eq!(comments[0].create_time.as_deref(), Some("2024-05-02T10:00:00Z"));
}

#[test]
fn test_groups_through_op() -> Result<(), hm_core::HmError> {
    let comments = load_fixture_comments();
    let res = Op::Groups {
        comments: comments.clone(),
        target: None,
    }
    .run(HYPERMEDIA_PUBLIC_WEB_GATEWAY)?;
    assert_eq!(res.to_string(), "Groups(z6Mk/c1+3, z6Mk/c3+0)");

    let OpResult::Groups(groups) = res else {
        panic!("expected groups");
    };
    let json = serde_json::to_value(&groups).unwrap();
    assert_eq!(json[0]["moreCommentsCount"], 3);
    assert_eq!(json[0]["comments"][1]["repliedComment"], "z6Mk/c1");

    let res = Op::Replies {
        comments,
        target: "z6Mk/c4".to_string(),
    }
    .run(HYPERMEDIA_PUBLIC_WEB_GATEWAY)?;
    assert_eq!(res.to_string(), "Replies(- > z6Mk/c1 > z6Mk/c2 > z6Mk/c4)");
    Ok(())
}
