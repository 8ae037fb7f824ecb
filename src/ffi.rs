//! Foreign-language bindings for the identifier codec.
//!
//! App shells written in other languages build and read links through these functions. They take
//! owned values so every argument maps onto a plain uniffi type.
use crate::{
    error::HmError,
    fragment::BlockRange,
    hmid::{
        create_web_hm_url, hm_id_with_version, id_to_url, label_of_entity_type, normalize_hm_id,
        unpack_hm_id, EntityType, HmIdOptions, UnpackedHmId, WebHost,
    },
};

#[uniffi::export]
pub fn new_hm_id(
    entity_type: EntityType,
    uid: String,
    path: Option<Vec<String>>,
    version: Option<String>,
    latest: bool,
    block_ref: Option<String>,
    block_range: Option<BlockRange>,
) -> Result<UnpackedHmId, HmError> {
    UnpackedHmId::try_new(
        entity_type,
        uid,
        HmIdOptions {
            path,
            version,
            latest,
            block_ref,
            block_range,
            hostname: None,
        },
    )
}

#[uniffi::export]
pub fn unpack_link(link: String) -> Option<UnpackedHmId> {
    unpack_hm_id(&link)
}

#[uniffi::export]
pub fn pack_link(hm_id: UnpackedHmId) -> String {
    hm_id.pack()
}

/// `None` host is the public gateway, an empty host a path-only URL.
#[uniffi::export]
pub fn web_url(hm_id: UnpackedHmId, host: Option<String>) -> String {
    create_web_hm_url(&hm_id, WebHost::from_override(host.as_deref()))
}

#[uniffi::export]
pub fn share_url(hm_id: UnpackedHmId) -> String {
    id_to_url(&hm_id)
}

#[uniffi::export]
pub fn normalize_link(link: String, gateway_url: String) -> Option<String> {
    normalize_hm_id(&link, &gateway_url)
}

#[uniffi::export]
pub fn link_with_version(
    link: String,
    version: Option<String>,
    block_ref: Option<String>,
    block_range: Option<BlockRange>,
) -> Option<String> {
    hm_id_with_version(
        Some(link.as_str()),
        version.as_deref(),
        block_ref.as_deref(),
        block_range,
    )
}

#[uniffi::export]
pub fn entity_type_label(entity_type: EntityType) -> String {
    label_of_entity_type(entity_type).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn test_new_hm_id_reports_missing_uid() {
        let res = new_hm_id(EntityType::Comment, String::new(), None, None, false, None, None);
        assert!(matches!(res, Err(HmError::InvalidId(_))));
    }

    #[test]
    fn test_binding_roundtrip() {
        let hm_id = new_hm_id(
            EntityType::Comment,
            "xyz".to_string(),
            None,
            Some("v1".to_string()),
            false,
            Some("BLOCKID1".to_string()),
            Some(BlockRange::range(1, 4)),
        )
        .unwrap();
        let link = pack_link(hm_id.clone());
        assert_eq!(link, "hm://comment/xyz?v=v1#BLOCKID1[1:4]");
        let unpacked = unpack_link(link).unwrap();
        assert_eq!(unpacked.id, hm_id.id);
        assert_eq!(
            web_url(unpacked, Some("https://example.com".to_string())),
            "https://example.com/hm/comment/xyz?v=v1#BLOCKID1[1:4]"
        );
        assert_eq!(entity_type_label(EntityType::Document), "Document");
    }
}
