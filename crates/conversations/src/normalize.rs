//! The history normalization transform.

use tracing::debug;

use crate::{
    attachments::image_refs,
    directory::UserDirectory,
    message::{NormalizedMessage, RawMessage},
};

/// Normalize a fetched history batch into display-ready records.
///
/// One output record per input record, in input order. Timestamps become
/// message ids verbatim, the caller-supplied `channel_id` is stamped onto
/// every record, and text is copied untouched. When `resolve_names` is set,
/// sender ids are resolved through `users`; a miss leaves the name empty and
/// never aborts the batch. Image attachments are extracted into the
/// JSON-encoded `images` field; everything else contributes nothing.
///
/// The transform mutates neither `messages` nor `users`, performs no I/O,
/// and is deterministic: identical inputs produce identical outputs.
#[must_use]
pub fn normalize(
    messages: &[RawMessage],
    channel_id: &str,
    resolve_names: bool,
    users: &dyn UserDirectory,
) -> Vec<NormalizedMessage> {
    let normalized: Vec<NormalizedMessage> = messages
        .iter()
        .map(|message| {
            let user_name = if resolve_names {
                users.lookup(&message.user).unwrap_or_default()
            } else {
                String::new()
            };

            let refs = image_refs(&message.files);
            let images = if refs.is_empty() {
                None
            } else {
                // Serializing plain string triples cannot fail.
                serde_json::to_string(&refs).ok()
            };

            NormalizedMessage {
                message_id: message.ts.clone(),
                channel_id: channel_id.to_string(),
                user_id: message.user.clone(),
                user_name,
                text: message.text.clone(),
                images,
            }
        })
        .collect();

    debug!(
        channel = %channel_id,
        count = normalized.len(),
        resolve_names,
        "normalized history batch"
    );

    normalized
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::{
        directory::EmptyDirectory,
        message::{File, ImageRef, RawMessage},
    };

    fn message_with_image_and_pdf() -> RawMessage {
        RawMessage {
            ts: "1234567890.123456".into(),
            user: "U12345".into(),
            text: "Here is an image".into(),
            files: vec![
                File {
                    id: "F12345".into(),
                    name: "image.png".into(),
                    title: "My Image".into(),
                    mimetype: "image/png".into(),
                    url_private: "https://slack.com/files/image.png".into(),
                    url_private_download: "https://slack.com/files/download/image.png".into(),
                },
                File {
                    id: "F67890".into(),
                    name: "doc.pdf".into(),
                    mimetype: "application/pdf".into(),
                    ..Default::default()
                },
            ],
            ..Default::default()
        }
    }

    #[test]
    fn image_attachments_are_extracted_and_documents_dropped() {
        let messages = vec![message_with_image_and_pdf()];

        let out = normalize(&messages, "C12345", false, &EmptyDirectory);

        assert_eq!(out.len(), 1);
        let msg = &out[0];
        assert_eq!(msg.message_id, "1234567890.123456");
        assert_eq!(msg.channel_id, "C12345");
        assert_eq!(msg.user_id, "U12345");
        assert_eq!(msg.text, "Here is an image");

        let images: Vec<ImageRef> =
            serde_json::from_str(msg.images.as_deref().unwrap()).unwrap();
        assert_eq!(images, vec![ImageRef {
            id: "F12345".into(),
            title: "My Image".into(),
            url: "https://slack.com/files/download/image.png".into(),
        }]);
    }

    #[test]
    fn output_length_and_order_match_input() {
        let messages: Vec<RawMessage> = (0..5)
            .map(|i| RawMessage {
                ts: format!("170000000{i}.00000{i}"),
                user: format!("U{i}"),
                text: format!("msg {i}"),
                ..Default::default()
            })
            .collect();

        let out = normalize(&messages, "C1", false, &EmptyDirectory);

        assert_eq!(out.len(), messages.len());
        for (raw, norm) in messages.iter().zip(&out) {
            assert_eq!(norm.message_id, raw.ts);
            assert_eq!(norm.user_id, raw.user);
            assert_eq!(norm.text, raw.text);
        }
    }

    #[test]
    fn empty_batch_yields_empty_output() {
        assert!(normalize(&[], "C1", true, &EmptyDirectory).is_empty());
    }

    #[test]
    fn no_attachments_means_no_images_field() {
        let messages = vec![RawMessage {
            ts: "1.0".into(),
            user: "U1".into(),
            text: "plain".into(),
            ..Default::default()
        }];
        let out = normalize(&messages, "C1", false, &EmptyDirectory);
        assert!(out[0].images.is_none());
    }

    #[test]
    fn names_resolve_only_when_requested() {
        let directory = HashMap::from([("U12345".to_string(), "Grace Hopper".to_string())]);
        let messages = vec![message_with_image_and_pdf()];

        let resolved = normalize(&messages, "C12345", true, &directory);
        assert_eq!(resolved[0].user_name, "Grace Hopper");

        // Directory contents are irrelevant when resolution is off.
        let unresolved = normalize(&messages, "C12345", false, &directory);
        assert_eq!(unresolved[0].user_name, "");
    }

    #[test]
    fn directory_miss_leaves_name_empty() {
        let directory = HashMap::from([("UOTHER".to_string(), "Someone Else".to_string())]);
        let out = normalize(&[message_with_image_and_pdf()], "C12345", true, &directory);
        assert_eq!(out[0].user_name, "");
    }

    #[test]
    fn system_messages_with_empty_author_normalize_fine() {
        let messages = vec![RawMessage {
            ts: "1700000003.000400".into(),
            text: "channel purpose updated".into(),
            ..Default::default()
        }];
        let out = normalize(&messages, "C1", true, &EmptyDirectory);
        assert_eq!(out[0].user_id, "");
        assert_eq!(out[0].user_name, "");
    }

    #[test]
    fn multiple_images_keep_attachment_order() {
        let messages = vec![RawMessage {
            ts: "2.0".into(),
            user: "U1".into(),
            files: vec![
                File {
                    id: "F-a".into(),
                    mimetype: "image/png".into(),
                    ..Default::default()
                },
                File {
                    id: "F-b".into(),
                    mimetype: "image/jpeg".into(),
                    ..Default::default()
                },
            ],
            ..Default::default()
        }];
        let out = normalize(&messages, "C1", false, &EmptyDirectory);
        let images: Vec<ImageRef> =
            serde_json::from_str(out[0].images.as_deref().unwrap()).unwrap();
        let ids: Vec<_> = images.into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["F-a", "F-b"]);
    }

    #[test]
    fn normalization_is_idempotent() {
        let directory = HashMap::from([("U12345".to_string(), "Grace Hopper".to_string())]);
        let messages = vec![message_with_image_and_pdf()];

        let first = normalize(&messages, "C12345", true, &directory);
        let second = normalize(&messages, "C12345", true, &directory);
        assert_eq!(first, second);
    }
}
