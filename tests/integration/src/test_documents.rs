//! List / remove / rename / share integration tests.

#[cfg(test)]
mod tests {
    use serde_json::Value;

    use crate::{
        cleanup_prefix, endpoint, http_client, object_exists, put_object, s3_client, test_prefix,
    };

    async fn list(prefix: &str, delimiter: &str) -> Vec<String> {
        let resp = http_client()
            .get(endpoint(
                "/list-documents",
                &[("prefix", prefix), ("delimiter", delimiter)],
            ))
            .send()
            .await
            .expect("list request");
        assert_eq!(resp.status(), 200);
        let json: Value = resp.json().await.expect("list json");
        json["payload"]
            .as_array()
            .expect("entry list")
            .iter()
            .map(|e| e["key"].as_str().unwrap_or_default().to_owned())
            .collect()
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_split_folders_and_files() {
        let s3 = s3_client();
        let prefix = test_prefix("list");
        put_object(&s3, &format!("{prefix}sub/"), b"").await;
        put_object(&s3, &format!("{prefix}a.txt"), b"alpha").await;
        put_object(&s3, &format!("{prefix}sub/b.txt"), b"beta").await;

        // Nested markers roll up into common prefixes; the marker at the
        // listed level is returned as an entry.
        let folders = list(&prefix, "/").await;
        assert!(folders.is_empty());
        let folders = list(&format!("{prefix}sub/"), "/").await;
        assert_eq!(folders, vec![format!("{prefix}sub/")]);

        let files = list(&prefix, "").await;
        assert_eq!(
            files,
            vec![format!("{prefix}a.txt"), format!("{prefix}sub/b.txt")]
        );

        cleanup_prefix(&s3, &prefix).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_remove_idempotently() {
        let s3 = s3_client();
        let prefix = test_prefix("rm");
        let key = format!("{prefix}doomed.txt");
        put_object(&s3, &key, b"bye").await;

        for _ in 0..2 {
            let resp = http_client()
                .delete(endpoint("/remove-document", &[("fileKey", key.as_str())]))
                .send()
                .await
                .expect("remove");
            assert_eq!(resp.status(), 200);
            let json: Value = resp.json().await.expect("remove json");
            assert_eq!(json["payload"], true);
        }
        assert!(!object_exists(&s3, &key).await);
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_rename_document() {
        let s3 = s3_client();
        let prefix = test_prefix("mv");
        let old_key = format!("{prefix}draft final.txt");
        let new_key = format!("{prefix}final.txt");
        put_object(&s3, &old_key, b"content").await;

        let resp = http_client()
            .patch(endpoint(
                "/rename-document",
                &[("oldFileKey", old_key.as_str()), ("newFileKey", new_key.as_str())],
            ))
            .send()
            .await
            .expect("rename");
        assert_eq!(resp.status(), 200);

        assert!(!object_exists(&s3, &old_key).await);
        assert!(object_exists(&s3, &new_key).await);
        cleanup_prefix(&s3, &prefix).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_fail_rename_of_missing_key() {
        let prefix = test_prefix("mv404");
        let resp = http_client()
            .patch(endpoint(
                "/rename-document",
                &[
                    ("oldFileKey", format!("{prefix}ghost.txt").as_str()),
                    ("newFileKey", format!("{prefix}other.txt").as_str()),
                ],
            ))
            .send()
            .await
            .expect("rename");
        assert_eq!(resp.status(), 500);
        assert!(!object_exists(&s3_client(), &format!("{prefix}other.txt")).await);
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_share_downloadable_link() {
        let s3 = s3_client();
        let prefix = test_prefix("share");
        let key = format!("{prefix}report.pdf");
        put_object(&s3, &key, b"%PDF-1.7").await;

        let resp = http_client()
            .get(endpoint(
                "/generate-share-url",
                &[("fileKey", key.as_str()), ("expiresIn", "300")],
            ))
            .send()
            .await
            .expect("share");
        assert_eq!(resp.status(), 200);
        let json: Value = resp.json().await.expect("share json");
        let url = json["payload"].as_str().expect("url").to_owned();

        let download = http_client().get(url).send().await.expect("download");
        assert_eq!(download.status(), 200);
        let disposition = download
            .headers()
            .get("content-disposition")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_owned();
        assert_eq!(disposition, "attachment");
        assert_eq!(download.bytes().await.expect("bytes").as_ref(), b"%PDF-1.7");

        cleanup_prefix(&s3, &prefix).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_reject_bad_share_expiry() {
        for expires_in in ["0", "604801", "tomorrow"] {
            let resp = http_client()
                .get(endpoint(
                    "/generate-share-url",
                    &[("fileKey", "a.pdf"), ("expiresIn", expires_in)],
                ))
                .send()
                .await
                .expect("share");
            assert_eq!(resp.status(), 400, "expiresIn={expires_in}");
        }
    }
}
