use bytes::Bytes;
use mockito::{Matcher, Server};
use serde_json::json;

use job_board::config::CloudStorageConfig;
use job_board::gateways::{CloudStorageBucket, StorageCredentialsError};
use job_board::workflows::applications::{
    ApplicantId, BlobStore, ResumeDocument, ResumeFormat, ResumeKey, UploadError,
};

const TEST_PRIVATE_KEY: &str = include_str!("fixtures/service_account_test_key.pem");
const UPLOAD_PATH: &str = "/upload/storage/v1/b/resumes/o";

fn config(endpoint: &str, service_account_key: Option<String>) -> CloudStorageConfig {
    CloudStorageConfig {
        bucket: "resumes".to_string(),
        service_account_key,
        upload_endpoint: endpoint.to_string(),
        public_base_url: "https://storage.googleapis.com/".to_string(),
    }
}

/// Service account document whose token exchange goes to `token_uri`.
fn service_account_json(token_uri: &str) -> String {
    json!({
        "type": "service_account",
        "project_id": "job-board-test",
        "private_key_id": "test-key-id",
        "private_key": TEST_PRIVATE_KEY,
        "client_email": "intake@job-board-test.iam.gserviceaccount.com",
        "client_id": "1234567890",
        "auth_uri": "https://accounts.google.com/o/oauth2/auth",
        "token_uri": token_uri,
        "auth_provider_x509_cert_url": "https://www.googleapis.com/oauth2/v1/certs",
        "client_x509_cert_url": "https://www.googleapis.com/robot/v1/metadata/x509/intake"
    })
    .to_string()
}

async fn unsigned_bucket(endpoint: &str) -> CloudStorageBucket {
    CloudStorageBucket::connect(reqwest::Client::new(), &config(endpoint, None))
        .await
        .expect("bucket without credentials")
}

fn resume(file_name: &str) -> ResumeDocument {
    ResumeDocument {
        file_name: file_name.to_string(),
        content_type: "application/pdf".to_string(),
        format: ResumeFormat::Pdf,
        bytes: Bytes::from_static(b"%PDF-1.7"),
    }
}

fn key() -> (ApplicantId, ResumeKey) {
    let applicant_id = ApplicantId::generate();
    (
        applicant_id,
        ResumeKey::for_resume(applicant_id, &resume("resume.pdf")),
    )
}

#[tokio::test]
async fn service_account_token_signs_uploads_and_is_reused() {
    let mut server = Server::new_async().await;
    let token_uri = format!("{}/token", server.url());

    let token = server
        .mock("POST", "/token")
        .match_body(Matcher::UrlEncoded(
            "grant_type".into(),
            "urn:ietf:params:oauth:grant-type:jwt-bearer".into(),
        ))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"access_token":"ya29.intake-token","expires_in":3600,"token_type":"Bearer"}"#)
        .expect(1)
        .create_async()
        .await;
    let upload = server
        .mock("POST", UPLOAD_PATH)
        .match_query(Matcher::Any)
        .match_header("authorization", "Bearer ya29.intake-token")
        .with_status(200)
        .with_body("{}")
        .expect(2)
        .create_async()
        .await;

    let store = CloudStorageBucket::connect(
        reqwest::Client::new(),
        &config(&server.url(), Some(service_account_json(&token_uri))),
    )
    .await
    .expect("service account key accepted");

    for _ in 0..2 {
        let (_, key) = key();
        store
            .put(&key, Bytes::from_static(b"%PDF-1.7"), "application/pdf")
            .await
            .expect("upload succeeds");
    }

    token.assert_async().await;
    upload.assert_async().await;
}

#[tokio::test]
async fn failed_token_exchange_is_unavailable_and_skips_upload() {
    let mut server = Server::new_async().await;
    let token_uri = format!("{}/token", server.url());

    let _token = server
        .mock("POST", "/token")
        .with_status(400)
        .with_header("content-type", "application/json")
        .with_body(r#"{"error":"invalid_grant","error_description":"Invalid JWT Signature."}"#)
        .create_async()
        .await;
    let upload = server
        .mock("POST", UPLOAD_PATH)
        .match_query(Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let store = CloudStorageBucket::connect(
        reqwest::Client::new(),
        &config(&server.url(), Some(service_account_json(&token_uri))),
    )
    .await
    .expect("service account key accepted");
    let (_, key) = key();

    let result = store
        .put(&key, Bytes::from_static(b"%PDF-1.7"), "application/pdf")
        .await;

    assert!(matches!(result, Err(UploadError::Unavailable(_))), "{result:?}");
    upload.assert_async().await;
}

#[tokio::test]
async fn malformed_service_account_key_is_rejected_at_startup() {
    let result = CloudStorageBucket::connect(
        reqwest::Client::new(),
        &config("http://localhost:4443", Some("not a key".to_string())),
    )
    .await;

    assert!(matches!(result, Err(StorageCredentialsError::InvalidKey(_))));
}

#[tokio::test]
async fn put_uploads_media_and_returns_public_address() {
    let mut server = Server::new_async().await;
    let (applicant_id, key) = key();

    let mock = server
        .mock("POST", UPLOAD_PATH)
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("uploadType".into(), "media".into()),
            Matcher::UrlEncoded("name".into(), format!("{applicant_id}.pdf")),
        ]))
        .match_header("content-type", "application/pdf")
        .match_header("authorization", Matcher::Missing)
        .match_body("%PDF-1.7")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"kind":"storage#object","name":"ignored"}"#)
        .create_async()
        .await;

    let store = unsigned_bucket(&server.url()).await;
    let address = store
        .put(&key, Bytes::from_static(b"%PDF-1.7"), "application/pdf")
        .await
        .expect("upload succeeds");

    mock.assert_async().await;
    assert_eq!(
        address.0,
        format!("https://storage.googleapis.com/resumes/{applicant_id}.pdf")
    );
}

#[tokio::test]
async fn rejected_upload_reports_status() {
    let mut server = Server::new_async().await;
    let (_, key) = key();

    let _mock = server
        .mock("POST", UPLOAD_PATH)
        .match_query(Matcher::Any)
        .with_status(403)
        .with_body("forbidden")
        .create_async()
        .await;

    let store = unsigned_bucket(&server.url()).await;

    match store
        .put(&key, Bytes::from_static(b"%PDF-1.7"), "application/pdf")
        .await
    {
        Err(UploadError::Rejected { status, detail }) => {
            assert_eq!(status, 403);
            assert_eq!(detail, "forbidden");
        }
        other => panic!("expected rejected upload, got {other:?}"),
    }
}

#[tokio::test]
async fn public_address_follows_bucket_naming_convention() {
    let store = unsigned_bucket("http://localhost:4443").await;
    let (applicant_id, key) = key();
    assert_eq!(
        store.public_address(&key).0,
        format!("https://storage.googleapis.com/resumes/{applicant_id}.pdf")
    );
}

#[tokio::test]
async fn url_significant_file_names_resolve_to_the_uploaded_object() {
    let store = unsigned_bucket("http://localhost:4443").await;
    let applicant_id = ApplicantId::generate();

    for file_name in ["resume.pdf?download=1", "resume.pdf#page=2", "resume.100%"] {
        let key = ResumeKey::for_resume(applicant_id, &resume(file_name));
        assert_eq!(
            store.public_address(&key).0,
            format!("https://storage.googleapis.com/resumes/{applicant_id}.pdf"),
            "{file_name}"
        );
    }
}
