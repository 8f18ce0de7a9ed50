//! End-to-end runs of the blocking HTTP client against a stubbed API.

use std::io::Write;

use osbulk::{BulkClient, Config, Error, FileType};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

fn archive() -> Vec<u8> {
    let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
    for (name, body) in [
        ("AK/32/AK_32_bills.csv", "id,identifier\nb1,HB 1\nb2,HB 2\n"),
        (
            "AK/32/AK_32_bill_sources.csv",
            "id,bill_id,url\ns1,b1,https://akleg.gov/1\n",
        ),
    ] {
        zip.start_file(name, SimpleFileOptions::default()).unwrap();
        zip.write_all(body.as_bytes()).unwrap();
    }
    zip.finish().unwrap().into_inner()
}

async fn mount_sessions(server: &MockServer, times: u64) {
    Mock::given(method("GET"))
        .and(path("/jurisdictions/ak"))
        .and(query_param("apikey", "test-key"))
        .and(query_param("include", "legislative_sessions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "legislative_sessions": [
                {
                    "identifier": "32",
                    "downloads": [{"url": format!("{}/csv/AK_32_csv.zip", server.uri())}]
                }
            ]
        })))
        .expect(times)
        .mount(server)
        .await;
}

#[tokio::test(flavor = "multi_thread")]
async fn downloads_archive_once_and_joins() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    mount_sessions(&server, 2).await;
    Mock::given(method("GET"))
        .and(path("/csv/AK_32_csv.zip"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(archive()))
        .expect(1)
        .mount(&server)
        .await;

    let cache = tempfile::tempdir()?;
    let config = Config::new("test-key")?
        .with_api_base(&server.uri())?
        .with_cache_dir(cache.path());

    let (rows, joined_rows) = tokio::task::spawn_blocking(move || {
        let client = BulkClient::new(config)?;
        let rows = client.load_rows("ak", "32", FileType::Bills)?;
        let joined = client.load_joined("ak", "32", FileType::Sources)?;
        Ok::<_, Error>((rows.len(), joined.num_rows()))
    })
    .await??;

    assert_eq!(rows, 2);
    assert_eq!(joined_rows, 2);
    assert!(cache.path().join("AK_32_csv.zip").exists());
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn unknown_session_is_reported() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    mount_sessions(&server, 1).await;

    let cache = tempfile::tempdir()?;
    let config = Config::new("test-key")?
        .with_api_base(&server.uri())?
        .with_cache_dir(cache.path());

    let result = tokio::task::spawn_blocking(move || {
        BulkClient::new(config)?.resolver().resolve("ak", "nonexistent-2099")
    })
    .await?;

    assert!(matches!(result, Err(Error::InvalidSession { .. })));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn server_errors_propagate_as_http() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/jurisdictions/ak"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let cache = tempfile::tempdir()?;
    let config = Config::new("test-key")?
        .with_api_base(&server.uri())?
        .with_cache_dir(cache.path());

    let result = tokio::task::spawn_blocking(move || {
        BulkClient::new(config)?.load_rows("ak", "32", FileType::Bills)
    })
    .await?;

    match result {
        Err(Error::Http(e)) => assert_eq!(e.status().map(|s| s.as_u16()), Some(500)),
        other => panic!("expected Http error, got {other:?}"),
    }
    Ok(())
}
