use std::{path::Path, sync::Arc};

use reqwest::StatusCode;
use serde_json::{Value, json};
use server::{router, server_state::ServerState};
use tokio_util::sync::CancellationToken;
use workout_mapper_data_management::{DataManager, events::TracingEvents, options::ApplicationOptions};

const ROUTE_1: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx version="1.1" creator="Apple Health Export" xmlns="http://www.topografix.com/GPX/1/1">
  <trk>
    <name>Route 1</name>
    <trkseg>
      <trkpt lon="-0.1285907" lat="51.5080900"><time>2021-05-04T11:25:35Z</time></trkpt>
      <trkpt lon="-0.1440787" lat="51.5013640"><time>2021-05-04T11:45:12Z</time></trkpt>
    </trkseg>
  </trk>
</gpx>
"#;

const ROUTE_2: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx version="1.1" creator="Apple Health Export" xmlns="http://www.topografix.com/GPX/1/1">
  <trk>
    <name>Route 2</name>
    <trkseg>
      <trkpt lon="-0.1285907" lat="51.5080900"><time>2021-05-05T11:25:35Z</time></trkpt>
    </trkseg>
  </trk>
</gpx>
"#;

struct TestServer {
    base_url: String,
    shutdown: CancellationToken,
    _dir: tempfile::TempDir,
}

async fn start_server() -> TestServer {
    let dir = tempfile::tempdir().unwrap();
    let data_directory = dir.path().join("App_Data");
    let static_directory = dir.path().join("wwwroot");

    std::fs::create_dir_all(&data_directory).unwrap();
    std::fs::create_dir_all(&static_directory).unwrap();
    std::fs::write(data_directory.join("route_1.gpx"), ROUTE_1).unwrap();
    std::fs::write(data_directory.join("route_2.gpx"), ROUTE_2).unwrap();
    std::fs::write(static_directory.join("index.html"), "<html>Workout Mapper</html>").unwrap();
    std::fs::write(static_directory.join("main.js"), "console.log('Workout Mapper');").unwrap();

    let options = ApplicationOptions {
        data_directory,
        google_maps_api_key: "test-key".into(),
        ..Default::default()
    };

    let data_manager = DataManager::start(options, Arc::new(TracingEvents)).await.unwrap();
    let shutdown = CancellationToken::new();
    let state = Arc::new(ServerState {
        data_manager,
        shutdown: shutdown.clone(),
    });

    let app = router(state, Path::new(&static_directory));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestServer {
        base_url: format!("http://{address}"),
        shutdown,
        _dir: dir,
    }
}

async fn import(server: &TestServer) -> reqwest::Response {
    reqwest::Client::new()
        .post(format!("{}/api/tracks/import", server.base_url))
        .send()
        .await
        .unwrap()
}

async fn get_json(server: &TestServer, path: &str) -> Value {
    let response = reqwest::get(format!("{}{}", server.base_url, path)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    response.json().await.unwrap()
}

#[tokio::test]
async fn empty_store_has_no_tracks() {
    let server = start_server().await;

    assert_eq!(get_json(&server, "/api/tracks/count").await, json!({ "count": 0 }));
    assert_eq!(get_json(&server, "/api/tracks").await, json!([]));
}

#[tokio::test]
async fn import_returns_created_with_count() {
    let server = start_server().await;

    let response = import(&server).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(response.json::<Value>().await.unwrap(), json!({ "count": 2 }));

    // A second import replaces the first.
    let response = import(&server).await;
    assert_eq!(response.json::<Value>().await.unwrap(), json!({ "count": 2 }));
    assert_eq!(get_json(&server, "/api/tracks/count").await, json!({ "count": 2 }));
}

#[tokio::test]
async fn tracks_are_listed_in_order() {
    let server = start_server().await;
    import(&server).await;

    let tracks = get_json(&server, "/api/tracks").await;
    let tracks = tracks.as_array().unwrap();

    assert_eq!(tracks.len(), 2);
    assert_eq!(tracks[0]["name"], "Route 1");
    assert_eq!(tracks[0]["points"].as_array().unwrap().len(), 2);
    assert_eq!(tracks[0]["points"][0]["longitude"], -0.1285907);
    assert_eq!(tracks[0]["points"][0]["latitude"], 51.50809);
    assert!(tracks[0]["points"][0]["timestamp"].as_str().unwrap().starts_with("2021-05-04T11:25:35"));
    assert_eq!(tracks[1]["name"], "Route 2");
}

#[tokio::test]
async fn tracks_can_be_filtered() {
    let server = start_server().await;
    import(&server).await;

    let recent = get_json(&server, "/api/tracks?notBefore=2021-05-05T00:00:00Z").await;
    assert_eq!(recent.as_array().unwrap().len(), 1);
    assert_eq!(recent[0]["name"], "Route 2");

    let older = get_json(&server, "/api/tracks?notAfter=2021-05-05T11:25:35Z").await;
    assert_eq!(older.as_array().unwrap().len(), 1);
    assert_eq!(older[0]["name"], "Route 1");

    let response = reqwest::get(format!("{}/api/tracks?notBefore=yesterday", server.base_url))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn summary_covers_filtered_tracks() {
    let server = start_server().await;
    import(&server).await;

    let summary = get_json(&server, "/api/tracks/summary").await;
    assert_eq!(summary["count"], 2);
    assert_eq!(summary["tracks"][0]["name"], "Route 1");
    assert_eq!(summary["tracks"][0]["durationSeconds"], 1177);
    assert!(summary["totalDistanceMeters"].as_f64().unwrap() > 1000.0);

    let summary = get_json(&server, "/api/tracks/summary?notBefore=2021-05-05T00:00:00Z").await;
    assert_eq!(summary["count"], 1);
    assert_eq!(summary["totalDistanceMeters"], 0.0);
}

#[tokio::test]
async fn model_uses_latest_track() {
    let server = start_server().await;
    import(&server).await;

    let model = get_json(&server, "/api/model").await;

    assert_eq!(model["googleMapsApiKey"], "test-key");
    assert_eq!(model["endDate"], "2021-05-06");
    assert_eq!(model["startDate"], "2021-04-08");
}

#[tokio::test]
async fn static_files_are_served() {
    let server = start_server().await;

    let response = reqwest::get(format!("{}/", server.base_url)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.text().await.unwrap(), "<html>Workout Mapper</html>");
}

#[tokio::test]
async fn static_files_carry_cache_headers() {
    let server = start_server().await;

    let response = reqwest::get(format!("{}/", server.base_url)).await.unwrap();
    assert_eq!(response.headers()["cache-control"], "max-age=604800");

    let response = reqwest::get(format!("{}/main.js", server.base_url)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["cache-control"], "max-age=31536000");

    let response = reqwest::get(format!("{}/missing.js", server.base_url)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(response.headers().get("cache-control").is_none());

    let response = reqwest::get(format!("{}/api/tracks/count", server.base_url)).await.unwrap();
    assert!(response.headers().get("cache-control").is_none());
}

#[tokio::test]
async fn responses_are_compressed_when_accepted() {
    let server = start_server().await;
    import(&server).await;

    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/api/tracks", server.base_url))
        .header("accept-encoding", "gzip")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["content-encoding"], "gzip");

    let response = client
        .get(format!("{}/api/tracks", server.base_url))
        .header("accept-encoding", "br")
        .send()
        .await
        .unwrap();
    assert_eq!(response.headers()["content-encoding"], "br");

    let response = client.get(format!("{}/api/tracks", server.base_url)).send().await.unwrap();
    assert!(response.headers().get("content-encoding").is_none());
}

#[tokio::test]
async fn requests_after_shutdown_are_rejected() {
    let server = start_server().await;
    server.shutdown.cancel();

    let response = reqwest::get(format!("{}/api/tracks", server.base_url)).await.unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let response = import(&server).await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}
