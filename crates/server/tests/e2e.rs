use std::net::SocketAddr;

use reqwest::StatusCode as HttpStatusCode;
use serde_json::{json, Value};
use service::students::StudentStore;
use tokio::net::TcpListener;
use uuid::Uuid;

use server::startup::router_for;

struct TestApp {
    base_url: String,
}

async fn start_server() -> anyhow::Result<TestApp> {
    let data_file = std::env::temp_dir().join(format!("e2e_students_{}.json", Uuid::new_v4()));
    let store = StudentStore::new(&data_file).await?;
    let app = router_for(store);

    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let base_url = format!("http://{}:{}", addr.ip(), addr.port());

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await { eprintln!("server error: {}", e); }
    });

    Ok(TestApp { base_url })
}

#[tokio::test]
async fn e2e_student_lifecycle_over_http() -> anyhow::Result<()> {
    let app = start_server().await?;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{}/students", app.base_url))
        .json(&json!({"name": "Grace", "grades": [88, 92]}))
        .send()
        .await?;
    assert_eq!(resp.status(), HttpStatusCode::CREATED);
    let created: Value = resp.json().await?;
    let id = created["id"].as_str().unwrap_or_default().to_string();

    let resp = client.get(format!("{}/students/{}/average", app.base_url, id)).send().await?;
    assert_eq!(resp.status(), HttpStatusCode::OK);
    let avg: Value = resp.json().await?;
    assert_eq!(avg["average"].as_f64(), Some(90.0));

    // CORS is enabled for browser clients
    let resp = client
        .get(format!("{}/students", app.base_url))
        .header("origin", "http://example.com")
        .send()
        .await?;
    assert!(resp.headers().contains_key("access-control-allow-origin"));

    let resp = client.delete(format!("{}/students/{}", app.base_url, id)).send().await?;
    assert_eq!(resp.status(), HttpStatusCode::NO_CONTENT);

    let resp = client.get(format!("{}/students/{}", app.base_url, id)).send().await?;
    assert_eq!(resp.status(), HttpStatusCode::NOT_FOUND);
    let err: Value = resp.json().await?;
    assert_eq!(err, json!({"error": "Student not found"}));
    Ok(())
}
