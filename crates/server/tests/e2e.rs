use std::net::SocketAddr;

use reqwest::StatusCode;
use serde_json::{json, Value};
use tokio::net::TcpListener;

use server::state::AppState;
use service::{Services, Stores};

struct TestApp {
    base_url: String,
}

/// In-memory backend by default; set `E2E_DATABASE=1` with `DATABASE_URL` to run
/// the same flow against PostgreSQL.
async fn start_server() -> anyhow::Result<TestApp> {
    let services = if std::env::var("E2E_DATABASE").is_ok() && std::env::var("DATABASE_URL").is_ok() {
        let db = models::db::connect().await?;
        use migration::MigratorTrait;
        migration::Migrator::up(&db, None).await?;
        Services::new(Stores::sea_orm(db))
    } else {
        Services::in_memory()
    };
    let app = server::build_app(AppState::new(services));

    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            eprintln!("server error: {}", e);
        }
    });
    Ok(TestApp { base_url: format!("http://{}", addr) })
}

// Ids derived from the pid keep reruns against a shared database apart.
fn base_id() -> i32 {
    (std::process::id() % 100_000) as i32 * 10 + 1_000_000
}

#[tokio::test]
async fn e2e_public_health() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = reqwest::get(format!("{}/health", app.base_url)).await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.json::<Value>().await?, json!({"status": "ok"}));

    let docs = reqwest::get(format!("{}/api-docs/openapi.json", app.base_url)).await?;
    assert_eq!(docs.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn e2e_schedule_a_session() -> anyhow::Result<()> {
    let app = start_server().await?;
    let http = reqwest::Client::new();
    let id = base_id();
    let username = format!("therapist_{id}");

    let user = json!({
        "user_id": id,
        "first_name": "Theo",
        "last_name": "Rapist",
        "username": username,
        "password": "Passw0rd!"
    });
    let res = http.post(format!("{}/api/user", app.base_url)).json(&user).send().await?;
    assert_eq!(res.status(), StatusCode::CREATED);

    let grant = json!({"permission_id": id, "user_id": id, "role": "therapist"});
    let res = http.post(format!("{}/api/permission", app.base_url)).json(&grant).send().await?;
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = http
        .post(format!("{}/api/user/login", app.base_url))
        .json(&json!({"username": username, "password": "Passw0rd!"}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let event = json!({
        "event_id": id,
        "therapist_id": id,
        "activity_name": "gait training",
        "start_time": "2010-02-08T09:00:00",
        "end_time": "2010-02-08T10:00:00",
        "notes": "first session"
    });
    let res = http.post(format!("{}/api/therapistevent", app.base_url)).json(&event).send().await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let location = res
        .headers()
        .get(reqwest::header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    assert_eq!(location, Some(format!("/api/therapistevent/{id}")));

    let window = json!({"start_time": "2010-02-08T00:00:00", "end_time": "2010-02-08T23:59:59", "therapist_id": id});
    let found: Vec<Value> = http
        .post(format!("{}/api/therapistevent/therapist", app.base_url))
        .json(&window)
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(found.len(), 1);
    assert_eq!(found[0]["notes"], "first session");

    // cleanup so the database variant can be rerun
    for path in [
        format!("/api/therapistevent/{id}"),
        format!("/api/permission/{id}"),
        format!("/api/user/{id}"),
    ] {
        let res = http.delete(format!("{}{}", app.base_url, path)).send().await?;
        assert_eq!(res.status(), StatusCode::OK, "{path}");
    }
    Ok(())
}
