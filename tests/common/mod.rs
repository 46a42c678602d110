#![allow(dead_code)]

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use myvivio_web::session::SessionStore;
use myvivio_web::{AppState, Config, DurableStore, Gateway, HttpGateway, router};
use reqwest::{Client, redirect::Policy};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

pub const EMAIL: &str = "ana@vivio.com";
pub const PASSWORD: &str = "segredo";
pub const TOKEN: &str = "tok-123";
pub const TAKEN_EMAIL: &str = "taken@vivio.com";
pub const BROKEN_EMAIL: &str = "broken@vivio.com";

/// In-process stand-in for the Myvivio API.
pub struct FakeUpstream {
    pub stats: Mutex<Value>,
    pub metrics: Mutex<Value>,
    pub history: Mutex<Value>,
    pub programs: Mutex<Value>,
    stats_delay_ms: AtomicU64,
    hits: AtomicUsize,
    failures: Mutex<HashMap<&'static str, (StatusCode, Option<String>)>>,
    empty_token: AtomicBool,
}

impl Default for FakeUpstream {
    fn default() -> Self {
        Self {
            stats: Mutex::new(json!({
                "risco_desistencia": 12.5,
                "usuarios_totais": 10,
                "usuarios_ativos": 8,
                "visitantes": 2,
                "programas": {"expirado": 1, "não-atribuído": 2, "atribuído": 3}
            })),
            metrics: Mutex::new(json!({
                "taxa_engajamento": 75.0,
                "roi": 12.0,
                "produtividade": 80.0,
                "usuarios_ativos": 8
            })),
            history: Mutex::new(json!([])),
            programs: Mutex::new(json!([])),
            stats_delay_ms: AtomicU64::new(0),
            hits: AtomicUsize::new(0),
            failures: Mutex::new(HashMap::new()),
            empty_token: AtomicBool::new(false),
        }
    }
}

impl FakeUpstream {
    pub fn set(&self, slot: &Mutex<Value>, value: Value) {
        *slot.lock().unwrap() = value;
    }

    pub fn delay_stats(&self, delay: Duration) {
        self.stats_delay_ms
            .store(delay.as_millis() as u64, Ordering::SeqCst);
    }

    /// Makes `path` answer `status`, with a JSON `detail` when one is given.
    pub fn fail(&self, path: &'static str, status: StatusCode, detail: Option<&str>) {
        self.failures
            .lock()
            .unwrap()
            .insert(path, (status, detail.map(str::to_string)));
    }

    pub fn issue_empty_token(&self) {
        self.empty_token.store(true, Ordering::SeqCst);
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    fn hit(&self) {
        self.hits.fetch_add(1, Ordering::SeqCst);
    }

    fn failure(&self, path: &str) -> Option<Response> {
        let failures = self.failures.lock().unwrap();
        let (status, detail) = failures.get(path)?;
        Some(match detail {
            Some(detail) => (*status, Json(json!({"detail": detail}))).into_response(),
            None => (*status).into_response(),
        })
    }
}

type Fake = Arc<FakeUpstream>;

fn authorized(headers: &HeaderMap) -> bool {
    let expected = format!("Bearer {TOKEN}");
    headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        == Some(expected.as_str())
}

fn unauthorized() -> Response {
    (StatusCode::UNAUTHORIZED, Json(json!({"detail": "Token inválido"}))).into_response()
}

async fn login(State(fake): State<Fake>, Json(body): Json<Value>) -> Response {
    fake.hit();
    if body["email"] == EMAIL && body["senha"] == PASSWORD {
        let token = if fake.empty_token.load(Ordering::SeqCst) { "" } else { TOKEN };
        Json(json!({"access_token": token, "nome": "Ana"})).into_response()
    } else {
        (StatusCode::UNAUTHORIZED, Json(json!({"detail": "Incorrect credentials"}))).into_response()
    }
}

async fn register(State(fake): State<Fake>, Json(body): Json<Value>) -> Response {
    fake.hit();
    if body["email"] == TAKEN_EMAIL {
        (StatusCode::BAD_REQUEST, Json(json!({"detail": "E-mail já cadastrado"}))).into_response()
    } else if body["email"] == BROKEN_EMAIL {
        StatusCode::INTERNAL_SERVER_ERROR.into_response()
    } else {
        StatusCode::CREATED.into_response()
    }
}

async fn stats(State(fake): State<Fake>, headers: HeaderMap) -> Response {
    fake.hit();
    if !authorized(&headers) {
        return unauthorized();
    }
    if let Some(response) = fake.failure("/stats/overview") {
        return response;
    }
    // Snapshot before sleeping so a delayed response carries the old payload.
    let body = fake.stats.lock().unwrap().clone();
    let delay = fake.stats_delay_ms.load(Ordering::SeqCst);
    if delay > 0 {
        tokio::time::sleep(Duration::from_millis(delay)).await;
    }
    Json(body).into_response()
}

async fn metrics(State(fake): State<Fake>, headers: HeaderMap) -> Response {
    fake.hit();
    if !authorized(&headers) {
        return unauthorized();
    }
    if let Some(response) = fake.failure("/metricas/ia") {
        return response;
    }
    Json(fake.metrics.lock().unwrap().clone()).into_response()
}

async fn history(State(fake): State<Fake>, headers: HeaderMap) -> Response {
    fake.hit();
    if !authorized(&headers) {
        return unauthorized();
    }
    if let Some(response) = fake.failure("/agendas/historico") {
        return response;
    }
    Json(fake.history.lock().unwrap().clone()).into_response()
}

async fn create(State(fake): State<Fake>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    fake.hit();
    if !authorized(&headers) {
        return unauthorized();
    }
    let mut history = fake.history.lock().unwrap();
    let Some(items) = history.as_array_mut() else {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    };
    let id = items.len() as u64 + 1;
    let mut created = body;
    created["id"] = json!(id);
    created["concluida"] = json!(false);
    items.push(created);
    StatusCode::CREATED.into_response()
}

async fn complete(State(fake): State<Fake>, headers: HeaderMap, Path(id): Path<u64>) -> Response {
    fake.hit();
    if !authorized(&headers) {
        return unauthorized();
    }
    let mut history = fake.history.lock().unwrap();
    if let Some(items) = history.as_array_mut() {
        for item in items.iter_mut().filter(|item| item["id"] == id) {
            item["concluida"] = json!(true);
        }
    }
    StatusCode::NO_CONTENT.into_response()
}

async fn programs(State(fake): State<Fake>, headers: HeaderMap) -> Response {
    fake.hit();
    if !authorized(&headers) {
        return unauthorized();
    }
    if let Some(response) = fake.failure("/programas") {
        return response;
    }
    Json(fake.programs.lock().unwrap().clone()).into_response()
}

async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

pub async fn spawn_upstream(fake: Fake) -> String {
    let app = Router::new()
        .route("/login", post(login))
        .route("/registrar", post(register))
        .route("/stats/overview", get(stats))
        .route("/metricas/ia", get(metrics))
        .route("/agendas/historico", get(history))
        .route("/agendas/criar", post(create))
        .route("/agendas/:id/concluir", put(complete))
        .route("/programas", get(programs))
        .with_state(fake);
    serve(app).await
}

pub fn unique_session_path(label: &str) -> PathBuf {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let mut path = std::env::temp_dir();
    path.push(format!("myvivio_{label}_{}_{nanos}", std::process::id()));
    path.push("session.json");
    path
}

pub struct TestClient {
    pub base_url: String,
    pub state: AppState,
    pub browser: Client,
}

impl TestClient {
    pub async fn post(&self, path: &str, form: &[(&str, &str)]) -> reqwest::Response {
        let response = self
            .browser
            .post(format!("{}{path}", self.base_url))
            .form(form)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "POST {path}");
        response
    }

    pub async fn page(&self) -> String {
        self.browser
            .get(format!("{}/", self.base_url))
            .send()
            .await
            .unwrap()
            .text()
            .await
            .unwrap()
    }

    pub async fn session(&self) -> Value {
        self.browser
            .get(format!("{}/api/session", self.base_url))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap()
    }

    pub async fn login(&self) {
        self.post("/login", &[("email", EMAIL), ("password", PASSWORD)])
            .await;
    }

    pub async fn slot(&self, slot: myvivio_web::render::Slot) -> String {
        self.state.client.lock().await.dom.get(slot).to_string()
    }
}

pub async fn spawn_client_with(gateway: Arc<dyn Gateway>, config: Config) -> TestClient {
    let store = DurableStore::open(&config.session_path).await;
    let session = SessionStore::restore(store);
    let state = AppState::new(config, gateway, session);
    myvivio_web::loads::bootstrap(&state).await;
    let base_url = serve(router(state.clone())).await;
    let browser = Client::builder().redirect(Policy::none()).build().unwrap();
    TestClient {
        base_url,
        state,
        browser,
    }
}

/// Writes a stored token as if an earlier run had logged in.
pub async fn seed_session(path: &std::path::Path, token: &str) {
    tokio::fs::create_dir_all(path.parent().unwrap()).await.unwrap();
    let body = json!({ "authToken": token }).to_string();
    tokio::fs::write(path, body).await.unwrap();
}

/// An address nothing listens on.
pub fn closed_upstream() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

pub async fn spawn_client(upstream_url: &str, session_path: PathBuf) -> TestClient {
    let config = Config {
        api_base_url: Some(upstream_url.to_string()),
        session_path,
        ..Config::default()
    };
    let gateway = HttpGateway::new(upstream_url, config.request_timeout).unwrap();
    spawn_client_with(Arc::new(gateway), config).await
}
