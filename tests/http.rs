mod common;

use common::{EMAIL, FakeUpstream, PASSWORD, spawn_upstream, unique_session_path};
use reqwest::{Client, redirect::Policy};
use serde::Deserialize;
use std::net::TcpListener;
use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::sleep;

#[derive(Debug, Deserialize)]
struct SessionSnapshot {
    authenticated: bool,
    page: String,
    mock: bool,
}

struct TestServer {
    base_url: String,
    child: Child,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

#[cfg(unix)]
mod cleanup {
    use std::sync::Mutex;
    use std::sync::Once;

    static REGISTER: Once = Once::new();
    static PIDS: Mutex<Vec<i32>> = Mutex::new(Vec::new());

    pub fn register(pid: u32) {
        if let Ok(mut pids) = PIDS.lock() {
            pids.push(pid as i32);
        }
        REGISTER.call_once(|| unsafe {
            libc::atexit(on_exit);
        });
    }

    extern "C" fn on_exit() {
        if let Ok(pids) = PIDS.lock() {
            for pid in pids.iter().copied().filter(|pid| *pid > 0) {
                unsafe {
                    libc::kill(pid, libc::SIGTERM);
                }
            }
        }
    }
}

fn pick_free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

async fn wait_until_ready(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        if let Ok(resp) = client.get(format!("{base_url}/api/session")).send().await {
            if resp.status().is_success() {
                return;
            }
        }
        if Instant::now() > deadline {
            panic!("server did not become ready");
        }
        sleep(Duration::from_millis(100)).await;
    }
}

async fn spawn_server(api_url: &str, session_path: &Path) -> TestServer {
    let port = pick_free_port();
    let child = Command::new(env!("CARGO_BIN_EXE_myvivio_web"))
        .env("PORT", port.to_string())
        .env("MYVIVIO_API_URL", api_url)
        .env("MYVIVIO_SESSION_PATH", session_path)
        .env("RUST_LOG", "info")
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .expect("failed to spawn server");

    #[cfg(unix)]
    cleanup::register(child.id());

    let base_url = format!("http://127.0.0.1:{port}");
    wait_until_ready(&base_url).await;

    TestServer { base_url, child }
}

async fn snapshot(client: &Client, server: &TestServer) -> SessionSnapshot {
    client
        .get(format!("{}/api/session", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

#[tokio::test(flavor = "multi_thread")]
async fn http_session_survives_restart() {
    let fake = Arc::new(FakeUpstream::default());
    let api_url = spawn_upstream(Arc::clone(&fake)).await;
    let session_path = unique_session_path("http_restart");
    let client = Client::builder().redirect(Policy::none()).build().unwrap();

    let first = spawn_server(&api_url, &session_path).await;
    let before = snapshot(&client, &first).await;
    assert!(!before.authenticated);
    assert!(!before.mock);

    let response = client
        .post(format!("{}/login", first.base_url))
        .form(&[("email", EMAIL), ("password", PASSWORD)])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::SEE_OTHER);
    assert!(snapshot(&client, &first).await.authenticated);
    drop(first);

    let second = spawn_server(&api_url, &session_path).await;
    let restored = snapshot(&client, &second).await;
    assert!(restored.authenticated);
    assert_eq!(restored.page, "home");

    let html = client
        .get(format!("{}/", second.base_url))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(html.contains(r#"id="dashboard-section""#));
    assert!(html.contains(r#"<span id="usuariosTotais" class="value">10</span>"#));
}

#[tokio::test(flavor = "multi_thread")]
async fn http_logout_forgets_session_across_restart() {
    let fake = Arc::new(FakeUpstream::default());
    let api_url = spawn_upstream(Arc::clone(&fake)).await;
    let session_path = unique_session_path("http_logout");
    let client = Client::builder().redirect(Policy::none()).build().unwrap();

    let first = spawn_server(&api_url, &session_path).await;
    client
        .post(format!("{}/login", first.base_url))
        .form(&[("email", EMAIL), ("password", PASSWORD)])
        .send()
        .await
        .unwrap();
    client
        .post(format!("{}/logout", first.base_url))
        .send()
        .await
        .unwrap();
    drop(first);

    let second = spawn_server(&api_url, &session_path).await;
    assert!(!snapshot(&client, &second).await.authenticated);
}
