use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::Value;

/// A server process with its own store file, killed on drop
pub struct TestServer {
    pub base_url: String,
    pub store_path: PathBuf,
    child: Child,
    _dir: tempfile::TempDir,
}

impl TestServer {
    /// Spawn the built binary against a fresh store seeded with `collection`
    pub async fn start(collection: &Value) -> Result<Self> {
        let dir = tempfile::tempdir().context("failed to create temp dir")?;
        let store_path = dir.path().join("crush.json");
        std::fs::write(&store_path, collection.to_string()).context("failed to seed store")?;

        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let child = Command::new(env!("CARGO_BIN_EXE_crush-api"))
            .env("APP_ENV", "development")
            .env("CRUSH_API_HOST", "127.0.0.1")
            .env("CRUSH_API_PORT", port.to_string())
            .env("CRUSH_STORE_PATH", &store_path)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()
            .context("failed to spawn server binary")?;

        let server = Self {
            base_url,
            store_path,
            child,
            _dir: dir,
        };
        server.wait_ready(Duration::from_secs(10)).await?;
        Ok(server)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Current contents of the store file
    pub fn persisted(&self) -> Result<Value> {
        let bytes = std::fs::read(&self.store_path).context("failed to read store")?;
        serde_json::from_slice(&bytes).context("store is not JSON")
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            if let Ok(resp) = client.get(self.url("/")).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

pub fn fixture() -> Value {
    serde_json::json!([
        { "id": 1, "name": "Madonna", "age": 62, "date": { "datedAt": "23/10/2020", "rate": 5 } },
        { "id": 2, "name": "Ana Maria", "age": 56, "date": { "datedAt": "22/10/2019", "rate": 5 } },
        { "id": 3, "name": "Keanu Reeves", "age": 56, "date": { "datedAt": "22/10/2019", "rate": 5 } }
    ])
}
