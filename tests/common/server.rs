//! Test server management.
//!
//! Spawns and manages tictacd instances for integration testing.

use std::process::{Child, Command, Stdio};
use std::time::Duration;
use tempfile::TempDir;
use tokio::time::sleep;

/// A test server instance.
pub struct TestServer {
    child: Child,
    port: u16,
    _data_dir: TempDir,
}

impl TestServer {
    /// Spawn a server with an in-memory SQLite archive.
    pub async fn spawn() -> anyhow::Result<Self> {
        Self::spawn_with_archive("sqlite", ":memory:").await
    }

    /// Spawn a server with a redb archive file inside its data directory.
    #[allow(dead_code)]
    pub async fn spawn_redb() -> anyhow::Result<Self> {
        Self::spawn_with_archive("redb", "matches.redb").await
    }

    /// Spawn a server allowing only `events_per_second` frames per connection.
    #[allow(dead_code)]
    pub async fn spawn_rate_limited(events_per_second: u32) -> anyhow::Result<Self> {
        Self::spawn_with("sqlite", ":memory:", events_per_second).await
    }

    /// Spawn a server with the given archive backend. A relative `path` is
    /// placed inside the server's temporary data directory.
    pub async fn spawn_with_archive(backend: &str, path: &str) -> anyhow::Result<Self> {
        Self::spawn_with(backend, path, 1000).await
    }

    async fn spawn_with(
        backend: &str,
        path: &str,
        events_per_second: u32,
    ) -> anyhow::Result<Self> {
        let data_dir = tempfile::tempdir()?;
        let port = free_port()?;

        let archive_path = if path == ":memory:" {
            path.to_string()
        } else {
            data_dir.path().join(path).display().to_string()
        };

        let config_path = data_dir.path().join("config.toml");
        let config_content = format!(
            r#"
[server]
name = "test.server"
metrics_port = 0

[listen]
address = "127.0.0.1:{port}"

[archive]
backend = "{backend}"
path = "{archive_path}"

[limits]
events_per_second = {events_per_second}
"#
        );
        std::fs::write(&config_path, config_content)?;

        let child = Command::new(env!("CARGO_BIN_EXE_tictacd"))
            .arg(&config_path)
            .env("RUST_LOG", "warn")
            .stdout(Stdio::null())
            .spawn()?;

        let server = Self {
            child,
            port,
            _data_dir: data_dir,
        };

        server.wait_until_ready().await?;
        Ok(server)
    }

    /// Wait until the server is accepting connections.
    async fn wait_until_ready(&self) -> anyhow::Result<()> {
        for _ in 0..50 {
            if tokio::net::TcpStream::connect(("127.0.0.1", self.port))
                .await
                .is_ok()
            {
                return Ok(());
            }
            sleep(Duration::from_millis(100)).await;
        }
        anyhow::bail!("Server failed to start within 5 seconds")
    }

    /// Get the server address.
    pub fn address(&self) -> String {
        format!("127.0.0.1:{}", self.port)
    }

    /// Create a new test client connected to this server.
    pub async fn connect(&self) -> anyhow::Result<super::client::TestClient> {
        super::client::TestClient::connect(&self.address()).await
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

/// Ask the OS for a port that is free right now.
fn free_port() -> std::io::Result<u16> {
    let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
    Ok(listener.local_addr()?.port())
}
