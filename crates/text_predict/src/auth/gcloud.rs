//! Access tokens from the gcloud CLI's active account

use std::future::Future;
use std::time::Duration;
use tokio::process::Command;
use tracing::debug;

use super::token::{AccessToken, TokenProvider};
use crate::config::CLIENT_CONFIG;
use crate::error::{PredictError, Result};

/// Reads the active identity's token via `gcloud auth print-access-token`
#[derive(Debug, Clone)]
pub struct GcloudTokenProvider {
    gcloud_path: String,
    timeout: Duration,
}

impl Default for GcloudTokenProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl GcloudTokenProvider {
    /// Use `gcloud` from PATH
    pub fn new() -> Self {
        Self {
            gcloud_path: "gcloud".to_string(),
            timeout: CLIENT_CONFIG.token_timeout,
        }
    }

    /// Use a specific gcloud binary
    pub fn with_path(gcloud_path: impl Into<String>) -> Self {
        Self {
            gcloud_path: gcloud_path.into(),
            ..Self::new()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn fetch(&self) -> Result<AccessToken> {
        debug!("Requesting access token from {}", self.gcloud_path);

        let output = tokio::time::timeout(
            self.timeout,
            Command::new(&self.gcloud_path)
                .arg("auth")
                .arg("print-access-token")
                .kill_on_drop(true)
                .output(),
        )
        .await
        .map_err(|_| {
            PredictError::Authentication(format!(
                "gcloud timed out after {}s",
                self.timeout.as_secs()
            ))
        })?
        .map_err(|e| {
            PredictError::Authentication(format!(
                "Failed to run '{}': {}",
                self.gcloud_path, e
            ))
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(PredictError::Authentication(format!(
                "gcloud auth print-access-token failed: {}",
                stderr.trim()
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        // gcloud may print warnings before the token; the token is the last line
        let token = stdout.lines().rev().find(|l| !l.trim().is_empty()).unwrap_or("");
        AccessToken::new(token)
    }
}

impl TokenProvider for GcloudTokenProvider {
    fn access_token(&self) -> impl Future<Output = Result<AccessToken>> + Send {
        self.fetch()
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use std::path::{Path, PathBuf};
    use tempfile::tempdir;

    fn fake_gcloud(dir: &Path, script: &str) -> PathBuf {
        let path = dir.join("gcloud");
        std::fs::write(&path, format!("#!/bin/sh\n{}\n", script)).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[tokio::test]
    async fn test_token_from_stdout() {
        let dir = tempdir().unwrap();
        let path = fake_gcloud(dir.path(), r#"[ "$1 $2" = "auth print-access-token" ] && echo ya29.fake"#);

        let provider = GcloudTokenProvider::with_path(path.to_string_lossy());
        let token = provider.access_token().await.unwrap();
        assert_eq!(token.secret(), "ya29.fake");
    }

    #[tokio::test]
    async fn test_last_line_wins() {
        let dir = tempdir().unwrap();
        let path = fake_gcloud(dir.path(), "echo 'WARNING: update available'\necho ya29.late\necho");

        let provider = GcloudTokenProvider::with_path(path.to_string_lossy());
        assert_eq!(provider.access_token().await.unwrap().secret(), "ya29.late");
    }

    #[tokio::test]
    async fn test_non_zero_exit_is_authentication_error() {
        let dir = tempdir().unwrap();
        let path = fake_gcloud(
            dir.path(),
            "echo 'ERROR: (gcloud.auth) You do not currently have an active account' >&2\nexit 1",
        );

        let provider = GcloudTokenProvider::with_path(path.to_string_lossy());
        let err = provider.access_token().await.unwrap_err();
        assert!(err.is_authentication());
        assert!(err.to_string().contains("active account"));
    }

    #[tokio::test]
    async fn test_missing_binary_is_authentication_error() {
        let dir = tempdir().unwrap();
        let provider =
            GcloudTokenProvider::with_path(dir.path().join("no-such-gcloud").to_string_lossy());
        assert!(provider.access_token().await.unwrap_err().is_authentication());
    }

    #[tokio::test]
    async fn test_timeout_is_authentication_error() {
        let dir = tempdir().unwrap();
        let path = fake_gcloud(dir.path(), "sleep 5");

        let provider = GcloudTokenProvider::with_path(path.to_string_lossy())
            .with_timeout(Duration::from_millis(200));
        let started = std::time::Instant::now();
        assert!(provider.access_token().await.unwrap_err().is_authentication());
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_timed_out_gcloud_is_killed() {
        let dir = tempdir().unwrap();
        let marker = dir.path().join("still-running");
        let path = fake_gcloud(
            dir.path(),
            &format!("sleep 1\ntouch '{}'\necho ya29.late", marker.display()),
        );

        let provider = GcloudTokenProvider::with_path(path.to_string_lossy())
            .with_timeout(Duration::from_millis(200));
        assert!(provider.access_token().await.unwrap_err().is_authentication());

        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert!(!marker.exists());
    }
}
