//! HTTP client for the tester web service
//!
//! All collaborator endpoints live behind the [`ConsoleApi`] trait so the
//! run orchestrator can be driven by this reqwest client in production and
//! by a scripted stand-in under test.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;

use crate::common::{Error, Result};

use super::types::{
    Device, DeviceRegistry, FileResponse, PromptBundle, PromptBundleSet, PromptSchema, RunRequest,
    TestCatalog,
};

/// Typed access to the tester endpoints
#[async_trait]
pub trait ConsoleApi {
    /// Fetch the device registry (`GET /target`)
    async fn get_devices(&self) -> Result<DeviceRegistry>;

    /// Fetch one device (`GET /target/{name}`)
    async fn get_device(&self, name: &str) -> Result<Device>;

    /// Upsert a device (`POST /target/{name}`)
    async fn set_device(&self, name: &str, device: &Device) -> Result<()>;

    /// Remove a device (`DELETE /target/{name}`)
    async fn delete_device(&self, name: &str) -> Result<()>;

    /// Fetch all saved prompt bundles (`GET /prompts`)
    async fn get_bundles(&self) -> Result<PromptBundleSet>;

    /// Fetch the current field schema (`GET /prompts/list`)
    async fn get_schema(&self) -> Result<PromptSchema>;

    /// Upsert a bundle (`POST /prompts`)
    async fn set_bundle(&self, bundle: &PromptBundle) -> Result<()>;

    /// Remove a bundle (`DELETE /prompts/{name}`)
    async fn delete_bundle(&self, name: &str) -> Result<()>;

    /// Fetch the test catalog (`GET /test`)
    async fn get_tests(&self) -> Result<TestCatalog>;

    /// Fetch the default test order (`GET /test/order`)
    async fn get_test_order(&self) -> Result<Vec<String>>;

    /// Trigger a run (`POST /run`); fire-and-forget from the caller's view
    async fn submit_run(&self, request: &RunRequest) -> Result<()>;

    /// Fetch the next output chunk (`GET /run/output`), `None` when nothing
    /// is pending
    async fn fetch_output(&self) -> Result<Option<String>>;

    /// Upload a file (`POST /file`), returns the assigned handle
    async fn upload_file(&self, path: &Path) -> Result<FileResponse>;

    /// Delete an uploaded file (`DELETE /file/{name}`)
    async fn delete_file(&self, name: &str) -> Result<()>;
}

/// reqwest-backed [`ConsoleApi`] against a configured base URL
pub struct HttpApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpApi {
    /// Create a client for the given base URL with a per-request timeout
    pub fn new(base_url: &str, request_timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| Error::http(base_url, e))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// GET an endpoint and decode its JSON body
    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self
            .client
            .get(self.url(path))
            .send()
            .await
            .map_err(|e| Error::http(path, e))?;
        let response = check_status(path, response)?;
        response.json().await.map_err(|e| Error::http(path, e))
    }

    /// POST a JSON body, discarding the response body
    async fn post_json<T: serde::Serialize>(&self, path: &str, body: &T) -> Result<()> {
        let response = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(|e| Error::http(path, e))?;
        check_status(path, response)?;
        Ok(())
    }

    async fn delete(&self, path: &str) -> Result<()> {
        let response = self
            .client
            .delete(self.url(path))
            .send()
            .await
            .map_err(|e| Error::http(path, e))?;
        check_status(path, response)?;
        Ok(())
    }
}

fn check_status(path: &str, response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(Error::api(path, status.as_u16()))
    }
}

#[async_trait]
impl ConsoleApi for HttpApi {
    async fn get_devices(&self) -> Result<DeviceRegistry> {
        self.get_json("/target").await
    }

    async fn get_device(&self, name: &str) -> Result<Device> {
        self.get_json(&format!("/target/{name}")).await
    }

    async fn set_device(&self, name: &str, device: &Device) -> Result<()> {
        self.post_json(&format!("/target/{name}"), device).await
    }

    async fn delete_device(&self, name: &str) -> Result<()> {
        self.delete(&format!("/target/{name}")).await
    }

    async fn get_bundles(&self) -> Result<PromptBundleSet> {
        self.get_json("/prompts").await
    }

    async fn get_schema(&self) -> Result<PromptSchema> {
        self.get_json("/prompts/list").await
    }

    async fn set_bundle(&self, bundle: &PromptBundle) -> Result<()> {
        self.post_json("/prompts", bundle).await
    }

    async fn delete_bundle(&self, name: &str) -> Result<()> {
        self.delete(&format!("/prompts/{name}")).await
    }

    async fn get_tests(&self) -> Result<TestCatalog> {
        self.get_json("/test").await
    }

    async fn get_test_order(&self) -> Result<Vec<String>> {
        self.get_json("/test/order").await
    }

    async fn submit_run(&self, request: &RunRequest) -> Result<()> {
        self.post_json("/run", request).await
    }

    async fn fetch_output(&self) -> Result<Option<String>> {
        let path = "/run/output";
        let response = self
            .client
            .get(self.url(path))
            .send()
            .await
            .map_err(|e| Error::http(path, e))?;
        let response = check_status(path, response)?;
        // The output endpoint serves text/plain; an empty body means no new
        // data is pending.
        let body = response.text().await.map_err(|e| Error::http(path, e))?;
        if body.is_empty() {
            Ok(None)
        } else {
            Ok(Some(body))
        }
    }

    async fn upload_file(&self, file: &Path) -> Result<FileResponse> {
        let path = "/file";
        let bytes = tokio::fs::read(file).await.map_err(|e| Error::FileRead {
            path: file.display().to_string(),
            error: e.to_string(),
        })?;
        let file_name = file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        let part = reqwest::multipart::Part::bytes(bytes).file_name(file_name);
        let form = reqwest::multipart::Form::new().part("file", part);
        let response = self
            .client
            .post(self.url(path))
            .multipart(form)
            .send()
            .await
            .map_err(|e| Error::http(path, e))?;
        let response = check_status(path, response)?;
        response.json().await.map_err(|e| Error::http(path, e))
    }

    async fn delete_file(&self, name: &str) -> Result<()> {
        self.delete(&format!("/file/{name}")).await
    }
}
