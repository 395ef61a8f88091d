// Script endpoints
//
// Scripts are addressed by filename under `/api/script/{name}`; running
// one is a plain GET on `/api/run/{name}`.

use tracing::debug;

use crate::device::client::DeviceApi;
use crate::error::ApiFailure;
use crate::models::ScriptBody;

impl DeviceApi {
    /// Fetch a script body.
    ///
    /// `GET /api/script/{name}`
    pub async fn get_script(&self, name: &str) -> Result<ScriptBody, ApiFailure> {
        let url = self.endpoint_url(&["api", "script", name]);
        self.get(url).await
    }

    /// Create or overwrite a script.
    ///
    /// `POST /api/script/{name}`
    pub async fn save_script(&self, name: &str, body: &ScriptBody) -> Result<ScriptBody, ApiFailure> {
        let url = self.endpoint_url(&["api", "script", name]);
        debug!(script = name, "saving script");
        self.post(url, body.clone()).await
    }

    /// Delete a script.
    ///
    /// `DELETE /api/script/{name}`
    pub async fn delete_script(&self, name: &str) -> Result<ScriptBody, ApiFailure> {
        let url = self.endpoint_url(&["api", "script", name]);
        debug!(script = name, "deleting script");
        self.delete(url).await
    }

    /// Start a stored script.
    ///
    /// `GET /api/run/{name}`
    pub async fn run_script(&self, name: &str) -> Result<(), ApiFailure> {
        let url = self.endpoint_url(&["api", "run", name]);
        debug!(script = name, "running script");
        self.get(url).await.map(|_| ())
    }
}
