// Site info endpoints
//
// Both listings are controller-scoped (not site-scoped) and come back
// keyed by site name.

use reqwest::Method;
use serde_json::Value;
use tracing::debug;

use crate::reorganize::reorganize_site_data;
use crate::session::ApiSession;

impl ApiSession {
    /// Sites visible to the logged-in user.
    ///
    /// `GET /api/self/sites`
    pub async fn site_info_simplified(&mut self) -> Option<Value> {
        debug!("listing sites");
        let raw = self.api_request("self/sites", Method::GET, None).await;
        reorganize_site_data(raw)
    }

    /// All sites with health and device counts.
    ///
    /// `GET /api/stat/sites`
    pub async fn site_info_detailed(&mut self) -> Option<Value> {
        debug!("listing site details");
        let raw = self.api_request("stat/sites", Method::GET, None).await;
        reorganize_site_data(raw)
    }
}
