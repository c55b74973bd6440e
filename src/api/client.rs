//! HTTP client for the LMIS REST API
//!
//! Each call checks the status code the contract promises and decodes the
//! body. There are no retries: a wrong status fails the calling case.

use std::time::Duration;

use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::common::{Error, Result};

use super::types::{
    Credentials, LoginResponse, Requisition, RequisitionCreated, RequisitionRecord,
    RequisitionEnvelope, StockCardEvent,
};

/// Client bound to one API base URL
pub struct LmisClient {
    http: reqwest::Client,
    base_url: String,
}

impl LmisClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `POST /rest-api/login` with a JSON credential body, expects 200
    pub async fn login(&self, credentials: &Credentials) -> Result<LoginResponse> {
        let request = self.request(Method::POST, "/rest-api/login").json(credentials);
        self.send("POST /rest-api/login", request, StatusCode::OK).await
    }

    /// `POST /rest-api/requisitions` with basic auth, expects 201 and an id
    pub async fn submit_requisition(
        &self,
        requisition: &Requisition,
        auth: &Credentials,
    ) -> Result<i64> {
        let request = self
            .authorized(Method::POST, "/rest-api/requisitions", auth)
            .json(requisition);
        let created: RequisitionCreated = self
            .send("POST /rest-api/requisitions", request, StatusCode::CREATED)
            .await?;

        created.requisition_id.ok_or_else(|| {
            Error::Contract("POST /rest-api/requisitions: requisitionId is null".to_string())
        })
    }

    /// `GET /rest-api/requisitions/{id}` with basic auth, expects 200
    pub async fn fetch_requisition(&self, id: i64, auth: &Credentials) -> Result<RequisitionRecord> {
        let path = format!("/rest-api/requisitions/{}", id);
        let request = self.authorized(Method::GET, &path, auth);
        let envelope: RequisitionEnvelope = self
            .send(&format!("GET {}", path), request, StatusCode::OK)
            .await?;
        Ok(envelope.requisition)
    }

    /// `POST /rest-api/facilities/{id}/stockCards` with basic auth, expects 200
    pub async fn sync_stock_cards(
        &self,
        facility_id: &str,
        events: &[StockCardEvent],
        auth: &Credentials,
    ) -> Result<()> {
        let path = format!("/rest-api/facilities/{}/stockCards", facility_id);
        let request = self.authorized(Method::POST, &path, auth).json(events);
        let endpoint = format!("POST {}", path);
        self.send_raw(&endpoint, request, StatusCode::OK).await?;
        Ok(())
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, format!("{}{}", self.base_url, path))
            .header(reqwest::header::ACCEPT, "application/json")
    }

    fn authorized(&self, method: Method, path: &str, auth: &Credentials) -> RequestBuilder {
        self.request(method, path)
            .basic_auth(&auth.username, Some(&auth.password))
    }

    async fn send<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        request: RequestBuilder,
        expected: StatusCode,
    ) -> Result<T> {
        let body = self.send_raw(endpoint, request, expected).await?;
        serde_json::from_str(&body).map_err(|e| {
            Error::Contract(format!("{}: response does not match schema: {}", endpoint, e))
        })
    }

    async fn send_raw(
        &self,
        endpoint: &str,
        request: RequestBuilder,
        expected: StatusCode,
    ) -> Result<String> {
        debug!(endpoint, base_url = %self.base_url, "sending request");
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        debug!(endpoint, status = status.as_u16(), "received response");

        if status != expected {
            return Err(Error::unexpected_status(
                endpoint,
                expected.as_u16(),
                status.as_u16(),
                &body,
            ));
        }
        Ok(body)
    }
}
