//! Driver for the on-device instrumentation server
//!
//! The server is reached through a forwarded TCP port and speaks JSON:
//! `POST /map` evaluates a query with an operation, `POST /` performs a
//! named action and `GET /ping` answers when the app is up.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, trace};

use crate::common::{Error, Result};

use super::driver::{Direction, Element, Orientation, UiDriver};
use super::Selector;

pub struct InstrumentationDriver {
    http: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct MapResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    results: Vec<Value>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ActionResponse {
    #[serde(default)]
    success: bool,
    message: Option<String>,
    #[serde(default)]
    bonus_information: Vec<String>,
}

impl InstrumentationDriver {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn map(&self, selector: &Selector, methods: &[&str]) -> Result<Vec<Value>> {
        let body = json!({
            "query": selector.to_string(),
            "operation": { "method_name": "query", "arguments": methods },
        });
        trace!(%selector, ?methods, "map");

        let response: MapResponse = self
            .http
            .post(format!("{}/map", self.base_url))
            .json(&body)
            .send()
            .await?
            .json()
            .await?;

        if !response.success {
            return Err(Error::UiDriver(format!(
                "query '{}' failed: {}",
                selector,
                response.message.unwrap_or_default()
            )));
        }
        Ok(response.results)
    }

    async fn perform(&self, command: &str, arguments: Vec<Value>) -> Result<ActionResponse> {
        debug!(command, ?arguments, "perform action");
        let response: ActionResponse = self
            .http
            .post(format!("{}/", self.base_url))
            .json(&json!({ "command": command, "arguments": arguments }))
            .send()
            .await?
            .json()
            .await?;

        if !response.success {
            return Err(Error::UiDriver(format!(
                "action '{}' failed: {}",
                command,
                response.message.unwrap_or_default()
            )));
        }
        Ok(response)
    }
}

/// Drag start/end as screen percentages: (from_x, to_x, from_y, to_y)
fn drag_points(direction: Direction) -> (u32, u32, u32, u32) {
    match direction {
        Direction::Left => (90, 10, 50, 50),
        Direction::Right => (10, 90, 50, 50),
        Direction::Up => (50, 50, 80, 20),
        Direction::Down => (50, 50, 20, 80),
    }
}

#[async_trait]
impl UiDriver for InstrumentationDriver {
    async fn ready(&self) -> Result<()> {
        let response = self
            .http
            .get(format!("{}/ping", self.base_url))
            .send()
            .await
            .map_err(|e| {
                Error::UiDriver(format!(
                    "instrumentation server at {} is not reachable: {}",
                    self.base_url, e
                ))
            })?;
        if !response.status().is_success() {
            return Err(Error::UiDriver(format!(
                "instrumentation server answered ping with {}",
                response.status()
            )));
        }
        Ok(())
    }

    async fn query(&self, selector: &Selector) -> Result<Vec<Element>> {
        // Views that vanished between lookup and serialization come back as
        // non-object placeholders
        let results = self.map(selector, &[]).await?;
        Ok(results
            .into_iter()
            .filter(Value::is_object)
            .filter_map(|v| serde_json::from_value(v).ok())
            .collect())
    }

    async fn query_property(&self, selector: &Selector, methods: &[&str]) -> Result<Vec<Value>> {
        self.map(selector, methods).await
    }

    async fn touch(&self, element: &Element) -> Result<()> {
        let rect = element.rect.ok_or_else(|| {
            Error::UiDriver(format!(
                "cannot touch {} (id {:?}): view has no bounds",
                element.class, element.id
            ))
        })?;
        self.perform("touch_coordinate", vec![json!(rect.center_x), json!(rect.center_y)])
            .await?;
        Ok(())
    }

    async fn keyboard_enter_text(&self, text: &str) -> Result<()> {
        self.perform("keyboard_enter_text", vec![json!(text)]).await?;
        Ok(())
    }

    async fn hide_soft_keyboard(&self) -> Result<()> {
        self.perform("hide_soft_keyboard", Vec::new()).await?;
        Ok(())
    }

    async fn go_back(&self) -> Result<()> {
        self.perform("go_back", Vec::new()).await?;
        Ok(())
    }

    async fn swipe(&self, direction: Direction) -> Result<()> {
        let (from_x, to_x, from_y, to_y) = drag_points(direction);
        self.perform(
            "drag",
            vec![json!(from_x), json!(to_x), json!(from_y), json!(to_y), json!(5)],
        )
        .await?;
        Ok(())
    }

    async fn set_orientation(&self, orientation: Orientation) -> Result<()> {
        self.perform("set_activity_orientation", vec![json!(orientation.as_str())])
            .await?;
        Ok(())
    }

    async fn current_activity(&self) -> Result<String> {
        let response = self.perform("get_activity_name", Vec::new()).await?;
        response
            .bonus_information
            .into_iter()
            .next()
            .or(response.message)
            .ok_or_else(|| Error::UiDriver("server did not report an activity name".to_string()))
    }
}
