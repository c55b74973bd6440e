//! UI automation primitives
//!
//! The step handlers only ever talk to a [`UiDriver`]; the concrete driver
//! is either the on-device instrumentation server or the scripted mock.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::common::{Error, Result};

use super::Selector;

/// A view returned by a query
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Element {
    #[serde(default)]
    pub class: String,
    pub id: Option<String>,
    pub text: Option<String>,
    pub rect: Option<Rect>,
}

impl Element {
    pub fn with_text(class: &str, id: &str, text: &str) -> Self {
        Self {
            class: class.to_string(),
            id: Some(id.to_string()),
            text: Some(text.to_string()),
            rect: None,
        }
    }
}

/// Screen bounds of a view
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub center_x: f64,
    pub center_y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, String> {
        match s.to_ascii_lowercase().as_str() {
            "left" => Ok(Direction::Left),
            "right" => Ok(Direction::Right),
            "up" => Ok(Direction::Up),
            "down" => Ok(Direction::Down),
            other => Err(format!("unknown swipe direction '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Portrait,
    Landscape,
}

impl Orientation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Orientation::Portrait => "portrait",
            Orientation::Landscape => "landscape",
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Orientation {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, String> {
        match s.to_ascii_lowercase().as_str() {
            "portrait" => Ok(Orientation::Portrait),
            "landscape" => Ok(Orientation::Landscape),
            other => Err(format!("unknown orientation '{}'", other)),
        }
    }
}

/// Connection to the application under test
#[async_trait]
pub trait UiDriver: Send + Sync {
    /// Check the automation server is reachable
    async fn ready(&self) -> Result<()>;

    /// Views matching the selector, in screen order
    async fn query(&self, selector: &Selector) -> Result<Vec<Element>>;

    /// Invoke a chain of getters on every matching view, e.g.
    /// `["getAdapter", "getCount"]` on a `ListView`
    async fn query_property(&self, selector: &Selector, methods: &[&str]) -> Result<Vec<Value>>;

    async fn touch(&self, element: &Element) -> Result<()>;

    /// Type into the focused view
    async fn keyboard_enter_text(&self, text: &str) -> Result<()>;

    async fn hide_soft_keyboard(&self) -> Result<()>;

    async fn go_back(&self) -> Result<()>;

    async fn swipe(&self, direction: Direction) -> Result<()>;

    async fn set_orientation(&self, orientation: Orientation) -> Result<()>;

    /// Name of the foreground activity
    async fn current_activity(&self) -> Result<String>;

    /// Touch the first matching view and type into it
    async fn enter_text(&self, selector: &Selector, text: &str) -> Result<()> {
        let element = self
            .query(selector)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| Error::ElementNotFound(selector.to_string()))?;
        self.touch(&element).await?;
        self.keyboard_enter_text(text).await
    }

    async fn text_visible(&self, text: &str) -> Result<bool> {
        let found = self.query(&Selector::any().containing_text(text)).await?;
        Ok(!found.is_empty())
    }
}
