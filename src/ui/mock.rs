//! Scripted in-memory driver
//!
//! Stands in for the device in the test suite. Query answers are
//! registered per selector; every action is recorded so tests can assert
//! on what a step did.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;

use crate::common::{Error, Result};

use super::driver::{Direction, Element, Orientation, UiDriver};
use super::Selector;

/// An action recorded by the mock
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Touch(Element),
    EnterText(String),
    HideKeyboard,
    GoBack,
    Swipe(Direction),
    Orientation(Orientation),
}

#[derive(Default)]
struct MockState {
    elements: HashMap<String, Vec<Element>>,
    properties: HashMap<String, Vec<Value>>,
    visible_text: Vec<String>,
    activity: String,
    offline: bool,
    actions: Vec<Action>,
}

/// Cloneable handle; clones share state
#[derive(Clone, Default)]
pub struct MockDriver {
    state: Arc<Mutex<MockState>>,
}

fn key(selector: &str) -> String {
    Selector::parse(selector)
        .map(|s| s.to_string())
        .unwrap_or_else(|_| selector.to_string())
}

impl MockDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer queries for `selector` with these views
    pub fn set_elements(&self, selector: &str, elements: Vec<Element>) {
        self.state.lock().elements.insert(key(selector), elements);
    }

    /// Answer property queries for `selector` with these values
    pub fn set_property(&self, selector: &str, values: Vec<Value>) {
        self.state.lock().properties.insert(key(selector), values);
    }

    /// Make `text` visible on screen
    pub fn show_text(&self, text: &str) {
        self.state.lock().visible_text.push(text.to_string());
    }

    pub fn set_activity(&self, activity: &str) {
        self.state.lock().activity = activity.to_string();
    }

    /// Make `ready` fail as if the server were down
    pub fn set_offline(&self, offline: bool) {
        self.state.lock().offline = offline;
    }

    /// Actions performed so far
    pub fn actions(&self) -> Vec<Action> {
        self.state.lock().actions.clone()
    }

    /// Text typed so far, in order
    pub fn entered_text(&self) -> Vec<String> {
        self.actions()
            .into_iter()
            .filter_map(|a| match a {
                Action::EnterText(t) => Some(t),
                _ => None,
            })
            .collect()
    }

    fn record(&self, action: Action) {
        self.state.lock().actions.push(action);
    }
}

#[async_trait]
impl UiDriver for MockDriver {
    async fn ready(&self) -> Result<()> {
        if self.state.lock().offline {
            return Err(Error::UiDriver("mock driver is offline".to_string()));
        }
        Ok(())
    }

    async fn query(&self, selector: &Selector) -> Result<Vec<Element>> {
        let state = self.state.lock();
        Ok(state
            .elements
            .get(&selector.to_string())
            .cloned()
            .unwrap_or_default())
    }

    async fn query_property(&self, selector: &Selector, _methods: &[&str]) -> Result<Vec<Value>> {
        let state = self.state.lock();
        Ok(state
            .properties
            .get(&selector.to_string())
            .cloned()
            .unwrap_or_default())
    }

    async fn touch(&self, element: &Element) -> Result<()> {
        self.record(Action::Touch(element.clone()));
        Ok(())
    }

    async fn keyboard_enter_text(&self, text: &str) -> Result<()> {
        self.record(Action::EnterText(text.to_string()));
        Ok(())
    }

    async fn hide_soft_keyboard(&self) -> Result<()> {
        self.record(Action::HideKeyboard);
        Ok(())
    }

    async fn go_back(&self) -> Result<()> {
        self.record(Action::GoBack);
        Ok(())
    }

    async fn swipe(&self, direction: Direction) -> Result<()> {
        self.record(Action::Swipe(direction));
        Ok(())
    }

    async fn set_orientation(&self, orientation: Orientation) -> Result<()> {
        self.record(Action::Orientation(orientation));
        Ok(())
    }

    async fn current_activity(&self) -> Result<String> {
        Ok(self.state.lock().activity.clone())
    }

    async fn text_visible(&self, text: &str) -> Result<bool> {
        let needle = text.to_lowercase();
        Ok(self
            .state
            .lock()
            .visible_text
            .iter()
            .any(|t| t.to_lowercase().contains(&needle)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_query_uses_canonical_selector() {
        let mock = MockDriver::new();
        mock.set_elements(
            "android.widget.EditText id:'et_received' ",
            vec![Element::with_text("android.widget.EditText", "et_received", "")],
        );

        let found = mock
            .query(&Selector::new("android.widget.EditText").id("et_received"))
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
    }

    #[tokio::test]
    async fn test_clones_share_recorded_actions() {
        let mock = MockDriver::new();
        let handle = mock.clone();
        mock.keyboard_enter_text("2008").await.unwrap();
        mock.go_back().await.unwrap();
        assert_eq!(
            handle.actions(),
            vec![Action::EnterText("2008".to_string()), Action::GoBack]
        );
    }

    #[tokio::test]
    async fn test_enter_text_requires_a_match() {
        let mock = MockDriver::new();
        let err = mock
            .enter_text(&Selector::new("android.widget.EditText").id("edit_text"), "5")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ElementNotFound(_)));
    }

    #[tokio::test]
    async fn test_text_visible_is_case_insensitive() {
        let mock = MockDriver::new();
        mock.show_text("Total:300");
        assert!(mock.text_visible("total:300").await.unwrap());
        assert!(!mock.text_visible("Total:1").await.unwrap());
    }
}
