//! UI automation layer
//!
//! Element queries, gestures and waits against the Android application
//! under test.

mod driver;
mod instrumentation;
mod mock;
mod selector;
pub mod wait;

pub use driver::{Direction, Element, Orientation, Rect, UiDriver};
pub use instrumentation::InstrumentationDriver;
pub use mock::{Action, MockDriver};
pub use selector::Selector;
