//! The page automation interface consumed by the control loop.

use crate::CoreResult;

use std::fmt;

use async_trait::async_trait;
use tracing::debug;

/// Identifier of a browser window or tab.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContextId(String);

impl ContextId {
    /// Wrap a backend-specific window identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque reference to an on-page element.
///
/// Only meaningful within the context it was resolved from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ElementHandle(String);

impl ElementHandle {
    /// Wrap a backend-specific element reference.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw reference.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// How to locate elements on the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// A CSS selector.
    Css(String),
    /// An XPath expression.
    XPath(String),
}

impl Selector {
    /// The W3C WebDriver location strategy name.
    pub fn strategy(&self) -> &'static str {
        match self {
            Selector::Css(_) => "css selector",
            Selector::XPath(_) => "xpath",
        }
    }

    /// The selector expression.
    pub fn value(&self) -> &str {
        match self {
            Selector::Css(value) | Selector::XPath(value) => value,
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.strategy(), self.value())
    }
}

/// Narrow automation interface the control loop drives.
///
/// Any backend able to read the focused window and page address, find
/// elements, and click or drag them can satisfy it.
#[async_trait]
pub trait PageDriver: Send + Sync {
    /// The window or tab that currently has focus.
    async fn current_context(&self) -> CoreResult<ContextId>;

    /// Focus `context`.
    async fn switch_context(&self, context: &ContextId) -> CoreResult<()>;

    /// The address of the page in the focused context.
    async fn current_address(&self) -> CoreResult<String>;

    /// All elements matching `selector`, in document order. Empty if none.
    async fn find_controls(&self, selector: &Selector) -> CoreResult<Vec<ElementHandle>>;

    /// Click `handle`.
    async fn click(&self, handle: &ElementHandle) -> CoreResult<()>;

    /// Press on `handle`, move by `(dx, dy)` pixels, and release.
    async fn drag_by(&self, handle: &ElementHandle, dx: i32, dy: i32) -> CoreResult<()>;

    /// Click the first element matching `selector`, if there is one.
    ///
    /// Returns whether anything was clicked.
    async fn dismiss(&self, selector: &Selector) -> CoreResult<bool> {
        let Some(handle) = self.find_controls(selector).await?.into_iter().next() else {
            return Ok(false);
        };
        self.click(&handle).await?;
        debug!(selector = %selector, "Overlay dismissed");
        Ok(true)
    }

    /// Shut the automation session down. Called exactly once.
    async fn release(&mut self) -> CoreResult<()>;
}
