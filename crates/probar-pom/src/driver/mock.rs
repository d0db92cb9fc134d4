//! In-memory driver for unit testing page objects.
//!
//! [`MockDriver`] keeps a tree of [`MockElement`]s. Lookups match by exact
//! [`Locator`] equality (no CSS or XPath evaluation): an element matches the
//! locators it was declared with. Replacing or removing a node makes every
//! handle to it, and to its descendants, stale. Navigation is recorded but
//! leaves the tree untouched.

use super::{ElementHandle, PomDriver};
use crate::locator::Locator;
use crate::result::{PomError, PomResult};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Declarative description of a mock DOM node
#[derive(Debug, Clone)]
pub struct MockElement {
    locators: Vec<Locator>,
    displayed: bool,
    properties: HashMap<String, String>,
    text: String,
}

impl Default for MockElement {
    fn default() -> Self {
        Self::new()
    }
}

impl MockElement {
    /// A visible element with no locators, properties or text
    #[must_use]
    pub fn new() -> Self {
        Self {
            locators: Vec::new(),
            displayed: true,
            properties: HashMap::new(),
            text: String::new(),
        }
    }

    /// Make the element findable by `locator`
    #[must_use]
    pub fn matching(mut self, locator: Locator) -> Self {
        self.locators.push(locator);
        self
    }

    /// Mark the element as not displayed
    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.displayed = false;
        self
    }

    /// Set a property value
    #[must_use]
    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let _ = self.properties.insert(name.into(), value.into());
        self
    }

    /// Set the element text
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }
}

#[derive(Debug)]
struct MockNode {
    id: String,
    parent: Option<String>,
    element: MockElement,
    attached: bool,
}

#[derive(Debug, Default)]
struct MockState {
    nodes: Vec<MockNode>,
    next_id: u64,
    current_url: Option<String>,
    unreachable: HashSet<String>,
    call_history: Vec<String>,
}

impl MockState {
    fn node(&self, id: &str) -> Option<&MockNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    fn node_mut(&mut self, id: &str) -> Option<&mut MockNode> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    fn is_live(&self, id: &str) -> bool {
        let mut current = Some(id);
        while let Some(id) = current {
            match self.node(id) {
                Some(node) if node.attached => current = node.parent.as_deref(),
                _ => return false,
            }
        }
        true
    }

    fn live_node(&self, handle: &ElementHandle) -> PomResult<&MockNode> {
        if !self.is_live(handle.id()) {
            return Err(PomError::stale_element(handle.id()));
        }
        self.node(handle.id())
            .ok_or_else(|| PomError::stale_element(handle.id()))
    }

    fn live_node_mut(&mut self, handle: &ElementHandle) -> PomResult<&mut MockNode> {
        if !self.is_live(handle.id()) {
            return Err(PomError::stale_element(handle.id()));
        }
        self.node_mut(handle.id())
            .ok_or_else(|| PomError::stale_element(handle.id()))
    }

    fn is_descendant(&self, id: &str, ancestor: &str) -> bool {
        let mut current = self.node(id).and_then(|n| n.parent.as_deref());
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.node(id).and_then(|n| n.parent.as_deref());
        }
        false
    }

    fn matches(
        &self,
        locator: &Locator,
        scope: Option<&ElementHandle>,
    ) -> PomResult<Vec<ElementHandle>> {
        if let Some(scope) = scope {
            let _ = self.live_node(scope)?;
        }
        Ok(self
            .nodes
            .iter()
            .filter(|n| n.element.locators.contains(locator))
            .filter(|n| self.is_live(&n.id))
            .filter(|n| scope.map_or(true, |s| self.is_descendant(&n.id, s.id())))
            .map(|n| ElementHandle::new(n.id.clone()))
            .collect())
    }

    fn allocate(&mut self, parent: Option<String>, element: MockElement) -> ElementHandle {
        self.next_id += 1;
        let id = format!("mock-{}", self.next_id);
        self.nodes.push(MockNode {
            id: id.clone(),
            parent,
            element,
            attached: true,
        });
        ElementHandle::new(id)
    }
}

/// Mock driver for unit testing
#[derive(Debug, Default)]
pub struct MockDriver {
    state: Mutex<MockState>,
}

impl MockDriver {
    /// Create new mock driver with an empty document
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add an element under `parent` (document level if `None`)
    pub fn insert(
        &self,
        parent: Option<&ElementHandle>,
        element: MockElement,
    ) -> PomResult<ElementHandle> {
        let mut state = self.state();
        let parent = match parent {
            Some(p) => Some(state.live_node(p)?.id.clone()),
            None => None,
        };
        Ok(state.allocate(parent, element))
    }

    /// Replace a node with an identical copy, as a re-render would.
    ///
    /// The old handle goes stale; children move to the new node, which
    /// takes the old node's place in document order.
    pub fn replace(&self, element: &ElementHandle) -> PomResult<ElementHandle> {
        let mut state = self.state();
        let old = state.live_node_mut(element)?;
        old.attached = false;
        let parent = old.parent.clone();
        let copy = old.element.clone();
        let old_id = old.id.clone();

        let replacement = state.allocate(parent, copy);
        if let Some(index) = state.nodes.iter().position(|n| n.id == old_id) {
            if let Some(node) = state.nodes.pop() {
                state.nodes.insert(index, node);
            }
        }
        for node in &mut state.nodes {
            if node.parent.as_deref() == Some(old_id.as_str()) {
                node.parent = Some(replacement.id().to_string());
            }
        }
        Ok(replacement)
    }

    /// Detach a node and its subtree
    pub fn remove(&self, element: &ElementHandle) -> PomResult<()> {
        self.state().live_node_mut(element)?.attached = false;
        Ok(())
    }

    /// Change whether a node is displayed
    pub fn set_displayed(&self, element: &ElementHandle, displayed: bool) -> PomResult<()> {
        self.state().live_node_mut(element)?.element.displayed = displayed;
        Ok(())
    }

    /// Change a node property
    pub fn set_property(
        &self,
        element: &ElementHandle,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> PomResult<()> {
        let _ = self
            .state()
            .live_node_mut(element)?
            .element
            .properties
            .insert(name.into(), value.into());
        Ok(())
    }

    /// Change a node text
    pub fn set_text(&self, element: &ElementHandle, text: impl Into<String>) -> PomResult<()> {
        self.state().live_node_mut(element)?.element.text = text.into();
        Ok(())
    }

    /// Make navigation to `url` fail
    pub fn fail_navigation_to(&self, url: impl Into<String>) {
        let _ = self.state().unreachable.insert(url.into());
    }

    /// Last URL successfully navigated to
    #[must_use]
    pub fn last_navigation(&self) -> Option<String> {
        self.state().current_url.clone()
    }

    /// Get call history
    #[must_use]
    pub fn history(&self) -> Vec<String> {
        self.state().call_history.clone()
    }

    /// Check if method was called
    #[must_use]
    pub fn was_called(&self, method: &str) -> bool {
        self.call_count(method) > 0
    }

    /// Number of recorded calls starting with `method`
    #[must_use]
    pub fn call_count(&self, method: &str) -> usize {
        self.state()
            .call_history
            .iter()
            .filter(|c| c.starts_with(method))
            .count()
    }
}

#[async_trait]
impl PomDriver for MockDriver {
    async fn navigate(&self, url: &str) -> PomResult<()> {
        let mut state = self.state();
        state.call_history.push(format!("navigate:{url}"));
        if state.unreachable.contains(url) {
            return Err(PomError::Navigation {
                url: url.to_string(),
                message: "unreachable".to_string(),
            });
        }
        state.current_url = Some(url.to_string());
        Ok(())
    }

    async fn current_url(&self) -> PomResult<String> {
        let mut state = self.state();
        state.call_history.push("current_url".to_string());
        Ok(state
            .current_url
            .clone()
            .unwrap_or_else(|| String::from("about:blank")))
    }

    async fn find_element(
        &self,
        locator: &Locator,
        scope: Option<&ElementHandle>,
    ) -> PomResult<ElementHandle> {
        let mut state = self.state();
        state.call_history.push(format!("find_element:{locator}"));
        state
            .matches(locator, scope)?
            .into_iter()
            .next()
            .ok_or_else(|| PomError::no_such_element(locator))
    }

    async fn find_elements(
        &self,
        locator: &Locator,
        scope: Option<&ElementHandle>,
    ) -> PomResult<Vec<ElementHandle>> {
        let mut state = self.state();
        state.call_history.push(format!("find_elements:{locator}"));
        state.matches(locator, scope)
    }

    async fn is_displayed(&self, element: &ElementHandle) -> PomResult<bool> {
        let mut state = self.state();
        state.call_history.push(format!("is_displayed:{element}"));
        Ok(state.live_node(element)?.element.displayed)
    }

    async fn property(&self, element: &ElementHandle, name: &str) -> PomResult<Option<String>> {
        let mut state = self.state();
        state.call_history.push(format!("property:{element}:{name}"));
        Ok(state.live_node(element)?.element.properties.get(name).cloned())
    }

    async fn text(&self, element: &ElementHandle) -> PomResult<String> {
        let mut state = self.state();
        state.call_history.push(format!("text:{element}"));
        Ok(state.live_node(element)?.element.text.clone())
    }
}
