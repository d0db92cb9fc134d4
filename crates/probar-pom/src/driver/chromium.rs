//! CDP driver over chromiumoxide.
//!
//! Element handles live in a page-side registry (`window.__probarPom`)
//! keyed by a per-document prefix, so every handle from a previous
//! document, or whose node has been detached, reports
//! [`PomError::StaleElement`]. Detached nodes are dropped from the
//! registry on every lookup, so polling does not keep them alive.

use super::{ElementHandle, PomDriver};
use crate::locator::Locator;
use crate::result::{PomError, PomResult};
use async_trait::async_trait;
use chromiumoxide::page::Page as CdpPage;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::Mutex;

const REGISTRY_PRELUDE: &str = "\
const reg = window.__probarPom || (window.__probarPom = { \
  doc: Math.random().toString(36).slice(2), next: 0, nodes: new Map() }); \
const lookup = (id) => { const el = reg.nodes.get(id); return el && el.isConnected ? el : null; }; \
const register = (el) => { const id = reg.doc + '-' + (++reg.next); reg.nodes.set(id, el); return id; }; \
const prune = () => { for (const [id, el] of reg.nodes) { if (!el.isConnected) reg.nodes.delete(id); } };";

/// Page-side reply envelope
#[derive(Debug, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
enum Reply<T> {
    Ok { value: T },
    Missing,
    Stale,
}

/// [`PomDriver`] backed by a chromiumoxide page
#[derive(Debug, Clone)]
pub struct ChromiumDriver {
    page: Arc<Mutex<CdpPage>>,
}

impl ChromiumDriver {
    /// Wrap an already-open CDP page
    #[must_use]
    pub fn new(page: CdpPage) -> Self {
        Self::from_shared(Arc::new(Mutex::new(page)))
    }

    /// Share a CDP page with other code that serialises through the same lock
    #[must_use]
    pub fn from_shared(page: Arc<Mutex<CdpPage>>) -> Self {
        Self { page }
    }

    async fn eval<T: DeserializeOwned>(&self, script: &str) -> PomResult<T> {
        let page = self.page.lock().await;
        let result = page
            .evaluate(script)
            .await
            .map_err(|e| PomError::driver(e.to_string()))?;
        result
            .into_value()
            .map_err(|e| PomError::driver(e.to_string()))
    }

    async fn find(
        &self,
        locator: &Locator,
        scope: Option<&ElementHandle>,
        first_only: bool,
    ) -> PomResult<Reply<Vec<String>>> {
        self.eval(&find_script(locator, scope, first_only)).await
    }

    async fn on_element<T: DeserializeOwned>(
        &self,
        element: &ElementHandle,
        expression: &str,
    ) -> PomResult<T> {
        let id = json(&element.id());
        let script = format!(
            "(() => {{ {REGISTRY_PRELUDE} \
             const el = lookup({id}); if (!el) return {{ status: 'stale' }}; \
             return {{ status: 'ok', value: {expression} }}; }})()"
        );
        match self.eval::<Reply<T>>(&script).await? {
            Reply::Ok { value } => Ok(value),
            Reply::Missing | Reply::Stale => Err(PomError::stale_element(element.id())),
        }
    }
}

fn find_script(locator: &Locator, scope: Option<&ElementHandle>, first_only: bool) -> String {
    let scope_id = json(&scope.map(ElementHandle::id));
    let finder = locator.to_js_finder();
    format!(
        "(() => {{ {REGISTRY_PRELUDE} \
         let scope = document; const sid = {scope_id}; \
         if (sid !== null) {{ scope = lookup(sid); if (!scope) return {{ status: 'stale' }}; }} \
         prune(); \
         let found = ({finder})(scope); \
         if ({first_only} && found.length === 0) return {{ status: 'missing' }}; \
         if ({first_only}) found = found.slice(0, 1); \
         return {{ status: 'ok', value: found.map(register) }}; }})()"
    )
}

fn json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| String::from("null"))
}

#[async_trait]
impl PomDriver for ChromiumDriver {
    async fn navigate(&self, url: &str) -> PomResult<()> {
        tracing::debug!(url, "navigating");
        let page = self.page.lock().await;
        page.goto(url).await.map_err(|e| PomError::Navigation {
            url: url.to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    async fn current_url(&self) -> PomResult<String> {
        self.eval("window.location.href").await
    }

    async fn find_element(
        &self,
        locator: &Locator,
        scope: Option<&ElementHandle>,
    ) -> PomResult<ElementHandle> {
        match self.find(locator, scope, true).await? {
            Reply::Ok { value } => value
                .into_iter()
                .next()
                .map(ElementHandle::new)
                .ok_or_else(|| PomError::no_such_element(locator)),
            Reply::Missing => Err(PomError::no_such_element(locator)),
            Reply::Stale => Err(stale_scope(scope)),
        }
    }

    async fn find_elements(
        &self,
        locator: &Locator,
        scope: Option<&ElementHandle>,
    ) -> PomResult<Vec<ElementHandle>> {
        match self.find(locator, scope, false).await? {
            Reply::Ok { value } => Ok(value.into_iter().map(ElementHandle::new).collect()),
            Reply::Missing => Ok(Vec::new()),
            Reply::Stale => Err(stale_scope(scope)),
        }
    }

    async fn is_displayed(&self, element: &ElementHandle) -> PomResult<bool> {
        self.on_element(
            element,
            "!!(el.offsetWidth || el.offsetHeight || el.getClientRects().length) \
             && getComputedStyle(el).visibility !== 'hidden'",
        )
        .await
    }

    async fn property(&self, element: &ElementHandle, name: &str) -> PomResult<Option<String>> {
        let name = json(&name);
        let expression = format!(
            "((v) => (v !== undefined && v !== null) ? String(v) : el.getAttribute({name}))(el[{name}])"
        );
        self.on_element(element, &expression).await
    }

    async fn text(&self, element: &ElementHandle) -> PomResult<String> {
        self.on_element(element, "(el.innerText ?? el.textContent ?? '')")
            .await
    }
}

fn stale_scope(scope: Option<&ElementHandle>) -> PomError {
    PomError::stale_element(scope.map_or("<document>", ElementHandle::id))
}
