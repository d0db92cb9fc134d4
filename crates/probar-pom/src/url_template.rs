//! Seed URL resolution.
//!
//! A page's seed URL is computed once, at construction, from an optional
//! base URL, an optional URL template and an ordered set of parameters:
//!
//! 1. No template: the base URL is used verbatim and every parameter is
//!    ignored.
//! 2. `{name}` placeholders in the template are replaced by the parameter
//!    of that name; `{{` and `}}` are literal braces. A placeholder with no
//!    parameter is [`PomError::MissingUrlParameter`].
//! 3. The substituted template is used as-is when absolute, otherwise it is
//!    joined onto the base URL.
//! 4. Parameters not consumed by a placeholder are appended to the query
//!    string in insertion order. The whole query, including pairs written
//!    in the template, is re-encoded as `application/x-www-form-urlencoded`
//!    (a space becomes `+`).
//!
//! An empty base URL counts as no base URL. Resolved URLs are serialized
//! in normalized form, so `https://www.test.com` comes back as
//! `https://www.test.com/`.

use crate::result::{PomError, PomResult};
use std::collections::HashSet;
use url::Url;

/// Ordered, possibly multi-valued URL parameters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlParams {
    entries: Vec<(String, Vec<String>)>,
}

impl UrlParams {
    /// Create an empty parameter set
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a single-valued parameter
    #[must_use]
    pub fn param(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.param_values(key, [value.into()])
    }

    /// Set a parameter that contributes one query pair per value
    #[must_use]
    pub fn param_values<I, V>(mut self, key: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.insert(key, values.into_iter().map(Into::into).collect());
        self
    }

    /// Set a parameter only when it has a value; `None` is dropped
    #[must_use]
    pub fn param_opt(self, key: impl Into<String>, value: Option<impl Into<String>>) -> Self {
        match value {
            Some(v) => self.param(key, v),
            None => self,
        }
    }

    /// Insert or replace a parameter, keeping its original position
    pub fn insert(&mut self, key: impl Into<String>, values: Vec<String>) {
        let key = key.into();
        if let Some(entry) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            entry.1 = values;
        } else {
            self.entries.push((key, values));
        }
    }

    /// First value of a parameter
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .and_then(|(_, v)| v.first())
            .map(String::as_str)
    }

    /// Iterate over `(key, values)` in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Number of distinct keys
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no parameters
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for UrlParams {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        iter.into_iter()
            .fold(Self::new(), |params, (k, v)| params.param(k, v))
    }
}

/// Substitute `{name}` placeholders, returning the text and the consumed keys
fn substitute(template: &str, params: &UrlParams) -> PomResult<(String, HashSet<String>)> {
    let mut out = String::with_capacity(template.len());
    let mut used = HashSet::new();
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                let _ = chars.next();
                out.push('{');
            }
            '}' if chars.peek() == Some(&'}') => {
                let _ = chars.next();
                out.push('}');
            }
            '{' => {
                let mut name = String::new();
                loop {
                    match chars.next() {
                        Some('}') => break,
                        Some(ch) => name.push(ch),
                        None => {
                            return Err(PomError::InvalidUrl {
                                url: template.to_string(),
                                message: "unterminated placeholder".to_string(),
                            })
                        }
                    }
                }
                let value = params
                    .get(&name)
                    .ok_or_else(|| PomError::MissingUrlParameter {
                        name: name.clone(),
                        template: template.to_string(),
                    })?;
                out.push_str(value);
                let _ = used.insert(name);
            }
            other => out.push(other),
        }
    }

    Ok((out, used))
}

/// Resolve the URL a page navigates to when opened.
///
/// Returns `Ok(None)` when there is neither a base URL nor a template.
///
/// # Examples
///
/// ```
/// use probar_pom::{resolve_seed_url, UrlParams};
///
/// let params = UrlParams::new()
///     .param("locale", "fr")
///     .param("q", "bold")
///     .param("topic", "css");
/// let url = resolve_seed_url(
///     Some("https://developer.mozilla.org/"),
///     Some("/{locale}/search"),
///     &params,
/// )
/// .unwrap();
/// assert_eq!(
///     url.as_deref(),
///     Some("https://developer.mozilla.org/fr/search?q=bold&topic=css")
/// );
/// ```
pub fn resolve_seed_url(
    base_url: Option<&str>,
    template: Option<&str>,
    params: &UrlParams,
) -> PomResult<Option<String>> {
    let base_url = base_url.filter(|b| !b.is_empty());
    let Some(template) = template else {
        return Ok(base_url.map(str::to_string));
    };

    let (target, used) = substitute(template, params)?;
    let mut url = match Url::parse(&target) {
        Ok(url) => url,
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            let base = base_url.ok_or_else(|| PomError::InvalidUrl {
                url: target.clone(),
                message: "relative URL template requires a base URL".to_string(),
            })?;
            Url::parse(base)
                .and_then(|b| b.join(&target))
                .map_err(|e| PomError::InvalidUrl {
                    url: format!("{base} + {target}"),
                    message: e.to_string(),
                })?
        }
        Err(e) => {
            return Err(PomError::InvalidUrl {
                url: target,
                message: e.to_string(),
            })
        }
    };

    let mut pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
    for (key, values) in params.iter().filter(|(k, _)| !used.contains(*k)) {
        pairs.extend(values.iter().map(|v| (key.to_string(), v.clone())));
    }
    if pairs.is_empty() {
        url.set_query(None);
    } else {
        let _ = url.query_pairs_mut().clear().extend_pairs(&pairs);
    }

    let resolved = String::from(url);
    tracing::debug!(template, seed_url = %resolved, "resolved seed URL");
    Ok(Some(resolved))
}
