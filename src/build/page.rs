use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::types::LocaleKey;

/// One generated page, as the site build pipeline writes it to its page-data file.
///
/// Keys are camelCase. `pathLocale`, `level`/`slug` (on headers) are accepted as
/// aliases so page-data emitted by common static site generators loads unchanged.
#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    /// Route of the page, e.g. `/guide/install.html`. Stable identifier.
    pub path: String,
    /// Locale prefix (`/`, `/zh/`). Missing means the default partition.
    #[serde(default, alias = "pathLocale")]
    pub locale: Option<String>,
    #[serde(default)]
    pub title: String,
    /// Header tree in document order.
    #[serde(default)]
    pub headers: Vec<PageHeader>,
    /// Rendered body text.
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub frontmatter: Map<String, Value>,
}

impl Page {
    pub fn locale_key(&self) -> LocaleKey {
        self.locale
            .as_deref()
            .map(LocaleKey::new)
            .unwrap_or_default()
    }
}

#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PageHeader {
    #[serde(alias = "title")]
    pub text: String,
    /// 1 = top-level section.
    #[serde(alias = "level")]
    pub depth: u8,
    #[serde(default, alias = "slug")]
    pub anchor: String,
    #[serde(default)]
    pub children: Vec<PageHeader>,
}
