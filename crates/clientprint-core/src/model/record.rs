use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::ClientprintResult;
use crate::model::signals::{
    AudioSignal, CanvasSignal, FontSignal, NetworkSignal, PluginSignal, UserAgentSignal,
    WebGlSignal,
};

/// Signal categories, in declared order.
///
/// `Ord` follows declaration order, so ordered collections keyed by `Category`
/// iterate in record order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(into = "&'static str")]
pub enum Category {
    UserAgent,
    Fonts,
    Canvas,
    Plugins,
    WebGl,
    Audio,
    Network,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::UserAgent,
        Category::Fonts,
        Category::Canvas,
        Category::Plugins,
        Category::WebGl,
        Category::Audio,
        Category::Network,
    ];

    /// Record key for this category.
    pub fn key(&self) -> &'static str {
        match self {
            Self::UserAgent => "userAgent",
            Self::Fonts => "fonts",
            Self::Canvas => "canvas",
            Self::Plugins => "plugins",
            Self::WebGl => "webgl",
            Self::Audio => "audio",
            Self::Network => "network",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.key() == key)
    }
}

impl From<Category> for &'static str {
    fn from(c: Category) -> Self {
        c.key()
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// The ordered aggregate of all probe results for one collection run.
///
/// Field order is the category declaration order and is what the canonical
/// encoding emits. A record is a read-only snapshot; it has no identity beyond
/// the run that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SignalRecord {
    pub user_agent: UserAgentSignal,
    pub fonts: FontSignal,
    pub canvas: CanvasSignal,
    pub plugins: PluginSignal,
    pub webgl: WebGlSignal,
    pub audio: AudioSignal,
    pub network: NetworkSignal,
}

impl SignalRecord {
    /// Structured form with keys in declared order.
    pub fn to_value(&self) -> ClientprintResult<Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// The value stored under one category, in structured form.
    pub fn category_value(&self, category: Category) -> ClientprintResult<Value> {
        let v = match category {
            Category::UserAgent => serde_json::to_value(&self.user_agent)?,
            Category::Fonts => serde_json::to_value(&self.fonts)?,
            Category::Canvas => serde_json::to_value(&self.canvas)?,
            Category::Plugins => serde_json::to_value(&self.plugins)?,
            Category::WebGl => serde_json::to_value(&self.webgl)?,
            Category::Audio => serde_json::to_value(&self.audio)?,
            Category::Network => serde_json::to_value(&self.network)?,
        };
        Ok(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_order_matches_declaration() {
        let mut sorted = Category::ALL;
        sorted.sort();
        assert_eq!(sorted, Category::ALL);
        assert_eq!(Category::from_key("webgl"), Some(Category::WebGl));
        assert_eq!(Category::from_key("WebGL"), None);
    }

    #[test]
    fn serialized_keys_follow_categories() {
        let rec = SignalRecord {
            user_agent: UserAgentSignal::default(),
            fonts: FontSignal::default(),
            canvas: CanvasSignal::Unsupported,
            plugins: PluginSignal::default(),
            webgl: WebGlSignal(None),
            audio: AudioSignal::Unsupported,
            network: NetworkSignal::offline(),
        };
        let v = rec.to_value().unwrap();
        let keys: Vec<&str> = v.as_object().unwrap().keys().map(|k| k.as_str()).collect();
        let expected: Vec<&str> = Category::ALL.iter().map(|c| c.key()).collect();
        assert_eq!(keys, expected);
    }
}
