use async_trait::async_trait;
use tokio::sync::mpsc;

/// Scrollable element as identified by the host.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ScrollTarget {
    /// The document's root scrolling element.
    Document,
    /// A host-specific handle, e.g. a unique CSS path.
    Element(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Overflow {
    #[default]
    Visible,
    Hidden,
    Auto,
    Scroll,
}

impl Overflow {
    /// Maps a computed `overflow-y` value.
    pub fn from_css(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "auto" | "overlay" => Overflow::Auto,
            "scroll" => Overflow::Scroll,
            "hidden" | "clip" => Overflow::Hidden,
            _ => Overflow::Visible,
        }
    }

    pub fn is_scrollable(self) -> bool {
        matches!(self, Overflow::Auto | Overflow::Scroll)
    }
}

/// A descendant element that might be the bet list's scroll container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrollCandidate {
    pub target: ScrollTarget,
    pub overflow_y: Overflow,
    pub scroll_height: u64,
    pub client_height: u64,
    /// Leading text of the element, used to match domain anchor tokens.
    pub text_sample: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ContainerMetrics {
    pub scroll_height: u64,
    pub child_count: usize,
}

/// Child-list mutations observed under the watched container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MutationBatch {
    pub added: usize,
    pub removed: usize,
}

impl MutationBatch {
    pub fn is_structural(&self) -> bool {
        self.added > 0 || self.removed > 0
    }
}

/// The live page a run operates on.
///
/// Implementations wrap a browser tab (or a recorded replay). All calls happen
/// from the single task driving the run, so the futures need not be `Send`.
#[async_trait(?Send)]
pub trait PageHost {
    fn url(&self) -> String;

    /// Serialized HTML of the current document.
    async fn snapshot(&self) -> String;

    /// Elements that might scroll the bet list, in document order.
    async fn scroll_candidates(&self) -> Vec<ScrollCandidate>;

    async fn scroll_to_end(&self, target: &ScrollTarget);

    async fn scroll_to_top(&self, target: &ScrollTarget);

    async fn metrics(&self, target: &ScrollTarget) -> ContainerMetrics;

    /// Starts a subtree watcher on `target`. Dropping the receiver stops it.
    fn watch_mutations(&self, target: &ScrollTarget) -> mpsc::UnboundedReceiver<MutationBatch>;
}
