//! Prometheus counters for the publish and chat paths.

use prometheus_client::encoding::text::encode;
use prometheus_client::metrics::counter::Counter;
use prometheus_client::registry::Registry;

pub struct Metrics {
    registry: Registry,
    pub posts_published: Counter,
    pub posts_rejected: Counter,
    pub groups_created: Counter,
    pub messages_sent: Counter,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    pub fn new() -> Self {
        let mut registry = Registry::with_prefix("unfiltered");
        let posts_published = Counter::default();
        let posts_rejected = Counter::default();
        let groups_created = Counter::default();
        let messages_sent = Counter::default();
        registry.register(
            "posts_published",
            "Posts stored after passing moderation",
            posts_published.clone(),
        );
        registry.register(
            "posts_rejected",
            "Posts refused by moderation",
            posts_rejected.clone(),
        );
        registry.register("groups_created", "Groups created", groups_created.clone());
        registry.register("messages_sent", "Chat messages sent", messages_sent.clone());
        Self { registry, posts_published, posts_rejected, groups_created, messages_sent }
    }

    /// OpenMetrics text exposition of every registered counter.
    pub fn render(&self) -> Result<String, std::fmt::Error> {
        let mut buffer = String::new();
        encode(&mut buffer, &self.registry)?;
        Ok(buffer)
    }
}
