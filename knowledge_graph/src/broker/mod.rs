//! Knowledge Broker - shared, path-addressed access to the knowledge graph.
//!
//! The broker answers four kinds of questions:
//! - **Resolution**: what lives at a dotted path (see [`resolve_path`])
//! - **Flattening**: which scalar values a subtree enumerates (see [`flatten_value`])
//! - **Validation**: whether a label belongs to a subtree, case-insensitively
//! - **Fuzzy matching**: which enumerated label is closest to a free-text query
//!
//! Flatten results are memoized per path. Any mutation clears the whole cache.

mod flatten;
mod path;
mod similarity;

pub use flatten::*;
pub use path::*;
pub use similarity::*;

use parking_lot::{Mutex, RwLock};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

use crate::{BrokerConfig, BrokerError};

/// Well-known top-level key holding the graph identifier.
pub const KB_ID_KEY: &str = "KB_ID";

/// Well-known top-level key holding the graph version.
pub const KB_VERSION_KEY: &str = "KB_Version";

/// A memoized flatten result. Cache hits hand out the same allocation.
pub type FlatList = Arc<Vec<Value>>;

/// Read-mostly knowledge graph with a memoizing flatten cache.
///
/// Readers may share a broker across threads. The graph lock is always taken
/// before the cache lock, so cache population cannot interleave with `inject`.
#[derive(Debug)]
pub struct KnowledgeBroker {
    graph: RwLock<Value>,
    cache: Mutex<HashMap<String, FlatList>>,
    config: BrokerConfig,
}

impl KnowledgeBroker {
    /// Create a broker over `graph` with default heuristics.
    pub fn new(graph: Value) -> Self {
        Self::with_config(graph, BrokerConfig::default())
    }

    /// Create a broker over `graph` with the given heuristics.
    pub fn with_config(graph: Value, config: BrokerConfig) -> Self {
        let broker = Self {
            graph: RwLock::new(graph),
            cache: Mutex::new(HashMap::new()),
            config,
        };
        let graph_id = broker.graph_id().unwrap_or_else(|| "unknown".to_string());
        let version = broker.version().unwrap_or_else(|| "unknown".to_string());
        info!(%graph_id, %version, "knowledge broker initialised");
        broker
    }

    pub fn config(&self) -> &BrokerConfig {
        &self.config
    }

    /// Identifier stored under [`KB_ID_KEY`], if any.
    pub fn graph_id(&self) -> Option<String> {
        self.resolve(KB_ID_KEY).as_ref().and_then(scalar_to_string)
    }

    /// Version stored under [`KB_VERSION_KEY`], if any.
    pub fn version(&self) -> Option<String> {
        self.resolve(KB_VERSION_KEY).as_ref().and_then(scalar_to_string)
    }

    /// Resolve a dotted path. Absent paths yield `None`.
    pub fn resolve(&self, path: &str) -> Option<Value> {
        let graph = self.graph.read();
        resolve_path(&graph, path).cloned()
    }

    /// Check whether a path resolves, without cloning the value.
    pub fn exists(&self, path: &str) -> bool {
        let graph = self.graph.read();
        resolve_path(&graph, path).is_some()
    }

    /// Flatten the subtree at `path` into its scalar values.
    ///
    /// Unresolved paths flatten to an empty list. Results are cached until the
    /// next [`inject`](Self::inject).
    pub fn flatten(&self, path: &str) -> FlatList {
        let graph = self.graph.read();
        let mut cache = self.cache.lock();

        if let Some(hit) = cache.get(path) {
            return Arc::clone(hit);
        }

        let items = resolve_path(&graph, path)
            .map(|value| flatten_value(value, self.config.lexicon_threshold))
            .unwrap_or_default();
        debug!(path, items = items.len(), "flatten cache miss");

        let items = Arc::new(items);
        cache.insert(path.to_string(), Arc::clone(&items));
        items
    }

    /// Flatten and stringify the subtree at `path`.
    pub fn flatten_strings(&self, path: &str) -> Vec<String> {
        self.flatten(path).iter().filter_map(scalar_to_string).collect()
    }

    /// Case-insensitive membership test over `flatten(path)`.
    pub fn contains(&self, path: &str, candidate: &str) -> bool {
        let needle = candidate.to_lowercase();
        self.flatten(path)
            .iter()
            .filter_map(scalar_to_string)
            .any(|item| item.to_lowercase() == needle)
    }

    /// Best lexical match for `query` among `flatten(path)`, if any reaches `cutoff`.
    pub fn nearest_match(&self, path: &str, query: &str, cutoff: f64) -> Option<String> {
        let options = self.flatten_strings(path);
        let found = closest_match(query, options.iter().map(String::as_str), cutoff)
            .map(str::to_owned);
        debug!(path, query, found = found.as_deref(), "nearest match");
        found
    }

    /// [`nearest_match`](Self::nearest_match) with the configured cutoff.
    pub fn nearest_match_default(&self, path: &str, query: &str) -> Option<String> {
        self.nearest_match(path, query, self.config.fuzzy_cutoff)
    }

    /// Write a value at `path`, creating intermediate maps, and clear the flatten cache.
    pub fn inject(&self, path: &str, value: Value) -> Result<(), BrokerError> {
        let mut graph = self.graph.write();
        inject_path(&mut graph, path, value)?;

        let mut cache = self.cache.lock();
        let evicted = cache.len();
        cache.clear();
        info!(path, evicted, "knowledge graph entry injected");
        Ok(())
    }

    /// Number of paths currently memoized.
    pub fn cached_paths(&self) -> usize {
        self.cache.lock().len()
    }

    /// A copy of the whole graph, for export.
    pub fn snapshot(&self) -> Value {
        self.graph.read().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn setup_test_broker() -> KnowledgeBroker {
        KnowledgeBroker::new(json!({
            "KB_ID": "TEST_KB",
            "KB_Version": "0.0-test",
            "5.0_Masters_Lexicon": {
                "5.3_Art_and_Design_References": {
                    "Cinematographers": ["Roger_Deakins", "Bradford_Young"]
                }
            },
            "region": {
                "Kinnari": {
                    "Properties": ["Half-bird", "Celestial musician"]
                }
            },
            "10.0_Technical_Execution_Ontology": {
                "10.1_Digital_Cinema_Cameras": {
                    "ARRI": ["ARRI Alexa 35", "ARRI Alexa Mini LF"],
                    "Canon": ["Canon EOS R5", "Canon C300 Mark III"]
                }
            }
        }))
    }

    const CAMERAS: &str = "10.0_Technical_Execution_Ontology.10.1_Digital_Cinema_Cameras";

    #[test]
    fn test_metadata() {
        let broker = setup_test_broker();
        assert_eq!(broker.graph_id().as_deref(), Some("TEST_KB"));
        assert_eq!(broker.version().as_deref(), Some("0.0-test"));
    }

    #[test]
    fn test_resolve_dotted_and_plain_siblings() {
        let broker = setup_test_broker();
        assert_eq!(
            broker.resolve("5.0_Masters_Lexicon.5.3_Art_and_Design_References.Cinematographers"),
            Some(json!(["Roger_Deakins", "Bradford_Young"]))
        );
        assert_eq!(
            broker.resolve("region.Kinnari.Properties"),
            Some(json!(["Half-bird", "Celestial musician"]))
        );
        assert!(broker.resolve("region.Centaur").is_none());
        assert!(!broker.exists("region.Kinnari.Variants"));
    }

    #[test]
    fn test_flatten_is_cached_and_reference_stable() {
        let broker = setup_test_broker();
        let first = broker.flatten(CAMERAS);
        let second = broker.flatten(CAMERAS);

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.len(), 4);
        assert_eq!(broker.cached_paths(), 1);
    }

    #[test]
    fn test_inject_clears_every_cached_path() {
        let broker = setup_test_broker();
        let cameras = broker.flatten(CAMERAS);
        let kinnari = broker.flatten("region.Kinnari");
        assert_eq!(broker.cached_paths(), 2);

        broker
            .inject("region.Centaur.Properties", json!(["Half-horse"]))
            .unwrap();
        assert_eq!(broker.cached_paths(), 0);

        let cameras_after = broker.flatten(CAMERAS);
        let kinnari_after = broker.flatten("region.Kinnari");
        assert!(!Arc::ptr_eq(&cameras, &cameras_after));
        assert!(!Arc::ptr_eq(&kinnari, &kinnari_after));
        assert_eq!(*cameras, *cameras_after);
        assert_eq!(broker.flatten_strings("region.Centaur"), vec!["Half-horse"]);
    }

    #[test]
    fn test_failed_inject_keeps_cache() {
        let broker = setup_test_broker();
        broker.flatten(CAMERAS);

        let result = broker.inject("KB_ID.child", json!(1));
        assert!(result.is_err());
        assert_eq!(broker.cached_paths(), 1);
    }

    #[test]
    fn test_unresolved_path_flattens_to_empty() {
        let broker = setup_test_broker();
        assert!(broker.flatten("missing.region").is_empty());
    }

    #[test]
    fn test_contains_is_case_insensitive() {
        let broker = setup_test_broker();
        assert!(broker.contains(CAMERAS, "arri alexa 35"));
        assert!(broker.contains(CAMERAS, "CANON EOS R5"));
        assert!(!broker.contains(CAMERAS, "Sony Venice"));
        assert!(!broker.contains("missing", "anything"));
    }

    #[test]
    fn test_nearest_match() {
        let broker = setup_test_broker();
        assert_eq!(
            broker.nearest_match(CAMERAS, "Cannon R5", 0.6).as_deref(),
            Some("Canon EOS R5")
        );
        assert_eq!(broker.nearest_match(CAMERAS, "Cannon R5", 0.8), None);
        assert_eq!(
            broker.nearest_match_default(CAMERAS, "Alexa Mini").as_deref(),
            Some("ARRI Alexa Mini LF")
        );
    }

    #[test]
    fn test_readers_and_injector_share_a_broker() {
        const BEASTS: usize = 50;
        let broker = Arc::new(setup_test_broker());

        std::thread::scope(|scope| {
            for _ in 0..4 {
                let reader = Arc::clone(&broker);
                scope.spawn(move || {
                    let mut seen = 0;
                    for _ in 0..200 {
                        assert_eq!(reader.flatten(CAMERAS).len(), 4);
                        assert!(reader.contains(CAMERAS, "ARRI Alexa 35"));

                        let region = reader.flatten_strings("region");
                        assert!(region.len() >= seen, "region shrank from {seen} to {}", region.len());
                        assert!(region.iter().any(|name| name == "Kinnari"));
                        seen = region.len();

                        for name in region.iter().filter(|name| name.starts_with("Beast")) {
                            assert_eq!(
                                reader.flatten_strings(&format!("region.{name}.Properties")),
                                vec![format!("Trait {}", &name["Beast".len()..])]
                            );
                        }
                    }
                });
            }

            let writer = Arc::clone(&broker);
            scope.spawn(move || {
                for i in 0..BEASTS {
                    writer
                        .inject(&format!("region.Beast{i}.Properties"), json!([format!("Trait {i}")]))
                        .unwrap();
                }
            });
        });

        assert_eq!(broker.flatten_strings("region").len(), BEASTS + 1);
        broker.inject("region.Kinnari.Era", json!("Gupta")).unwrap();
        assert_eq!(broker.cached_paths(), 0);
        broker.flatten(CAMERAS);
        broker.flatten("region");
        assert_eq!(broker.cached_paths(), 2);
    }

    #[test]
    fn test_snapshot_reflects_injection() {
        let broker = setup_test_broker();
        broker.inject("region.Kinnari.Era", json!("Gupta")).unwrap();
        assert_eq!(broker.snapshot()["region"]["Kinnari"]["Era"], json!("Gupta"));
    }
}
