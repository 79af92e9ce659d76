//! Shared utilities and strongly-typed common values for workspace crates.
//!
//! ```rust
//! use vcommon::{GenerationOptions, MetadataMap, RunId, TraceId};
//!
//! let run = RunId::from("run-1");
//! let trace = TraceId::new("trace-1");
//! let mut metadata = MetadataMap::new();
//! metadata.insert("store".to_string(), "north-gate".to_string());
//!
//! let options = GenerationOptions::default().with_temperature(0.3);
//! assert_eq!(run.as_str(), "run-1");
//! assert_eq!(trace.to_string(), "trace-1");
//! assert_eq!(options.temperature, Some(0.3));
//! ```

pub mod future {
    //! Shared async future aliases.
    //!
    //! ```rust
    //! use vcommon::BoxFuture;
    //!
    //! fn str_len<'a>(value: &'a str) -> BoxFuture<'a, usize> {
    //!     Box::pin(async move { value.len() })
    //! }
    //!
    //! let _future = str_len("hello");
    //! ```

    use std::future::Future;
    use std::pin::Pin;

    pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;
}

pub mod context {
    //! Shared metadata and cross-crate identifier newtypes.
    //!
    //! ```rust
    //! use vcommon::{MetadataMap, RunId, TraceId};
    //!
    //! let run = RunId::new("run-42");
    //! let trace = TraceId::from("trace-42");
    //! let mut metadata = MetadataMap::new();
    //! metadata.insert("env".to_string(), "test".to_string());
    //!
    //! assert_eq!(run.to_string(), "run-42");
    //! assert_eq!(trace.as_str(), "trace-42");
    //! ```

    use std::collections::HashMap;
    use std::fmt::{Display, Formatter};

    pub type MetadataMap = HashMap<String, String>;

    /// Identifies one bounded orchestrator run.
    #[derive(Debug, Clone, PartialEq, Eq, Hash)]
    pub struct RunId(String);

    impl RunId {
        pub fn new(value: impl Into<String>) -> Self {
            Self(value.into())
        }

        pub fn generate() -> Self {
            Self(crate::ids::short_id())
        }

        pub fn as_str(&self) -> &str {
            self.0.as_str()
        }
    }

    impl Display for RunId {
        fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
            f.write_str(&self.0)
        }
    }

    impl From<String> for RunId {
        fn from(value: String) -> Self {
            Self(value)
        }
    }

    impl From<&str> for RunId {
        fn from(value: &str) -> Self {
            Self(value.to_string())
        }
    }

    #[derive(Debug, Clone, PartialEq, Eq, Hash)]
    pub struct TraceId(String);

    impl TraceId {
        pub fn new(value: impl Into<String>) -> Self {
            Self(value.into())
        }

        pub fn as_str(&self) -> &str {
            self.0.as_str()
        }
    }

    impl Display for TraceId {
        fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
            f.write_str(&self.0)
        }
    }

    impl From<String> for TraceId {
        fn from(value: String) -> Self {
            Self(value)
        }
    }

    impl From<&str> for TraceId {
        fn from(value: &str) -> Self {
            Self(value.to_string())
        }
    }
}

pub mod ids {
    //! Short opaque identifiers.
    //!
    //! ```rust
    //! let id = vcommon::short_id();
    //! assert_eq!(id.len(), 8);
    //! assert!(id.chars().all(|ch| ch.is_ascii_hexdigit()));
    //! ```

    use uuid::Uuid;

    pub const SHORT_ID_LEN: usize = 8;

    /// First eight hex digits of a random v4 UUID.
    pub fn short_id() -> String {
        let mut id = Uuid::new_v4().simple().to_string();
        id.truncate(SHORT_ID_LEN);
        id
    }
}

pub mod model {
    //! Shared generation settings used by request types.
    //!
    //! ```rust
    //! use vcommon::GenerationOptions;
    //!
    //! let options = GenerationOptions::default()
    //!     .with_temperature(0.2)
    //!     .with_max_tokens(128);
    //!
    //! assert_eq!(options.temperature, Some(0.2));
    //! assert_eq!(options.max_tokens, Some(128));
    //! ```

    #[derive(Debug, Clone, Copy, PartialEq, Default)]
    pub struct GenerationOptions {
        pub temperature: Option<f32>,
        pub max_tokens: Option<u32>,
    }

    impl GenerationOptions {
        pub fn with_temperature(mut self, temperature: f32) -> Self {
            self.temperature = Some(temperature);
            self
        }

        pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
            self.max_tokens = Some(max_tokens);
            self
        }
    }
}

pub mod registry {
    //! Ordered registry map wrapper used by runtime registries.
    //!
    //! Iteration follows key order so listings built from a registry are stable.
    //!
    //! ```rust
    //! use vcommon::Registry;
    //!
    //! let mut registry = Registry::new();
    //! registry.insert("beta".to_string(), 2_u32);
    //! registry.insert("alpha".to_string(), 1_u32);
    //!
    //! assert_eq!(registry.get("alpha"), Some(&1));
    //! assert_eq!(registry.keys().collect::<Vec<_>>(), ["alpha", "beta"]);
    //! ```

    use std::borrow::Borrow;
    use std::collections::BTreeMap;

    #[derive(Debug, Clone)]
    pub struct Registry<K, V> {
        items: BTreeMap<K, V>,
    }

    impl<K, V> Default for Registry<K, V>
    where
        K: Ord,
    {
        fn default() -> Self {
            Self {
                items: BTreeMap::new(),
            }
        }
    }

    impl<K, V> Registry<K, V>
    where
        K: Ord,
    {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn insert(&mut self, key: K, value: V) -> Option<V> {
            self.items.insert(key, value)
        }

        pub fn get<Q>(&self, key: &Q) -> Option<&V>
        where
            K: Borrow<Q>,
            Q: Ord + ?Sized,
        {
            self.items.get(key)
        }

        pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
        where
            K: Borrow<Q>,
            Q: Ord + ?Sized,
        {
            self.items.remove(key)
        }

        pub fn contains_key<Q>(&self, key: &Q) -> bool
        where
            K: Borrow<Q>,
            Q: Ord + ?Sized,
        {
            self.items.contains_key(key)
        }

        pub fn keys(&self) -> impl Iterator<Item = &K> {
            self.items.keys()
        }

        pub fn values(&self) -> impl Iterator<Item = &V> {
            self.items.values()
        }

        pub fn len(&self) -> usize {
            self.items.len()
        }

        pub fn is_empty(&self) -> bool {
            self.items.is_empty()
        }
    }
}

pub use context::{MetadataMap, RunId, TraceId};
pub use future::BoxFuture;
pub use ids::short_id;
pub use model::GenerationOptions;
pub use registry::Registry;
