//! # Type Descriptor Cache Module
//!
//! Thread-safe memo of [`TypeDescriptor`]s, one per registered type name.
//!
//! ## Overview
//!
//! Building a descriptor walks every field and constructor parameter of a type and
//! classifies its declared types against the registry. Hydrating the same type on
//! every request would repeat that work, so descriptors are built once, on first
//! request, and shared behind an `Arc` afterwards.
//!
//! ## Thread Safety
//!
//! Each type name owns a `OnceCell` stored in a `DashMap`:
//! - The first caller for a type runs the build inside the cell
//! - Concurrent callers for the same type block on that cell and reuse its result
//! - Callers for other types only touch their own shard
//! - A published descriptor is never mutated or evicted
//!
//! A failed build (unknown type) drops its empty cell again, so nothing is
//! published for it and the error is returned to the caller that asked.
//!
//! ## Registry Binding
//!
//! Descriptors are keyed by type name only, so a cache is only meaningful for
//! the registry it was filled from. Builders bind the cache to their registry
//! (see [`ObjectBuilder::with_cache`](crate::ObjectBuilder::with_cache)); a
//! second builder over a different registry is refused.
//!
//! ## Configuration
//!
//! Caching can be disabled with `HYDRATOR_TYPE_CACHE=off` (see
//! [`HydratorConfig`](crate::HydratorConfig)); every lookup then rebuilds.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use once_cell::sync::OnceCell;
use tracing::{debug, info};

use crate::descriptor::TypeDescriptor;
use crate::error::HydrationError;
use crate::registry::TypeRegistry;

type Slot = Arc<OnceCell<Arc<TypeDescriptor>>>;

/// Process-scoped cache of type descriptors.
///
/// Cloning is cheap and clones share the same entries, so one cache can back
/// several builders.
///
/// # Example
///
/// ```rust
/// use hydrator::{ClassDef, HydrationError, TypeCache, TypeDescriptor, TypeRegistry};
///
/// #[derive(Debug, Default)]
/// struct Empty;
///
/// let registry = TypeRegistry::new().with(ClassDef::<Empty>::new("Empty"));
/// let cache = TypeCache::new(true);
///
/// let build = || -> Result<TypeDescriptor, HydrationError> {
///     let def = registry.get("Empty").ok_or_else(|| HydrationError::UnknownType("Empty".into()))?;
///     Ok(TypeDescriptor::build(def, &registry))
/// };
/// let first = cache.get_or_build("Empty", build).unwrap();
/// let second = cache.get_or_build("Empty", build).unwrap();
/// assert!(std::sync::Arc::ptr_eq(&first, &second));
/// assert_eq!(cache.build_count(), 1);
/// ```
#[derive(Clone)]
pub struct TypeCache {
    /// Per-type cells; a cell is initialized at most once.
    entries: Arc<DashMap<Arc<str>, Slot>>,
    /// Whether descriptors are kept between lookups.
    enabled: bool,
    /// Number of successful descriptor builds, for observability and tests.
    builds: Arc<AtomicUsize>,
    /// Registry the descriptors were built from, set by the first builder.
    registry: Arc<OnceCell<Arc<TypeRegistry>>>,
}

impl TypeCache {
    /// Create a new cache.
    ///
    /// # Arguments
    ///
    /// * `enabled` - Whether descriptors are kept (from [`HydratorConfig`](crate::HydratorConfig))
    pub fn new(enabled: bool) -> Self {
        info!(enabled = enabled, "Initializing type descriptor cache");
        Self {
            entries: Arc::new(DashMap::new()),
            enabled,
            builds: Arc::new(AtomicUsize::new(0)),
            registry: Arc::new(OnceCell::new()),
        }
    }

    /// Fresh cache already bound to `registry`.
    pub(crate) fn bound_to(enabled: bool, registry: &Arc<TypeRegistry>) -> Self {
        let cache = Self::new(enabled);
        let _ = cache.registry.set(Arc::clone(registry));
        cache
    }

    /// Bind this cache (and its clones) to `registry`.
    ///
    /// Succeeds when the cache is already bound to the same registry, or is
    /// unbound and still empty. Descriptors published for another registry
    /// would describe different types under the same names.
    pub(crate) fn bind(&self, registry: &Arc<TypeRegistry>) -> Result<(), HydrationError> {
        if self.registry.get().is_none() && !self.entries.is_empty() {
            return Err(HydrationError::RegistryMismatch);
        }
        let bound = self.registry.get_or_init(|| Arc::clone(registry));
        if Arc::ptr_eq(bound, registry) {
            Ok(())
        } else {
            Err(HydrationError::RegistryMismatch)
        }
    }

    /// Get the cached descriptor for `type_name` or build and publish it.
    ///
    /// `build` runs at most once per type across all threads while the cache is
    /// enabled. If it fails, nothing is cached and the error is returned.
    ///
    /// # Performance
    ///
    /// - Cache hit: one shard read lock and an `Arc` clone
    /// - Cache miss: one shard write lock to create the cell, then the build
    pub fn get_or_build<F>(
        &self,
        type_name: &str,
        build: F,
    ) -> Result<Arc<TypeDescriptor>, HydrationError>
    where
        F: FnOnce() -> Result<TypeDescriptor, HydrationError>,
    {
        if !self.enabled {
            let descriptor = build()?;
            self.builds.fetch_add(1, Ordering::Relaxed);
            return Ok(Arc::new(descriptor));
        }

        // Fast path: published descriptor, shard read lock only
        if let Some(slot) = self.entries.get(type_name) {
            if let Some(descriptor) = slot.get() {
                debug!(type_name = type_name, "Type descriptor cache hit");
                return Ok(Arc::clone(descriptor));
            }
        }

        // Slow path: take (or create) the cell, then build outside the shard lock
        let slot: Slot = Arc::clone(
            self.entries
                .entry(Arc::from(type_name))
                .or_default()
                .value(),
        );

        let built = slot.get_or_try_init(|| {
            let descriptor = build()?;
            let count = self.builds.fetch_add(1, Ordering::Relaxed) + 1;
            debug!(
                type_name = type_name,
                fields = descriptor.fields().len(),
                constructor_params = descriptor.constructor_params().len(),
                builds = count,
                "Type descriptor built and cached"
            );
            Ok::<_, HydrationError>(Arc::new(descriptor))
        });

        match built {
            Ok(descriptor) => Ok(Arc::clone(descriptor)),
            Err(err) => {
                self.entries.remove_if(type_name, |_, slot| slot.get().is_none());
                Err(err)
            }
        }
    }

    /// `true` if a descriptor for `type_name` has been published.
    pub fn contains(&self, type_name: &str) -> bool {
        self.entries
            .get(type_name)
            .is_some_and(|slot| slot.get().is_some())
    }

    /// Number of published descriptors.
    pub fn size(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.value().get().is_some())
            .count()
    }

    /// Number of raw entries, including cells still being built.
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// Number of successful descriptor builds since the cache was created.
    pub fn build_count(&self) -> usize {
        self.builds.load(Ordering::Relaxed)
    }

    /// Whether descriptors are kept between lookups.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl std::fmt::Debug for TypeCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeCache")
            .field("enabled", &self.enabled)
            .field("size", &self.size())
            .field("builds", &self.build_count())
            .finish()
    }
}
