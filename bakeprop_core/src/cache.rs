use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

use parking_lot::RwLock;

use crate::CandidateDeclaration;
use crate::ContainerGroup;
use crate::Diagnostic;
use crate::PropertyMap;
use crate::ValidatedModel;
use crate::emit::render_unit_text;
use crate::properties::resolve;
use crate::validate::validate;

/// Everything the text of a unit depends on: the group's models and the
/// configured value (if any) each member reads.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct UnitKey {
	group: ContainerGroup,
	values: Vec<Option<String>>,
}

impl UnitKey {
	fn new(group: &ContainerGroup, properties: &PropertyMap) -> Self {
		let values = group
			.members
			.iter()
			.map(|model| properties.value(&model.resolved_key).map(str::to_string))
			.collect();

		Self {
			group: group.clone(),
			values,
		}
	}
}

/// Hit and miss counters for a [`GenerationCache`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
	pub hits: u64,
	pub misses: u64,
}

/// Number of live entries in each table of a [`GenerationCache`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheSizes {
	pub properties: usize,
	pub validations: usize,
	pub units: usize,
}

/// A memoized value and the most recent pass that read it.
#[derive(Debug)]
struct Entry<V> {
	value: V,
	last_pass: AtomicU64,
}

impl<V: Clone> Entry<V> {
	fn new(value: V, pass: u64) -> Self {
		Self {
			value,
			last_pass: AtomicU64::new(pass),
		}
	}

	fn touch(&self, pass: u64) -> V {
		self.last_pass.fetch_max(pass, Ordering::Relaxed);
		self.value.clone()
	}
}

type Table<K, V> = RwLock<HashMap<K, Entry<V>>>;

/// Memoizes each pipeline stage by the identity of its input.
///
/// Re-running after an unrelated change only recomputes the stages whose
/// inputs changed: an edited candidate is revalidated, and only groups whose
/// members or configured values changed are re-rendered. Tables are
/// read-mostly and safe to share between concurrent passes.
///
/// Lookups happen through a [`CachePass`]. When a pass finishes, every entry
/// that neither it nor a later pass read is evicted, so the tables hold
/// roughly one pass worth of entries however many passes run.
#[derive(Debug, Default)]
pub struct GenerationCache {
	properties: Table<String, Arc<PropertyMap>>,
	validations: Table<CandidateDeclaration, Result<ValidatedModel, Diagnostic>>,
	units: Table<UnitKey, Arc<str>>,
	passes: AtomicU64,
	hits: AtomicU64,
	misses: AtomicU64,
}

impl GenerationCache {
	pub fn new() -> Self {
		Self::default()
	}

	/// Start a pass. Entries read through it are kept when it finishes.
	pub fn begin_pass(&self) -> CachePass<'_> {
		let id = self.passes.fetch_add(1, Ordering::Relaxed) + 1;
		CachePass { cache: self, id }
	}

	pub fn stats(&self) -> CacheStats {
		CacheStats {
			hits: self.hits.load(Ordering::Relaxed),
			misses: self.misses.load(Ordering::Relaxed),
		}
	}

	pub fn sizes(&self) -> CacheSizes {
		CacheSizes {
			properties: self.properties.read().len(),
			validations: self.validations.read().len(),
			units: self.units.read().len(),
		}
	}

	/// Drop every memoized entry. Counters are kept.
	pub fn clear(&self) {
		self.properties.write().clear();
		self.validations.write().clear();
		self.units.write().clear();
	}

	fn lookup_or_insert<K, V>(
		&self,
		table: &Table<K, V>,
		pass: u64,
		key: K,
		compute: impl FnOnce(&K) -> V,
	) -> V
	where
		K: Eq + Hash,
		V: Clone,
	{
		if let Some(entry) = table.read().get(&key) {
			self.hits.fetch_add(1, Ordering::Relaxed);
			return entry.touch(pass);
		}

		self.misses.fetch_add(1, Ordering::Relaxed);
		let value = compute(&key);
		table
			.write()
			.entry(key)
			.or_insert_with(|| Entry::new(value, pass))
			.touch(pass)
	}

	fn sweep(&self, pass: u64) {
		fn retain<K, V>(table: &Table<K, V>, pass: u64) -> usize {
			let mut table = table.write();
			let before = table.len();
			table.retain(|_, entry| entry.last_pass.load(Ordering::Relaxed) >= pass);
			before - table.len()
		}

		let evicted = retain(&self.properties, pass)
			+ retain(&self.validations, pass)
			+ retain(&self.units, pass);
		if evicted > 0 {
			tracing::trace!(pass, evicted, "evicted stale cache entries");
		}
	}
}

/// One generation pass over a [`GenerationCache`].
#[derive(Debug)]
pub struct CachePass<'a> {
	cache: &'a GenerationCache,
	id: u64,
}

impl CachePass<'_> {
	/// Resolve the raw property string, reusing an earlier result for the
	/// same text. Absent and empty input share one entry.
	pub fn properties(&self, raw: Option<&str>) -> Arc<PropertyMap> {
		let key = raw.unwrap_or_default().to_string();
		self.cache
			.lookup_or_insert(&self.cache.properties, self.id, key, |raw| {
				Arc::new(resolve(Some(raw)))
			})
	}

	/// Validate a candidate, reusing an earlier result for an identical one.
	pub fn validate(&self, candidate: &CandidateDeclaration) -> Result<ValidatedModel, Diagnostic> {
		self.cache
			.lookup_or_insert(&self.cache.validations, self.id, candidate.clone(), validate)
	}

	/// Render the text for a group, reusing an earlier rendering when
	/// neither the members nor the values they read have changed.
	pub fn unit_text(&self, group: &ContainerGroup, properties: &PropertyMap) -> Arc<str> {
		let key = UnitKey::new(group, properties);
		self.cache.lookup_or_insert(&self.cache.units, self.id, key, |_| {
			Arc::from(render_unit_text(group, properties))
		})
	}

	/// Evict every entry last read before this pass.
	pub fn finish(self) {
		self.cache.sweep(self.id);
	}
}
