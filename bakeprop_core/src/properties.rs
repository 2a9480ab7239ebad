use std::collections::BTreeMap;

use derive_more::Deref;
use serde::Deserialize;
use serde::Serialize;

/// Environment variable a host reads the raw property string from.
pub const PROPERTIES_ENV_VAR: &str = "BAKEPROP_PROPERTIES";

/// A single `key=value` entry taken from the raw property string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BuildProperty {
	pub key: String,
	pub value: String,
}

impl BuildProperty {
	pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
		Self {
			key: key.into(),
			value: value.into(),
		}
	}
}

/// Split a raw property string into ordered entries.
///
/// Fragments are separated by `,` and split on their first `=`. Both sides
/// are trimmed. A fragment without `=`, or whose key trims to nothing, is
/// dropped.
pub fn parse_entries(raw: &str) -> Vec<BuildProperty> {
	raw.split(',')
		.filter_map(|fragment| {
			let (key, value) = fragment.split_once('=')?;
			let key = key.trim();
			if key.is_empty() {
				return None;
			}

			Some(BuildProperty::new(key, value.trim()))
		})
		.collect()
}

/// Resolved build properties keyed by name.
///
/// When the same key appears more than once, the last occurrence wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Deref, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyMap(BTreeMap<String, String>);

impl PropertyMap {
	pub fn from_entries(entries: impl IntoIterator<Item = BuildProperty>) -> Self {
		let mut map = BTreeMap::new();
		for entry in entries {
			map.insert(entry.key, entry.value);
		}

		Self(map)
	}

	/// Look up the value configured for `key`.
	pub fn value(&self, key: &str) -> Option<&str> {
		self.0.get(key).map(String::as_str)
	}

	/// Render the map back into its canonical `key=value,key=value` form.
	///
	/// Values that themselves contain `,` cannot be represented and will not
	/// survive a second [`resolve`].
	pub fn to_raw(&self) -> String {
		self.0
			.iter()
			.map(|(key, value)| format!("{key}={value}"))
			.collect::<Vec<_>>()
			.join(",")
	}
}

impl FromIterator<BuildProperty> for PropertyMap {
	fn from_iter<T: IntoIterator<Item = BuildProperty>>(iter: T) -> Self {
		Self::from_entries(iter)
	}
}

/// Resolve the raw property string into a [`PropertyMap`].
///
/// An absent or empty string yields an empty map. This never fails:
/// malformed fragments are discarded.
pub fn resolve(raw: Option<&str>) -> PropertyMap {
	let Some(raw) = raw.filter(|raw| !raw.trim().is_empty()) else {
		return PropertyMap::default();
	};

	let entries = parse_entries(raw);
	tracing::debug!(entries = entries.len(), "resolved build properties");

	PropertyMap::from_entries(entries)
}
