//! Hash map aliases using the FxHash hasher for deterministic, fast lookups.

pub type FxHashMap<K, V> = rustc_hash::FxHashMap<K, V>;
pub type FxHashSet<T> = rustc_hash::FxHashSet<T>;
