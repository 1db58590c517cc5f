//! Display names for flag members.
//!
//! Labels come from a [`NameResolver`]. Anything other than the plain member
//! name goes through a process-wide [`DisplayNameCache`], so each
//! (type, member) pair is resolved once and the first stored answer wins for
//! the life of the process.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

use crate::flag::FlagMember;

type CacheKey = (String, String);

/// Thread-safe memo of resolver results keyed by (type name, member name).
///
/// Only the resolver's raw answer is stored, including "no label". Callers
/// apply their own fallback.
#[derive(Debug, Default)]
pub struct DisplayNameCache {
    entries: RwLock<HashMap<CacheKey, Option<String>>>,
}

lazy_static! {
    static ref SHARED: DisplayNameCache = DisplayNameCache::new();
    static ref DESCRIPTIONS: DisplayNameCache = DisplayNameCache::new();
    static ref DISPLAY_NAMES: DisplayNameCache = DisplayNameCache::new();
}

impl DisplayNameCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide cache used by custom resolvers.
    pub fn global() -> &'static DisplayNameCache {
        &SHARED
    }

    /// Resolve `member` through the cache.
    ///
    /// On a miss the resolver runs outside the lock and the first result to be
    /// stored wins; every caller gets the stored value back. A panicking
    /// resolver propagates to the caller and stores nothing.
    pub fn resolve<F>(&self, member: &FlagMember, resolver: F) -> Option<String>
    where
        F: FnOnce(&FlagMember) -> Option<String>,
    {
        if let Some(hit) = self.get(member.type_name(), member.name()) {
            tracing::trace!(member = member.name(), "display name cache hit");
            return hit;
        }

        tracing::trace!(
            type_name = member.type_name(),
            member = member.name(),
            "resolving display name"
        );
        let resolved = resolver(member);

        let key = (member.type_name().to_string(), member.name().to_string());
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.entry(key).or_insert(resolved).clone()
    }

    /// Look up a stored answer without resolving. `None` means "not cached".
    pub fn get(&self, type_name: &str, member_name: &str) -> Option<Option<String>> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries
            .get(&(type_name.to_string(), member_name.to_string()))
            .cloned()
    }

    /// Number of cached keys.
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether nothing has been cached yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Built-in naming strategies, selectable from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "native", derive(uniffi::Enum))]
pub enum NameStyle {
    /// The declared member name.
    #[default]
    MemberName,
    /// The member's description annotation.
    Description,
    /// The member's display-name annotation.
    Display,
}

/// Caller-supplied label function.
pub type ResolveFn = dyn Fn(&FlagMember) -> Option<String> + Send + Sync;

/// How a toggle's label is derived from its member.
///
/// Every strategy falls back to the member name when it yields no label.
#[derive(Clone, Default)]
pub enum NameResolver {
    /// Use the member name as is.
    #[default]
    MemberName,
    /// Read the description annotation.
    Description,
    /// Read the display-name annotation.
    Display,
    /// Arbitrary caller function, memoized in [`DisplayNameCache::global`].
    Custom(Arc<ResolveFn>),
}

impl NameResolver {
    /// Wrap a caller function.
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&FlagMember) -> Option<String> + Send + Sync + 'static,
    {
        NameResolver::Custom(Arc::new(f))
    }

    /// Label for `member`.
    pub fn label(&self, member: &FlagMember) -> String {
        let resolved = match self {
            NameResolver::MemberName => None,
            NameResolver::Description => {
                DESCRIPTIONS.resolve(member, |m| m.description().map(str::to_string))
            }
            NameResolver::Display => {
                DISPLAY_NAMES.resolve(member, |m| m.display_name().map(str::to_string))
            }
            NameResolver::Custom(f) => DisplayNameCache::global().resolve(member, |m| f(m)),
        };
        resolved.unwrap_or_else(|| member.name().to_string())
    }
}

impl From<NameStyle> for NameResolver {
    fn from(style: NameStyle) -> Self {
        match style {
            NameStyle::MemberName => NameResolver::MemberName,
            NameStyle::Description => NameResolver::Description,
            NameStyle::Display => NameResolver::Display,
        }
    }
}

impl fmt::Debug for NameResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NameResolver::MemberName => f.write_str("MemberName"),
            NameResolver::Description => f.write_str("Description"),
            NameResolver::Display => f.write_str("Display"),
            NameResolver::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}
