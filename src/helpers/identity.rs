//! Cached user and group name <-> id resolution.
//!
//! Every lookup is remembered for the lifetime of the resolver, including
//! misses, so the system databases are consulted at most once per key. An
//! unknown id or name resolves to `None`; it is not an error.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::ffi::OsStr;
use std::hash::Hash;
use std::sync::{Mutex, OnceLock, PoisonError};
use tracing::trace;

/// Where names and ids come from.
pub trait IdentitySource {
    fn user_name(&self, uid: u32) -> Option<String>;
    fn user_id(&self, name: &str) -> Option<u32>;
    fn group_name(&self, gid: u32) -> Option<String>;
    fn group_id(&self, name: &str) -> Option<u32>;
}

/// Names that are not valid UTF-8 are treated as unresolvable rather than
/// replaced, so a cached name always matches the account exactly.
#[cfg_attr(not(unix), allow(dead_code))]
fn utf8_name(name: &OsStr) -> Option<String> {
    name.to_str().map(str::to_owned)
}

/// The host's user and group databases.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemIdentitySource;

#[cfg(unix)]
impl IdentitySource for SystemIdentitySource {
    fn user_name(&self, uid: u32) -> Option<String> {
        uzers::get_user_by_uid(uid).and_then(|user| utf8_name(user.name()))
    }

    fn user_id(&self, name: &str) -> Option<u32> {
        uzers::get_user_by_name(name).map(|user| user.uid())
    }

    fn group_name(&self, gid: u32) -> Option<String> {
        uzers::get_group_by_gid(gid).and_then(|group| utf8_name(group.name()))
    }

    fn group_id(&self, name: &str) -> Option<u32> {
        uzers::get_group_by_name(name).map(|group| group.gid())
    }
}

#[cfg(not(unix))]
impl IdentitySource for SystemIdentitySource {
    fn user_name(&self, _uid: u32) -> Option<String> {
        None
    }

    fn user_id(&self, _name: &str) -> Option<u32> {
        None
    }

    fn group_name(&self, _gid: u32) -> Option<String> {
        None
    }

    fn group_id(&self, _name: &str) -> Option<u32> {
        None
    }
}

#[derive(Debug)]
struct Memo<K, V>(Mutex<HashMap<K, Option<V>>>);

impl<K, V> Default for Memo<K, V> {
    fn default() -> Self {
        Self(Mutex::new(HashMap::new()))
    }
}

impl<K: Eq + Hash, V: Clone> Memo<K, V> {
    fn get_or_resolve<Q>(&self, key: &Q, resolve: impl FnOnce(&Q) -> Option<V>) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ToOwned<Owned = K> + ?Sized,
    {
        let mut map = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(hit) = map.get(key) {
            return hit.clone();
        }
        let value = resolve(key);
        map.insert(key.to_owned(), value.clone());
        value
    }

    fn len(&self) -> usize {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

/// Memoizing front for an [`IdentitySource`].
#[derive(Debug, Default)]
pub struct IdentityResolver<S = SystemIdentitySource> {
    source: S,
    user_names: Memo<u32, String>,
    user_ids: Memo<String, u32>,
    group_names: Memo<u32, String>,
    group_ids: Memo<String, u32>,
}

impl<S: IdentitySource> IdentityResolver<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            user_names: Memo::default(),
            user_ids: Memo::default(),
            group_names: Memo::default(),
            group_ids: Memo::default(),
        }
    }

    pub fn user_name_for_id(&self, uid: u32) -> Option<String> {
        self.user_names.get_or_resolve(&uid, |uid| {
            trace!("Resolving user name for uid {uid}");
            self.source.user_name(*uid)
        })
    }

    pub fn id_for_user_name(&self, name: &str) -> Option<u32> {
        self.user_ids.get_or_resolve(name, |name| {
            trace!("Resolving uid for user {name:?}");
            self.source.user_id(name)
        })
    }

    pub fn group_name_for_id(&self, gid: u32) -> Option<String> {
        self.group_names.get_or_resolve(&gid, |gid| {
            trace!("Resolving group name for gid {gid}");
            self.source.group_name(*gid)
        })
    }

    pub fn id_for_group_name(&self, name: &str) -> Option<u32> {
        self.group_ids.get_or_resolve(name, |name| {
            trace!("Resolving gid for group {name:?}");
            self.source.group_id(name)
        })
    }

    /// Number of remembered lookups, hits and misses alike.
    pub fn cached_entries(&self) -> usize {
        self.user_names.len() + self.user_ids.len() + self.group_names.len() + self.group_ids.len()
    }
}

static SYSTEM: OnceLock<IdentityResolver> = OnceLock::new();

/// The process-wide resolver backed by the system databases.
pub fn system() -> &'static IdentityResolver {
    SYSTEM.get_or_init(|| IdentityResolver::new(SystemIdentitySource))
}

pub fn user_name_for_id(uid: u32) -> Option<String> {
    system().user_name_for_id(uid)
}

pub fn id_for_user_name(name: &str) -> Option<u32> {
    system().id_for_user_name(name)
}

pub fn group_name_for_id(gid: u32) -> Option<String> {
    system().group_name_for_id(gid)
}

pub fn id_for_group_name(name: &str) -> Option<u32> {
    system().id_for_group_name(name)
}
