//! Persistent query cache (LMDB)
//!
//! JSON bodies keyed by a typed `QueryKey`, plus a big-endian generation
//! counter and a write timestamp per key. Every write or invalidation bumps
//! the generation so a consumer can tell a refetch is due. The store is
//! shared across processes, so readers that need bounded staleness use
//! `get_fresh`.

use std::path::Path;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use heed::types::{Str, U64};
use heed::{Database, Env, EnvOpenOptions, RoTxn, RwTxn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info};

use crate::constants::{CACHE_MAP_SIZE, CACHE_MAX_DBS};
use crate::error::{err, Result};
use crate::role::RoleId;

pub type DbBody = Database<Str, Str>;
pub type DbGen = Database<Str, U64<byteorder::BigEndian>>;
/// Write time, milliseconds since the epoch
pub type DbStamp = Database<Str, U64<byteorder::BigEndian>>;

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Cached query identity
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryKey {
    Catalog,
    Roles,
    Role(RoleId),
    Users,
    CurrentUser,
}

impl QueryKey {
    pub fn as_key(&self) -> String {
        match self {
            QueryKey::Catalog => "catalog".into(),
            QueryKey::Roles => "roles".into(),
            QueryKey::Role(id) => format!("role:{}", id),
            QueryKey::Users => "users".into(),
            QueryKey::CurrentUser => "me".into(),
        }
    }

    /// Queries made stale by creating, updating or toggling a role
    pub fn after_role_mutation(id: &RoleId) -> Vec<QueryKey> {
        vec![
            QueryKey::Role(id.clone()),
            QueryKey::Roles,
            QueryKey::Users,
            QueryKey::CurrentUser,
        ]
    }
}

/// All database handles
pub struct Dbs {
    pub bodies: DbBody,
    pub gens: DbGen,
    pub stamps: DbStamp,
}

pub struct QueryCache {
    env: Env,
    dbs: Dbs,
}

impl QueryCache {
    /// Open (or create) the cache at `path`
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        std::fs::create_dir_all(path)?;
        // SAFETY: LMDB requires no other processes access this path concurrently during open.
        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(CACHE_MAP_SIZE)
                .max_dbs(CACHE_MAX_DBS)
                .open(path)
                .map_err(err)?
        };
        let mut tx = env.write_txn().map_err(err)?;
        let dbs = Dbs {
            bodies: env.create_database(&mut tx, Some("bodies")).map_err(err)?,
            gens: env.create_database(&mut tx, Some("gens")).map_err(err)?,
            stamps: env.create_database(&mut tx, Some("stamps")).map_err(err)?,
        };
        tx.commit().map_err(err)?;
        debug!(path = %path.display(), "query cache opened");
        Ok(Self { env, dbs })
    }

    #[inline]
    fn read<T, F: FnOnce(&Dbs, &RoTxn) -> Result<T>>(&self, f: F) -> Result<T> {
        f(&self.dbs, &self.env.read_txn().map_err(err)?)
    }

    #[inline]
    fn write<T, F: FnOnce(&Dbs, &mut RwTxn) -> Result<T>>(&self, f: F) -> Result<T> {
        let mut txn = self.env.write_txn().map_err(err)?;
        let r = f(&self.dbs, &mut txn)?;
        txn.commit().map_err(err)?;
        Ok(r)
    }

    fn bump(d: &Dbs, tx: &mut RwTxn, key: &str) -> Result<u64> {
        let next = d.gens.get(tx, key).map_err(err)?.unwrap_or(0) + 1;
        d.gens.put(tx, key, &next).map_err(err)?;
        Ok(next)
    }

    /// Live cached value, if any, regardless of age
    pub fn get<T: DeserializeOwned>(&self, key: &QueryKey) -> Result<Option<T>> {
        let k = key.as_key();
        self.read(|d, tx| match d.bodies.get(tx, k.as_str()).map_err(err)? {
            Some(body) => Ok(Some(serde_json::from_str(body)?)),
            None => Ok(None),
        })
    }

    /// Cached value written less than `max_age` ago. A zero `max_age` never hits.
    pub fn get_fresh<T: DeserializeOwned>(&self, key: &QueryKey, max_age: Duration) -> Result<Option<T>> {
        match self.age(key)? {
            Some(age) if age < max_age => self.get(key),
            Some(age) => {
                debug!(key = %key.as_key(), age_ms = age.as_millis() as u64, "cached query expired");
                Ok(None)
            }
            None => Ok(None),
        }
    }

    /// Time since the live value was written
    pub fn age(&self, key: &QueryKey) -> Result<Option<Duration>> {
        let k = key.as_key();
        let stamp = self.read(|d, tx| {
            if d.bodies.get(tx, k.as_str()).map_err(err)?.is_none() {
                return Ok(None);
            }
            d.stamps.get(tx, k.as_str()).map_err(err)
        })?;
        Ok(stamp.map(|ms| Duration::from_millis(now_ms().saturating_sub(ms))))
    }

    /// Store a value, returning the key's new generation
    pub fn put<T: Serialize>(&self, key: &QueryKey, value: &T) -> Result<u64> {
        let k = key.as_key();
        let body = serde_json::to_string(value)?;
        self.write(|d, tx| {
            d.bodies.put(tx, k.as_str(), body.as_str()).map_err(err)?;
            d.stamps.put(tx, k.as_str(), &now_ms()).map_err(err)?;
            Self::bump(d, tx, &k)
        })
    }

    /// Drop cached bodies; returns how many were present
    pub fn invalidate(&self, keys: &[QueryKey]) -> Result<usize> {
        let n = self.write(|d, tx| {
            let mut n = 0;
            for key in keys {
                let k = key.as_key();
                if d.bodies.delete(tx, k.as_str()).map_err(err)? {
                    n += 1;
                }
                d.stamps.delete(tx, k.as_str()).map_err(err)?;
                Self::bump(d, tx, &k)?;
            }
            Ok(n)
        })?;
        info!(keys = keys.len(), dropped = n, "queries invalidated");
        Ok(n)
    }

    /// Current generation of a key (0 if never written)
    pub fn generation(&self, key: &QueryKey) -> Result<u64> {
        let k = key.as_key();
        self.read(|d, tx| Ok(d.gens.get(tx, k.as_str()).map_err(err)?.unwrap_or(0)))
    }

    /// Clear all databases
    pub fn clear(&self) -> Result<()> {
        self.write(|d, tx| {
            d.bodies.clear(tx).map_err(err)?;
            d.stamps.clear(tx).map_err(err)?;
            d.gens.clear(tx).map_err(err)
        })
    }
}
