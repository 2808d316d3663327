//! Query cache tests (LMDB in a temp dir)

use std::time::Duration;

use rolegate::{CatalogResponse, QueryCache, QueryKey, RoleId};
use tempfile::TempDir;

fn setup() -> (TempDir, QueryCache) {
    let dir = TempDir::new().unwrap();
    let cache = QueryCache::open(dir.path()).unwrap();
    (dir, cache)
}

#[test]
fn put_and_get() {
    let (_dir, cache) = setup();
    let resp = CatalogResponse {
        resources: vec!["projects".into()],
        combinations: vec!["projects:read".into()],
    };
    assert!(cache.get::<CatalogResponse>(&QueryKey::Catalog).unwrap().is_none());
    cache.put(&QueryKey::Catalog, &resp).unwrap();
    assert_eq!(cache.get::<CatalogResponse>(&QueryKey::Catalog).unwrap(), Some(resp));
}

#[test]
fn fresh_reads_are_bounded_by_age() {
    let (_dir, cache) = setup();
    let key = QueryKey::Catalog;
    assert!(cache.age(&key).unwrap().is_none());
    assert!(cache.get_fresh::<u32>(&key, Duration::from_secs(60)).unwrap().is_none());

    cache.put(&key, &7u32).unwrap();
    assert!(cache.age(&key).unwrap().unwrap() < Duration::from_secs(60));
    assert_eq!(cache.get_fresh::<u32>(&key, Duration::from_secs(60)).unwrap(), Some(7));
    assert!(cache.get_fresh::<u32>(&key, Duration::ZERO).unwrap().is_none());
    // Plain reads ignore age
    assert_eq!(cache.get::<u32>(&key).unwrap(), Some(7));

    cache.invalidate(&[key.clone()]).unwrap();
    assert!(cache.age(&key).unwrap().is_none());
}

#[test]
fn generations_bump_on_write_and_invalidate() {
    let (_dir, cache) = setup();
    let key = QueryKey::Role(RoleId::new("r1"));
    assert_eq!(cache.generation(&key).unwrap(), 0);
    assert_eq!(cache.put(&key, &"v1").unwrap(), 1);
    assert_eq!(cache.put(&key, &"v2").unwrap(), 2);

    assert_eq!(cache.invalidate(&[key.clone()]).unwrap(), 1);
    assert_eq!(cache.generation(&key).unwrap(), 3);
    assert!(cache.get::<String>(&key).unwrap().is_none());

    // Invalidating an absent key still bumps its generation
    assert_eq!(cache.invalidate(&[QueryKey::Users]).unwrap(), 0);
    assert_eq!(cache.generation(&QueryKey::Users).unwrap(), 1);
}

#[test]
fn role_mutation_keys() {
    let id = RoleId::new("r9");
    let keys = QueryKey::after_role_mutation(&id);
    assert!(keys.contains(&QueryKey::Role(id.clone())));
    assert!(keys.contains(&QueryKey::Roles));
    assert!(keys.contains(&QueryKey::Users));
    assert!(keys.contains(&QueryKey::CurrentUser));
    assert!(!keys.contains(&QueryKey::Catalog));
    assert_eq!(QueryKey::Role(id).as_key(), "role:r9");
}

#[test]
fn keys_do_not_collide() {
    let (_dir, cache) = setup();
    cache.put(&QueryKey::Role(RoleId::new("a")), &1u32).unwrap();
    cache.put(&QueryKey::Role(RoleId::new("b")), &2u32).unwrap();
    cache.invalidate(&[QueryKey::Role(RoleId::new("a"))]).unwrap();
    assert_eq!(cache.get::<u32>(&QueryKey::Role(RoleId::new("b"))).unwrap(), Some(2));
}

#[test]
fn persists_across_reopen() {
    let dir = TempDir::new().unwrap();
    {
        let cache = QueryCache::open(dir.path()).unwrap();
        cache.put(&QueryKey::Roles, &vec!["r1", "r2"]).unwrap();
    }
    let cache = QueryCache::open(dir.path()).unwrap();
    assert_eq!(
        cache.get::<Vec<String>>(&QueryKey::Roles).unwrap(),
        Some(vec!["r1".to_string(), "r2".to_string()])
    );
}

#[test]
fn clear_drops_everything() {
    let (_dir, cache) = setup();
    cache.put(&QueryKey::Users, &0u8).unwrap();
    cache.clear().unwrap();
    assert!(cache.get::<u8>(&QueryKey::Users).unwrap().is_none());
    assert_eq!(cache.generation(&QueryKey::Users).unwrap(), 0);
}
