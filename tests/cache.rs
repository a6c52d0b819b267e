use std::thread;
use std::time::Duration;

use workpool::cache::{ExpiringCache, ExpiringSet, ExpiringValue};

#[test]
fn live_entries_are_returned() {
    let cache: ExpiringCache<String, u32> = ExpiringCache::new(Duration::from_secs(60));
    assert_eq!(cache.put("a".to_string(), 1), None);
    assert_eq!(cache.get(&"a".to_string()), Some(1));
}

#[test]
fn entries_expire() {
    let cache: ExpiringCache<&str, u32> = ExpiringCache::new(Duration::from_millis(40));
    cache.put("a", 1);
    thread::sleep(Duration::from_millis(80));

    assert_eq!(cache.get(&"a"), None);
    // the expired entry no longer counts as a previous value either
    assert_eq!(cache.put("a", 2), None);
    assert_eq!(cache.get(&"a"), Some(2));
}

#[test]
fn put_returns_the_previous_live_value() {
    let cache: ExpiringCache<&str, u32> = ExpiringCache::new(Duration::from_secs(60));
    cache.put("a", 1);
    assert_eq!(cache.put("a", 2), Some(1));
    assert_eq!(cache.remove(&"a"), Some(2));
    assert_eq!(cache.get(&"a"), None);
}

#[test]
fn clear_empties_the_cache() {
    let cache: ExpiringCache<&str, u32> = ExpiringCache::one_minute();
    cache.put("a", 1);
    cache.put("b", 2);
    cache.clear();
    assert_eq!(cache.get(&"a"), None);
    assert_eq!(cache.get(&"b"), None);
}

#[test]
fn single_slot_value_expires() {
    let slot: ExpiringValue<String> = ExpiringValue::new(Duration::from_millis(40));
    assert_eq!(slot.get(), None);

    slot.set("cached".to_string());
    assert_eq!(slot.get(), Some("cached".to_string()));

    thread::sleep(Duration::from_millis(80));
    assert_eq!(slot.get(), None);
}

#[test]
fn set_membership_expires() {
    let set: ExpiringSet<&str> = ExpiringSet::new(Duration::from_millis(40));
    assert!(set.insert("x"));
    assert!(!set.insert("x"), "second insert sees the live member");
    assert!(set.contains(&"x"));

    thread::sleep(Duration::from_millis(80));
    assert!(!set.contains(&"x"));
    assert!(set.insert("x"), "an expired member counts as absent");
}
