//! Unit tests for environment guards.

use super::*;
use std::sync::{Arc, Barrier};
use std::thread;

fn env_value(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

#[test]
fn set_var_restores_original() {
    let key = "TEST_HELPERS_SET_VAR";
    let base = set_var(key, "orig");
    {
        let _guard = set_var(key, "temp");
        assert_eq!(env_value(key).as_deref(), Some("temp"));
    }
    assert_eq!(env_value(key).as_deref(), Some("orig"));
    drop(base);
    assert_eq!(env_value(key), None);
}

#[test]
fn remove_var_restores_value() {
    let key = "TEST_HELPERS_REMOVE_VAR";
    let _base = set_var(key, "kept");
    {
        let _guard = remove_var(key);
        assert_eq!(env_value(key), None);
    }
    assert_eq!(env_value(key).as_deref(), Some("kept"));
}

#[test]
fn stacked_guards_restore_in_lifo_order() {
    let key = "TEST_HELPERS_STACKING";
    let first = set_var(key, "v1");
    let second = set_var(key, "v2");
    assert_eq!(env_value(key).as_deref(), Some("v2"));
    drop(second);
    assert_eq!(env_value(key).as_deref(), Some("v1"));
    drop(first);
    assert_eq!(env_value(key), None);
}

#[test]
fn locale_scope_sets_and_clears_all_variables() {
    let _outer = set_var("LC_MESSAGES", "de_DE.UTF-8");
    {
        let _scope = locale_scope(Some("zh_CN.UTF-8"), None, Some("en_US.UTF-8"));
        assert_eq!(env_value("LC_ALL").as_deref(), Some("zh_CN.UTF-8"));
        assert_eq!(env_value("LC_MESSAGES"), None);
        assert_eq!(env_value("LANG").as_deref(), Some("en_US.UTF-8"));
    }
    assert_eq!(env_value("LC_MESSAGES").as_deref(), Some("de_DE.UTF-8"));
}

#[test]
fn concurrent_mutations_of_distinct_keys_restore_values() {
    const THREADS: usize = 4;
    let barrier = Arc::new(Barrier::new(THREADS));
    let handles: Vec<_> = (0..THREADS)
        .map(|index| {
            let start = Arc::clone(&barrier);
            thread::spawn(move || {
                let key = format!("TEST_HELPERS_CONCURRENT_{index}");
                start.wait();
                for iteration in 0..8 {
                    let value = format!("{key}-{iteration}");
                    let guard = set_var(&key, &value);
                    assert_eq!(env_value(&key), Some(value));
                    drop(guard);
                    assert_eq!(env_value(&key), None);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("worker thread panicked");
    }
}
