use deli_stylize::{ModelCache, StylizeError};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

#[test]
fn test_loader_runs_once_and_handle_is_shared() {
    let cache: ModelCache<String> = ModelCache::new();
    let calls = AtomicUsize::new(0);

    let first = cache
        .get_or_load("model_cache_hayao", || {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok("hayao".to_string())
        })
        .unwrap();
    let second = cache
        .get_or_load("model_cache_hayao", || {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok("reloaded".to_string())
        })
        .unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(*second, "hayao");
}

#[test]
fn test_keys_are_independent() {
    let cache: ModelCache<u32> = ModelCache::new();
    assert!(cache.is_empty());

    let a = cache.get_or_load("a", || Ok(1)).unwrap();
    let b = cache.get_or_load("b", || Ok(2)).unwrap();

    assert_eq!((*a, *b), (1, 2));
    assert_eq!(cache.len(), 2);
    assert!(cache.contains("a"));
    assert!(!cache.contains("c"));
}

#[test]
fn test_failed_load_leaves_no_entry_and_retries() {
    let cache: ModelCache<u32> = ModelCache::new();

    let result = cache.get_or_load("model_cache_hosoda", || {
        Err(StylizeError::ModelLoad("weights file not found".to_string()))
    });
    assert!(matches!(result, Err(StylizeError::ModelLoad(_))));
    assert!(!cache.contains("model_cache_hosoda"));
    assert_eq!(cache.len(), 0);

    let retried = cache.get_or_load("model_cache_hosoda", || Ok(7)).unwrap();
    assert_eq!(*retried, 7);
    assert!(cache.contains("model_cache_hosoda"));
}

#[test]
fn test_concurrent_misses_share_one_load() {
    let cache: Arc<ModelCache<usize>> = Arc::new(ModelCache::new());
    let calls = Arc::new(AtomicUsize::new(0));
    let barrier = Arc::new(Barrier::new(8));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let cache = Arc::clone(&cache);
            let calls = Arc::clone(&calls);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                cache
                    .get_or_load("model_cache_hayao", || {
                        // slow loader widens the race window
                        thread::sleep(Duration::from_millis(50));
                        Ok(calls.fetch_add(1, Ordering::SeqCst))
                    })
                    .unwrap()
            })
        })
        .collect();

    let results: Vec<Arc<usize>> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(results.iter().all(|r| Arc::ptr_eq(r, &results[0])));
}

#[test]
fn test_slow_load_does_not_block_other_keys() {
    let cache: Arc<ModelCache<&'static str>> = Arc::new(ModelCache::new());
    let started = Arc::new(Barrier::new(2));

    let slow = {
        let cache = Arc::clone(&cache);
        let started = Arc::clone(&started);
        thread::spawn(move || {
            cache
                .get_or_load("slow", || {
                    started.wait();
                    thread::sleep(Duration::from_millis(200));
                    Ok("slow")
                })
                .unwrap()
        })
    };

    started.wait();
    // "slow" is mid-load; a different key must still load right away
    let fast = cache.get_or_load("fast", || Ok("fast")).unwrap();
    assert_eq!(*fast, "fast");

    assert_eq!(*slow.join().unwrap(), "slow");
    assert_eq!(cache.len(), 2);
}
