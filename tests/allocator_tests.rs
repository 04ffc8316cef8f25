//! Allocator tests
//!
//! Exercise candidate normalization, collision handling and error mapping
//! with scripted sequences and misbehaving stores.

mod common;

use std::collections::HashSet;
use std::sync::Arc;

use common::{FailingStore, RacyStore, ScriptedSequence};
use shortcode::cache::NullMappingCache;
use shortcode::config::ConflictPolicy;
use shortcode::errors::ShortcodeError;
use shortcode::sequence::AtomicSequence;
use shortcode::storage::{Mapping, MemoryStore, Store};
use shortcode::utils::base62::{self, min_value_with_len};
use shortcode::{Allocator, AllocatorOptions};

const SEVEN: u64 = 56_800_235_584; // 62^6
const EIGHT: u64 = 3_521_614_606_208; // 62^7

fn options(max_attempts: u32, conflict_policy: ConflictPolicy) -> AllocatorOptions {
    AllocatorOptions {
        code_length: 7,
        max_attempts,
        conflict_policy,
    }
}

fn allocator(store: Arc<dyn Store>, sequence: Arc<ScriptedSequence>) -> Allocator {
    Allocator::new(
        store,
        sequence,
        Arc::new(NullMappingCache),
        AllocatorOptions::default(),
    )
}

#[tokio::test]
async fn test_rejects_invalid_targets_before_touching_the_sequence() {
    let sequence = Arc::new(ScriptedSequence::new([SEVEN]));
    let allocator = allocator(Arc::new(MemoryStore::new()), sequence.clone());

    for target in ["", "   ", "ftp://example.com/file", "example.com", "http://"] {
        let err = allocator.allocate(target).await.unwrap_err();
        assert!(
            matches!(err, ShortcodeError::InvalidInput(_)),
            "{:?} gave {:?}",
            target,
            err
        );
    }
    assert_eq!(sequence.calls(), 0);
}

#[tokio::test]
async fn test_rejects_targets_that_are_not_verbatim_uris() {
    let sequence = Arc::new(ScriptedSequence::new([SEVEN]));
    let store = Arc::new(MemoryStore::new());
    let allocator = allocator(store.clone(), sequence.clone());

    for target in [
        "https://example.com/a b",
        "https://example.com/<x>",
        "https://example.com/a\tb",
        "https://example.com/100%",
        "HTTP://example.com",
        "Https://example.com",
    ] {
        let err = allocator.allocate(target).await.unwrap_err();
        assert!(
            matches!(err, ShortcodeError::InvalidInput(_)),
            "{:?} gave {:?}",
            target,
            err
        );
    }
    assert_eq!(sequence.calls(), 0);
    assert!(store.is_empty());

    // 已编码的形式可以正常分配
    let mapping = allocator
        .allocate("https://example.com/a%20b")
        .await
        .unwrap();
    assert_eq!(mapping.target, "https://example.com/a%20b");
}

#[tokio::test]
async fn test_stores_trimmed_target() {
    let store = Arc::new(MemoryStore::new());
    let allocator = allocator(store.clone(), Arc::new(ScriptedSequence::new([SEVEN])));

    let mapping = allocator
        .allocate("  https://example.com/a/b?q=1\n")
        .await
        .unwrap();
    assert_eq!(mapping.target, "https://example.com/a/b?q=1");

    let stored = store.get(&mapping.code).await.unwrap().unwrap();
    assert_eq!(stored.target, "https://example.com/a/b?q=1");
}

#[tokio::test]
async fn test_short_candidates_are_discarded_not_padded() {
    let sequence = Arc::new(ScriptedSequence::new([1, 61, 3843, SEVEN - 1, SEVEN + 5]));
    let allocator = allocator(Arc::new(MemoryStore::new()), sequence.clone());

    let mapping = allocator.allocate("https://example.com").await.unwrap();
    assert_eq!(mapping.code, base62::encode(SEVEN + 5));
    assert_eq!(mapping.code, "1000005");
    assert_eq!(sequence.calls(), 5);
}

#[tokio::test]
async fn test_long_candidates_are_truncated_and_collisions_skipped() {
    // "10000000" 和 "10000001" 截断后都是 "1000000"，"10000010" 截断为 "1000001"
    let sequence = Arc::new(ScriptedSequence::new([EIGHT, EIGHT + 1, EIGHT + 62]));
    let store = Arc::new(MemoryStore::new());
    let allocator = allocator(store.clone(), sequence.clone());

    let first = allocator.allocate("https://example.com/1").await.unwrap();
    assert_eq!(first.code, "1000000");

    let second = allocator.allocate("https://example.com/2").await.unwrap();
    assert_eq!(second.code, "1000001");
    assert_eq!(sequence.calls(), 3);

    // 第一个映射保持不变
    let kept = store.get("1000000").await.unwrap().unwrap();
    assert_eq!(kept.target, "https://example.com/1");
    assert_eq!(store.len(), 2);
}

#[tokio::test]
async fn test_exhausted_after_max_attempts_and_store_untouched() {
    let store = Arc::new(MemoryStore::new());
    let taken: Vec<u64> = (0..5).map(|i| SEVEN + i).collect();
    for id in &taken {
        store
            .insert_if_absent(&Mapping::new(
                base62::encode(*id),
                format!("https://taken.example.com/{}", id),
            ))
            .await
            .unwrap();
    }

    let sequence = Arc::new(ScriptedSequence::new(taken.iter().copied().chain([SEVEN + 5])));
    let allocator = Allocator::new(
        store.clone(),
        sequence.clone(),
        Arc::new(NullMappingCache),
        options(5, ConflictPolicy::Fail),
    );

    let err = allocator.allocate("https://example.com").await.unwrap_err();
    assert!(matches!(err, ShortcodeError::AllocationExhausted(_)));
    assert_eq!(sequence.calls(), 5);
    assert_eq!(store.len(), 5);
    assert!(store.get("1000005").await.unwrap().is_none());
}

#[tokio::test]
async fn test_single_attempt_budget() {
    let store = Arc::new(MemoryStore::new());
    store
        .insert_if_absent(&Mapping::new("1000000", "https://a.example.com"))
        .await
        .unwrap();

    let allocator = Allocator::new(
        store,
        Arc::new(ScriptedSequence::new([SEVEN, SEVEN + 1])),
        Arc::new(NullMappingCache),
        options(1, ConflictPolicy::Fail),
    );

    let err = allocator.allocate("https://b.example.com").await.unwrap_err();
    assert!(matches!(err, ShortcodeError::AllocationExhausted(_)));
}

#[tokio::test]
async fn test_lost_insert_race_fails_under_fail_policy() {
    let store = Arc::new(RacyStore::new(1));
    let allocator = Allocator::new(
        store.clone(),
        Arc::new(ScriptedSequence::new([SEVEN, SEVEN + 1])),
        Arc::new(NullMappingCache),
        options(5, ConflictPolicy::Fail),
    );

    let err = allocator.allocate("https://example.com").await.unwrap_err();
    assert!(matches!(err, ShortcodeError::StoreConflict(_)));
    assert_eq!(store.len(), 0);
}

#[tokio::test]
async fn test_lost_insert_race_retries_under_retry_policy() {
    let store = Arc::new(RacyStore::new(2));
    let sequence = Arc::new(ScriptedSequence::new([SEVEN, SEVEN + 1, SEVEN + 2]));
    let allocator = Allocator::new(
        store.clone(),
        sequence.clone(),
        Arc::new(NullMappingCache),
        options(5, ConflictPolicy::Retry),
    );

    let mapping = allocator.allocate("https://example.com").await.unwrap();
    assert_eq!(mapping.code, "1000002");
    assert_eq!(sequence.calls(), 3);
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn test_retry_policy_still_bounded_by_max_attempts() {
    let store = Arc::new(RacyStore::new(10));
    let allocator = Allocator::new(
        store,
        Arc::new(ScriptedSequence::new((0..10).map(|i| SEVEN + i))),
        Arc::new(NullMappingCache),
        options(3, ConflictPolicy::Retry),
    );

    let err = allocator.allocate("https://example.com").await.unwrap_err();
    assert!(matches!(err, ShortcodeError::AllocationExhausted(_)));
}

#[tokio::test]
async fn test_store_failures_surface_as_unavailable() {
    for (fail_get, fail_insert) in [(true, false), (false, true)] {
        let allocator = allocator(
            Arc::new(FailingStore::new(fail_get, fail_insert)),
            Arc::new(ScriptedSequence::new([SEVEN])),
        );
        let err = allocator.allocate("https://example.com").await.unwrap_err();
        assert!(
            matches!(err, ShortcodeError::StoreUnavailable(_)),
            "get={} insert={} gave {:?}",
            fail_get,
            fail_insert,
            err
        );
    }
}

#[tokio::test]
async fn test_sequence_exhaustion_propagates() {
    let allocator = Allocator::new(
        Arc::new(MemoryStore::new()),
        Arc::new(AtomicSequence::new(u64::MAX)),
        Arc::new(NullMappingCache),
        AllocatorOptions {
            code_length: 11,
            ..AllocatorOptions::default()
        },
    );

    let err = allocator.allocate("https://example.com").await.unwrap_err();
    assert!(matches!(err, ShortcodeError::AllocationExhausted(_)));
}

#[tokio::test]
async fn test_sequential_allocations_are_distinct() {
    let store = Arc::new(MemoryStore::new());
    let allocator = Allocator::new(
        store.clone(),
        Arc::new(AtomicSequence::new(min_value_with_len(7).unwrap())),
        Arc::new(NullMappingCache),
        AllocatorOptions::default(),
    );

    let mut codes = HashSet::new();
    for i in 0..200 {
        let mapping = allocator
            .allocate(&format!("https://example.com/{}", i))
            .await
            .unwrap();
        assert_eq!(mapping.code.len(), 7);
        assert!(base62::is_base62(&mapping.code));
        assert!(codes.insert(mapping.code));
    }
    assert_eq!(store.len(), 200);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_allocations_are_unique() {
    let store = Arc::new(MemoryStore::new());
    let allocator = Allocator::new(
        store.clone(),
        Arc::new(AtomicSequence::new(min_value_with_len(7).unwrap())),
        Arc::new(NullMappingCache),
        AllocatorOptions::default(),
    );

    let mut handles = Vec::new();
    for i in 0..64 {
        let allocator = allocator.clone();
        handles.push(tokio::spawn(async move {
            let mut codes = Vec::new();
            for j in 0..20 {
                let mapping = allocator
                    .allocate(&format!("https://example.com/{}/{}", i, j))
                    .await
                    .unwrap();
                codes.push(mapping.code);
            }
            codes
        }));
    }

    let mut all = HashSet::new();
    for handle in handles {
        for code in handle.await.unwrap() {
            assert!(all.insert(code), "duplicate code handed out");
        }
    }
    assert_eq!(all.len(), 64 * 20);
    assert_eq!(store.len(), 64 * 20);
}
