//! Allocation accounting for teardown and allocation-failure behaviour.
//!
//! The allocator keeps its books per thread, so tests running in parallel do
//! not see each other's allocations.

use std::alloc::{GlobalAlloc, Layout, System};
use std::cell::Cell;

use freq_trie::{Error, Trie};

struct TrackingAllocator;

thread_local! {
    static LIVE: Cell<isize> = const { Cell::new(0) };
    static FAIL_WHEN: Cell<Option<fn(&Layout) -> bool>> = const { Cell::new(None) };
}

#[global_allocator]
static ALLOC: TrackingAllocator = TrackingAllocator;

unsafe impl GlobalAlloc for TrackingAllocator {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let refuse = FAIL_WHEN
            .try_with(|fail| fail.get().map_or(false, |should_fail| should_fail(&layout)))
            .unwrap_or(false);
        if refuse {
            return std::ptr::null_mut();
        }

        let ptr = System.alloc(layout);
        if !ptr.is_null() {
            let _ = LIVE.try_with(|live| live.set(live.get() + 1));
        }
        ptr
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        let _ = LIVE.try_with(|live| live.set(live.get() - 1));
        System.dealloc(ptr, layout)
    }
}

fn live_allocations() -> isize {
    LIVE.with(|live| live.get())
}

fn with_failures<T>(fail: fn(&Layout) -> bool, f: impl FnOnce() -> T) -> T {
    FAIL_WHEN.with(|cell| cell.set(Some(fail)));
    let result = f();
    FAIL_WHEN.with(|cell| cell.set(None));
    result
}

// Levels are the only allocations this large
fn is_level(layout: &Layout) -> bool {
    layout.size() >= 4096
}

fn is_three_byte_copy(layout: &Layout) -> bool {
    layout.size() == 3 && layout.align() == 1
}

#[test]
fn test_drop_releases_everything() {
    let words: Vec<String> = (0..300)
        .map(|i| format!("w{}x{}", i % 17, i * 7919 % 1000))
        .collect();
    let deep: Vec<u8> = vec![b'd'; 400];

    let baseline = live_allocations();
    {
        let mut trie = Trie::new();
        for (i, word) in words.iter().enumerate() {
            for _ in 0..(i % 4 + 1) {
                trie.insert(word).unwrap();
            }
        }
        trie.insert(&deep).unwrap();
        trie.insert(&deep[..200]).unwrap();
        assert!(live_allocations() > baseline);
    }
    assert_eq!(live_allocations(), baseline);
}

#[test]
fn test_clear_releases_everything() {
    let mut trie = Trie::new();
    let baseline = live_allocations();

    for key in &["alpha", "alphabet", "beta", "gamma", "gamut"] {
        trie.insert(key).unwrap();
    }
    assert!(live_allocations() > baseline);

    trie.clear();
    assert_eq!(live_allocations(), baseline);

    // A second clear has nothing left to release
    trie.clear();
    assert_eq!(live_allocations(), baseline);
}

#[test]
fn test_clear_releases_levels_from_failed_insert() {
    let mut trie = Trie::new();
    let baseline = live_allocations();

    let result = with_failures(is_three_byte_copy, || trie.insert("xyz"));
    assert!(result.is_err());
    assert!(trie.is_empty());
    assert!(live_allocations() > baseline);

    trie.clear();
    assert_eq!(live_allocations(), baseline);
}

#[test]
fn test_autocomplete_result_is_the_only_new_allocation() {
    let mut trie = Trie::new();
    trie.insert("owned").unwrap();

    let baseline = live_allocations();
    let completion = trie.autocomplete("ow").unwrap();
    assert_eq!(live_allocations(), baseline + 1);

    drop(completion);
    assert_eq!(live_allocations(), baseline);
}

#[test]
fn test_try_new_reports_failure() {
    let result = with_failures(is_level, Trie::try_new);
    assert!(matches!(result, Err(Error::Allocation { .. })));
}

#[test]
fn test_level_failure_leaves_trie_consistent() {
    let mut trie = Trie::new();
    trie.insert("ab").unwrap();

    let result = with_failures(is_level, || trie.insert("xyz"));
    assert!(matches!(result, Err(Error::Allocation { what: "trie level", .. })));

    assert_eq!(trie.len(), 1);
    assert_eq!(trie.count("xyz"), 0);
    assert_eq!(trie.autocomplete("x").unwrap(), b"x".to_vec());
    assert_eq!(trie.autocomplete("").unwrap(), b"ab".to_vec());

    // The same insert succeeds once memory is available again
    trie.insert("xyz").unwrap();
    assert_eq!(trie.autocomplete("x").unwrap(), b"xyz".to_vec());
}

#[test]
fn test_copy_failure_leaves_statistics_untouched() {
    let mut trie = Trie::new();
    trie.insert("xa").unwrap();

    let result = with_failures(is_three_byte_copy, || trie.insert("xyz"));
    assert!(matches!(result, Err(Error::Allocation { what: "terminal string", .. })));

    // Levels created on the way down stay, but nothing above them changed
    assert_eq!(trie.len(), 1);
    assert_eq!(trie.count("xyz"), 0);
    assert_eq!(trie.autocomplete("x").unwrap(), b"xa".to_vec());
    assert_eq!(trie.autocomplete("xy").unwrap(), b"xy".to_vec());

    trie.insert("xyz").unwrap();
    trie.insert("xyz").unwrap();
    assert_eq!(trie.autocomplete("x").unwrap(), b"xyz".to_vec());
}

#[test]
fn test_autocomplete_copy_failure() {
    let mut trie = Trie::new();
    trie.insert("abc").unwrap();

    let result = with_failures(is_three_byte_copy, || trie.autocomplete("a"));
    assert!(matches!(result, Err(Error::Allocation { what: "completion", .. })));

    assert_eq!(trie.autocomplete("a").unwrap(), b"abc".to_vec());
}
