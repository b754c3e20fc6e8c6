/*!
 * Arena Lifecycle Tests
 * End-to-end allocation, reuse, teardown and zero-size scenarios
 */

use handle_arena::{AllocationError, Arena, ArenaConfig, ElementKind, ElementValue};
use pretty_assertions::assert_eq;

#[test]
fn test_calloc_then_grow_preserves_values() {
    let mut arena = Arena::new(0);
    let h = arena.allocate(5, 4).unwrap();
    assert_eq!(arena.read(h).unwrap(), &[0u8; 20][..]);

    arena.write_elements(h, &[10i32, 20, 30, 40, 50]).unwrap();
    let h = arena.resize(h, 8).unwrap();

    assert_eq!(
        arena.read_elements::<i32>(h).unwrap(),
        vec![10, 20, 30, 40, 50, 0, 0, 0]
    );
    assert_eq!(arena.len(h).unwrap(), 8);
    assert_eq!(arena.size_of(h).unwrap(), 32);
}

#[test]
fn test_free_then_reallocate_reuses_storage() {
    let mut arena = Arena::new(0);
    let first = arena.allocate(16, 1).unwrap();
    arena.write(first, &[0xAB; 16]).unwrap();
    let capacity = arena.capacity();

    arena.free(first).unwrap();
    let second = arena.allocate(16, 1).unwrap();

    assert_eq!(second.index(), first.index());
    assert_eq!(second.generation(), first.generation() + 1);
    assert_eq!(arena.capacity(), capacity);
    // Recycled storage comes back zeroed
    assert_eq!(arena.read(second).unwrap(), &[0u8; 16][..]);

    assert_eq!(
        arena.read(first),
        Err(AllocationError::InvalidHandle {
            index: first.index(),
            generation: first.generation(),
        })
    );
    assert!(arena.write(first, b"x").unwrap_err().is_invalid_handle());
}

#[test]
fn test_teardown_closes_every_handle() {
    let mut arena = Arena::new(64);
    let handles: Vec<_> = (0..3).map(|_| arena.allocate(4, 4).unwrap()).collect();

    arena.teardown().unwrap();

    for h in handles {
        assert_eq!(arena.read(h), Err(AllocationError::ArenaClosed));
        assert_eq!(arena.write(h, &[1]), Err(AllocationError::ArenaClosed));
        assert_eq!(arena.resize(h, 8), Err(AllocationError::ArenaClosed));
        assert_eq!(arena.free(h), Err(AllocationError::ArenaClosed));
        assert_eq!(arena.read_elements::<u32>(h), Err(AllocationError::ArenaClosed));
        assert_eq!(arena.read_element::<u32>(h, 0), Err(AllocationError::ArenaClosed));
        assert_eq!(arena.write_element(h, 0, 7u32), Err(AllocationError::ArenaClosed));
        assert_eq!(arena.read_value(h, 0), Err(AllocationError::ArenaClosed));
        assert_eq!(arena.size_of(h), Err(AllocationError::ArenaClosed));
        assert_eq!(arena.len(h), Err(AllocationError::ArenaClosed));
        assert_eq!(arena.kind(h), Err(AllocationError::ArenaClosed));
        assert!(!arena.is_valid(h));
    }
    assert_eq!(arena.allocate_typed::<u64>(1), Err(AllocationError::ArenaClosed));
    assert_eq!(arena.allocate(1, 1), Err(AllocationError::ArenaClosed));
    assert_eq!(arena.teardown(), Err(AllocationError::ArenaClosed));
    assert_eq!(arena.capacity(), 0);
}

#[test]
fn test_zero_count_changes_nothing() {
    let mut arena = Arena::new(0);
    let before = arena.stats();

    assert_eq!(arena.allocate(0, 4), Err(AllocationError::ZeroSizeRequest));
    assert_eq!(arena.allocate(4, 0), Err(AllocationError::ZeroSizeRequest));

    let after = arena.stats();
    assert_eq!(after.capacity, before.capacity);
    assert_eq!(after.live_slots, 0);
    assert_eq!(after.total_allocations, 0);
}

#[test]
fn test_double_free_rejected() {
    let mut arena = Arena::new(0);
    let h = arena.allocate(8, 1).unwrap();
    arena.free(h).unwrap();
    assert!(arena.free(h).unwrap_err().is_invalid_handle());
    assert_eq!(arena.stats().total_frees, 1);
}

#[test]
fn test_foreign_handle_rejected() {
    let mut a = Arena::new(0);
    let mut b = Arena::new(0);
    let ha = a.allocate(8, 1).unwrap();
    let _hb = b.allocate(8, 1).unwrap();

    assert_ne!(a.id(), b.id());
    assert!(!b.is_valid(ha));
    assert!(b.read(ha).unwrap_err().is_invalid_handle());
}

#[test]
fn test_out_of_bounds_access() {
    let mut arena = Arena::new(0);
    let h = arena.allocate(20, 1).unwrap();

    let err = arena.write(h, b"Hello, Dynamic Memory!").unwrap_err();
    assert_eq!(
        err,
        AllocationError::OutOfBounds {
            offset: 0,
            len: 22,
            size: 20,
        }
    );
    // Rejected writes leave the slot untouched
    assert_eq!(arena.read(h).unwrap(), &[0u8; 20][..]);

    assert!(matches!(
        arena.read_at(h, 18, 4),
        Err(AllocationError::OutOfBounds { .. })
    ));
    assert!(matches!(
        arena.read_at(h, usize::MAX, 2),
        Err(AllocationError::OutOfBounds { .. })
    ));
}

#[test]
fn test_string_buffer_grows_and_appends() {
    let mut arena = Arena::new(0);
    let greeting = b"Hello, Dynamic Memory!";
    let h = arena.allocate(20, 1).unwrap();
    assert!(arena.write(h, greeting).is_err());

    let h = arena.resize(h, 50).unwrap();
    arena.write(h, greeting).unwrap();
    arena.write_at(h, greeting.len(), b" More.").unwrap();

    let text = arena.read_at(h, 0, greeting.len() + 6).unwrap();
    assert_eq!(text, b"Hello, Dynamic Memory! More.");
}

#[test]
fn test_typed_views_check_kind() {
    let mut arena = Arena::new(0);
    let h = arena.allocate_from(&[1.5f64, -2.25]).unwrap();

    assert_eq!(arena.kind(h).unwrap(), ElementKind::F64);
    assert_eq!(arena.read_value(h, 1).unwrap(), ElementValue::F64(-2.25));
    assert_eq!(
        arena.read_elements::<u64>(h),
        Err(AllocationError::TypeMismatch {
            expected: ElementKind::U64,
            found: ElementKind::F64,
        })
    );
    assert!(matches!(
        arena.read_element::<f64>(h, 2),
        Err(AllocationError::OutOfBounds { .. })
    ));
}

#[test]
fn test_raw_slot_accepts_matching_stride() {
    let mut arena = Arena::new(0);
    let h = arena.allocate(3, 4).unwrap();
    arena.write_element(h, 2, 7u32).unwrap();
    assert_eq!(arena.read_elements::<u32>(h).unwrap(), vec![0, 0, 7]);
    assert_eq!(arena.read_element::<i32>(h, 2).unwrap(), 7);
    assert!(matches!(
        arena.read_elements::<u64>(h),
        Err(AllocationError::TypeMismatch { .. })
    ));
}

#[test]
fn test_ceiling_rejects_growth() {
    let config = ArenaConfig::default().with_max_capacity(64);
    let mut arena = Arena::with_config(config).unwrap();

    let h = arena.allocate(48, 1).unwrap();
    let err = arena.allocate(32, 1).unwrap_err();
    assert!(matches!(err, AllocationError::CapacityExceeded { limit: 64, .. }));
    assert!(arena.is_valid(h));
    assert!(arena.capacity() <= 64);
}

#[test]
fn test_compact_keeps_handles_and_contents() {
    let mut arena = Arena::new(0);
    let a = arena.allocate_from(&[1u8, 2, 3, 4]).unwrap();
    let b = arena.allocate(64, 1).unwrap();
    let c = arena.allocate_from(&[9u16, 8, 7]).unwrap();
    arena.free(b).unwrap();

    let before = arena.capacity();
    let reclaimed = arena.compact().unwrap();

    assert_eq!(reclaimed, before - 10);
    assert_eq!(arena.capacity(), 10);
    assert_eq!(arena.read_elements::<u8>(a).unwrap(), vec![1, 2, 3, 4]);
    assert_eq!(arena.read_elements::<u16>(c).unwrap(), vec![9, 8, 7]);
    assert_eq!(arena.stats().free_ranges, 0);

    // Space after compaction is still usable
    let d = arena.allocate(8, 1).unwrap();
    assert_eq!(arena.read(d).unwrap(), &[0u8; 8][..]);
}

#[test]
fn test_stats_after_teardown() {
    let mut arena = Arena::new(0);
    let _ = arena.allocate(10, 1).unwrap();
    let _ = arena.allocate(5, 2).unwrap();
    arena.teardown().unwrap();

    let stats = arena.stats();
    assert_eq!(stats.live_bytes, 0);
    assert_eq!(stats.live_slots, 0);
    assert_eq!(stats.peak_live_bytes, 20);
    assert_eq!(stats.total_allocations, 2);
    assert_eq!(stats.total_frees, 2);
}

#[test]
fn test_fragmented_arena_at_ceiling_still_allocates() {
    let config = ArenaConfig::with_initial_capacity(100).with_max_capacity(100);
    let mut arena = Arena::with_config(config).unwrap();
    let first = arena.allocate(40, 1).unwrap();
    let kept = arena.allocate_from(&[9u8; 20]).unwrap();
    arena.free(first).unwrap();

    let big = arena.allocate(50, 1).unwrap();

    assert_eq!(arena.capacity(), 100);
    assert_eq!(arena.read(kept).unwrap(), &[9u8; 20][..]);
    assert_eq!(arena.read(big).unwrap(), &[0u8; 50][..]);
    assert_eq!(arena.stats().fragmented_bytes, 0);

    // Past the ceiling in live bytes is still refused
    assert!(matches!(
        arena.allocate(31, 1),
        Err(AllocationError::CapacityExceeded { limit: 100, .. })
    ));
}
