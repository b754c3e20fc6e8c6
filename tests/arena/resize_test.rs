/*!
 * Resize Tests
 * Shrink, in-place growth, relocation and failure behaviour
 */

use handle_arena::{AllocationError, Arena, ArenaConfig};
use pretty_assertions::assert_eq;

#[test]
fn test_shrink_keeps_prefix_and_bounds() {
    let mut arena = Arena::new(0);
    let h = arena.allocate_from(&[1u32, 2, 3, 4, 5]).unwrap();

    let h = arena.resize(h, 2).unwrap();

    assert_eq!(arena.read_elements::<u32>(h).unwrap(), vec![1, 2]);
    assert!(matches!(
        arena.read_element::<u32>(h, 2),
        Err(AllocationError::OutOfBounds { .. })
    ));
    assert!(matches!(
        arena.read_at(h, 8, 4),
        Err(AllocationError::OutOfBounds { .. })
    ));
}

#[test]
fn test_regrow_after_shrink_zeroes_tail() {
    let mut arena = Arena::new(0);
    let h = arena.allocate_from(&[7u8; 8]).unwrap();
    let h = arena.resize(h, 3).unwrap();
    let h = arena.resize(h, 8).unwrap();
    assert_eq!(arena.read(h).unwrap(), &[7, 7, 7, 0, 0, 0, 0, 0][..]);
}

#[test]
fn test_relocation_preserves_contents() {
    let mut arena = Arena::new(0);
    let moving = arena.allocate_from(&[0xDEADBEEFu32, 0xCAFEBABE]).unwrap();
    let blocker = arena.allocate(4, 1).unwrap();

    let moving = arena.resize(moving, 6).unwrap();

    assert_eq!(
        arena.read_elements::<u32>(moving).unwrap(),
        vec![0xDEADBEEF, 0xCAFEBABE, 0, 0, 0, 0]
    );
    assert!(arena.is_valid(blocker));
    // Old region went back to the free list
    assert!(arena.stats().free_ranges >= 1);
}

#[test]
fn test_resize_keeps_generation() {
    let mut arena = Arena::new(0);
    let h = arena.allocate(4, 1).unwrap();
    let resized = arena.resize(h, 400).unwrap();
    assert_eq!(resized, h);
    assert!(arena.is_valid(h));
}

#[test]
fn test_resize_same_count_is_noop() {
    let mut arena = Arena::new(0);
    let h = arena.allocate_from(&[1u16, 2]).unwrap();
    let capacity = arena.capacity();
    let _ = arena.resize(h, 2).unwrap();
    assert_eq!(arena.capacity(), capacity);
    assert_eq!(arena.read_elements::<u16>(h).unwrap(), vec![1, 2]);
}

#[test]
fn test_resize_stale_handle() {
    let mut arena = Arena::new(0);
    let h = arena.allocate(4, 1).unwrap();
    arena.free(h).unwrap();
    assert!(arena.resize(h, 8).unwrap_err().is_invalid_handle());
}

#[test]
fn test_resize_to_zero_rejected() {
    let mut arena = Arena::new(0);
    let h = arena.allocate(4, 1).unwrap();
    assert_eq!(arena.resize(h, 0), Err(AllocationError::ZeroSizeRequest));
    assert_eq!(arena.size_of(h).unwrap(), 4);
}

#[test]
fn test_failed_growth_leaves_slot_intact() {
    let config = ArenaConfig::default().with_max_capacity(32);
    let mut arena = Arena::with_config(config).unwrap();
    let h = arena.allocate_from(&[1u8, 2, 3, 4]).unwrap();

    let err = arena.resize(h, 64).unwrap_err();

    assert!(matches!(err, AllocationError::CapacityExceeded { .. }));
    assert_eq!(arena.read(h).unwrap(), &[1, 2, 3, 4][..]);
    assert_eq!(arena.len(h).unwrap(), 4);
}

#[test]
fn test_resize_overflow_rejected() {
    let mut arena = Arena::new(0);
    let h = arena.allocate(1, 8).unwrap();
    assert!(matches!(
        arena.resize(h, usize::MAX),
        Err(AllocationError::CapacityExceeded { .. })
    ));
}

#[test]
fn test_fragmented_arena_at_ceiling_still_grows() {
    let config = ArenaConfig::with_initial_capacity(100).with_max_capacity(100);
    let mut arena = Arena::with_config(config).unwrap();
    let hole = arena.allocate(40, 1).unwrap();
    let growing = arena.allocate_from(&[1u8; 20]).unwrap();
    let after = arena.allocate_from(&[2u8; 30]).unwrap();
    arena.free(hole).unwrap();

    let growing = arena.resize(growing, 50).unwrap();

    let bytes = arena.read(growing).unwrap();
    assert_eq!(&bytes[..20], &[1u8; 20][..]);
    assert!(bytes[20..].iter().all(|b| *b == 0));
    assert_eq!(arena.read(after).unwrap(), &[2u8; 30][..]);
    assert_eq!(arena.capacity(), 100);

    assert!(matches!(
        arena.resize(growing, 71),
        Err(AllocationError::CapacityExceeded { .. })
    ));
    assert_eq!(arena.len(growing).unwrap(), 50);
}
