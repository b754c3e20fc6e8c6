/*!
 * Guard and Transaction Tests
 */

use handle_arena::core::guard::{GuardError, TransactionState};
use handle_arena::{
    AllocationError, AllocationGuardExt, Arena, ArenaConfig, SharedArena, TransactionExt,
};
use pretty_assertions::assert_eq;

#[test]
fn test_guard_frees_on_scope_exit() {
    let arena = SharedArena::new(0);
    let handle = {
        let guard = arena.allocate_typed_guard::<u32>(4).unwrap();
        arena.write_element(guard.handle(), 3, 99u32).unwrap();
        assert_eq!(arena.read_element::<u32>(guard.handle(), 3).unwrap(), 99);
        guard.handle()
    };
    assert!(!arena.is_valid(handle));
    assert_eq!(arena.stats().live_bytes, 0);
}

#[test]
fn test_kept_guard_survives() {
    let arena = SharedArena::new(0);
    let handle = arena.allocate_guard(8, 1).unwrap().keep();
    assert!(arena.is_valid(handle));
    arena.free(handle).unwrap();
}

#[test]
fn test_matrix_transaction_commits() {
    let mut arena = Arena::new(0);
    let rows = {
        let mut tx = arena.begin();
        for _ in 0..3 {
            let _ = tx.allocate(4, 4).unwrap();
        }
        assert_eq!(tx.state(), TransactionState::Active);
        tx.commit().unwrap()
    };

    for (i, row) in rows.iter().enumerate() {
        let values: Vec<i32> = (0..4).map(|j| (i * 4 + j) as i32).collect();
        arena.write_elements(*row, &values).unwrap();
    }
    assert_eq!(arena.read_elements::<i32>(rows[2]).unwrap(), vec![8, 9, 10, 11]);
    assert_eq!(arena.stats().live_slots, 3);
}

#[test]
fn test_matrix_transaction_rolls_back_on_failure() {
    let config = ArenaConfig::default().with_max_capacity(40);
    let mut arena = Arena::with_config(config).unwrap();

    let result = {
        let mut tx = arena.begin();
        (0..3).try_for_each(|_| tx.allocate(4, 4).map(|_| ()))
    };

    assert!(matches!(
        result,
        Err(GuardError::OperationFailed(AllocationError::CapacityExceeded { .. }))
    ));
    assert_eq!(arena.stats().live_slots, 0);
    assert_eq!(arena.live_bytes(), 0);

    // Rolled-back slots are reusable
    let h = arena.allocate(4, 4).unwrap();
    assert_eq!(arena.read_elements::<i32>(h).unwrap(), vec![0; 4]);
}

#[test]
fn test_transaction_on_shared_arena() {
    let arena = SharedArena::new(0);
    let mut allocator = arena.clone();
    {
        let mut tx = allocator.begin();
        let _ = tx.allocate(16, 1).unwrap();
        let _ = tx.allocate(16, 1).unwrap();
        tx.rollback().unwrap();
    }
    assert_eq!(arena.stats().live_slots, 0);
    assert_eq!(arena.stats().total_frees, 2);
}
