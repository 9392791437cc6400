use arenalloc::{Allocation, BlockInfo, DEFAULT_ARENA_SIZE, DefaultPool, HEADER_SIZE, PoolError};

fn snapshot(pool: &DefaultPool) -> Vec<BlockInfo> {
  pool.blocks().collect()
}

fn assert_partition(pool: &DefaultPool) {
  let mut expected_offset = 0;

  for block in pool.blocks() {
    assert_eq!(block.offset, expected_offset);
    expected_offset = block.end();
  }

  assert_eq!(expected_offset, DEFAULT_ARENA_SIZE);
}

fn overlaps(
  pool: &DefaultPool,
  a: Allocation,
  b: Allocation,
) -> bool {
  let end_a = a.offset() + pool.usable_size(a).unwrap();
  let end_b = b.offset() + pool.usable_size(b).unwrap();

  a.offset() < end_b && b.offset() < end_a
}

fn scenario_a(pool: &mut DefaultPool) -> [Allocation; 3] {
  let small = pool.allocate(128).unwrap();
  let medium = pool.allocate(1024).unwrap();
  let large = pool.allocate(4096).unwrap();

  [small, medium, large]
}

#[test]
fn three_allocations_are_disjoint() {
  let mut pool = DefaultPool::new();
  let [small, medium, large] = scenario_a(&mut pool);

  assert_ne!(small, medium);
  assert_ne!(medium, large);
  assert_ne!(small, large);

  assert!(!overlaps(&pool, small, medium));
  assert!(!overlaps(&pool, medium, large));
  assert!(!overlaps(&pool, small, large));

  assert!(pool.usable_size(small).unwrap() >= 128);
  assert!(pool.usable_size(medium).unwrap() >= 1024);
  assert!(pool.usable_size(large).unwrap() >= 4096);

  assert_partition(&pool);
}

#[test]
fn freed_region_is_reused_first() {
  let mut pool = DefaultPool::new();
  let [_, medium, _] = scenario_a(&mut pool);

  pool.deallocate(Some(medium)).unwrap();
  assert_partition(&pool);

  let replacement = pool.allocate(512).unwrap();

  assert_eq!(replacement, medium);
  assert_eq!(pool.usable_size(replacement), Some(512));

  // The rest of the vacated block stays free ahead of the tail.
  let blocks = snapshot(&pool);
  assert_eq!(blocks[2].offset, replacement.offset() + 512);
  assert!(blocks[2].is_free);
  assert_eq!(blocks[2].usable_size, 1024 - 512 - HEADER_SIZE);
  assert_partition(&pool);
}

#[test]
fn second_free_of_the_same_block_fails() {
  let mut pool = DefaultPool::new();
  let [_, medium, _] = scenario_a(&mut pool);

  pool.deallocate(Some(medium)).unwrap();
  let before = snapshot(&pool);

  assert_eq!(
    pool.deallocate(Some(medium)),
    Err(PoolError::DoubleFree {
      offset: medium.offset()
    })
  );
  assert_eq!(snapshot(&pool), before);
}

#[test]
fn non_positive_sizes_are_rejected() {
  let mut pool = DefaultPool::new();
  scenario_a(&mut pool);
  let before = snapshot(&pool);

  for size in [0, -5, isize::MIN] {
    assert_eq!(
      pool.allocate(size),
      Err(PoolError::InvalidSize { requested: size })
    );
  }

  assert_eq!(snapshot(&pool), before);
}

#[test]
fn null_deallocation_is_rejected() {
  let mut pool = DefaultPool::new();
  scenario_a(&mut pool);
  let before = snapshot(&pool);

  assert_eq!(pool.deallocate(None), Err(PoolError::NullDeallocation));
  assert_eq!(snapshot(&pool), before);
}

#[test]
fn oversized_request_leaves_chain_untouched() {
  let mut pool = DefaultPool::new();
  let before = snapshot(&pool);

  for size in [DEFAULT_ARENA_SIZE as isize, DEFAULT_ARENA_SIZE as isize * 2, isize::MAX] {
    assert!(matches!(
      pool.allocate(size),
      Err(PoolError::OutOfMemory { .. })
    ));
  }

  assert_eq!(snapshot(&pool), before);
  assert_partition(&pool);
}

#[test]
fn whole_arena_can_be_taken_and_returned() {
  let mut pool = DefaultPool::new();
  let usable = DEFAULT_ARENA_SIZE - HEADER_SIZE;

  let everything = pool.allocate(usable as isize).unwrap();
  assert_eq!(pool.free_bytes(), 0);
  assert!(matches!(
    pool.allocate(1),
    Err(PoolError::OutOfMemory { .. })
  ));

  pool.deallocate(Some(everything)).unwrap();
  assert_eq!(pool.free_bytes(), usable);
}

#[test]
fn reinitialising_discards_live_allocations() {
  let mut pool = DefaultPool::new();
  let [small, _, _] = scenario_a(&mut pool);

  pool.init();

  assert_eq!(pool.blocks().count(), 1);
  assert_eq!(pool.used_bytes(), 0);
  assert!(matches!(
    pool.deallocate(Some(small)),
    Err(PoolError::DoubleFree { .. })
  ));
}
