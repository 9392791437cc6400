use core::fmt;

use tracing::{debug, trace, warn};

use crate::{
  align::align,
  block::{Block, BlockInfo, HEADER_SIZE},
  error::{PoolError, Result},
};

/// Arena length of [`DefaultPool`]: 100 KiB.
pub const DEFAULT_ARENA_SIZE: usize = 102_400;

/// A pool backed by a [`DEFAULT_ARENA_SIZE`] byte arena.
pub type DefaultPool = Pool<DEFAULT_ARENA_SIZE>;

/// Handle to a live allocation: the offset of its first payload byte.
///
/// Handles are plain values. Copying one does not extend the allocation, and
/// a handle kept after [`Pool::deallocate`] or [`Pool::init`] is rejected or,
/// once the region is handed out again, refers to the new owner's block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Allocation {
  offset: usize,
}

impl Allocation {
  /// Offset of the first payload byte from the start of the arena.
  pub fn offset(&self) -> usize {
    self.offset
  }
}

impl fmt::Display for Allocation {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>,
  ) -> fmt::Result {
    write!(f, "arena+{:#x}", self.offset)
  }
}

/// First-fit allocator over an inline `N` byte arena.
///
/// Blocks are threaded through the arena as a singly-linked list of
/// [`HEADER_SIZE`] byte headers in address order, each followed by its
/// payload. The first header always sits at offset 0.
pub struct Pool<const N: usize> {
  arena: [u8; N],
}

impl<const N: usize> Pool<N> {
  /// Creates a pool whose whole arena is a single free block.
  pub fn new() -> Self {
    const { assert!(N >= HEADER_SIZE, "arena must hold at least one block header") };

    let mut pool = Self { arena: [0; N] };
    pool.init();
    pool
  }

  /// Resets the arena to a single free block of `N - HEADER_SIZE` bytes.
  ///
  /// Every outstanding [`Allocation`] is invalidated.
  pub fn init(&mut self) {
    Block::new(N - HEADER_SIZE, true, None).write(&mut self.arena, 0);
  }

  /// Arena length in bytes.
  pub const fn capacity(&self) -> usize {
    N
  }

  fn block(
    &self,
    offset: usize,
  ) -> Block {
    Block::read(&self.arena, offset)
  }

  fn set_block(
    &mut self,
    offset: usize,
    block: Block,
  ) {
    block.write(&mut self.arena, offset);
  }

  fn find_free_block(
    &self,
    size: usize,
  ) -> Option<usize> {
    let mut current = Some(0);

    while let Some(offset) = current {
      let block = self.block(offset);
      if block.is_free && block.size >= size {
        return Some(offset);
      }
      current = block.next;
    }

    None
  }

  /// Walks the chain to the header at `target`, returning it together with
  /// the offset of its predecessor.
  fn locate(
    &self,
    target: usize,
  ) -> Option<(Option<usize>, Block)> {
    let mut previous = None;
    let mut current = Some(0);

    while let Some(offset) = current {
      if offset > target {
        break;
      }

      let block = self.block(offset);
      if offset == target {
        return Some((previous, block));
      }

      previous = Some(offset);
      current = block.next;
    }

    None
  }

  /// Whether `header` is an abandoned header inside a free block that still
  /// reads as free.
  fn is_absorbed_header(
    &self,
    header: usize,
  ) -> bool {
    self
      .blocks()
      .find(|block| block.payload_offset() <= header && header < block.end())
      .is_some_and(|block| {
        block.is_free
          && header + HEADER_SIZE <= block.end()
          && Block::read(&self.arena, header).is_free
      })
  }

  /// Header of a live allocation.
  fn used_block(
    &self,
    allocation: Allocation,
  ) -> Option<Block> {
    let offset = allocation.offset.checked_sub(HEADER_SIZE)?;
    let (_, block) = self.locate(offset)?;

    (!block.is_free).then_some(block)
  }

  /// Allocates at least `size` bytes from the first free block that fits.
  ///
  /// The size is rounded up to the word alignment. When the chosen block has
  /// room for another header past the request, the remainder is split off as
  /// a new free block; otherwise the whole block is handed out.
  pub fn allocate(
    &mut self,
    size: isize,
  ) -> Result<Allocation> {
    if size <= 0 {
      return Err(PoolError::InvalidSize { requested: size });
    }

    let size = align(size as usize);

    let offset = self
      .find_free_block(size)
      .ok_or(PoolError::OutOfMemory { requested: size })?;

    let mut block = self.block(offset);
    let split = block.size > size + HEADER_SIZE;

    if split {
      let remainder_offset = offset + HEADER_SIZE + size;
      let remainder = Block::new(block.size - size - HEADER_SIZE, true, block.next);
      self.set_block(remainder_offset, remainder);

      block.size = size;
      block.next = Some(remainder_offset);
    }

    block.is_free = false;
    self.set_block(offset, block);

    trace!(header = offset, size = block.size, split, "allocated block");

    Ok(Allocation {
      offset: offset + HEADER_SIZE,
    })
  }

  /// Returns a block to the pool and merges it with free neighbours.
  ///
  /// `None` stands for a null pointer. A free block absorbs the following
  /// block if that one is free, and is itself absorbed by its predecessor if
  /// the predecessor is free.
  pub fn deallocate(
    &mut self,
    allocation: Option<Allocation>,
  ) -> Result<()> {
    let Some(allocation) = allocation else {
      warn!("deallocation failed: null pointer");
      return Err(PoolError::NullDeallocation);
    };

    let payload = allocation.offset;
    let located = payload
      .checked_sub(HEADER_SIZE)
      .and_then(|offset| Some((offset, self.locate(offset)?)));

    let Some((offset, (previous, mut block))) = located else {
      let absorbed = payload
        .checked_sub(HEADER_SIZE)
        .is_some_and(|header| self.is_absorbed_header(header));

      if absorbed {
        warn!(offset = payload, "deallocation failed: block already free");
        return Err(PoolError::DoubleFree { offset: payload });
      }

      warn!(offset = payload, "deallocation failed: no block at offset");
      return Err(PoolError::InvalidHandle { offset: payload });
    };

    if block.is_free {
      warn!(offset = payload, "deallocation failed: block already free");
      return Err(PoolError::DoubleFree { offset: payload });
    }

    block.is_free = true;
    debug!(offset = payload, size = block.size, "deallocated block");

    if let Some(next_offset) = block.next {
      let next = self.block(next_offset);
      if next.is_free {
        block.size += HEADER_SIZE + next.size;
        block.next = next.next;
        trace!(
          header = offset,
          absorbed = next_offset,
          size = block.size,
          "merged with next block"
        );
      }
    }

    self.set_block(offset, block);

    if let Some(previous_offset) = previous {
      let mut previous_block = self.block(previous_offset);
      if previous_block.is_free {
        previous_block.size += HEADER_SIZE + block.size;
        previous_block.next = block.next;
        self.set_block(previous_offset, previous_block);
        trace!(
          header = previous_offset,
          absorbed = offset,
          size = previous_block.size,
          "merged into previous block"
        );
      }
    }

    Ok(())
  }

  /// Payload bytes of a live allocation.
  pub fn payload(
    &self,
    allocation: Allocation,
  ) -> Option<&[u8]> {
    let block = self.used_block(allocation)?;
    Some(&self.arena[allocation.offset..allocation.offset + block.size])
  }

  pub fn payload_mut(
    &mut self,
    allocation: Allocation,
  ) -> Option<&mut [u8]> {
    let block = self.used_block(allocation)?;
    Some(&mut self.arena[allocation.offset..allocation.offset + block.size])
  }

  /// Payload bytes available to a live allocation. May exceed the request
  /// when the block was too small to split.
  pub fn usable_size(
    &self,
    allocation: Allocation,
  ) -> Option<usize> {
    self.used_block(allocation).map(|block| block.size)
  }

  /// Iterates over the block chain in address order.
  pub fn blocks(&self) -> Blocks<'_> {
    Blocks {
      arena: &self.arena,
      next: Some(0),
    }
  }

  pub fn free_bytes(&self) -> usize {
    self
      .blocks()
      .filter(|block| block.is_free)
      .map(|block| block.usable_size)
      .sum()
  }

  pub fn used_bytes(&self) -> usize {
    self
      .blocks()
      .filter(|block| !block.is_free)
      .map(|block| block.usable_size)
      .sum()
  }
}

impl<const N: usize> Default for Pool<N> {
  fn default() -> Self {
    Self::new()
  }
}

impl<const N: usize> fmt::Debug for Pool<N> {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>,
  ) -> fmt::Result {
    f.debug_struct("Pool")
      .field("capacity", &N)
      .field("blocks", &self.blocks().collect::<Vec<_>>())
      .finish()
  }
}

/// Iterator over the blocks of a [`Pool`], returned by [`Pool::blocks`].
pub struct Blocks<'a> {
  arena: &'a [u8],
  next: Option<usize>,
}

impl Iterator for Blocks<'_> {
  type Item = BlockInfo;

  fn next(&mut self) -> Option<Self::Item> {
    let offset = self.next?;
    let block = Block::read(self.arena, offset);
    self.next = block.next;

    Some(BlockInfo {
      offset,
      usable_size: block.size,
      is_free: block.is_free,
    })
  }
}
