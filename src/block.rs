use core::mem;

const WORD: usize = mem::size_of::<usize>();

/// Stored in the `next` word of the last header in the chain.
const NO_NEXT: usize = usize::MAX;

/// Bytes occupied by one encoded [`Block`] header inside the arena.
pub const HEADER_SIZE: usize = 3 * WORD;

/// Block header as stored inline in the arena.
///
/// Encoded as three native-endian words: usable size, free flag and the
/// offset of the next header (`usize::MAX` when there is none).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Block {
  pub size: usize,
  pub is_free: bool,
  pub next: Option<usize>,
}

impl Block {
  pub fn new(
    size: usize,
    is_free: bool,
    next: Option<usize>,
  ) -> Self {
    Self { size, is_free, next }
  }

  /// Decodes the header starting at `offset`.
  ///
  /// Panics if the header does not fit inside `arena`; callers only pass
  /// offsets taken from the chain.
  pub fn read(
    arena: &[u8],
    offset: usize,
  ) -> Self {
    let word = |i: usize| {
      let start = offset + i * WORD;
      let mut bytes = [0u8; WORD];
      bytes.copy_from_slice(&arena[start..start + WORD]);
      usize::from_ne_bytes(bytes)
    };

    let next = word(2);

    Self {
      size: word(0),
      is_free: word(1) != 0,
      next: (next != NO_NEXT).then_some(next),
    }
  }

  pub fn write(
    &self,
    arena: &mut [u8],
    offset: usize,
  ) {
    let words = [self.size, self.is_free as usize, self.next.unwrap_or(NO_NEXT)];

    for (i, word) in words.iter().enumerate() {
      let start = offset + i * WORD;
      arena[start..start + WORD].copy_from_slice(&word.to_ne_bytes());
    }
  }
}

/// Snapshot of one block in the chain, as reported by
/// [`Pool::blocks`](crate::Pool::blocks).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlockInfo {
  /// Offset of the block header from the start of the arena.
  pub offset: usize,
  /// Payload bytes following the header.
  pub usable_size: usize,
  pub is_free: bool,
}

impl BlockInfo {
  /// Offset of the first payload byte.
  pub fn payload_offset(&self) -> usize {
    self.offset + HEADER_SIZE
  }

  /// Offset of the first byte past the payload.
  pub fn end(&self) -> usize {
    self.payload_offset() + self.usable_size
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn header_is_three_words() {
    assert_eq!(HEADER_SIZE, 3 * mem::size_of::<usize>());
  }

  #[test]
  fn write_then_read_at_offset() {
    let mut arena = [0xFFu8; 128];

    let first = Block::new(40, false, Some(64));
    let second = Block::new(16, true, None);

    first.write(&mut arena, 0);
    second.write(&mut arena, 64);

    assert_eq!(Block::read(&arena, 0), first);
    assert_eq!(Block::read(&arena, 64), second);
  }

  #[test]
  fn unaligned_offsets_are_supported() {
    let mut arena = [0u8; 64];
    let block = Block::new(7, true, Some(33));

    block.write(&mut arena, 3);

    assert_eq!(Block::read(&arena, 3), block);
  }

  #[test]
  fn end_accounts_for_header() {
    let info = BlockInfo {
      offset: 8,
      usable_size: 32,
      is_free: true,
    };
    assert_eq!(info.payload_offset(), 8 + HEADER_SIZE);
    assert_eq!(info.end(), 8 + HEADER_SIZE + 32);
  }
}
