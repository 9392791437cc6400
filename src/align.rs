/// Alignment unit of every block produced by a split: one machine word.
pub const ALIGNMENT: usize = core::mem::size_of::<usize>();

/// Rounds `value` up to the machine word alignment.
///
/// # Examples
///
/// ```rust
/// use arenalloc::align;
///
/// match core::mem::size_of::<usize>() {
///     8 => assert_eq!(align!(13), 16), // 64 bit machine.
///     4 => assert_eq!(align!(11), 12), // 32 bit machine.
///     _ => {},
/// };
/// ```
#[macro_export]
macro_rules! align {
  ($value:expr) => {
    ($value + $crate::align::ALIGNMENT - 1) & !($crate::align::ALIGNMENT - 1)
  };
}

/// Function form of [`align!`], usable in const contexts.
///
/// `size` must be positive; zero maps to zero.
pub const fn align(size: usize) -> usize {
  align!(size)
}
