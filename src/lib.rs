//! # arenalloc - A Fixed Arena Memory Allocator
//!
//! This crate provides a **first-fit free-list allocator** that carves every
//! allocation out of a single fixed-size byte arena. It never asks the
//! operating system or the global allocator for memory.
//!
//! ## Overview
//!
//! The arena is split into blocks. Every block starts with a header and is
//! followed by its payload; the headers form a singly-linked list in address
//! order:
//!
//! ```text
//!   Arena Layout:
//!
//!   offset 0
//!   ▼
//!   ┌────────┬──────────┬────────┬─────────────┬────────┬──────────────────┐
//!   │ header │ payload  │ header │  payload    │ header │     payload      │
//!   │ used   │ 128 B    │ free   │  1024 B     │ used   │     ...          │
//!   └───┬────┴──────────┴───▲─┬──┴─────────────┴───▲────┴──────────────────┘
//!       │                   │ │                    │
//!       └───── next ────────┘ └────── next ────────┘
//! ```
//!
//! ## Crate Structure
//!
//! ```text
//!   arenalloc
//!   ├── align      - Word alignment (align!, align)
//!   ├── block      - Header encoding and BlockInfo
//!   ├── error      - PoolError
//!   └── pool       - Pool<N> implementation
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use arenalloc::{DefaultPool, PoolError};
//!
//! let mut pool = DefaultPool::new();
//!
//! let allocation = pool.allocate(128)?;
//! pool.payload_mut(allocation).unwrap()[0] = 42;
//! assert_eq!(pool.payload(allocation).unwrap()[0], 42);
//!
//! pool.deallocate(Some(allocation))?;
//! assert_eq!(pool.blocks().count(), 1);
//! # Ok::<(), PoolError>(())
//! ```
//!
//! ## How It Works
//!
//! Allocation walks the chain from the head and takes the first free block
//! that fits the word-aligned request. If enough is left over for another
//! header, the block is split:
//!
//! ```text
//!   Before:  ┌────────┬──────────────────────────────────────┐
//!            │ free   │              usable                  │
//!            └────────┴──────────────────────────────────────┘
//!
//!   After:   ┌────────┬──────────┬────────┬──────────────────┐
//!            │ used   │  size    │ free   │ usable-size-hdr  │
//!            └────────┴──────────┴────────┴──────────────────┘
//!                     ▲
//!                     └── Allocation returned to the caller
//! ```
//!
//! Deallocation marks the block free, absorbs the next block if it is free,
//! and then lets a free predecessor absorb it, so adjacent free regions never
//! stay fragmented.
//!
//! ## Limitations
//!
//! - **Single owner**: mutation needs `&mut Pool`; wrap in a `Mutex` to share
//! - **Fixed size**: the arena never grows
//! - **Word alignment only**: payloads are sized in machine words
//! - **Linear time**: every operation walks the block chain
//!
//! ## Logging
//!
//! Deallocation outcomes are reported through [`tracing`]. Install a
//! subscriber to see them.

pub mod align;
mod block;
mod error;
mod pool;

pub use block::{BlockInfo, HEADER_SIZE};
pub use error::{PoolError, Result};
pub use pool::{Allocation, Blocks, DEFAULT_ARENA_SIZE, DefaultPool, Pool};
