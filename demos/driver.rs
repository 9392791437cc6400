use arenalloc::{Allocation, DefaultPool};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Reports the outcome of one allocation the way a caller would.
fn report(
  label: &str,
  result: arenalloc::Result<Allocation>,
) -> Option<Allocation> {
  match result {
    Ok(allocation) => {
      info!("allocation successful for {label}: {allocation}");
      Some(allocation)
    }
    Err(err) => {
      error!("allocation failed for {label}: {err}");
      None
    }
  }
}

fn main() {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")))
    .init();

  let mut pool = DefaultPool::new();
  let mut slots: [Option<Allocation>; 3] = [None; 3];

  slots[0] = report("slot 0", pool.allocate(128));
  slots[1] = report("slot 1", pool.allocate(1024));
  slots[2] = report("slot 2", pool.allocate(4096));

  if let Err(err) = pool.deallocate(slots[1].take()) {
    error!("{err}");
  }

  slots[1] = report("slot 1 (realloc)", pool.allocate(512));

  // Caller errors are reported, not fatal.
  if let Err(err) = pool.deallocate(None) {
    error!("{err}");
  }

  for block in pool.blocks() {
    info!(
      offset = block.offset,
      size = block.usable_size,
      free = block.is_free,
      "block"
    );
  }

  info!("memory operations completed successfully");
}
