/// Largest valid bounds dimension (world units). Prevents degenerate spatial
/// index envelopes.
pub const MAX_BOUNDS: f64 = 16_384.0;

/// Hard cap on the live population. Reproduction is skipped once reached.
pub const MAX_TOTAL_AGENTS: usize = 100_000;

/// Smallest rendered/interacting agent size; starving agents never shrink
/// below this.
pub const MIN_AGENT_SIZE: f64 = 1.0;
