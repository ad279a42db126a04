// ABOUTME: Sealed trait pattern for runtime traits.
// ABOUTME: Prevents external implementations, allowing non-breaking evolution.

/// Sealed trait to prevent external implementations.
///
/// Only runtime types inside this crate (the bollard client and the test
/// fake) can implement the capability traits.
pub trait Sealed {}
