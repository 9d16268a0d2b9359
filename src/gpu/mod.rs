// ============================================================================
// GPU MODULE: hardware-accelerated candidate evaluation
// ============================================================================
//
// Architecture:
//   context.rs  : wgpu Device, Queue, adapter init
//   shaders.rs  : WGSL shader source (inline strings)
//   evaluator.rs: CandidateEvaluator backed by a fragment pass
// ============================================================================

/// wgpu device and queue initialization
pub mod context;
/// GPU implementation of weighted-selection candidate errors
pub mod evaluator;
/// Inline WGSL shader sources
pub mod shaders;

pub use context::GpuContext;
pub use evaluator::GpuEvaluator;
