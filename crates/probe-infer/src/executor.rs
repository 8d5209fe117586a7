use serde::{Deserialize, Serialize};
use std::fmt;

/// Arena growth policy for the CUDA memory allocator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArenaStrategy {
    NextPowerOfTwo,
    SameAsRequested,
}

/// How cuDNN picks convolution kernels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConvAlgoSearch {
    Exhaustive,
    Heuristic,
    Default,
}

/// Tuning knobs for the CUDA execution provider.
///
/// The defaults pin the session to device 0 with a 2 GiB arena that grows in
/// powers of two, exhaustive cuDNN benchmarking, and copies issued on the
/// default stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CudaOptions {
    pub device_id: i32,
    pub memory_limit: usize,
    pub arena_extend_strategy: ArenaStrategy,
    pub conv_algo_search: ConvAlgoSearch,
    pub copy_in_default_stream: bool,
}

impl Default for CudaOptions {
    fn default() -> Self {
        Self {
            device_id: 0,
            memory_limit: 2 * 1024 * 1024 * 1024,
            arena_extend_strategy: ArenaStrategy::NextPowerOfTwo,
            conv_algo_search: ConvAlgoSearch::Exhaustive,
            copy_in_default_stream: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Executor {
    Cpu,
    Cuda(CudaOptions),
}

impl fmt::Display for Executor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Executor::Cpu => write!(f, "CPU"),
            Executor::Cuda(options) => write!(f, "CUDA(device_id={})", options.device_id),
        }
    }
}
