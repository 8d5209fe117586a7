pub mod config;
pub mod error;
pub mod executor;
pub mod modelsource;
pub mod session;

pub use config::{ExecutorConfig, ExecutorKind, InputSpec, RunConfig, SAMPLE_MODEL};
pub use error::{InferError, Result};
pub use executor::{ArenaStrategy, ConvAlgoSearch, CudaOptions, Executor};
pub use modelsource::ModelSource;
pub use session::{GraphSession, OptimizationLevel, Tuning};
