use crate::error::Result;
use crate::executor::{CudaOptions, Executor};
use crate::session::{OptimizationLevel, Tuning};
use crate::InferError;
use probe_base::Tensor;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Graph file the sample run loads when no model is given.
pub const SAMPLE_MODEL: &str = "sample_interop.onnx";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutorKind {
    Cpu,
    Cuda,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutorConfig {
    pub kind: ExecutorKind,
    pub cuda: CudaOptions,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            kind: ExecutorKind::Cpu,
            cuda: CudaOptions::default(),
        }
    }
}

impl ExecutorConfig {
    pub fn to_executor(&self) -> Executor {
        match self.kind {
            ExecutorKind::Cpu => Executor::Cpu,
            ExecutorKind::Cuda => Executor::Cuda(self.cuda.clone()),
        }
    }
}

/// One hand-built input tensor: flat values plus the shape they fold into.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputSpec {
    /// Input to feed. None means the graph's first declared input.
    pub name: Option<String>,
    pub shape: Vec<usize>,
    pub data: Vec<f32>,
}

impl Default for InputSpec {
    fn default() -> Self {
        Self {
            name: None,
            shape: vec![2, 2],
            data: vec![1.0, 2.0, 3.0, 4.0],
        }
    }
}

impl InputSpec {
    /// Build the tensor, flat first, then folded to the requested shape.
    pub fn to_tensor(&self) -> Result<Tensor<f32>> {
        let flat = Tensor::new(vec![self.data.len()], self.data.clone())?;
        Ok(flat.reshape(self.shape.clone())?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub model: PathBuf,
    pub executor: ExecutorConfig,
    pub optimization: OptimizationLevel,
    pub intra_threads: Option<usize>,
    pub input: InputSpec,
    pub outputs: Vec<String>,
    pub pause: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            model: PathBuf::from(SAMPLE_MODEL),
            executor: ExecutorConfig::default(),
            optimization: OptimizationLevel::All,
            intra_threads: None,
            input: InputSpec::default(),
            outputs: vec!["Y".to_string()],
            pause: false,
        }
    }
}

impl RunConfig {
    /// Returns the hardcoded configuration for the interop sample run:
    /// CUDA executor with its default options, pausing for attach.
    pub fn sample() -> Self {
        Self {
            executor: ExecutorConfig {
                kind: ExecutorKind::Cuda,
                cuda: CudaOptions::default(),
            },
            pause: true,
            ..Self::default()
        }
    }

    /// Read a config from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path.as_ref())?;
        let config: RunConfig = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.outputs.is_empty() {
            return Err(InferError::Config("no outputs requested".to_string()));
        }
        Ok(())
    }

    pub fn tuning(&self) -> Tuning {
        Tuning {
            optimization: self.optimization,
            intra_threads: self.intra_threads,
        }
    }
}
