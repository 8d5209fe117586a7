use crate::error::Result;
use crate::{Executor, InferError, ModelSource};
use ndarray::ArrayD;
use ort::{
    inputs,
    session::{builder::GraphOptimizationLevel, Session as OrtSession},
    value::TensorRef,
};
use probe_base::Tensor;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

static ORT_INIT: OnceLock<()> = OnceLock::new();

fn ensure_ort_init() {
    ORT_INIT.get_or_init(|| {
        let _ = ort::init().commit();
    });
}

/// How much the runtime is allowed to rewrite the graph before running it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptimizationLevel {
    Disabled,
    Basic,
    Extended,
    All,
}

/// Session-level tuning applied before the graph is committed.
#[derive(Debug, Clone, PartialEq)]
pub struct Tuning {
    pub optimization: OptimizationLevel,
    pub intra_threads: Option<usize>,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            optimization: OptimizationLevel::All,
            intra_threads: None,
        }
    }
}

fn graph_level(level: OptimizationLevel) -> GraphOptimizationLevel {
    match level {
        OptimizationLevel::Disabled => GraphOptimizationLevel::Disable,
        OptimizationLevel::Basic => GraphOptimizationLevel::Level1,
        OptimizationLevel::Extended => GraphOptimizationLevel::Level2,
        OptimizationLevel::All => GraphOptimizationLevel::Level3,
    }
}

#[cfg(feature = "cuda")]
fn cuda_provider(
    options: &crate::executor::CudaOptions,
) -> ort::execution_providers::CUDAExecutionProvider {
    use crate::executor::{ArenaStrategy, ConvAlgoSearch};
    use ort::execution_providers::cuda::CuDNNConvAlgorithmSearch;
    use ort::execution_providers::{ArenaExtendStrategy, CUDAExecutionProvider};

    let strategy = match options.arena_extend_strategy {
        ArenaStrategy::NextPowerOfTwo => ArenaExtendStrategy::NextPowerOfTwo,
        ArenaStrategy::SameAsRequested => ArenaExtendStrategy::SameAsRequested,
    };
    let search = match options.conv_algo_search {
        ConvAlgoSearch::Exhaustive => CuDNNConvAlgorithmSearch::Exhaustive,
        ConvAlgoSearch::Heuristic => CuDNNConvAlgorithmSearch::Heuristic,
        ConvAlgoSearch::Default => CuDNNConvAlgorithmSearch::Default,
    };

    CUDAExecutionProvider::default()
        .with_device_id(options.device_id)
        .with_memory_limit(options.memory_limit)
        .with_arena_extend_strategy(strategy)
        .with_conv_algorithm_search(search)
        .with_copy_in_default_stream(options.copy_in_default_stream)
}

/// A committed inference session with its input and output names captured
/// at load time.
pub struct GraphSession {
    session: OrtSession,
    input_names: Vec<String>,
    output_names: Vec<String>,
}

impl GraphSession {
    /// Build and commit a session for the given graph on the given executor.
    ///
    /// A CUDA executor registers the CUDA execution provider first and the
    /// CPU provider after it, so the runtime falls back to CPU for anything
    /// the device cannot take.
    pub fn load(model: &ModelSource, executor: &Executor, tuning: &Tuning) -> Result<GraphSession> {
        ensure_ort_init();

        log::debug!("loading graph from {}", model.describe());

        let mut builder = OrtSession::builder()?
            .with_optimization_level(graph_level(tuning.optimization))?;
        if let Some(threads) = tuning.intra_threads {
            builder = builder.with_intra_threads(threads)?;
        }

        let builder = match executor {
            Executor::Cpu => {
                log::info!("using CPU execution provider");
                builder.with_execution_providers([
                    ort::execution_providers::CPUExecutionProvider::default().build(),
                ])?
            }
            #[cfg(feature = "cuda")]
            Executor::Cuda(options) => {
                use ort::execution_providers::ExecutionProvider;

                let ep = cuda_provider(options);
                let available = ep.is_available().unwrap_or(false);
                log::info!(
                    "CUDA execution provider requested (device_id={}), available: {}",
                    options.device_id,
                    available
                );
                builder.with_execution_providers([
                    ep.build(),
                    ort::execution_providers::CPUExecutionProvider::default().build(),
                ])?
            }
            #[cfg(not(feature = "cuda"))]
            Executor::Cuda(_) => {
                return Err(InferError::Runtime("CUDA feature not enabled".to_string()));
            }
        };

        let session = match model {
            ModelSource::File(path) => builder.commit_from_file(path)?,
            ModelSource::Memory(bytes) => builder.commit_from_memory(bytes)?,
        };

        let input_names: Vec<String> = session
            .inputs
            .iter()
            .map(|input| input.name.to_string())
            .collect();
        let output_names: Vec<String> = session
            .outputs
            .iter()
            .map(|output| output.name.to_string())
            .collect();

        Ok(GraphSession {
            session,
            input_names,
            output_names,
        })
    }

    pub fn input_names(&self) -> &[String] {
        &self.input_names
    }

    pub fn output_names(&self) -> &[String] {
        &self.output_names
    }

    /// Run one forward pass.
    ///
    /// Every input name must be one the graph declares, and every requested
    /// output name must be one the graph produces. Results come back in the
    /// order the outputs were requested.
    pub fn run(
        &mut self,
        inputs: &[(&str, &Tensor<f32>)],
        outputs: &[&str],
    ) -> Result<Vec<Tensor<f32>>> {
        check_run_request(inputs, outputs, &self.input_names, &self.output_names)?;

        let arrays = inputs
            .iter()
            .map(|&(_, tensor)| tensor_to_ndarray(tensor))
            .collect::<Result<Vec<_>>>()?;

        // The inputs! macro is arity-typed, so each supported count gets its
        // own arm
        let session_outputs = match inputs.len() {
            1 => {
                let (name, _) = inputs[0];
                let value = TensorRef::from_array_view(arrays[0].view())?;
                self.session.run(inputs![name => value])?
            }
            2 => {
                let (name_a, _) = inputs[0];
                let (name_b, _) = inputs[1];
                let value_a = TensorRef::from_array_view(arrays[0].view())?;
                let value_b = TensorRef::from_array_view(arrays[1].view())?;
                self.session
                    .run(inputs![name_a => value_a, name_b => value_b])?
            }
            3 => {
                let (name_a, _) = inputs[0];
                let (name_b, _) = inputs[1];
                let (name_c, _) = inputs[2];
                let value_a = TensorRef::from_array_view(arrays[0].view())?;
                let value_b = TensorRef::from_array_view(arrays[1].view())?;
                let value_c = TensorRef::from_array_view(arrays[2].view())?;
                self.session.run(inputs![
                    name_a => value_a,
                    name_b => value_b,
                    name_c => value_c
                ])?
            }
            n => return Err(arity_error(n)),
        };

        let mut results = Vec::with_capacity(outputs.len());
        for name in outputs {
            let array = session_outputs[*name].try_extract_array::<f32>().map_err(|e| {
                InferError::Shape(format!("output '{}' is not f32: {}", name, e))
            })?;
            results.push(ndarray_to_tensor(array)?);
        }

        Ok(results)
    }
}

fn arity_error(count: usize) -> InferError {
    InferError::Runtime(format!("runs support 1 to 3 inputs, got {count}"))
}

/// Validate a run request against the names the graph declares.
pub fn check_run_request(
    inputs: &[(&str, &Tensor<f32>)],
    outputs: &[&str],
    input_names: &[String],
    output_names: &[String],
) -> Result<()> {
    if inputs.is_empty() || inputs.len() > 3 {
        return Err(arity_error(inputs.len()));
    }
    for (name, _) in inputs {
        if !input_names.iter().any(|known| known == name) {
            return Err(InferError::Runtime(format!(
                "unknown input '{}', graph inputs are {:?}",
                name, input_names
            )));
        }
    }
    for name in outputs {
        if !output_names.iter().any(|known| known == name) {
            return Err(InferError::Runtime(format!(
                "unknown output '{}', graph outputs are {:?}",
                name, output_names
            )));
        }
    }
    Ok(())
}

// Helper function to convert Tensor<f32> to ndarray::ArrayD<f32>
pub fn tensor_to_ndarray(tensor: &Tensor<f32>) -> Result<ArrayD<f32>> {
    ArrayD::from_shape_vec(tensor.shape.clone(), tensor.data.clone())
        .map_err(|e| InferError::Shape(format!("tensor does not fit its shape: {}", e)))
}

// Helper function to convert ndarray::ArrayD<f32> to Tensor<f32>
pub fn ndarray_to_tensor(array: ndarray::ArrayViewD<'_, f32>) -> Result<Tensor<f32>> {
    let shape = array.shape().to_vec();
    let data = array.iter().copied().collect();
    Ok(Tensor::new(shape, data)?)
}
