use probe_infer::{Executor, GraphSession, InferError, ModelSource, Tuning};

#[test]
fn test_tensor_to_ndarray_conversion() {
    use probe_base::Tensor;
    use probe_infer::session::tensor_to_ndarray;

    let tensor = Tensor::new(vec![2, 3], vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
    let array = tensor_to_ndarray(&tensor).unwrap();

    assert_eq!(array.shape(), &[2, 3]);
    assert_eq!(array.len(), 6);
    assert_eq!(array[[0, 0]], 1.0);
    assert_eq!(array[[1, 2]], 6.0);
}

#[test]
fn test_ndarray_to_tensor_conversion() {
    use ndarray::ArrayD;
    use probe_infer::session::ndarray_to_tensor;

    let array =
        ArrayD::<f32>::from_shape_vec(vec![2, 3], vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
    let tensor = ndarray_to_tensor(array.view()).unwrap();

    assert_eq!(tensor.shape, vec![2, 3]);
    assert_eq!(tensor.data, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
}

#[test]
fn test_load_missing_file_fails() {
    let model = ModelSource::File("fake_model.onnx".into());
    let result = GraphSession::load(&model, &Executor::Cpu, &Tuning::default());
    assert!(result.is_err()); // Should error because file doesn't exist
}

#[test]
fn test_load_garbage_bytes_fails() {
    let model = ModelSource::Memory(b"not an onnx graph".to_vec());
    let result = GraphSession::load(&model, &Executor::Cpu, &Tuning::default());
    assert!(result.is_err());
}

#[cfg(not(feature = "cuda"))]
#[test]
fn test_load_cuda_without_feature_fails() {
    use probe_infer::CudaOptions;

    let model = ModelSource::File("fake_model.onnx".into());
    let result = GraphSession::load(
        &model,
        &Executor::Cuda(CudaOptions::default()),
        &Tuning::default(),
    );
    match result {
        Err(InferError::Runtime(msg)) => assert!(msg.contains("CUDA feature not enabled")),
        Err(other) => panic!("unexpected error: {:?}", other),
        Ok(_) => panic!("expected an error"),
    }
}

#[cfg(feature = "cuda")]
#[test]
fn test_load_cuda_missing_file_fails() {
    // Note: This test may run on a machine without a CUDA device.
    // Loading still fails on the missing file either way.
    use probe_infer::CudaOptions;

    let model = ModelSource::File("fake_model.onnx".into());
    let result = GraphSession::load(
        &model,
        &Executor::Cuda(CudaOptions::default()),
        &Tuning::default(),
    );
    assert!(result.is_err());
}

#[test]
fn test_tuning_default() {
    use probe_infer::OptimizationLevel;

    let tuning = Tuning::default();
    assert_eq!(tuning.optimization, OptimizationLevel::All);
    assert_eq!(tuning.intra_threads, None);
}

#[test]
fn test_model_source_describe() {
    let file = ModelSource::File("graphs/sample.onnx".into());
    assert_eq!(file.describe(), "file graphs/sample.onnx");

    let memory = ModelSource::Memory(vec![0u8; 16]);
    assert_eq!(memory.describe(), "16 bytes in memory");
}

#[test]
fn test_check_run_request_accepts_known_names() {
    use probe_base::Tensor;
    use probe_infer::session::check_run_request;

    let input_names = vec!["X".to_string()];
    let output_names = vec!["Y".to_string()];
    let x = Tensor::new(vec![2, 2], vec![1.0, 2.0, 3.0, 4.0]).unwrap();

    assert!(check_run_request(&[("X", &x)], &["Y"], &input_names, &output_names).is_ok());
    // Requesting the same output twice is allowed
    assert!(check_run_request(&[("X", &x)], &["Y", "Y"], &input_names, &output_names).is_ok());
}

#[test]
fn test_check_run_request_rejects_empty_inputs() {
    use probe_infer::session::check_run_request;

    let input_names = vec!["X".to_string()];
    let output_names = vec!["Y".to_string()];

    let result = check_run_request(&[], &["Y"], &input_names, &output_names);
    match result {
        Err(InferError::Runtime(msg)) => assert!(msg.contains("got 0")),
        other => panic!("expected a runtime error, got {:?}", other),
    }
}

#[test]
fn test_check_run_request_rejects_too_many_inputs() {
    use probe_base::Tensor;
    use probe_infer::session::check_run_request;

    let input_names = vec!["X".to_string()];
    let output_names = vec!["Y".to_string()];
    let x = Tensor::from_scalar(1.0);

    let four = [("X", &x), ("X", &x), ("X", &x), ("X", &x)];
    let result = check_run_request(&four, &["Y"], &input_names, &output_names);
    match result {
        Err(InferError::Runtime(msg)) => {
            assert!(msg.contains("runs support 1 to 3 inputs, got 4"))
        }
        other => panic!("expected a runtime error, got {:?}", other),
    }
}

#[test]
fn test_check_run_request_rejects_unknown_input() {
    use probe_base::Tensor;
    use probe_infer::session::check_run_request;

    let input_names = vec!["X".to_string()];
    let output_names = vec!["Y".to_string()];
    let x = Tensor::from_scalar(1.0);

    let result = check_run_request(&[("A", &x)], &["Y"], &input_names, &output_names);
    match result {
        Err(InferError::Runtime(msg)) => {
            assert!(msg.contains("unknown input 'A'"));
            // The error names the set of inputs the graph declares
            assert!(msg.contains("graph inputs are"));
            assert!(msg.contains("X"));
        }
        other => panic!("expected a runtime error, got {:?}", other),
    }
}

#[test]
fn test_check_run_request_rejects_unknown_output() {
    use probe_base::Tensor;
    use probe_infer::session::check_run_request;

    let input_names = vec!["X".to_string()];
    let output_names = vec!["Y".to_string()];
    let x = Tensor::from_scalar(1.0);

    let result = check_run_request(&[("X", &x)], &["Z"], &input_names, &output_names);
    match result {
        Err(InferError::Runtime(msg)) => {
            assert!(msg.contains("unknown output 'Z'"));
            assert!(msg.contains("graph outputs are"));
            assert!(msg.contains("Y"));
        }
        other => panic!("expected a runtime error, got {:?}", other),
    }
}
