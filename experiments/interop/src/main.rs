use probe_base::{hostctx, log, log_fatal};
use probe_infer::{ExecutorKind, GraphSession, ModelSource, RunConfig};
use std::error::Error;
use std::path::PathBuf;

struct Cli {
    config: RunConfig,
    log_dir: Option<PathBuf>,
}

fn usage(program: &str) {
    eprintln!(
        "Usage: {} [--config FILE] [--model PATH] [--cpu | --cuda [DEVICE]] [--input CSV] [--shape DxDx..] [--output NAME].. [--pause | --no-pause] [--log-dir DIR]",
        program
    );
}

fn value_of<'a>(args: &'a [String], i: &mut usize) -> Result<&'a str, Box<dyn Error>> {
    let flag = &args[*i];
    *i += 1;
    match args.get(*i) {
        Some(value) => Ok(value.as_str()),
        None => Err(format!("{} needs a value", flag).into()),
    }
}

fn parse_data(text: &str) -> Result<Vec<f32>, Box<dyn Error>> {
    text.split(',')
        .map(|part| part.trim().parse::<f32>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| format!("bad --input value: {}", e).into())
}

fn parse_shape(text: &str) -> Result<Vec<usize>, Box<dyn Error>> {
    text.split('x')
        .map(|part| part.trim().parse::<usize>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| format!("bad --shape value: {}", e).into())
}

fn parse_args(args: &[String]) -> Result<Cli, Box<dyn Error>> {
    let mut config_path: Option<PathBuf> = None;
    let mut model: Option<PathBuf> = None;
    let mut kind: Option<ExecutorKind> = None;
    let mut device: Option<i32> = None;
    let mut data: Option<Vec<f32>> = None;
    let mut shape: Option<Vec<usize>> = None;
    let mut outputs: Vec<String> = Vec::new();
    let mut pause: Option<bool> = None;
    let mut log_dir: Option<PathBuf> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" => config_path = Some(PathBuf::from(value_of(args, &mut i)?)),
            "--model" => model = Some(PathBuf::from(value_of(args, &mut i)?)),
            "--cpu" => kind = Some(ExecutorKind::Cpu),
            "--cuda" => {
                kind = Some(ExecutorKind::Cuda);
                // Optional device ordinal directly after the flag
                if let Some(id) = args.get(i + 1).and_then(|a| a.parse::<i32>().ok()) {
                    device = Some(id);
                    i += 1;
                }
            }
            "--input" => data = Some(parse_data(value_of(args, &mut i)?)?),
            "--shape" => shape = Some(parse_shape(value_of(args, &mut i)?)?),
            "--output" => outputs.push(value_of(args, &mut i)?.to_string()),
            "--pause" => pause = Some(true),
            "--no-pause" => pause = Some(false),
            "--log-dir" => log_dir = Some(PathBuf::from(value_of(args, &mut i)?)),
            _ => {
                usage(&args[0]);
                std::process::exit(1);
            }
        }
        i += 1;
    }

    let mut config = match &config_path {
        Some(path) => RunConfig::load(path)?,
        None => {
            let mut base = RunConfig::sample();
            // The interactive hold is opt-in on the command line
            base.pause = false;
            base
        }
    };
    if let Some(model) = model {
        config.model = model;
    }
    if let Some(kind) = kind {
        config.executor.kind = kind;
    }
    if let Some(device) = device {
        config.executor.cuda.device_id = device;
    }
    if let Some(data) = data {
        config.input.data = data;
    }
    if let Some(shape) = shape {
        config.input.shape = shape;
    }
    if !outputs.is_empty() {
        config.outputs = outputs;
    }
    if let Some(pause) = pause {
        config.pause = pause;
    }
    config.validate()?;

    Ok(Cli { config, log_dir })
}

#[cfg(not(feature = "cuda"))]
fn cpu_fallback(config: &mut RunConfig) {
    if config.executor.kind == ExecutorKind::Cuda {
        log::warn!("CUDA support not compiled in, falling back to CPU");
        config.executor.kind = ExecutorKind::Cpu;
    }
}

#[cfg(feature = "cuda")]
fn cpu_fallback(_config: &mut RunConfig) {}

fn main() -> Result<(), Box<dyn Error>> {
    let args: Vec<String> = std::env::args().collect();
    let cli = parse_args(&args)?;

    match &cli.log_dir {
        Some(dir) => probe_base::init_file_logger(dir.clone())?,
        None => probe_base::init_stdout_logger(),
    }

    let mut config = cli.config;

    log::info!("current process id is {}", hostctx::pid());
    log::info!("context as found: {}", hostctx::context_info());

    if !config.model.exists() {
        log_fatal!("model file {} not found", config.model.display());
    }

    if config.pause {
        hostctx::hold_for_attach()?;
    }

    cpu_fallback(&mut config);
    let executor = config.executor.to_executor();
    log::info!("creating inference session using {}", executor);

    hostctx::set_info_1(vec!["ccc".to_string(), "ddd".to_string()]);
    hostctx::set_info_2(vec!["333".to_string(), "444".to_string()]);
    log::debug!("context updated: {}", hostctx::context_info());

    let model = ModelSource::File(config.model.clone());
    let mut session = GraphSession::load(&model, &executor, &config.tuning())?;
    log::info!("session ready, process id is {}", hostctx::pid());
    log::debug!(
        "graph inputs: {:?}, outputs: {:?}",
        session.input_names(),
        session.output_names()
    );

    let input_name = match &config.input.name {
        Some(name) => name.clone(),
        None => session
            .input_names()
            .first()
            .cloned()
            .ok_or("graph declares no inputs")?,
    };
    let x = config.input.to_tensor()?;
    log::info!("running inference, input '{}' of shape {:?}", input_name, x.shape);

    let requested: Vec<&str> = config.outputs.iter().map(|name| name.as_str()).collect();
    let results = session.run(&[(input_name.as_str(), &x)], &requested)?;
    log::info!("inference done");

    for (name, tensor) in config.outputs.iter().zip(&results) {
        println!("{}: {}", name, tensor);
    }

    Ok(())
}
