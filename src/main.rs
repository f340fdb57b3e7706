use std::env;
use std::path::PathBuf;
use stickhdl::{BuildConfig, StickError, fulladder_design};
use stickhdl_codegen::generate_project;
use stickhdl_ir::Design;
use stickhdl_sim::{ScanEngine, SimBackend, Simulator, parse_stimulus, truth_table};

const USAGE: &str = "Usage: stickhdl [--config <file.toml>] [--json | --truth-table | --generate [dir] | --simulate S1=0,S2=1,S3=1]";

enum Command {
    Json,
    TruthTable,
    Generate(Option<PathBuf>),
    Simulate(String),
}

fn usage() -> ! {
    eprintln!("{USAGE}");
    std::process::exit(1)
}

fn parse_args(mut args: Vec<String>) -> (Option<PathBuf>, Command) {
    let mut config_path = None;
    let mut command = Command::Json;

    while !args.is_empty() {
        let arg = args.remove(0);
        match arg.as_str() {
            "--config" => {
                if args.is_empty() {
                    usage();
                }
                config_path = Some(PathBuf::from(args.remove(0)));
            }
            "--json" => command = Command::Json,
            "--truth-table" => command = Command::TruthTable,
            "--generate" => {
                let dir = if args.first().is_some_and(|next| !next.starts_with("--")) {
                    Some(PathBuf::from(args.remove(0)))
                } else {
                    None
                };
                command = Command::Generate(dir);
            }
            "--simulate" => {
                if args.is_empty() {
                    usage();
                }
                command = Command::Simulate(args.remove(0));
            }
            "-h" | "--help" => {
                println!("{USAGE}");
                std::process::exit(0);
            }
            other => {
                eprintln!("Unknown argument: {other}");
                usage();
            }
        }
    }

    (config_path, command)
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let (config_path, command) = parse_args(env::args().skip(1).collect());

    if let Err(err) = run(config_path, command) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run(config_path: Option<PathBuf>, command: Command) -> Result<(), StickError> {
    let config = match config_path {
        Some(path) => BuildConfig::from_file(path)?,
        None => BuildConfig::default(),
    };
    let design = fulladder_design(&config)?;

    match command {
        Command::Json => {
            println!("{}", design.to_json()?);
        }
        Command::TruthTable => print!("{}", truth_table(&design)?),
        Command::Generate(dir) => {
            let dir = dir.unwrap_or_else(|| config.out_dir.clone());
            let written = generate_project(&design, &config.codegen_config(), &dir)?;
            eprintln!("generated {} files in {}", written.len(), dir.display());
        }
        Command::Simulate(stimulus) => simulate(&design, &stimulus)?,
    }
    Ok(())
}

fn simulate(design: &Design, stimulus: &str) -> Result<(), StickError> {
    let simulator = Simulator::new(design)?;
    let assignment = parse_stimulus(stimulus)?;
    simulator.check_stimulus(&assignment)?;

    let mut backend = SimBackend::new();
    for (pin, value) in assignment {
        backend.set_input(&pin, value);
    }
    let mut engine = ScanEngine::new(backend, simulator);
    for (pin, value) in engine.step()? {
        println!("{pin} = {}", u8::from(value));
    }
    Ok(())
}
