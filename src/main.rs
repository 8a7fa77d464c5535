#![allow(dead_code)]

mod common;
mod point;
mod token;
mod tool;
mod gerber;
mod interpreter;
mod igor;
mod config;
mod progress;

use log::{info,error,LevelFilter};
use std::io::Write;
use std::path::{Path,PathBuf};
use pico_args::Arguments;

use common::*;
use config::{Config,Loadable,Overrides,Settings};
use gerber::Tokenizer;
use igor::Igor;
use interpreter::{Flow,Gerber};
use progress::ProgressIndicator;

const USAGE : &str = "\
Translate photoplotter command files into Igor Pro text scripts.

Usage: gerber2igor [OPTIONS] FILE...

Options:
  -u, --units N          1 = tenths of millimeters, 2 = hundredths of inches,
                         3 = thousandths of inches (default 2)
  -m, --markoffset X,Y   Mark tool offset in inches (default 0,0)
  -c, --cutoffset X,Y    Cut tool offset in inches (default 0,0)
  -d, --drilloffset X,Y  Drill tool offset in inches (default 0,0)
  -v, --verbose          Display progress to terminal
      --config FILE      RON configuration file (default gerber2igor.ron if present)
      --output FILE      Combine all inputs into one script, one graph per input
  -h, --help             Print this help
";

/// Script written next to the input: same base name, `.itx` extension.
pub fn output_path(input:&Path)->PathBuf {
    input.with_extension("itx")
}

/// Run one input file through the interpreter into `igor`.
fn convert<W:Write>(input:&Path,igor:Igor<W>,settings:&Settings)->Res<Igor<W>> {
    let text = gerber::read_file(input)?;
    let mut tokens = Tokenizer::new(&text)?;
    let mut progress = settings.verbose.then(|| {
	ProgressIndicator::new(&input.display().to_string(),tokens.total())
    });
    let stream = std::iter::from_fn(|| {
	let tok = tokens.next();
	if let Some(p) = progress.as_mut() {
	    p.update(tokens.offset());
	}
	tok
    });
    let before = igor.wave_count();
    let mut gerber = Gerber::new(igor,settings.units,settings.offsets);
    if gerber.run(stream)? == Flow::Continue {
	info!("{}: end of data without stop code",input.display());
    }
    let igor = gerber.into_plotter();
    info!("{}: {} waves",input.display(),igor.wave_count() - before);
    Ok(igor)
}

fn main()->Res<()> {
    simple_logger::SimpleLogger::new()
	.with_level(LevelFilter::Debug)
	.init()?;
    log::set_max_level(LevelFilter::Info);

    let res = main0();
    if let Err(e) = &res {
	error!("{}",e);
    }

    res
}

fn main0()->Res<()> {
    let mut args = Arguments::from_env();

    if args.contains(["-h","--help"]) {
	print!("{}",USAGE);
	return Ok(());
    }

    let overrides = Overrides {
	units:args.opt_value_from_str(["-u","--units"])?,
	markoffset:args.opt_value_from_str(["-m","--markoffset"])?,
	cutoffset:args.opt_value_from_str(["-c","--cutoffset"])?,
	drilloffset:args.opt_value_from_str(["-d","--drilloffset"])?,
	verbose:args.contains(["-v","--verbose"])
    };
    let config_fn : Option<String> = args.opt_value_from_str("--config")?;
    let output : Option<String> = args.opt_value_from_str("--output")?;

    let mut inputs : Vec<PathBuf> = Vec::new();
    for arg in args.finish() {
	let arg = PathBuf::from(arg);
	if arg.to_string_lossy().starts_with('-') {
	    return Err(error(&format!("Unknown option {}",arg.display())));
	}
	inputs.push(arg);
    }
    if inputs.is_empty() {
	eprint!("{}",USAGE);
	return Err(error("No input file given"));
    }

    let config = match config_fn {
	Some(path) => {
	    info!("Loading configuration from {}",path);
	    Config::load(&path)?
	},
	None if Path::new(config::DEFAULT_CONFIG).exists() => {
	    info!("Loading configuration from {}",config::DEFAULT_CONFIG);
	    Config::load(config::DEFAULT_CONFIG)?
	},
	None => Config::default()
    };
    let settings = Settings::resolve(&overrides,&config)?;
    if settings.verbose {
	log::set_max_level(LevelFilter::Debug);
    }
    info!("Units: {}",settings.units);

    match output {
	Some(out) => {
	    info!("Writing {} inputs to {}",inputs.len(),out);
	    let mut igor = Igor::create(&out)?;
	    for (i,input) in inputs.iter().enumerate() {
		if i > 0 {
		    igor.begin_graph();
		}
		igor = convert(input,igor,&settings)?;
	    }
	    igor.finish()?;
	},
	None => {
	    for input in &inputs {
		let out = output_path(input);
		info!("Writing {} to {}",input.display(),out.display());
		let igor = Igor::create(&out)?;
		convert(input,igor,&settings)?.finish()?;
	    }
	}
    }

    Ok(())
}
