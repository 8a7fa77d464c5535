use serde::{Serialize,Deserialize};
use std::{
    fs::File,
    path::Path
};

use crate::{
    common::*,
    point::{Point,Units},
    tool::Offsets
};

pub const DEFAULT_CONFIG : &str = "gerber2igor.ron";

/// Contents of the optional RON configuration file, e.g.
///
/// ```text
/// (
///     units: Some(3),
///     markoffset: Some("0.1,-0.05"),
///     verbose: Some(true),
/// )
/// ```
#[derive(Clone,Serialize,Deserialize,Debug,Default,PartialEq)]
#[serde(default)]
pub struct Config {
    pub units:Option<i64>,
    pub markoffset:Option<String>,
    pub cutoffset:Option<String>,
    pub drilloffset:Option<String>,
    pub verbose:Option<bool>
}

pub trait Loadable {
    fn load<P:AsRef<Path>>(path:P)->Res<Self>
    where Self:Sized,for<'a> Self:Deserialize<'a> {
	let fd = File::open(path)?;
	let this : Self = ron::de::from_reader(fd)?;
	Ok(this)
    }

    fn parse(u:&str)->Res<Self>
    where Self:Sized,for<'a> Self:Deserialize<'a> {
	let this : Self = ron::de::from_str(u)?;
	Ok(this)
    }
}

impl Loadable for Config { }

/// Values given on the command line, which take precedence over the file.
#[derive(Clone,Debug,Default)]
pub struct Overrides {
    pub units:Option<i64>,
    pub markoffset:Option<String>,
    pub cutoffset:Option<String>,
    pub drilloffset:Option<String>,
    pub verbose:bool
}

/// Fully resolved conversion parameters.
#[derive(Clone,Debug,PartialEq)]
pub struct Settings {
    pub units:Units,
    pub offsets:Offsets,
    pub verbose:bool
}

fn offset(cli:&Option<String>,file:&Option<String>)->Res<Point> {
    let text = cli.as_deref().or(file.as_deref()).unwrap_or("0,0");
    Ok(text.parse::<Point>()?)
}

impl Settings {
    pub fn resolve(cli:&Overrides,file:&Config)->Res<Self> {
	let units = match cli.units.or(file.units) {
	    Some(n) => Units::from_selector(n)?,
	    None => Units::default()
	};
	let offsets = Offsets {
	    mark:offset(&cli.markoffset,&file.markoffset)?,
	    cut:offset(&cli.cutoffset,&file.cutoffset)?,
	    drill:offset(&cli.drilloffset,&file.drilloffset)?
	};
	let verbose = cli.verbose || file.verbose.unwrap_or(false);
	Ok(Self { units,offsets,verbose })
    }
}
