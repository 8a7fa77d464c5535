use std::fmt::{Display,Formatter};
use std::ops::Add;
use std::str::FromStr;

use crate::common::*;

pub type Real = f64;

/// Length units of the raw plotter coordinates.
#[derive(Debug,Clone,Copy,PartialEq,Eq)]
pub enum Units {
    Tenths,
    Hundredths,
    Thousandths
}

impl Units {
    /// Plot units (inches) per raw plotter unit.
    pub fn scale(self)->Real {
	match self {
	    Self::Tenths => 0.0039,
	    Self::Hundredths => 0.01,
	    Self::Thousandths => 0.001
	}
    }

    /// Selector used on the command line and in the configuration file.
    pub fn from_selector(n:i64)->Result<Self,GerberError> {
	match n {
	    1 => Ok(Self::Tenths),
	    2 => Ok(Self::Hundredths),
	    3 => Ok(Self::Thousandths),
	    _ => Err(GerberError::InvalidUnits(n))
	}
    }
}

impl Default for Units {
    fn default()->Self {
	Self::Hundredths
    }
}

impl Display for Units {
    fn fmt(&self,f:&mut Formatter)->std::fmt::Result {
	match self {
	    Self::Tenths => write!(f,"tenths of millimeters"),
	    Self::Hundredths => write!(f,"hundredths of inches"),
	    Self::Thousandths => write!(f,"thousandths of inches")
	}
    }
}

#[derive(Debug,Clone,Copy,PartialEq,Default)]
pub struct Point {
    pub x:Real,
    pub y:Real
}

impl Point {
    pub const MISSING : Point = Point { x:Real::NAN, y:Real::NAN };

    pub fn new(x:Real,y:Real)->Self {
	Self { x,y }
    }

    pub fn from_xy(x:i32,y:i32,units:Units)->Self {
	let s = units.scale();
	Self { x:s * x as Real, y:s * y as Real }
    }
}

impl FromStr for Point {
    type Err = GerberError;

    fn from_str(u:&str)->Result<Self,Self::Err> {
	let bad = || GerberError::InvalidOffset(u.to_string());
	let (xs,ys) = u.split_once(',').ok_or_else(bad)?;
	let x : Real = xs.trim().parse().map_err(|_| bad())?;
	let y : Real = ys.trim().parse().map_err(|_| bad())?;
	Ok(Self { x,y })
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self,other:Point)->Point {
	Point { x:self.x + other.x, y:self.y + other.y }
    }
}

impl Display for Point {
    fn fmt(&self,f:&mut Formatter)->std::fmt::Result {
	write!(f,"({},{})",self.x,self.y)
    }
}
