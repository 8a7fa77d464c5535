use std::fmt::{Display,Formatter};

/// One lexical unit of the plotter command stream.  Coordinates are raw
/// plotter units, scaling happens in the interpreter.
#[derive(Debug,Clone,Copy,PartialEq,Eq)]
pub enum Token {
    Coordinate {
	x:i32,
	y:i32
    },
    Command {
	code:char,
	value:Option<i32>
    }
}

impl Token {
    pub fn command(code:char,value:Option<i32>)->Self {
	Self::Command { code,value }
    }

    pub fn coordinate(x:i32,y:i32)->Self {
	Self::Coordinate { x,y }
    }
}

impl Display for Token {
    fn fmt(&self,f:&mut Formatter)->std::fmt::Result {
	match self {
	    Self::Coordinate { x,y } => write!(f,"({},{})",x,y),
	    Self::Command { code,value:Some(v) } => write!(f,"{}{}",code,v),
	    Self::Command { code,value:None } => write!(f,"{}",code)
	}
    }
}
