use std::fmt::{Display,Formatter};

use crate::point::Point;

#[derive(Debug,Clone,Copy,PartialEq,Eq,Default)]
pub enum Tool {
    #[default]
    None,
    Mark,
    Cut,
    Drill
}

/// Row of the `plotColors` palette used for notches.  Nothing emits
/// notches yet, the row is reserved so the palette layout stays fixed.
pub const NOTCH_COLOR : u32 = 3;

impl Tool {
    /// Row of the `plotColors` palette the tool is drawn with.
    pub fn color_index(self)->u32 {
	match self {
	    Self::Mark => 0,
	    Self::Cut => 1,
	    Self::Drill => 2,
	    Self::None => 4
	}
    }
}

impl Display for Tool {
    fn fmt(&self,f:&mut Formatter)->std::fmt::Result {
	let name = match self {
	    Self::None => "none",
	    Self::Mark => "mark",
	    Self::Cut => "cut",
	    Self::Drill => "drill"
	};
	write!(f,"{}",name)
    }
}

/// Offset vector of each tool, in plot units.
#[derive(Debug,Clone,Copy,PartialEq,Default)]
pub struct Offsets {
    pub mark:Point,
    pub cut:Point,
    pub drill:Point
}

impl Offsets {
    pub fn of(&self,tool:Tool)->Point {
	match tool {
	    Tool::Mark => self.mark,
	    Tool::Cut => self.cut,
	    Tool::Drill => self.drill,
	    Tool::None => Point::default()
	}
    }
}
