pub use std::error::Error;

pub type Res<T> = Result<T,Box<dyn Error>>;

pub fn error(msg:&str)->Box<dyn Error> {
    msg.into()
}

/// Commands the plotter dialect defines but whose geometry we do not know.
#[derive(Debug,Clone,Copy,PartialEq,Eq)]
pub enum Feature {
    FlickNotch,
    Rewind,
    ConveyorBite,
    BlockDelete
}

impl std::fmt::Display for Feature {
    fn fmt(&self,f:&mut std::fmt::Formatter)->std::fmt::Result {
	match self {
	    Self::FlickNotch => write!(f,"E/M68 (Flick notch)"),
	    Self::Rewind => write!(f,"M30 (Rewind data file)"),
	    Self::ConveyorBite => write!(f,"M69 (Conveyor bite)"),
	    Self::BlockDelete => write!(f,"'/' (Block delete)")
	}
    }
}

#[derive(Debug,thiserror::Error)]
pub enum GerberError {
    #[error("There should not be a path when the drill command executes ({0} points open)")]
    PathOpenAtDrill(usize),

    #[error("Wasn't expecting {0}")]
    Unsupported(Feature),

    #[error("Invalid offset {0:?}, expected \"x,y\"")]
    InvalidOffset(String),

    #[error("Invalid units {0}: 1 = tenths of millimeters, 2 = hundredths of inches, 3 = thousandths of inches")]
    InvalidUnits(i64)
}
