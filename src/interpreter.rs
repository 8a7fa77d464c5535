use log::{debug,info,warn};

use crate::common::*;
use crate::igor::Plotter;
use crate::point::{Point,Units};
use crate::token::Token;
use crate::tool::{Offsets,Tool};

/// Decoded meaning of a token.
#[derive(Debug,Clone,Copy,PartialEq)]
pub enum Command {
    Move { x:i32, y:i32 },
    Stop,
    ToolUp,
    ToolDown(Tool),
    Drill,
    SetOrigin,
    GoToOrigin,
    SetUnits(Units),
    SetFileNumber(Option<i32>),
    SetPatternNumber(Option<i32>),
    ResumeNormalSpeed,
    Unsupported(Feature),
    Unrecognized
}

impl From<Token> for Command {
    fn from(tok:Token)->Self {
	match tok {
	    Token::Coordinate { x,y } => Self::Move { x,y },
	    Token::Command { code,value } => match (code,value) {
		('M',Some(0)) => Self::Stop,
		('A',_) | ('D',Some(2)) | ('M',Some(15)) => Self::ToolUp,
		('B',_) | ('M',Some(14)) => Self::ToolDown(Tool::Cut),
		('D',Some(1)) => Self::ToolDown(Tool::Mark),
		('G',Some(4)) => Self::SetOrigin,
		('G',Some(70)) => Self::SetUnits(Units::Thousandths),
		('G',Some(71)) => Self::SetUnits(Units::Tenths),
		('G',Some(91)) => Self::SetUnits(Units::Hundredths),
		('H',v) => Self::SetFileNumber(v),
		('N',v) => Self::SetPatternNumber(v),
		('O',_) | ('M',Some(26)) => Self::ResumeNormalSpeed,
		('R',_) | ('M',Some(43)) | ('M',Some(44)) => Self::Drill,
		('E',_) | ('M',Some(68)) => Self::Unsupported(Feature::FlickNotch),
		('M',Some(70)) => Self::GoToOrigin,
		('M',Some(30)) => Self::Unsupported(Feature::Rewind),
		('M',Some(69)) => Self::Unsupported(Feature::ConveyorBite),
		('/',_) => Self::Unsupported(Feature::BlockDelete),
		_ => Self::Unrecognized
	    }
	}
    }
}

/// What the driving loop should do after a token.
#[derive(Debug,Clone,Copy,PartialEq,Eq)]
pub enum Flow {
    Continue,
    Halt
}

#[derive(Debug,Default)]
struct State {
    units:Units,
    origin:Point,
    location:Point,
    path:Vec<Point>,
    tool:Tool,
    tool_is_down:bool,
    pattern_number:Option<i32>,
    file_number:Option<i32>
}

/// Tool state machine turning tokens into paths and drill marks.
pub struct Gerber<P:Plotter> {
    plotter:P,
    offsets:Offsets,
    state:State
}

impl<P:Plotter> Gerber<P> {
    pub fn new(plotter:P,units:Units,offsets:Offsets)->Self {
	Self {
	    plotter,
	    offsets,
	    state:State { units,..State::default() }
	}
    }

    pub fn plotter(&self)->&P {
	&self.plotter
    }

    /// Hand back the plotter, dropping any path still open.
    pub fn into_plotter(self)->P {
	if !self.state.path.is_empty() {
	    warn!("Discarding {} point {} path left open at end of data",
		  self.state.path.len(),
		  self.state.tool);
	}
	self.plotter
    }

    pub fn location(&self)->Point {
	self.state.location
    }

    pub fn units(&self)->Units {
	self.state.units
    }

    pub fn tool(&self)->Tool {
	self.state.tool
    }

    pub fn file_number(&self)->Option<i32> {
	self.state.file_number
    }

    pub fn pattern_number(&self)->Option<i32> {
	self.state.pattern_number
    }

    fn tool_down(&mut self,tool:Tool) {
	debug!("Tool {} down.",tool);
	let st = &mut self.state;
	st.tool = tool;
	st.path.push(st.location);
	st.tool_is_down = true;
    }

    fn tool_up(&mut self)->Res<()> {
	debug!("Tool up.");
	let path = std::mem::take(&mut self.state.path);
	if !path.is_empty() {
	    let tool = self.state.tool;
	    let offset = self.offsets.of(tool);
	    let path : Vec<Point> = path.into_iter().map(|p| p + offset).collect();
	    self.plotter.plot_path(tool,&path)?;
	}
	self.state.tool = Tool::None;
	self.state.tool_is_down = false;
	Ok(())
    }

    fn drill(&mut self)->Res<()> {
	let n = self.state.path.len();
	if n > 0 {
	    return Err(GerberError::PathOpenAtDrill(n).into());
	}
	let location = self.state.location + self.offsets.of(Tool::Drill);
	debug!("Drill at {}",location);
	self.plotter.plot_drill(location)
    }

    fn move_to(&mut self,x:i32,y:i32) {
	let st = &mut self.state;
	st.location = Point::from_xy(x,y,st.units);
	debug!("Move to {}",st.location);
	if st.tool_is_down {
	    st.path.push(st.location);
	}
    }

    fn go_to_origin(&mut self) {
	let st = &mut self.state;
	st.location = st.origin;
	debug!("Back to origin {}",st.origin);
	if st.tool_is_down {
	    st.path.push(st.location);
	}
    }

    /// Process one token.
    pub fn command(&mut self,tok:Token)->Res<Flow> {
	match Command::from(tok) {
	    Command::Move { x,y } => self.move_to(x,y),
	    Command::Stop => {
		debug!("Stop.");
		return Ok(Flow::Halt);
	    },
	    Command::ToolUp => self.tool_up()?,
	    Command::ToolDown(tool) => self.tool_down(tool),
	    Command::Drill => self.drill()?,
	    Command::SetOrigin => {
		self.state.origin = self.state.location;
		debug!("Origin set to {}",self.state.origin);
	    },
	    Command::GoToOrigin => self.go_to_origin(),
	    Command::SetUnits(units) => {
		debug!("Units: {}",units);
		self.state.units = units;
	    },
	    Command::SetFileNumber(n) => {
		debug!("File number {:?}",n);
		self.state.file_number = n;
	    },
	    Command::SetPatternNumber(n) => {
		debug!("Pattern number {:?}",n);
		self.state.pattern_number = n;
	    },
	    Command::ResumeNormalSpeed => debug!("Resume normal speed."),
	    Command::Unsupported(feature) =>
		return Err(GerberError::Unsupported(feature).into()),
	    Command::Unrecognized => info!("Didn't process command {}.",tok)
	}
	Ok(Flow::Continue)
    }

    /// Feed tokens until a stop code or the end of the stream.
    pub fn run<I:Iterator<Item=Token>>(&mut self,tokens:I)->Res<Flow> {
	for tok in tokens {
	    if self.command(tok)? == Flow::Halt {
		return Ok(Flow::Halt);
	    }
	}
	Ok(Flow::Continue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gerber::Tokenizer;
    use crate::igor::Igor;

    #[derive(Default)]
    struct Recorder {
	paths:Vec<(Tool,Vec<Point>)>,
	drills:Vec<Point>
    }

    impl Plotter for Recorder {
	fn plot_path(&mut self,tool:Tool,path:&[Point])->Res<()> {
	    self.paths.push((tool,path.to_vec()));
	    Ok(())
	}

	fn plot_drill(&mut self,location:Point)->Res<()> {
	    self.drills.push(location);
	    Ok(())
	}
    }

    fn gerber()->Gerber<Recorder> {
	Gerber::new(Recorder::default(),Units::Hundredths,Offsets::default())
    }

    fn run(g:&mut Gerber<Recorder>,u:&str)->Res<Flow> {
	g.run(Tokenizer::new(u)?)
    }

    fn gerber_error(e:&Box<dyn Error>)->&GerberError {
	e.downcast_ref::<GerberError>().unwrap()
    }

    #[test]
    fn decode_table() {
	let c = |code,value| Command::from(Token::command(code,value));
	assert_eq!(c('M',Some(0)),Command::Stop);
	assert_eq!(c('A',None),Command::ToolUp);
	assert_eq!(c('D',Some(2)),Command::ToolUp);
	assert_eq!(c('M',Some(15)),Command::ToolUp);
	assert_eq!(c('B',None),Command::ToolDown(Tool::Cut));
	assert_eq!(c('M',Some(14)),Command::ToolDown(Tool::Cut));
	assert_eq!(c('D',Some(1)),Command::ToolDown(Tool::Mark));
	assert_eq!(c('G',Some(4)),Command::SetOrigin);
	assert_eq!(c('M',Some(70)),Command::GoToOrigin);
	assert_eq!(c('G',Some(70)),Command::SetUnits(Units::Thousandths));
	assert_eq!(c('G',Some(71)),Command::SetUnits(Units::Tenths));
	assert_eq!(c('G',Some(91)),Command::SetUnits(Units::Hundredths));
	assert_eq!(c('H',Some(3)),Command::SetFileNumber(Some(3)));
	assert_eq!(c('N',None),Command::SetPatternNumber(None));
	assert_eq!(c('O',None),Command::ResumeNormalSpeed);
	assert_eq!(c('M',Some(26)),Command::ResumeNormalSpeed);
	assert_eq!(c('R',None),Command::Drill);
	assert_eq!(c('M',Some(43)),Command::Drill);
	assert_eq!(c('M',Some(44)),Command::Drill);
	assert_eq!(c('E',None),Command::Unsupported(Feature::FlickNotch));
	assert_eq!(c('M',Some(68)),Command::Unsupported(Feature::FlickNotch));
	assert_eq!(c('M',Some(30)),Command::Unsupported(Feature::Rewind));
	assert_eq!(c('M',Some(69)),Command::Unsupported(Feature::ConveyorBite));
	assert_eq!(c('/',None),Command::Unsupported(Feature::BlockDelete));
	assert_eq!(c('D',None),Command::Unrecognized);
	assert_eq!(c('M',None),Command::Unrecognized);
	assert_eq!(c('G',Some(1)),Command::Unrecognized);
	assert_eq!(c('Z',None),Command::Unrecognized);
	assert_eq!(Command::from(Token::coordinate(1,-2)),Command::Move { x:1,y:-2 });
    }

    #[test]
    fn mark_path() {
	let mut g = gerber();
	run(&mut g,"X100Y100 D1 X200Y100 X200Y300 D2").unwrap();
	let rec = g.into_plotter();
	assert_eq!(rec.paths,
		   vec![(Tool::Mark,vec![Point::new(1.0,1.0),
					 Point::new(2.0,1.0),
					 Point::new(2.0,3.0)])]);
	assert!(rec.drills.is_empty());
    }

    #[test]
    fn path_starts_at_current_location() {
	let mut g = gerber();
	run(&mut g,"D1 X100Y100 X200Y100 D2").unwrap();
	let rec = g.into_plotter();
	assert_eq!(rec.paths[0].1,
		   vec![Point::new(0.0,0.0),Point::new(1.0,1.0),Point::new(2.0,1.0)]);
    }

    #[test]
    fn tool_up_resets_tool() {
	let mut g = gerber();
	run(&mut g,"B X100Y0").unwrap();
	assert_eq!(g.tool(),Tool::Cut);
	run(&mut g,"A X300Y0 D2").unwrap();
	assert_eq!(g.tool(),Tool::None);
	assert_eq!(g.location(),Point::new(3.0,0.0));
	let rec = g.into_plotter();
	assert_eq!(rec.paths.len(),1);
	assert_eq!(rec.paths[0].0,Tool::Cut);
	assert_eq!(rec.paths[0].1.len(),2);
    }

    #[test]
    fn tool_up_without_path_plots_nothing() {
	let mut g = gerber();
	run(&mut g,"X100Y100 D2 A M15 X5Y5").unwrap();
	let rec = g.into_plotter();
	assert!(rec.paths.is_empty());
	assert!(rec.drills.is_empty());
    }

    #[test]
    fn units_change_not_retroactive() {
	let mut g = gerber();
	run(&mut g,"X100Y100 D1 G70 X100Y100 G71 X100Y100 D2").unwrap();
	assert_eq!(g.units(),Units::Tenths);
	let rec = g.into_plotter();
	assert_eq!(rec.paths[0].1,
		   vec![Point::new(1.0,1.0),
			Point::from_xy(100,100,Units::Thousandths),
			Point::from_xy(100,100,Units::Tenths)]);
    }

    #[test]
    fn offsets_applied_at_flush() {
	let offsets = Offsets {
	    mark:Point::new(0.5,-0.25),
	    cut:Point::new(10.0,10.0),
	    drill:Point::new(-1.0,2.0)
	};
	let mut g = Gerber::new(Recorder::default(),Units::Hundredths,offsets);
	run(&mut g,"X100Y200 D1 X300Y400 D2 B X0Y0 A X50Y50 R").unwrap();
	let rec = g.into_plotter();
	assert_eq!(rec.paths[0],
		   (Tool::Mark,vec![Point::new(1.5,1.75),Point::new(3.5,3.75)]));
	assert_eq!(rec.paths[1],
		   (Tool::Cut,vec![Point::new(13.0,14.0),Point::new(10.0,10.0)]));
	assert_eq!(rec.drills,vec![Point::new(-0.5,2.5)]);
    }

    #[test]
    fn origin() {
	let mut g = gerber();
	run(&mut g,"X100Y100 G4 X300Y300 D1 X400Y300 M70 D2").unwrap();
	assert_eq!(g.location(),Point::new(1.0,1.0));
	let rec = g.into_plotter();
	assert_eq!(rec.paths[0].1,
		   vec![Point::new(3.0,3.0),Point::new(4.0,3.0),Point::new(1.0,1.0)]);
    }

    #[test]
    fn origin_defaults_to_zero() {
	let mut g = gerber();
	run(&mut g,"X100Y100 M70").unwrap();
	assert_eq!(g.location(),Point::new(0.0,0.0));
    }

    #[test]
    fn drill_marks() {
	let mut g = gerber();
	run(&mut g,"X50Y50 R X100Y0 M43 M44").unwrap();
	let rec = g.into_plotter();
	assert_eq!(rec.drills,
		   vec![Point::new(0.5,0.5),Point::new(1.0,0.0),Point::new(1.0,0.0)]);
	assert!(rec.paths.is_empty());
    }

    #[test]
    fn drill_with_open_path_fails() {
	let mut g = gerber();
	let e = run(&mut g,"X50Y50 D1 R").unwrap_err();
	assert!(matches!(gerber_error(&e),GerberError::PathOpenAtDrill(1)));
	let rec = g.into_plotter();
	assert!(rec.drills.is_empty());
	assert!(rec.paths.is_empty());
    }

    #[test]
    fn unsupported_features_fail() {
	for (u,feature) in [("E",Feature::FlickNotch),
			    ("M68",Feature::FlickNotch),
			    ("M30",Feature::Rewind),
			    ("M69",Feature::ConveyorBite),
			    ("/",Feature::BlockDelete)] {
	    let mut g = gerber();
	    let e = run(&mut g,u).unwrap_err();
	    match gerber_error(&e) {
		GerberError::Unsupported(f) => assert_eq!(*f,feature),
		other => panic!("unexpected error {}",other)
	    }
	}
    }

    #[test]
    fn stop_halts() {
	let mut g = gerber();
	let flow = run(&mut g,"X100Y100 D1 X200Y100 D2 M0 D1 X0Y0 D2").unwrap();
	assert_eq!(flow,Flow::Halt);
	assert_eq!(g.location(),Point::new(2.0,1.0));
	assert_eq!(g.plotter().paths.len(),1);
	assert_eq!(run(&mut g,"X1Y1").unwrap(),Flow::Continue);
    }

    #[test]
    fn diagnostics_have_no_geometry() {
	let mut g = gerber();
	run(&mut g,"X100Y100 H7 N12 O M26 Z G1 D X1Y1").unwrap();
	assert_eq!(g.file_number(),Some(7));
	assert_eq!(g.pattern_number(),Some(12));
	assert_eq!(g.location(),Point::new(0.01,0.01));
	let rec = g.into_plotter();
	assert!(rec.paths.is_empty());
	assert!(rec.drills.is_empty());
    }

    #[test]
    fn open_path_discarded_at_end() {
	let mut g = gerber();
	assert_eq!(run(&mut g,"D1 X100Y100").unwrap(),Flow::Continue);
	assert!(g.into_plotter().paths.is_empty());
    }

    #[test]
    fn to_igor() {
	let igor = Igor::new(Vec::new()).unwrap();
	let mut g = Gerber::new(igor,Units::Hundredths,Offsets::default());
	g.run(Tokenizer::new("X100Y100 D1 X200Y100 D2 X50Y50 R M0").unwrap()).unwrap();
	let igor = g.into_plotter();
	assert_eq!(igor.wave_count(),2);
	let u = String::from_utf8(igor.finish().unwrap()).unwrap();
	assert!(u.contains("WAVES/O/N=(2,2) wave1\nBEGIN\n\t1\t1\n\t2\t1\nEND\n"));
	assert!(u.contains("WAVES/O/N=(25,2) wave2\n"));
	assert!(u.contains("X SetAxis/W=GerberPlot bottom 0.975,2.025\n"));
    }
}
