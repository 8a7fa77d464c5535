use std::fs::File;
use std::path::Path;
use std::io::{Write,BufWriter};
use log::debug;

use crate::common::*;
use crate::point::{Point,Real};
use crate::tool::Tool;

/// Receiver of the geometry produced by the interpreter.
pub trait Plotter {
    fn plot_path(&mut self,tool:Tool,path:&[Point])->Res<()>;
    fn plot_drill(&mut self,location:Point)->Res<()>;
}

pub const GRAPH_NAME : &str = "GerberPlot";

const DRILL_RADIUS : Real = 0.5;
const DRILL_TICK : Real = 0.75;
const DRILL_CIRCLE_POINTS : usize = 20;

const FIRST_MARKER : u32 = 5;
const INNER_MARKER : u32 = 8;
const LAST_MARKER : u32 = 3;

/// Running bounding box of everything plotted.
#[derive(Debug,Clone,Copy,PartialEq)]
pub struct Bounds {
    pub min_x:Real,
    pub max_x:Real,
    pub min_y:Real,
    pub max_y:Real
}

impl Bounds {
    pub fn new()->Self {
	Self {
	    min_x:Real::INFINITY,
	    max_x:-Real::INFINITY,
	    min_y:Real::INFINITY,
	    max_y:-Real::INFINITY
	}
    }

    pub fn include(&mut self,p:Point) {
	self.min_x = self.min_x.min(p.x);
	self.max_x = self.max_x.max(p.x);
	self.min_y = self.min_y.min(p.y);
	self.max_y = self.max_y.max(p.y);
    }

    pub fn is_empty(&self)->bool {
	self.min_x > self.max_x || self.min_y > self.max_y
    }

    /// Axis ranges ((x0,x1),(y0,y1)) widened by a fortieth of the extent.
    pub fn padded(&self)->((Real,Real),(Real,Real)) {
	let dx = (self.max_x - self.min_x) / 40.0;
	let dy = (self.max_y - self.min_y) / 40.0;
	((self.min_x - dx,self.max_x + dx),
	 (self.min_y - dy,self.max_y + dy))
    }
}

/// Marker sizes along a path: large at the start, small at the end.
pub fn marker_sizes(n:usize)->Vec<u32> {
    let mut sizes = Vec::with_capacity(n);
    if n > 0 {
	sizes.push(FIRST_MARKER);
    }
    if n > 1 {
	sizes.extend(std::iter::repeat(INNER_MARKER).take(n - 2));
	sizes.push(LAST_MARKER);
    }
    sizes
}

/// Drill mark: horizontal tick, circle, break, vertical tick.
pub fn drill_shape(c:Point)->Vec<Point> {
    let mut pts = Vec::with_capacity(DRILL_CIRCLE_POINTS + 5);
    pts.push(Point::new(c.x - DRILL_TICK,c.y));
    pts.push(Point::new(c.x + DRILL_TICK,c.y));
    for i in 0..DRILL_CIRCLE_POINTS {
	let theta = 2.0 * std::f64::consts::PI * i as Real
	    / (DRILL_CIRCLE_POINTS - 1) as Real;
	pts.push(Point::new(c.x + DRILL_RADIUS * theta.cos(),
			    c.y + DRILL_RADIUS * theta.sin()));
    }
    pts.push(Point::MISSING);
    pts.push(Point::new(c.x,c.y - DRILL_TICK));
    pts.push(Point::new(c.x,c.y + DRILL_TICK));
    pts
}

/// Streaming writer of an Igor Pro text (`.itx`) script.
pub struct Igor<W:Write> {
    out:W,
    wave_count:usize,
    bounds:Bounds,
    graphed:bool,
    graph_starts:Vec<usize>
}

impl Igor<BufWriter<File>> {
    pub fn create<P:AsRef<Path>>(path:P)->Res<Self> {
	let fd = File::create(path)?;
	Self::new(BufWriter::new(fd))
    }
}

impl<W:Write> Igor<W> {
    pub fn new(out:W)->Res<Self> {
	let mut this = Self {
	    out,
	    wave_count:0,
	    bounds:Bounds::new(),
	    graphed:false,
	    graph_starts:vec![1]
	};
	this.preamble()?;
	Ok(this)
    }

    fn preamble(&mut self)->Res<()> {
	let f = &mut self.out;
	writeln!(f,"IGOR")?;
	writeln!(f,"X Display /W=(35,45,1797,1294) /N={}",GRAPH_NAME)?;
	writeln!(f,"WAVES/O/N=(5,3) plotColors")?;
	writeln!(f,"BEGIN")?;
	writeln!(f,"\t0\t65535\t0")?;
	writeln!(f,"\t65535\t0\t0")?;
	writeln!(f,"\t48545\t4000\t32768")?;
	writeln!(f,"\t24000\t24000\t65535")?;
	writeln!(f,"\t32768\t48545\t4000")?;
	writeln!(f,"END")?;
	writeln!(f,"WAVES/O/N=(4,4) markerColors")?;
	writeln!(f,"BEGIN")?;
	writeln!(f,"\t16385\t65535\t36045\t32768")?;
	writeln!(f,"\t65535\t16385\t36045\t32768")?;
	writeln!(f,"\t65535\t20000\t48535\t32768")?;
	// Notches carry no markers
	writeln!(f,"\t0\t0\t0\t65535")?;
	writeln!(f,"END")?;
	writeln!(f,"X Variable/G logWaveQuantity=10")?;
	Ok(())
    }

    pub fn wave_count(&self)->usize {
	self.wave_count
    }

    pub fn bounds(&self)->Bounds {
	self.bounds
    }

    /// Start a new graph: the next wave is the first one of graph N+1.
    pub fn begin_graph(&mut self) {
	self.graph_starts.push(self.wave_count + 1);
    }

    fn next_wave(&mut self)->usize {
	self.wave_count += 1;
	self.wave_count
    }

    fn write_points(&mut self,name:&str,pts:&[Point])->Res<()> {
	writeln!(self.out,"WAVES/O/N=({},2) {}",pts.len(),name)?;
	writeln!(self.out,"BEGIN")?;
	for p in pts {
	    writeln!(self.out,"\t{}\t{}",p.x,p.y)?;
	}
	writeln!(self.out,"END")?;
	Ok(())
    }

    fn write_column<I:Iterator<Item=u32>>(&mut self,name:&str,n:usize,values:I)->Res<()> {
	writeln!(self.out,"WAVES/O/N=({}) {}",n,name)?;
	writeln!(self.out,"BEGIN")?;
	for v in values {
	    writeln!(self.out,"\t{}",v)?;
	}
	writeln!(self.out,"END")?;
	Ok(())
    }

    fn attach_graph(&mut self,iw:usize,sized:bool)->Res<()> {
	self.graphed = true;
	let f = &mut self.out;
	writeln!(f,"X AppendToGraph/W={0} wave{1}[][1] vs wave{1}[][0]",GRAPH_NAME,iw)?;
	writeln!(f,"X ModifyGraph/W={} mode=4, marker=19, lsize=1",GRAPH_NAME)?;
	writeln!(f,"X ModifyGraph/W={} zColor(wave{})={{color{},0,4,ctableRGB,0,plotColors}}",
		 GRAPH_NAME,iw,iw)?;
	if sized {
	    writeln!(f,"X ModifyGraph/W={} zmrkSize(wave{})={{size{},0,8,1,8}}",
		     GRAPH_NAME,iw,iw)?;
	}
	writeln!(f,"X ModifyGraph/W={} width={{Plan,1,bottom,left}}",GRAPH_NAME)?;
	writeln!(f,"X Label/W={} bottom \"x (inches)\"",GRAPH_NAME)?;
	writeln!(f,"X Label/W={} left \"y (inches)\"",GRAPH_NAME)?;
	Ok(())
    }

    /// Start and end of the first path, shown on the graph.
    fn annotate_first_path(&mut self,start:Point,end:Point)->Res<()> {
	writeln!(self.out,"X Variable/G firstStartX={}, firstStartY={}",start.x,start.y)?;
	writeln!(self.out,"X Variable/G firstEndX={}, firstEndY={}",end.x,end.y)?;
	writeln!(self.out,
		 "X TextBox/W={}/C/N=firstPath/A=LT \"Start {} End {}\"",
		 GRAPH_NAME,start,end)?;
	Ok(())
    }

    pub fn finish(mut self)->Res<W> {
	if self.bounds.is_empty() {
	    debug!("Nothing plotted, no axis ranges written");
	    self.out.flush()?;
	    return Ok(self.out);
	}
	let ((x0,x1),(y0,y1)) = self.bounds.padded();
	let n_graphs = self.graph_starts.len();
	let starts = std::mem::take(&mut self.graph_starts);
	let f = &mut self.out;
	writeln!(f,"X SetAxis/W={} bottom {},{}",GRAPH_NAME,x0,x1)?;
	writeln!(f,"X SetAxis/W={} left {},{}",GRAPH_NAME,y0,y1)?;
	writeln!(f,"WAVES/O/N=({}) graphFirstWave",n_graphs)?;
	writeln!(f,"BEGIN")?;
	for s in &starts {
	    writeln!(f,"\t{}",s)?;
	}
	writeln!(f,"END")?;
	writeln!(f,"X Variable/G waveCount={}, graphCount={}, currentGraph=0, currentWave=1",
		 self.wave_count,n_graphs)?;
	writeln!(f,"X ControlBar/W={} 40",GRAPH_NAME)?;
	writeln!(f,"X Button prevGraph win={}, pos={{10,8}}, size={{80,24}}, title=\"Previous\", proc=GerberStepGraph",
		 GRAPH_NAME)?;
	writeln!(f,"X Button nextGraph win={}, pos={{100,8}}, size={{80,24}}, title=\"Next\", proc=GerberStepGraph",
		 GRAPH_NAME)?;
	writeln!(f,"X ValDisplay graphNumber win={}, pos={{200,12}}, size={{110,16}}, title=\"Graph\", value=#\"root:currentGraph\"",
		 GRAPH_NAME)?;
	writeln!(f,"X ValDisplay waveNumber win={}, pos={{320,12}}, size={{110,16}}, title=\"Wave\", value=#\"root:currentWave\"",
		 GRAPH_NAME)?;
	writeln!(f,"X ValDisplay waveTotal win={}, pos={{440,12}}, size={{110,16}}, title=\"Waves\", value=#\"root:waveCount\"",
		 GRAPH_NAME)?;
	writeln!(f,"X CheckBox showMarkers win={}, pos={{560,12}}, title=\"Markers\", value=1, proc=GerberToggleMarkers",
		 GRAPH_NAME)?;
	self.out.flush()?;
	Ok(self.out)
    }
}

impl<W:Write> Plotter for Igor<W> {
    fn plot_path(&mut self,tool:Tool,path:&[Point])->Res<()> {
	let (start,end) = match (path.first(),path.last()) {
	    (Some(&s),Some(&e)) => (s,e),
	    _ => return Err(error("Cannot plot an empty path"))
	};
	let iw = self.next_wave();
	debug!("Wave {}: {} path of {} points",iw,tool,path.len());
	let n = path.len();
	self.write_points(&format!("wave{}",iw),path)?;
	self.write_column(&format!("size{}",iw),n,marker_sizes(n).into_iter())?;
	self.write_column(&format!("color{}",iw),n,
			  std::iter::repeat(tool.color_index()).take(n))?;
	for &p in path {
	    self.bounds.include(p);
	}
	if !self.graphed {
	    self.attach_graph(iw,true)?;
	    self.annotate_first_path(start,end)?;
	}
	Ok(())
    }

    fn plot_drill(&mut self,location:Point)->Res<()> {
	let iw = self.next_wave();
	debug!("Wave {}: drill at {}",iw,location);
	let shape = drill_shape(location);
	let n = shape.len();
	self.write_points(&format!("wave{}",iw),&shape)?;
	self.write_column(&format!("color{}",iw),n,
			  std::iter::repeat(Tool::Drill.color_index()).take(n))?;
	if !self.graphed {
	    self.attach_graph(iw,false)?;
	}
	Ok(())
    }
}
