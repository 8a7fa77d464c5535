use log::info;

use crate::point::Real;

pub struct ProgressIndicator {
    total: usize,
    current: usize,
    last: usize,
    rate: Real,
    t_first: Real,
    t_prev: Real,
    t_last: Real,
    delta_t: Real,
    label: String
}

fn now()->Real {
    std::time::SystemTime::now()
	.duration_since(std::time::UNIX_EPOCH)
	.map(|dt| dt.as_secs_f64())
	.unwrap_or(0.0)
}

impl ProgressIndicator {
    pub fn new(lbl:&str,total:usize)->Self {
	let t = now();
        ProgressIndicator {
            total,
            current: 0,
            last: 0,
            rate: 0.0,
            t_first: t,
            t_prev: t,
            t_last: t,
            delta_t: 0.5,
            label: lbl.to_string()
        }
    }

    pub fn percent(&self)->Real {
	if self.total == 0 {
	    100.0
	} else {
	    100.0 * self.current as Real / self.total as Real
	}
    }

    pub fn update(&mut self,current:usize) {
        self.current = current;
        if current as Real >= self.last as Real + self.rate*self.delta_t {
            let t = now();
            if t > self.t_prev + self.delta_t {
                let new_rate = current.saturating_sub(self.last) as Real / (t - self.t_last);
                self.last = current;
                self.rate = (1.0 as Real).max((2.0*self.rate + new_rate)/3.0);
                self.t_last = t;
                self.t_prev = t;
                self.display();
            }
        }
    }

    pub fn display(&self) {
        let elp = self.t_last - self.t_first;
	let eta = if self.current > 0 {
	    self.total.saturating_sub(self.current) as Real
		/ (self.current as Real / elp.max(Real::EPSILON))
	} else {
	    0.0
	};
        info!("{:20} {:12} bytes {:6.2}% elp {:8.1} ETA {:8.1}",
              self.label, self.current, self.percent(), elp, eta);
    }
}
