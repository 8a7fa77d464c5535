use std::fs::File;
use std::path::Path;
use std::io::Read;
use log::warn;
use regex::{Regex,Captures};

use crate::common::*;
use crate::token::Token;

/// Lazy token stream over the text of a plotter command file.
///
/// Commands are a letter A-W, Z or `/` followed by an optional run of
/// digits; coordinates are `X<int>Y<int>`.  Anything between two matches is
/// skipped.
pub struct Tokenizer<'a> {
    rex:Regex,
    text:&'a str,
    offset:usize
}

impl<'a> Tokenizer<'a> {
    pub fn new(text:&'a str)->Res<Self> {
	let rex = Regex::new(
	    r"(?P<code>[A-WZ/])(?P<value>[0-9]*)|X(?P<x>-?[0-9]+)Y(?P<y>-?[0-9]+)")?;
	Ok(Self { rex,text,offset:0 })
    }

    /// Number of input bytes consumed so far.
    pub fn offset(&self)->usize {
	self.offset
    }

    pub fn total(&self)->usize {
	self.text.len()
    }

    fn token(caps:&Captures)->Option<Token> {
	if let (Some(x),Some(y)) = (caps.name("x"),caps.name("y")) {
	    match (x.as_str().parse(),y.as_str().parse()) {
		(Ok(x),Ok(y)) => Some(Token::coordinate(x,y)),
		_ => {
		    warn!("Coordinate {} out of range, skipped",&caps[0]);
		    None
		}
	    }
	} else {
	    let code = caps.name("code")?.as_str().chars().next()?;
	    match caps.name("value").map(|v| v.as_str()) {
		None | Some("") => Some(Token::command(code,None)),
		Some(v) => match v.parse() {
		    Ok(n) => Some(Token::command(code,Some(n))),
		    Err(_) => {
			warn!("Command {} out of range, skipped",&caps[0]);
			None
		    }
		}
	    }
	}
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Token;

    fn next(&mut self)->Option<Token> {
	loop {
	    let caps = self.rex.captures_at(self.text,self.offset)?;
	    self.offset = caps.get(0)?.end();
	    if let Some(tok) = Self::token(&caps) {
		return Some(tok);
	    }
	}
    }
}

pub fn read_file<P:AsRef<Path>>(path:P)->Res<String> {
    let mut fd = File::open(path)?;
    let mut u = String::new();
    fd.read_to_string(&mut u)?;
    Ok(u)
}
