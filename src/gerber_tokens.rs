#![allow(dead_code)]

mod common;
mod token;
mod gerber;

use pico_args::Arguments;

use common::*;
use gerber::Tokenizer;

fn main()->Res<()> {
    let mut args = Arguments::from_env();
    let fn_in : String = args.value_from_str("--input")?;
    let u = gerber::read_file(&fn_in)?;
    println!("Read {} bytes",u.len());

    let mut n = 0;
    for tok in Tokenizer::new(&u)? {
	println!("{}",tok);
	n += 1;
    }
    println!("{} tokens",n);
    Ok(())
}
