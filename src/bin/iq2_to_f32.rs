extern crate ca_acquire;

use std::io::{self, BufWriter};
use std::process;

use log::{error, info};

use ca_acquire::io::SampleFormat;
use ca_acquire::io::convert;

// Reads packed 2-bit sign/magnitude I/Q from stdin, four values per byte, and writes native-endian f32 I/Q to stdout
fn main() {
	env_logger::init();

	let stdin = io::stdin();
	let stdout = io::stdout();
	let mut src = stdin.lock();
	let mut dst = BufWriter::new(stdout.lock());

	match convert::convert_stream(&mut src, &mut dst, SampleFormat::Iq2) {
		Ok(n) => info!("Wrote {} values", n),
		Err(e) => {
			error!("{}", e);
			process::exit(1);
		}
	}
}
