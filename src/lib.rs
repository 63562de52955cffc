
use std::fmt;

use num_complex::Complex;

pub mod gnss;
pub mod io;

pub type Sample = Complex<f32>;

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum DigSigProcErr {
	InvalidSatellite(usize),
	InvalidConfig(&'static str),
	MissingReference(usize),
	ShortRead { requested:usize, received:usize },
	Io(String),
}

impl fmt::Display for DigSigProcErr {

	fn fmt(&self, f:&mut fmt::Formatter) -> fmt::Result {
		match self {
			Self::InvalidSatellite(sv) => write!(f, "invalid sv {}, expected 0 (scan all) or 1..=32", sv),
			Self::InvalidConfig(msg)   => write!(f, "invalid configuration: {}", msg),
			Self::MissingReference(sv) => write!(f, "no reference spectrum was built for sv {}", sv),
			Self::ShortRead{ requested, received } =>
				write!(f, "couldn't read {} input samples needed for training (got {})", requested, received),
			Self::Io(msg)              => write!(f, "I/O error: {}", msg),
		}
	}

}

impl std::error::Error for DigSigProcErr {}

impl From<std::io::Error> for DigSigProcErr {
	fn from(e:std::io::Error) -> Self { Self::Io(e.to_string()) }
}
