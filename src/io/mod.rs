
use std::collections::VecDeque;
use std::io::Read;
use std::str::FromStr;

use byteorder::{ByteOrder, NativeEndian};
use num_traits::Zero;

use crate::{DigSigProcErr, Sample};

pub mod convert;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleFormat {
	/// Interleaved native-endian f32 I/Q
	F32,
	/// Interleaved signed 8-bit I/Q
	I8,
	/// Four 2-bit sign/magnitude values per byte, interleaved I/Q
	Iq2,
}

impl FromStr for SampleFormat {
	type Err = DigSigProcErr;

	fn from_str(s:&str) -> Result<Self, Self::Err> {
		match s {
			"f32" => Ok(Self::F32),
			"i8"  => Ok(Self::I8),
			"iq2" => Ok(Self::Iq2),
			_     => Err(DigSigProcErr::InvalidConfig("sample type must be one of f32, i8 or iq2")),
		}
	}
}

pub trait SampleSource {
	/// Fills as much of `buffer` as the source allows and returns the number of complex samples
	/// written.  Returning fewer than `buffer.len()` means the stream has ended.
	fn read_samples(&mut self, buffer:&mut [Sample]) -> Result<usize, DigSigProcErr>;
}

/// Reads a complete block or fails; there's no such thing as a partial training window
pub fn read_block<S: SampleSource + ?Sized>(src:&mut S, block:&mut [Sample]) -> Result<(), DigSigProcErr> {
	let received = src.read_samples(block)?;
	if received < block.len() {
		Err(DigSigProcErr::ShortRead{ requested: block.len(), received })
	} else {
		Ok(())
	}
}

pub struct SampleReader<R: Read> {
	src: R,
	format: SampleFormat,
	bytes: Vec<u8>,
	values: Vec<f32>,
	pending: VecDeque<f32>,
}

impl<R: Read> SampleReader<R> {

	pub fn new(src:R, format:SampleFormat) -> Self {
		Self { src, format, bytes: vec![], values: vec![], pending: VecDeque::new() }
	}

	// Keeps reading until `n_bytes` have arrived or the source reports end of stream
	fn fill(&mut self, n_bytes:usize) -> Result<usize, DigSigProcErr> {
		self.bytes.resize(n_bytes, 0);
		let mut total:usize = 0;
		while total < n_bytes {
			match self.src.read(&mut self.bytes[total..]) {
				Ok(0) => break,
				Ok(n) => total += n,
				Err(ref e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
				Err(e) => return Err(e.into()),
			}
		}
		self.bytes.truncate(total);
		Ok(total)
	}

}

impl<R: Read> SampleSource for SampleReader<R> {

	fn read_samples(&mut self, buffer:&mut [Sample]) -> Result<usize, DigSigProcErr> {
		let n_values:usize = 2 * buffer.len();

		self.values.clear();
		while self.values.len() < n_values {
			match self.pending.pop_front() {
				Some(x) => self.values.push(x),
				None => break,
			}
		}

		let needed:usize = n_values - self.values.len();
		let n_bytes:usize = match self.format {
			SampleFormat::F32 => 4 * needed,
			SampleFormat::I8  => needed,
			SampleFormat::Iq2 => (needed + 3) / 4,
		};

		if n_bytes > 0 {
			self.fill(n_bytes)?;
			match self.format {
				SampleFormat::F32 => self.values.extend(self.bytes.chunks_exact(4).map(NativeEndian::read_f32)),
				SampleFormat::I8  => self.values.extend(self.bytes.iter().map(|b| convert::i8_to_f32(*b as i8))),
				SampleFormat::Iq2 => for b in self.bytes.iter() {
					self.values.extend(convert::iq2_to_f32(*b).iter());
				},
			}
		}

		// Anything past the request (2-bit bytes carry four values) waits for the next call
		while self.values.len() > n_values {
			if let Some(x) = self.values.pop() { self.pending.push_front(x); }
		}

		let n_samples:usize = self.values.len() / 2;
		for (sample, iq) in buffer.iter_mut().zip(self.values.chunks_exact(2)) {
			*sample = Sample{ re: iq[0], im: iq[1] };
		}
		for sample in buffer.iter_mut().skip(n_samples) {
			*sample = Sample::zero();
		}

		Ok(n_samples)
	}

}

#[cfg(test)]
mod tests {

	use std::io::Cursor;

	use byteorder::WriteBytesExt;

	use super::*;

	fn f32_bytes(values:&[f32]) -> Vec<u8> {
		let mut bytes:Vec<u8> = vec![];
		for x in values { bytes.write_f32::<NativeEndian>(*x).unwrap(); }
		bytes
	}

	#[test]
	fn reads_interleaved_f32() {
		let bytes = f32_bytes(&[1.0, -1.0, 0.5, 0.25, -3.0, 2.0]);
		let mut reader = SampleReader::new(Cursor::new(bytes), SampleFormat::F32);

		let mut block = vec![Sample::zero(); 2];
		read_block(&mut reader, &mut block).unwrap();
		assert_eq!(block, vec![Sample{ re: 1.0, im: -1.0 }, Sample{ re: 0.5, im: 0.25 }]);

		// Only one sample is left
		assert_eq!(read_block(&mut reader, &mut block), Err(DigSigProcErr::ShortRead{ requested: 2, received: 1 }));
	}

	#[test]
	fn partial_trailing_float_is_dropped() {
		let mut bytes = f32_bytes(&[1.0, 2.0]);
		bytes.extend_from_slice(&[0, 0]);
		let mut reader = SampleReader::new(Cursor::new(bytes), SampleFormat::F32);

		let mut block = vec![Sample::zero(); 4];
		assert_eq!(reader.read_samples(&mut block).unwrap(), 1);
		assert_eq!(block[0], Sample{ re: 1.0, im: 2.0 });
	}

	#[test]
	fn reads_signed_bytes() {
		let bytes:Vec<u8> = vec![64, (-128i8) as u8, 0, 127];
		let mut reader = SampleReader::new(Cursor::new(bytes), SampleFormat::I8);

		let mut block = vec![Sample::zero(); 2];
		read_block(&mut reader, &mut block).unwrap();
		assert_eq!(block[0], Sample{ re: 0.5, im: -1.0 });
		assert_eq!(block[1], Sample{ re: 0.0, im: 127.0 / 128.0 });
	}

	#[test]
	fn two_bit_values_carry_over_between_reads() {
		let bytes:Vec<u8> = vec![0b0001_1011, 0b1010_0000];
		let mut reader = SampleReader::new(Cursor::new(bytes), SampleFormat::Iq2);

		// Three complex samples need one and a half bytes
		let mut block = vec![Sample::zero(); 3];
		read_block(&mut reader, &mut block).unwrap();
		assert_eq!(block[0], Sample{ re: 1.0 / 3.0, im: -1.0 / 3.0 });
		assert_eq!(block[1], Sample{ re: 1.0, im: -1.0 });
		assert_eq!(block[2], Sample{ re: 1.0, im: 1.0 });

		let mut last = vec![Sample::zero(); 1];
		read_block(&mut reader, &mut last).unwrap();
		assert_eq!(last[0], Sample{ re: 1.0 / 3.0, im: 1.0 / 3.0 });

		assert_eq!(reader.read_samples(&mut last).unwrap(), 0);
	}

	#[test]
	fn parses_format_names() {
		assert_eq!("iq2".parse::<SampleFormat>(), Ok(SampleFormat::Iq2));
		assert!("u16".parse::<SampleFormat>().is_err());
	}

}
