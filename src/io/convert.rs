
use std::io::{Read, Write};

use byteorder::{NativeEndian, WriteBytesExt};

use crate::DigSigProcErr;
use super::SampleFormat;

const CHUNK_BYTES:usize = 4096;

// (magnitude, sign) bit positions, most significant pair first
const IQ2_BIT_PAIRS:[(u32, u32); 4] = [(7, 6), (5, 4), (3, 2), (1, 0)];

pub fn i8_to_f32(x:i8) -> f32 { x as f32 / 128.0 }

/// Magnitude bit set means 1.0, otherwise 1/3; sign bit set negates
pub fn iq2_to_f32(byte:u8) -> [f32; 4] {
	let mut ans:[f32; 4] = [0.0; 4];
	for (value, (mag_bit, sign_bit)) in ans.iter_mut().zip(IQ2_BIT_PAIRS.iter()) {
		let magnitude:f32 = if (byte >> *mag_bit) & 1 == 1 { 1.0 } else { 1.0 / 3.0 };
		*value = if (byte >> *sign_bit) & 1 == 1 { -magnitude } else { magnitude };
	}
	ans
}

/// Rewrites a raw stream in `format` as native-endian f32 values and returns how many were written
pub fn convert_stream<R: Read, W: Write>(src:&mut R, dst:&mut W, format:SampleFormat) -> Result<usize, DigSigProcErr> {
	let mut chunk:[u8; CHUNK_BYTES] = [0; CHUNK_BYTES];
	let mut n_values:usize = 0;

	if format == SampleFormat::F32 {
		let n_bytes = std::io::copy(src, dst)?;
		return Ok((n_bytes / 4) as usize);
	}

	loop {
		let n = match src.read(&mut chunk) {
			Ok(0) => break,
			Ok(n) => n,
			Err(ref e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
			Err(e) => return Err(e.into()),
		};

		for b in chunk[..n].iter() {
			match format {
				SampleFormat::I8 => {
					dst.write_f32::<NativeEndian>(i8_to_f32(*b as i8))?;
					n_values += 1;
				},
				_ => for x in iq2_to_f32(*b).iter() {
					dst.write_f32::<NativeEndian>(*x)?;
					n_values += 1;
				},
			}
		}
	}

	dst.flush()?;
	Ok(n_values)
}
