
use crate::DigSigProcErr;
use crate::gnss::constants::gps;

// G2 phase selector taps (1-based register stages) for PRN 1..=32
const G2_TAPS:[(usize, usize); gps::MAX_SV] = [
	(2, 6),  (3, 7),  (4, 8),  (5, 9),  (1, 9),  (2, 10), (1, 8),  (2, 9),
	(3, 10), (2, 3),  (3, 4),  (5, 6),  (6, 7),  (7, 8),  (8, 9),  (9, 10),
	(1, 4),  (2, 5),  (3, 6),  (4, 7),  (5, 8),  (6, 9),  (1, 3),  (4, 6),
	(5, 7),  (6, 8),  (7, 9),  (8, 10), (1, 6),  (2, 7),  (3, 8),  (4, 9),
];

/// One period of the C/A Gold code for the given PRN.  G1 is x^10 + x^3 + 1 and G2 is
/// x^10 + x^9 + x^8 + x^6 + x^3 + x^2 + 1, both starting from all ones.
pub fn ca_code(prn:usize) -> Result<[bool; gps::CODE_LENGTH], DigSigProcErr> {
	let (tap_a, tap_b) = *G2_TAPS.get(prn.wrapping_sub(1)).ok_or(DigSigProcErr::InvalidSatellite(prn))?;

	let mut g1:[bool; 10] = [true; 10];
	let mut g2:[bool; 10] = [true; 10];
	let mut code:[bool; gps::CODE_LENGTH] = [false; gps::CODE_LENGTH];

	for chip in code.iter_mut() {
		*chip = g1[9] ^ g2[tap_a-1] ^ g2[tap_b-1];

		let g1_feedback = g1[2] ^ g1[9];
		let g2_feedback = g2[1] ^ g2[2] ^ g2[5] ^ g2[7] ^ g2[8] ^ g2[9];
		g1.rotate_right(1);
		g2.rotate_right(1);
		g1[0] = g1_feedback;
		g2[0] = g2_feedback;
	}

	Ok(code)
}

pub fn prn_int(prn:usize) -> Result<Vec<i8>, DigSigProcErr> {
	Ok(ca_code(prn)?.iter().map(|b| if *b { 1 } else { -1 }).collect())
}

/// The code sampled at `fs`, `len` samples long, starting at chip zero.  Sample `i` takes
/// chip `floor(i / samples_per_chip)`, wrapping every code period.
pub fn prn_int_sampled(prn:usize, fs:f64, len:usize) -> Result<Vec<i8>, DigSigProcErr> {
	let code = ca_code(prn)?;
	let samples_per_chip:f64 = fs / gps::CHIP_RATE_HZ;

	Ok((0..len).map(|i| {
		let chip_idx:usize = ((i as f64 / samples_per_chip) as usize) % gps::CODE_LENGTH;
		if code[chip_idx] { 1 } else { -1 }
	}).collect())
}

#[cfg(test)]
mod tests {

	use super::*;

	fn first_ten_octal(prn:usize) -> u16 {
		ca_code(prn).unwrap().iter().take(10).fold(0u16, |acc, b| (acc << 1) | (*b as u16))
	}

	fn circular_correlation(a:&[i8], b:&[i8], lag:usize) -> i32 {
		(0..a.len()).map(|i| (a[i] as i32) * (b[(i + lag) % b.len()] as i32)).sum()
	}

	#[test]
	fn first_chips_match_published_octal() {
		assert_eq!(first_ten_octal(1),  0o1440);
		assert_eq!(first_ten_octal(2),  0o1620);
		assert_eq!(first_ten_octal(3),  0o1710);
		assert_eq!(first_ten_octal(4),  0o1744);
		assert_eq!(first_ten_octal(32), 0o1712);
	}

	#[test]
	fn every_code_has_512_ones() {
		for prn in 1..=gps::MAX_SV {
			let ones = ca_code(prn).unwrap().iter().filter(|b| **b).count();
			assert_eq!(ones, 512, "PRN {}", prn);
		}
	}

	#[test]
	fn gold_code_correlation_values() {
		let allowed = [-65, -1, 63];
		let prn1 = prn_int(1).unwrap();
		let prn7 = prn_int(7).unwrap();

		assert_eq!(circular_correlation(&prn1, &prn1, 0), gps::CODE_LENGTH as i32);
		for lag in 1..gps::CODE_LENGTH {
			assert!(allowed.contains(&circular_correlation(&prn1, &prn1, lag)));
		}
		for lag in 0..gps::CODE_LENGTH {
			assert!(allowed.contains(&circular_correlation(&prn1, &prn7, lag)));
		}
	}

	#[test]
	fn out_of_range_prn() {
		assert_eq!(ca_code(0).err(),  Some(DigSigProcErr::InvalidSatellite(0)));
		assert_eq!(ca_code(33).err(), Some(DigSigProcErr::InvalidSatellite(33)));
	}

	#[test]
	fn sampling_holds_each_chip() {
		let chips = prn_int(5).unwrap();

		// Exactly one sample per chip reproduces the code
		assert_eq!(prn_int_sampled(5, 1.023e6, gps::CODE_LENGTH).unwrap(), chips);

		// Two samples per chip repeats every chip and wraps after one period
		let doubled = prn_int_sampled(5, 2.046e6, 2*gps::CODE_LENGTH + 4).unwrap();
		for (i, x) in doubled.iter().enumerate() {
			assert_eq!(*x, chips[(i / 2) % gps::CODE_LENGTH]);
		}
	}

}
