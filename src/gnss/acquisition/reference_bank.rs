
use std::collections::BTreeMap;

use rustfft::{FFT, FFTplanner, Length};
use num_complex::Complex;
use num_traits::Zero;

use crate::DigSigProcErr;
use crate::gnss::gps_l1_ca::signal_modulation;
use super::ScanSet;

/// Spectrum of one code period sampled at `fs`, `len/2 + 1` bins long (the rest follow from
/// Hermitian symmetry).  Time-domain chips are scaled by `1/len^1.5` so that after the forward
/// and inverse transforms the correlation power doesn't grow with `len`.
pub fn ca_code_spectrum(fft:&dyn FFT<f32>, prn:usize, fs:f64, len:usize) -> Result<Vec<Complex<f32>>, DigSigProcErr> {
	if fft.len() != len {
		return Err(DigSigProcErr::InvalidConfig("FFT length must match the code length"));
	}

	let normalize_dft:f64 = (len as f64).powf(1.5);

	let mut local_code_time_domain:Vec<Complex<f32>> = signal_modulation::prn_int_sampled(prn, fs, len)?
		.into_iter().map(|b| Complex{ re: (b as f64 / normalize_dft) as f32, im: 0.0 }).collect();
	let mut local_code_freq_domain:Vec<Complex<f32>> = vec![Complex::zero(); len];
	fft.process(&mut local_code_time_domain, &mut local_code_freq_domain);

	local_code_freq_domain.truncate(len / 2 + 1);
	Ok(local_code_freq_domain)
}

pub fn build_spectrum(prn:usize, fs:f64, len:usize) -> Result<Vec<Complex<f32>>, DigSigProcErr> {
	let mut planner = FFTplanner::new(false);
	let fft = planner.plan_fft(len);
	ca_code_spectrum(&*fft, prn, fs, len)
}

/// Code spectra for exactly the satellites in the scan set, built once and only read afterwards
#[derive(Debug)]
pub struct ReferenceBank {
	spectra:BTreeMap<usize, Vec<Complex<f32>>>,
}

impl ReferenceBank {

	pub fn build(scan_set:&ScanSet, fs:f64, code_len:usize) -> Result<Self, DigSigProcErr> {
		let mut planner = FFTplanner::new(false);
		let fft = planner.plan_fft(code_len);

		let mut spectra:BTreeMap<usize, Vec<Complex<f32>>> = BTreeMap::new();
		for prn in scan_set.iter() {
			spectra.insert(prn, ca_code_spectrum(&*fft, prn, fs, code_len)?);
		}

		Ok(Self { spectra })
	}

	pub fn get(&self, prn:usize) -> Option<&[Complex<f32>]> { self.spectra.get(&prn).map(|v| v.as_slice()) }

	pub fn prns(&self) -> impl Iterator<Item = usize> + '_ { self.spectra.keys().copied() }

}
