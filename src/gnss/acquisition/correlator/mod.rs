
use std::sync::Arc;

use log::trace;
use rustfft::{FFT, FFTplanner};
use num_complex::Complex;
use num_traits::Zero;

use crate::{DigSigProcErr, Sample};
use crate::gnss::constants::gps;
use super::{AcquisitionParams, AcquisitionReport, PeakTracker, ReferenceBank, ScanSet, SignalStrength, SHIFT_INC};


/// Parallel code phase search over a grid of Doppler bins, one training window at a time.
///
/// The training window spans `training_len / code_len` code periods, so its spectrum has that
/// many bins for every bin of a code-period spectrum.  Taking every such bin, offset by the
/// Doppler shift under test, folds the window onto a single code period; multiplying by the
/// reference spectrum and transforming back gives the circular correlation against the local
/// code for every code phase at once.
pub struct Correlator {
	pub code_len:usize,
	pub training_len:usize,
	pub bin_width_hz:f64,
	pub max_shift:i64,
	pub shift_inc:i64,
	pub carrier_bins:i64,
	scan_set:ScanSet,
	bank:ReferenceBank,
	fft:Arc<dyn FFT<f32>>,
	ifft:Arc<dyn FFT<f32>>,
	training_conj:Vec<Complex<f32>>,
	prod:Vec<Complex<f32>>,
	corr:Vec<Complex<f32>>,
}

pub fn make_correlator(params:&AcquisitionParams) -> Result<Correlator, DigSigProcErr> {
	let scan_set:ScanSet = params.validate()?;

	let code_len:usize = params.code_len();
	let training_len:usize = params.training_len();
	let bank = ReferenceBank::build(&scan_set, params.fs(), code_len)?;

	let mut planner = FFTplanner::new(false);
	let fft = planner.plan_fft(training_len);

	let mut inv_planner = FFTplanner::new(true);
	let ifft = inv_planner.plan_fft(code_len);

	Ok(Correlator { code_len, training_len,
		bin_width_hz: params.bin_width_hz(), max_shift: params.max_shift(), shift_inc: SHIFT_INC, carrier_bins: params.carrier_bins(),
		scan_set, bank, fft, ifft,
		training_conj: vec![Complex::zero(); training_len],
		prod: vec![Complex::zero(); code_len],
		corr: vec![Complex::zero(); code_len] })
}

impl Correlator {

	pub fn training_len(&self) -> usize { self.training_len }

	pub fn scan_set(&self) -> &ScanSet { &self.scan_set }

	/// Correlates one training window against every scanned satellite.  The block is used as
	/// scratch by the forward transform.
	pub fn process(&mut self, block:&mut [Sample]) -> Result<Vec<AcquisitionReport>, DigSigProcErr> {
		if block.len() < self.training_len {
			return Err(DigSigProcErr::ShortRead{ requested: self.training_len, received: block.len() });
		}
		if block.len() > self.training_len {
			return Err(DigSigProcErr::InvalidConfig("block is longer than one training window"));
		}

		self.fft.process(block, &mut self.training_conj);

		// The conjugate is shared by every satellite and Doppler bin
		for c in self.training_conj.iter_mut() {
			c.im = -c.im;
		}

		let prns:Vec<usize> = self.scan_set.iter().collect();
		let mut reports:Vec<AcquisitionReport> = Vec::with_capacity(prns.len());
		for prn in prns {
			let strength = self.sweep(prn)?;
			reports.push(AcquisitionReport::new(prn, &strength));
		}

		Ok(reports)
	}

	/// Doppler sweep for one satellite over the spectrum of the last processed window
	pub fn sweep(&mut self, prn:usize) -> Result<SignalStrength, DigSigProcErr> {
		let mut tracker = PeakTracker::new(self.bin_width_hz, self.shift_inc);

		let mut shift:i64 = -self.max_shift;
		while shift <= self.max_shift {
			let (snr, code_phase) = self.correlate(prn, shift)?;

			trace!("PRN {:02} {:10.2} [Hz]: best code phase {:9.4} [chips], S/N {:.4}",
				prn, (self.carrier_bins + shift) as f64 * self.bin_width_hz, code_phase, snr);

			tracker.apply(self.carrier_bins + shift, snr, code_phase);
			shift += self.shift_inc;
		}

		Ok(tracker.finish())
	}

	/// Peak-to-average correlation power and the code phase (chips) of the peak, for the Doppler
	/// bin `shift` bins away from the carrier offset
	pub fn correlate(&mut self, prn:usize, shift:i64) -> Result<(f32, f32), DigSigProcErr> {
		let code_freq_domain:&[Complex<f32>] = self.bank.get(prn).ok_or(DigSigProcErr::MissingReference(prn))?;

		let n:i64 = self.training_len as i64;
		let fold:i64 = (self.training_len / self.code_len) as i64;
		let offset:i64 = self.carrier_bins + shift + n;
		let training_idx = |k:usize| -> usize { (k as i64 * fold + offset).rem_euclid(n) as usize };

		// Only the first half of the reference is stored; the mirrored half of the product
		// takes the conjugate of the matching reference bin
		let len = self.code_len;
		for i in 0..(len / 2) {
			self.prod[i]           = self.training_conj[training_idx(i)] * code_freq_domain[i];
			self.prod[len - 1 - i] = self.training_conj[training_idx(len - 1 - i)] * code_freq_domain[i + 1].conj();
		}
		if len % 2 == 1 {
			self.prod[len / 2] = self.training_conj[training_idx(len / 2)] * code_freq_domain[len / 2];
		}

		self.ifft.process(&mut self.prod, &mut self.corr);

		let mut max_pwr:f32 = 0.0;
		let mut max_idx:usize = 0;
		let mut tot_pwr:f32 = 0.0;
		for (idx, c) in self.corr.iter().enumerate() {
			let pwr:f32 = c.norm_sqr();
			if pwr > max_pwr {
				max_pwr = pwr;
				max_idx = idx;
			}
			tot_pwr += pwr;
		}

		let snr:f32 = max_pwr / (tot_pwr / len as f32);
		let code_phase:f32 = (max_idx as f64 * (gps::CODE_LENGTH as f64 / len as f64)) as f32;

		Ok((snr, code_phase))
	}

}
