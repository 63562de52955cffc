
/// Best estimate so far for one satellite.  `snr` is a linear peak-to-average power ratio,
/// `code_phase` is in chips.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct SignalStrength {
	pub snr:f32,
	pub doppler_hz:f32,
	pub code_phase:f32,
}

/// Single-pass peak search over a Doppler sweep.  Every bin's score is held back one step so it
/// can be compared against both neighbours; a local maximum that beats the best so far replaces
/// it, with the Doppler refined by a three-point weighted average.
#[derive(Debug)]
pub struct PeakTracker {
	bin_width_hz:f64,
	step:i64,
	best:SignalStrength,
	snr_1:f32,
	snr_2:f32,
	phase_1:f32,
	last_bin:Option<i64>,
}

impl PeakTracker {

	pub fn new(bin_width_hz:f64, step:i64) -> Self {
		Self { bin_width_hz, step, best: SignalStrength::default(), snr_1: 0.0, snr_2: 0.0, phase_1: 0.0, last_bin: None }
	}

	/// `bin` is the absolute Doppler bin just evaluated, `step` bins after the previous one
	pub fn apply(&mut self, bin:i64, snr:f32, code_phase:f32) {
		self.update(bin - self.step, snr);

		self.snr_2 = self.snr_1;
		self.snr_1 = snr;
		self.phase_1 = code_phase;
		self.last_bin = Some(bin);
	}

	/// Closes the sweep with a virtual zero after the last bin, so a peak on the final bin
	/// still counts
	pub fn finish(mut self) -> SignalStrength {
		if let Some(bin) = self.last_bin {
			self.update(bin, 0.0);
		}
		self.best
	}

	// snr_1 is the candidate at `peak_bin`, snr_2 precedes it and snr_0 follows it
	fn update(&mut self, peak_bin:i64, snr_0:f32) {
		let is_local_peak:bool = self.snr_2 <= self.snr_1 && snr_0 <= self.snr_1;
		if !(is_local_peak && self.snr_1 > self.best.snr) {
			return;
		}

		let correction:f32 = (snr_0 - self.snr_2) / (self.snr_2 + self.snr_1 + snr_0);

		self.best = SignalStrength {
			snr: self.snr_1,
			doppler_hz: ((peak_bin as f32 + correction) as f64 * self.bin_width_hz) as f32,
			code_phase: self.phase_1,
		};
	}

}

#[cfg(test)]
mod tests {

	use super::*;

	fn sweep(snrs:&[f32]) -> SignalStrength {
		let mut tracker = PeakTracker::new(50.0, 2);
		for (idx, snr) in snrs.iter().enumerate() {
			let bin = 2 * idx as i64 - 10;
			tracker.apply(bin, *snr, idx as f32);
		}
		tracker.finish()
	}

	#[test]
	fn interior_peak_is_interpolated() {
		// Bins -10, -8, -6, -4, -2
		let best = sweep(&[1.0, 3.0, 7.0, 4.0, 2.0]);
		assert_eq!(best.snr, 7.0);
		assert_eq!(best.code_phase, 2.0);

		let expected:f64 = (-6.0 + 1.0 / 14.0) * 50.0;
		assert!((best.doppler_hz as f64 - expected).abs() < 1.0e-3);
	}

	#[test]
	fn peak_on_last_bin_is_caught_by_the_flush() {
		let best = sweep(&[1.0, 2.0, 5.0]);
		assert_eq!(best.snr, 5.0);
		assert_eq!(best.code_phase, 2.0);

		let expected:f64 = (-6.0 - 2.0 / 7.0) * 50.0;
		assert!((best.doppler_hz as f64 - expected).abs() < 1.0e-3);
	}

	#[test]
	fn peak_on_first_bin() {
		// The history starts at zero, so a falling sweep peaks on its first bin
		let best = sweep(&[9.0, 5.0, 3.0]);
		assert_eq!(best.snr, 9.0);
		assert_eq!(best.code_phase, 0.0);
	}

	#[test]
	fn equal_peaks_keep_the_first() {
		let best = sweep(&[1.0, 5.0, 1.0, 5.0, 1.0]);
		assert_eq!(best.snr, 5.0);
		assert_eq!(best.code_phase, 1.0);
	}

	#[test]
	fn plateau_promotes_only_its_first_point() {
		let best = sweep(&[3.0, 3.0, 3.0, 3.0]);
		assert_eq!(best.snr, 3.0);
		assert_eq!(best.code_phase, 0.0);
	}

	#[test]
	fn lower_later_peak_does_not_replace_best() {
		let best = sweep(&[1.0, 8.0, 2.0, 6.0, 1.0]);
		assert_eq!(best.snr, 8.0);
		assert_eq!(best.code_phase, 1.0);
	}

	#[test]
	fn best_never_decreases_during_a_sweep() {
		let snrs:[f32; 10] = [2.0, 4.0, 3.0, 9.0, 1.0, 12.0, 11.0, 2.0, 15.0, 0.5];
		let mut tracker = PeakTracker::new(50.0, 2);
		let mut last:f32 = 0.0;
		for (idx, snr) in snrs.iter().enumerate() {
			tracker.apply(2 * idx as i64, *snr, 0.0);
			assert!(tracker.best.snr >= last);
			last = tracker.best.snr;
		}
		assert_eq!(tracker.finish().snr, 15.0);
	}

	#[test]
	fn empty_or_all_zero_sweep_reports_nothing() {
		assert_eq!(sweep(&[]).snr, 0.0);
		assert_eq!(sweep(&[0.0, 0.0, 0.0]).snr, 0.0);
	}

}
