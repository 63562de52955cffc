
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

use log::{debug, info};
use num_traits::Zero;
use serde::Serialize;

use crate::{DigSigProcErr, Sample};
use crate::io::{self, SampleSource};

pub mod correlator;
pub mod peak_tracker;
pub mod reference_bank;
pub mod scan_set;

pub use self::correlator::Correlator;
pub use self::peak_tracker::{PeakTracker, SignalStrength};
pub use self::reference_bank::ReferenceBank;
pub use self::scan_set::ScanSet;

/// Length of one coherent training window
pub const TRAINING_MS:u64 = 20;

/// Half-width of the Doppler search around the carrier offset
pub const DOPPLER_SEARCH_HZ:f64 = 10000.0;

/// Doppler bins advanced between correlations
pub const SHIFT_INC:i64 = 2;

#[derive(Debug, Clone, PartialEq)]
pub struct AcquisitionParams {
	pub sample_rate_sps:u32,
	pub carrier_offset_hz:f64,
	pub target_sv:usize,
	pub decimate:usize,
	pub max_iterations:Option<usize>,
}

impl AcquisitionParams {

	pub fn new(sample_rate_sps:u32, carrier_offset_hz:f64, target_sv:usize) -> Self {
		Self { sample_rate_sps, carrier_offset_hz, target_sv, decimate: 1, max_iterations: None }
	}

	pub fn validate(&self) -> Result<ScanSet, DigSigProcErr> {
		let scan_set = ScanSet::from_selector(self.target_sv)?;
		if self.sample_rate_sps < 1000 {
			return Err(DigSigProcErr::InvalidConfig("sample rate must be at least 1000 [samples/sec]"));
		}
		if self.decimate == 0 {
			return Err(DigSigProcErr::InvalidConfig("decimation factor must be at least 1"));
		}
		if self.carrier_offset_hz.is_nan() || self.carrier_offset_hz.abs() > self.fs() / 2.0 {
			return Err(DigSigProcErr::InvalidConfig("carrier offset must be within half the sample rate"));
		}
		Ok(scan_set)
	}

	pub fn fs(&self) -> f64 { self.sample_rate_sps as f64 }

	/// Samples in one code period
	pub fn code_len(&self) -> usize { (self.sample_rate_sps / 1000) as usize }

	pub fn training_len(&self) -> usize { (self.sample_rate_sps as u64 * TRAINING_MS / 1000) as usize }

	pub fn bin_width_hz(&self) -> f64 { self.fs() / self.training_len() as f64 }

	pub fn max_shift(&self) -> i64 { (DOPPLER_SEARCH_HZ * self.training_len() as f64 / self.fs()).round() as i64 }

	/// The carrier offset rounded to whole Doppler bins
	pub fn carrier_bins(&self) -> i64 { (self.carrier_offset_hz / self.bin_width_hz()).round() as i64 }

}

/// What gets reported for each scanned satellite after every processed training window
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AcquisitionReport {
	pub prn:usize,
	pub snr_db:f32,
	pub doppler_hz:f32,
	pub code_phase:f32,
}

impl AcquisitionReport {

	pub fn new(prn:usize, strength:&SignalStrength) -> Self {
		Self { prn, snr_db: 10.0 * strength.snr.log10(), doppler_hz: strength.doppler_hz, code_phase: strength.code_phase }
	}

	pub fn snr(&self) -> f32 { 10.0f32.powf(self.snr_db / 10.0) }

}

impl fmt::Display for AcquisitionReport {

	fn fmt(&self, f:&mut fmt::Formatter) -> fmt::Result {
		write!(f, "{:2}, {:4.4}, {:10.4}, {:7.4},", self.prn, self.snr_db, self.doppler_hz, self.code_phase)
	}

}

/// Reads training windows from `src` until `running` is cleared, the iteration limit is hit or
/// the source runs dry.  Every `decimate`-th window is correlated and its reports handed to
/// `sink`.  The stop flag is only looked at between windows.  Returns the number of windows
/// that were correlated.
pub fn run_acquisition<S, F>(correlator:&mut Correlator, src:&mut S, running:&AtomicBool, decimate:usize, max_iterations:Option<usize>, mut sink:F) -> Result<usize, DigSigProcErr>
	where S: SampleSource + ?Sized, F: FnMut(usize, &[AcquisitionReport])
{
	let decimate:usize = decimate.max(1);
	let mut block:Vec<Sample> = vec![Sample::zero(); correlator.training_len()];
	let mut window:usize = 0;
	let mut processed:usize = 0;

	while running.load(Ordering::SeqCst) {
		if let Some(max) = max_iterations {
			if processed >= max { break; }
		}

		io::read_block(src, &mut block)?;
		window += 1;

		if window % decimate != 0 {
			continue;
		}

		let reports = correlator.process(&mut block)?;
		for r in reports.iter() {
			debug!("window {} PRN {:02}: {:.2} [dB], {:.1} [Hz], {:.2} [chips]", window, r.prn, r.snr_db, r.doppler_hz, r.code_phase);
		}

		sink(window, &reports);
		processed += 1;
	}

	info!("Stopped after {} windows read, {} correlated", window, processed);
	Ok(processed)
}
