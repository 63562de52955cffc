
use crate::DigSigProcErr;
use crate::gnss::constants::gps;

/// The satellites searched for the whole life of the process, in ascending PRN order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanSet {
	prns: Vec<usize>,
}

impl ScanSet {

	/// Zero scans every PRN, 1..=32 scans just that one
	pub fn from_selector(target_sv:usize) -> Result<Self, DigSigProcErr> {
		match target_sv {
			0               => Ok(Self { prns: (1..=gps::MAX_SV).collect() }),
			1..=gps::MAX_SV => Ok(Self { prns: vec![target_sv] }),
			_               => Err(DigSigProcErr::InvalidSatellite(target_sv)),
		}
	}

	pub fn iter(&self) -> impl Iterator<Item = usize> + '_ { self.prns.iter().copied() }

}

#[cfg(test)]
mod tests {

	use super::*;

	#[test]
	fn selector_zero_scans_everything() {
		let all = ScanSet::from_selector(0).unwrap();
		assert_eq!(all.iter().count(), 32);
		assert_eq!(all.iter().collect::<Vec<usize>>(), (1..=32).collect::<Vec<usize>>());
	}

	#[test]
	fn single_target() {
		let one = ScanSet::from_selector(17).unwrap();
		assert_eq!(one.iter().collect::<Vec<usize>>(), vec![17]);
	}

	#[test]
	fn selector_past_32_is_rejected() {
		assert_eq!(ScanSet::from_selector(33), Err(DigSigProcErr::InvalidSatellite(33)));
	}

}
