
/// This module contains the coarse acquisition search: reference spectra, the Doppler/code-phase
/// correlator and the peak estimator that refines its output
pub mod acquisition;

pub mod constants;

pub mod gps_l1_ca;
