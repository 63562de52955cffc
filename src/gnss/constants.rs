
pub mod gps {

	pub const CODE_LENGTH:usize = 1023;
	pub const CHIP_RATE_HZ:f64 = 1.023e6;

	pub const MAX_SV:usize = 32;

}
