extern crate ca_acquire;
extern crate clap;
extern crate colored;

use std::fs::File;
use std::io::{self as std_io, BufReader, Read};
use std::process;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use clap::{Arg, App, ArgMatches};
use colored::*;
use log::{error, info};

use ca_acquire::DigSigProcErr;
use ca_acquire::io::{SampleFormat, SampleReader};
use ca_acquire::gnss::acquisition::{self, AcquisitionParams, AcquisitionReport};
use ca_acquire::gnss::acquisition::correlator;

// Reports above this are printed in green
const SNR_DB_HIGHLIGHT:f32 = 15.0;

fn main() {
	env_logger::init();

	let matches = App::new("GPS L1 CA Acquisition")
		.version("0.1.0")
		.author("John Stanford (johnwstanford@gmail.com)")
		.about("Takes IQ samples near 1575.42 MHz and reports the best Doppler, code phase and S/N for each PRN every 20 [ms]")
		.arg(Arg::with_name("sample_rate_sps")
			.short("s").long("sample_rate_sps")
			.takes_value(true).required(true))
		.arg(Arg::with_name("carrier_offset_hz")
			.short("c").long("carrier_offset_hz")
			.help("Intermediate frequency the Doppler search is centered on")
			.takes_value(true))
		.arg(Arg::with_name("prn")
			.short("p").long("prn")
			.help("PRN to search for; 0 searches all 32")
			.takes_value(true))
		.arg(Arg::with_name("filename")
			.short("f").long("filename")
			.help("Input filename; reads stdin if omitted")
			.takes_value(true))
		.arg(Arg::with_name("input_type")
			.short("t").long("type")
			.takes_value(true)
			.possible_values(&["f32", "i8", "iq2"]))
		.arg(Arg::with_name("decimate")
			.short("d").long("decimate")
			.help("Only correlate every Nth training window")
			.takes_value(true))
		.arg(Arg::with_name("max_iterations")
			.short("m").long("max_iterations")
			.takes_value(true))
		.arg(Arg::with_name("json")
			.long("json")
			.help("Print one JSON object per report"))
		.get_matches();

	if let Err(e) = run(&matches) {
		error!("{}", e);
		eprintln!("{}", format!("Error: {}", e).red());
		process::exit(1);
	}
}

fn parse_params(matches:&ArgMatches) -> Result<AcquisitionParams, DigSigProcErr> {
	let sample_rate_sps:u32 = matches.value_of("sample_rate_sps").unwrap_or("").parse()
		.map_err(|_| DigSigProcErr::InvalidConfig("sample rate must be a whole number of samples/sec"))?;
	let carrier_offset_hz:f64 = matches.value_of("carrier_offset_hz").unwrap_or("0").parse()
		.map_err(|_| DigSigProcErr::InvalidConfig("carrier offset must be a number of Hz"))?;
	let target_sv:usize = matches.value_of("prn").unwrap_or("0").parse()
		.map_err(|_| DigSigProcErr::InvalidConfig("PRN must be a whole number"))?;

	let mut params = AcquisitionParams::new(sample_rate_sps, carrier_offset_hz, target_sv);
	params.decimate = matches.value_of("decimate").unwrap_or("1").parse()
		.map_err(|_| DigSigProcErr::InvalidConfig("decimation factor must be a whole number"))?;
	params.max_iterations = match matches.value_of("max_iterations") {
		Some(s) => Some(s.parse().map_err(|_| DigSigProcErr::InvalidConfig("max iterations must be a whole number"))?),
		None => None,
	};

	Ok(params)
}

fn print_report(report:&AcquisitionReport, json:bool) {
	if json {
		match serde_json::to_string(report) {
			Ok(s) => println!("{}", s),
			Err(e) => error!("Unable to serialize report for PRN {}: {}", report.prn, e),
		}
	} else if report.snr_db > SNR_DB_HIGHLIGHT {
		println!("{}", format!("{}", report).green());
	} else {
		println!("{}", report);
	}
}

fn run(matches:&ArgMatches) -> Result<(), DigSigProcErr> {
	let params = parse_params(matches)?;
	let format:SampleFormat = matches.value_of("input_type").unwrap_or("f32").parse()?;
	let json:bool = matches.is_present("json");

	// Bad parameters are caught here, before the stream is touched
	let mut correlator = correlator::make_correlator(&params)?;

	info!("Searching {} PRN(s) at {} [samples/sec], carrier offset {} [Hz], {} samples per window, {} Doppler bins of {} [Hz]",
		correlator.scan_set().iter().count(), params.sample_rate_sps, params.carrier_offset_hz,
		correlator.training_len(), 2 * params.max_shift() / correlator.shift_inc + 1, params.bin_width_hz());

	let src:Box<dyn Read> = match matches.value_of("filename") {
		Some(fname) => {
			info!("Decoding {} as {:?}", fname, format);
			Box::new(BufReader::new(File::open(fname)?))
		},
		None => {
			info!("Decoding stdin as {:?}", format);
			Box::new(std_io::stdin())
		}
	};
	let mut reader = SampleReader::new(src, format);

	let running = Arc::new(AtomicBool::new(true));
	let r = running.clone();
	ctrlc::set_handler(move || {
		r.store(false, Ordering::SeqCst);
	}).map_err(|e| DigSigProcErr::Io(e.to_string()))?;

	acquisition::run_acquisition(&mut correlator, &mut reader, &running, params.decimate, params.max_iterations, |_, reports| {
		for report in reports {
			print_report(report, json);
		}
	})?;

	Ok(())
}
