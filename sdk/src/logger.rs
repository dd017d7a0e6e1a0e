/* -------------------------------------------------------- *\
 *                                                          *
 *  tsprov: declarative ThoughtSpot TML provider            *
 *                                                          *
 *  This file is licensed as MIT. See LICENSE for details.  *
 *                                                          *
\* ---------------------------------------------------------*/


/// `CliLogger` wraps the `env_logger::Logger` built by the command line so every crate of the
/// workspace writes through the same formatter.
///
/// Resources never install a logger themselves; they only use the `log` macros. The binary
/// builds one `CliLogger` and calls [`CliLogger::install`] once at startup.
pub struct CliLogger(env_logger::Logger);

impl CliLogger {
	/// Constructs a new `CliLogger` from the given `env_logger::Logger`.
	pub fn new(logger: env_logger::Logger) -> Self {
		Self(logger)
	}

	/// Retrieves the current log level filter of the `CliLogger`.
	pub fn filter(&self) -> log::LevelFilter {
		self.0.filter()
	}

	/// Registers the logger as the global `log` backend and raises the max level to its filter.
	///
	/// ### Returns
	///
	/// An error if a global logger was already installed.
	pub fn install(self) -> Result<(), log::SetLoggerError> {
		let max_level = self.filter();
		log::set_boxed_logger(Box::new(self))?;
		log::set_max_level(max_level);
		Ok(())
	}
}

impl log::Log for CliLogger {
	fn enabled(&self, metadata: &log::Metadata) -> bool {
		self.0.enabled(metadata)
	}

	fn log(&self, record: &log::Record) {
		if self.enabled(record.metadata()) {
			self.0.log(record);
		}
	}

	fn flush(&self) {
		self.0.flush();
	}
}
