/* -------------------------------------------------------- *\
 *                                                          *
 *  tsprov: declarative ThoughtSpot TML provider            *
 *                                                          *
 *  This file is licensed as MIT. See LICENSE for details.  *
 *                                                          *
\* ---------------------------------------------------------*/

use console::style;
use std::io::Write;
use tsprov_sdk::CliLogger;

pub(crate) fn init() -> anyhow::Result<()> {
    let logger = env_logger::Builder::from_env(env_logger::Env::default())
        .filter_module("tsprov", log::LevelFilter::Info)
        .filter_module("tsprov_core", log::LevelFilter::Info)
        .format(|buf, record| {
            let mut target = record.target().to_string();
            let is_resource = target.starts_with("tsprov_core::resources");

            if let Some(line_no) = record.line() {
                target.push(':');
                target.push_str(&line_no.to_string());
            }
            if record.level() <= log::Level::Info {
                match record.level() {
                    log::Level::Error => writeln!(buf, "{} {}", style("error:").red().bold(), record.args()),
                    log::Level::Warn => writeln!(buf, "{} {}", style("warning:").yellow().bold(), record.args()),
                    _ if is_resource => writeln!(buf, "[{}]: {}", style("thoughtspot").bold(), record.args()),
                    _ => writeln!(buf, "{}", record.args()),
                }
            } else {
                // Add prefix to DEBUG or TRACE logs
                writeln!(buf, "{} RS - {} - {}", record.level(), target, record.args())
            }
        })
        .build();

    CliLogger::new(logger).install()?;
    Ok(())
}
