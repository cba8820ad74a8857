use std::io::Write;

use console::style;

use crate::cli::status::StatusOptions;
use crate::connectivity::{
    ConnectivityMonitor, ConnectivityResult, ConnectivitySignal, ProbeOptions,
};
use crate::io::{HttpRunner, Response};
use crate::time::Milliseconds;
use crate::Result;

pub fn execute<R: HttpRunner<Response = Response>, W: Write>(
    options: StatusOptions,
    default_timeout: Milliseconds,
    monitor: &ConnectivityMonitor<R>,
    mut writer: W,
) -> Result<()> {
    let environment = if monitor.is_online() {
        style("Online").green()
    } else {
        style("Offline").red()
    };
    writeln!(writer, "Environment: {environment}")?;
    if !options.ping {
        return Ok(());
    }
    let probe_options = ProbeOptions {
        ping: true,
        timeout: options.timeout.unwrap_or(default_timeout),
    };
    let result = monitor.probe(probe_options);
    writeln!(writer, "API: {}", styled(&result))?;
    Ok(())
}

fn styled(result: &ConnectivityResult) -> console::StyledObject<String> {
    if result.online {
        style(result.to_string()).green()
    } else {
        style(result.to_string()).red()
    }
}
