use clap::Parser;

use crate::time::Milliseconds;

use super::common::parse_timeout;

#[derive(Parser)]
pub struct StatusCommand {
    /// Only report the environment flag, do not contact the API
    #[clap(long, conflicts_with = "timeout")]
    pub no_ping: bool,
    /// How long to wait for the API to answer, e.g. 3s. Defaults to the
    /// `probe_timeout` setting
    #[clap(long, value_parser = parse_timeout)]
    pub timeout: Option<Milliseconds>,
}

pub struct StatusOptions {
    pub ping: bool,
    pub timeout: Option<Milliseconds>,
}

impl From<StatusCommand> for StatusOptions {
    fn from(options: StatusCommand) -> Self {
        StatusOptions {
            ping: !options.no_ping,
            timeout: options.timeout,
        }
    }
}
