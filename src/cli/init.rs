use clap::Parser;

#[derive(Parser)]
pub struct InitCommand {
    /// Base URL of the recipes API, e.g. https://api.example.com
    #[clap(long)]
    pub base_url: String,
}

pub struct InitCommandOptions {
    pub base_url: String,
}

impl From<InitCommand> for InitCommandOptions {
    fn from(options: InitCommand) -> Self {
        InitCommandOptions {
            base_url: options.base_url,
        }
    }
}
