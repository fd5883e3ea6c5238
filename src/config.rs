use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use anyhow::{bail, Result};
use fn_error_context::context;
use serde::Deserialize;
use structopt::StructOpt;

use crate::site::ExecutionContext;

#[derive(Debug, StructOpt)]
pub struct Options {
    #[structopt(
        value_name = "CONFIG_FILE",
        help = "Path to the config file",
        parse(from_os_str)
    )]
    config: PathBuf,
}

#[context("failed to parse config from `{}`", options.config.display())]
pub fn parse(options: &Options) -> Result<Config> {
    let reader = BufReader::new(File::open(&options.config)?);
    let config: Config = serde_yaml::from_reader(reader)?;
    config.validate()?;
    Ok(config)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    pub current_url: String,
    pub stored_url: String,
    pub context: ExecutionContext,
    #[serde(default)]
    pub taxonomies: Vec<String>,
}

impl Config {
    fn validate(&self) -> Result<()> {
        if self.current_url.is_empty() {
            bail!("`current-url` must not be empty");
        }
        if self.stored_url.is_empty() {
            bail!("`stored-url` must not be empty");
        }
        for taxonomy in &self.taxonomies {
            if taxonomy.is_empty() || taxonomy.contains(char::is_whitespace) {
                bail!("invalid taxonomy name `{}`", taxonomy);
            }
        }
        Ok(())
    }
}
