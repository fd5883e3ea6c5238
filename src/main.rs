use std::io::{self, Read, Write};

use anyhow::{Context, Result};
use fn_error_context::context;
use structopt::StructOpt;

use home_url_rewrite::config;
use home_url_rewrite::hook::{HookPoint, Transform};
use home_url_rewrite::site::SiteShim;

const ABOUT: &str =
    "Rewrite hardcoded home-URL references between the stored and served domains.";

#[derive(Debug, StructOpt)]
#[structopt(about = ABOUT)]
#[structopt(setting = structopt::clap::AppSettings::UnifiedHelpMessage)]
pub struct Options {
    #[structopt(flatten)]
    config: config::Options,
    #[structopt(
        long,
        value_name = "HOOK",
        help = "Interception point to rewrite through, e.g. `the_content` or `pre_category_description`"
    )]
    hook: HookPoint,
}

fn main() -> Result<()> {
    env_logger::init_from_env(env_logger::Env::new().filter_or("HOME_URL_REWRITE_LOG", "info"));
    let options = Options::from_args();
    log::debug!("{:#?}", options);

    let config = config::parse(&options.config)?;

    let mut shim = SiteShim::new(config.context, config.taxonomies);
    shim.switch_site(&config.current_url, &config.stored_url);

    if !shim.rewriter().is_active() {
        log::info!("served and stored domains match, passing input through unchanged");
    } else if shim.plan().lookup(&options.hook).is_none() {
        log::info!(
            "`{}` is not bound in a {} context, passing input through unchanged",
            options.hook,
            shim.context()
        );
    }

    let input = read_stdin()?;
    let output = match shim.plan().lookup(&options.hook).map(|binding| binding.transform) {
        Some(Transform::InboundDeep) => {
            let value = serde_json::from_str(&input)
                .with_context(|| format!("`{}` expects a JSON record on stdin", options.hook))?;
            let mut output = serde_json::to_string_pretty(&shim.apply_value(&options.hook, value))
                .expect("writing value to a string should not fail");
            output.push('\n');
            output
        }
        _ => shim.apply_text(&options.hook, &input),
    };

    io::stdout().write_all(output.as_bytes())?;
    Ok(())
}

#[context("failed to read input from stdin")]
fn read_stdin() -> Result<String> {
    let mut input = String::new();
    io::stdin().read_to_string(&mut input)?;
    Ok(input)
}
