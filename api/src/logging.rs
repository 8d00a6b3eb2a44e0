use std::str::FromStr;

use anyhow::Result;
use tracing_subscriber::{prelude::*, EnvFilter};

pub fn init(level: &str, json: bool) -> Result<()> {
    let env_filter = EnvFilter::from_str(level)?;

    let builder = tracing_subscriber::fmt()
        .with_line_number(true)
        .with_file(true)
        .with_env_filter(env_filter);

    if json {
        builder.json().finish().try_init()?;
    } else {
        builder.pretty().finish().try_init()?;
    }

    Ok(())
}
