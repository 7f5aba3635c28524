//! Environment source: PROMPT_BRIDGE__<SECTION>__<KEY>, e.g.
//! `PROMPT_BRIDGE__PROMPT__TIMEOUT_SECS=30`.

use config::builder::DefaultState;
use config::{ConfigBuilder, Environment};

pub const ENV_PREFIX: &str = "PROMPT_BRIDGE";

pub fn add_to_builder(builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
    builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .separator("__")
            .try_parsing(true),
    )
}
