use clap::Args;
use log::LevelFilter;

#[derive(Args, Debug, Clone)]
pub(crate) struct UtilsArgs {
    #[arg(
        short,
        long,
        global = true,
        default_value_t = false,
        help = "Log progress to stderr"
    )]
    pub verbose: bool,
}

impl UtilsArgs {
    /// Initializes the logger. `RUST_LOG` wins over `--verbose`.
    pub fn setup(&self) -> anyhow::Result<()> {
        let mut builder = pretty_env_logger::formatted_builder();
        builder.filter_level(if self.verbose {
            LevelFilter::Info
        }
        else {
            LevelFilter::Warn
        });
        if let Ok(filters) = std::env::var("RUST_LOG") {
            builder.parse_filters(&filters);
        }
        builder.try_init()?;
        Ok(())
    }
}
