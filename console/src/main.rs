mod layout;
mod utils;
mod view;

use clap::{
    Parser,
    Subcommand,
};
use layout::LayoutArgs;
use utils::UtilsArgs;
use view::ViewArgs;
use wild::ArgsOs;

#[derive(Parser, Debug)]
#[command(
    author = env!("CARGO_PKG_AUTHORS"),
    version = env!("CARGO_PKG_VERSION"),
    about = env!("CARGO_PKG_DESCRIPTION"),
    long_about = None,)]
struct Cli {
    #[command(subcommand)]
    command: MainMenu,
}

#[derive(Subcommand, Debug)]
enum MainMenu {
    /// Assign annotations to non-overlapping lanes and print them as TSV.
    Layout {
        #[clap(flatten)]
        utils: UtilsArgs,
        #[clap(flatten)]
        args:  LayoutArgs,
    },

    /// Print the visible range of a zoomed (and optionally resized) track.
    View {
        #[clap(flatten)]
        utils: UtilsArgs,
        #[clap(flatten)]
        args:  ViewArgs,
    },
}

fn main() -> anyhow::Result<()> {
    let args: ArgsOs = wild::args_os();
    let cli = Cli::parse_from(args);

    match cli.command {
        MainMenu::Layout { utils, args } => {
            utils.setup()?;
            args.run(&utils)?;
        },
        MainMenu::View { utils, args } => {
            utils.setup()?;
            args.run(&utils)?;
        },
    }
    Ok(())
}
