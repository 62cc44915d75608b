//! `ekart` - command-line storefront.

use clap::Parser;

use ekart_storefront::cli::Cli;
use ekart_storefront::output::Output;

fn main() {
    let cli = Cli::parse();
    ekart_storefront::init_tracing(cli.verbose);

    let out = Output::new(cli.json);
    if let Err(e) = ekart_storefront::run(cli) {
        out.error(&e);
        std::process::exit(1);
    }
}
