use clap::Parser;
use utterance_finder_lib::Cli;

fn main() {
    if let Err(e) = utterance_finder_lib::run(Cli::parse()) {
        log::error!("{e}");
        eprintln!("❌ {e}");
        std::process::exit(1);
    }
}
