use std::process;

use seedforge::cli::{parse_args, run};
use seedforge::config::RunConfig;

fn main() {
    let config = RunConfig::from_env();
    config.init_logging();

    let args: Vec<String> = std::env::args().collect();
    let command = match parse_args(&args) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{e}");
            process::exit(e.exit_code());
        }
    };

    if let Err(e) = run(command, &config) {
        eprintln!("{e}");
        process::exit(e.exit_code());
    }
}
