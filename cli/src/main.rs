use std::process::ExitCode;

use clap::Parser;

fn main() -> ExitCode {
    match scrypt_params_cli::run(scrypt_params_cli::Cli::parse()) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("scrypt-params: {e:#}");
            ExitCode::FAILURE
        }
    }
}
