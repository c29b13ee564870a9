use std::error::Error;

use crawlboard::cli::run;
use crawlboard::config::ConfigError;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    #[cfg(windows)]
    let _ = enable_ansi_support::enable_ansi_support();

    if let Err(e) = run() {
        // Everything reaching this point is a storage or configuration failure;
        // invalid input exits earlier through `user_error`.
        if let Some(config_err) = e.downcast_ref::<ConfigError>() {
            eprintln!("Error: {}", config_err);
            let mut source = config_err.source();
            while let Some(err) = source {
                eprintln!("  {}", err);
                source = err.source();
            }
            std::process::exit(1);
        }

        eprintln!("Internal error: {}", e);
        let mut source = e.source();
        if source.is_some() {
            eprintln!("\nCaused by:");
            let mut indent = 1;
            while let Some(err) = source {
                eprintln!("{:indent$}  {}", "", err);
                source = err.source();
                indent += 1;
            }
        }
        std::process::exit(2);
    }
}
