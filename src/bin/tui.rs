use anyhow::Result;
use stellar::cli::{self, Command};
use stellar::config::Config;
use stellar::context::StandardContext;
use stellar::logging;
use std::env;

fn main() -> Result<()> {
    let args = match cli::parse_args(env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(2);
        }
    };

    if args.command == Command::Help {
        cli::print_help("stellar");
        return Ok(());
    }

    let ctx = StandardContext::new(args.root);

    let cfg = match Config::load_or_init(&ctx) {
        Ok(cfg) => cfg,
        Err(e) => {
            // A broken config is reported instead of being silently replaced.
            eprintln!("Error loading configuration:\n{}", e);
            std::process::exit(1);
        }
    };

    if args.command == Command::Tui {
        if let Err(e) = logging::init_file_logger(&ctx, cfg.log_level_filter()) {
            eprintln!("Warning: logging disabled: {:#}", e);
        }
        return stellar::tui::run(&ctx, &cfg);
    }

    let _ = logging::init_term_logger(log::LevelFilter::Warn);
    if let Err(e) = cli::run_command(&ctx, &cfg, args.command, std::io::stdout()) {
        eprintln!("{}", e);
        std::process::exit(1);
    }
    Ok(())
}
