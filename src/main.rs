use clap::Parser;
use koscreen::cli::{execute_command, get_log_level, Cli};
use koscreen::error::ScreenError;
use tracing::{debug, error, trace};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // Usage errors exit 1; --help and --version exit 0 unless they could not be written
            let code = if e.use_stderr() { 1 } else { 0 };
            if let Err(io_err) = e.print() {
                eprintln!("Error: cannot write usage message: {io_err}");
                std::process::exit(1);
            }
            std::process::exit(code);
        }
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(get_log_level(cli.verbose)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(cli.verbose >= 2)
        .with_line_number(cli.verbose >= 3)
        .init();

    debug!("koscreen started with verbosity level: {}", cli.verbose);
    trace!("Full CLI args: {:?}", std::env::args().collect::<Vec<_>>());

    if let Err(e) = execute_command(cli).await {
        error!("Fatal error: {:#}", e);
        match e.downcast_ref::<ScreenError>() {
            Some(screen_error) => {
                eprintln!("Error: {}", screen_error.user_message());
                if let ScreenError::Execution {
                    stderr: Some(stderr),
                    ..
                } = screen_error
                {
                    eprintln!("{}", stderr.trim_end());
                }
            }
            None => eprintln!("Error: {e:#}"),
        }
        std::process::exit(1);
    }
}
