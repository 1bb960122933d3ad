#![forbid(unsafe_code)]

//! keyheat-anim binary entry point.

use std::io;

use keyheat_anim::cli::{Mode, Opts};
use keyheat_anim::{Session, info, logging};

fn main() {
    let opts = Opts::parse();
    logging::init(&opts.log_filter);

    match opts.mode {
        Mode::Info => {
            let stdout = io::stdout();
            if let Err(e) = info::write_info(&mut stdout.lock()) {
                eprintln!("Failed to write plugin info: {e}");
                std::process::exit(1);
            }
        }
        Mode::Run => {
            let stdin = io::stdin();
            let stdout = io::stdout();
            let mut session = Session::new(stdout.lock());
            if let Err(e) = session.run(stdin.lock()) {
                tracing::error!("animation session failed: {e}");
                eprintln!("Runtime error: {e}");
                std::process::exit(1);
            }
        }
    }
}
