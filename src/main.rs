use std::process;

use tabsort::{
    args::{parse_args, usage, Invocation},
    error::SortResult,
    sort, EXIT_SUCCESS,
};

/// Restore default SIGPIPE handling so `sort | head` ends quietly
#[cfg(unix)]
fn reset_sigpipe() {
    unsafe {
        libc::signal(libc::SIGPIPE, libc::SIG_DFL);
    }
}

#[cfg(not(unix))]
fn reset_sigpipe() {}

fn main() {
    reset_sigpipe();

    match run() {
        Ok(exit_code) => process::exit(exit_code),
        Err(e) => {
            eprintln!("sort: {}", e);
            if e.is_usage() {
                eprintln!("{}", usage());
            }
            process::exit(e.exit_code());
        }
    }
}

fn run() -> SortResult<i32> {
    match parse_args(std::env::args_os())? {
        Invocation::Run(args) => sort(&args.config, &args.files),
        Invocation::Info(text) => {
            print!("{text}");
            Ok(EXIT_SUCCESS)
        }
    }
}
