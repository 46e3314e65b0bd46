use std::process;

fn main() {
    if let Err(e) = rcall::cli::run() {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}
