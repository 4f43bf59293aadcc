//! rHousekeep main entrypoint.

use rhousekeep::run;
use rhousekeep::ui::messages::error;

fn main() {
    println!();
    if let Err(e) = run() {
        error(format!("Error: {}", e));
        std::process::exit(1);
    }
}
