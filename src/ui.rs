use console::style;

use crate::resolver::NoReleaseReason;

pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red().bold(), message);
}

pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

pub fn display_no_release(reason: &NoReleaseReason) {
    println!("{} No release: {}", style("→").yellow(), reason);
}
