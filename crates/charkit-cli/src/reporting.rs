//! Human-readable rendering of build results.
//!
//! Libraries only accumulate; rendering warnings and summaries to the
//! terminal happens here, and only here.

use colored::Colorize;

use charkit_spec::{ValidationError, ValidationWarning};

/// Prints validation errors, one per line, to stderr.
pub fn errors(errors: &[ValidationError]) {
    for error in errors {
        eprintln!("{} {}", "error:".red().bold(), error);
    }
}

/// Prints accumulated warnings, one per line, to stderr.
pub fn warnings(warnings: &[ValidationWarning]) {
    for warning in warnings {
        eprintln!("{} {}", "warning:".yellow().bold(), warning);
    }
}

/// Prints the one-line outcome summary.
pub fn summary(what: &str, processed: usize, warning_count: usize) {
    if warning_count == 0 {
        println!(
            "{} {processed} {what} processed",
            "Done:".green().bold()
        );
    } else {
        println!(
            "{} {processed} {what} processed, {warning_count} warning(s)",
            "Done:".yellow().bold()
        );
    }
}
