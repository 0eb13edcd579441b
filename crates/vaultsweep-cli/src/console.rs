use std::io::{BufRead, Write};

use vaultsweep_core::{Announce, Confirm};

/// Interactive yes/no prompt over any line reader.
///
/// Empty input picks the default; end of input or a read error also picks the
/// default. Anything other than y/yes/n/no asks again.
pub struct StdinConfirm<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> StdinConfirm<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> Confirm for StdinConfirm<R, W> {
    fn confirm(&mut self, question: &str, default: bool) -> bool {
        let hint = if default { "[Y/n]" } else { "[y/N]" };
        loop {
            if write!(self.output, "{question} {hint}: ")
                .and_then(|()| self.output.flush())
                .is_err()
            {
                return default;
            }

            let mut line = String::new();
            match self.input.read_line(&mut line) {
                Ok(0) | Err(_) => return default,
                Ok(_) => {}
            }

            let answer = line.trim();
            if answer.is_empty() {
                return default;
            }
            if let Some(parsed) = parse_answer(answer) {
                return parsed;
            }
            let _ = writeln!(self.output, "Please enter y or n.");
        }
    }
}

fn parse_answer(answer: &str) -> Option<bool> {
    match answer.to_ascii_lowercase().as_str() {
        "y" | "yes" => Some(true),
        "n" | "no" => Some(false),
        _ => None,
    }
}

/// Prints progress lines to stdout, or stderr when stdout carries JSON.
#[derive(Debug, Clone, Copy)]
pub struct ConsoleAnnouncer {
    pub to_stderr: bool,
}

impl Announce for ConsoleAnnouncer {
    fn announce(&mut self, line: &str) {
        if self.to_stderr {
            eprintln!("{line}");
        } else {
            println!("{line}");
        }
    }
}
