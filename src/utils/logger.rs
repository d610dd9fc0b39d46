// Copyright 2025 Andrea Gilot
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::fmt::Display;

use super::{error::*, fs::write_csv};
use console::Style;
use console::Term;
use polars::frame::DataFrame;
use tracing::Level;

#[derive(Debug)]
pub enum TaskStatus {
    InProgress,
    Success,
    Failure,
}

impl Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                TaskStatus::InProgress => "...",
                TaskStatus::Success => " - SUCCESS",
                TaskStatus::Failure => " - FAILED",
            }
        )
    }
}

/// Progress messages of the phases, written to the terminal.
pub struct Logger {
    term: Term,
    last_line: Option<String>,
}

impl Default for Logger {
    fn default() -> Self {
        Logger::new()
    }
}

impl Logger {
    pub fn new() -> Logger {
        Logger {
            term: Term::stdout(),
            last_line: None,
        }
    }

    pub fn change_status(&self, status: TaskStatus) -> Result<(), Error> {
        map_err(
            self.term
                .clear_line()
                .and_then(|_| self.term.move_cursor_up(1)),
            "Could not log in the terminal",
        )?;
        let last_line: &str = ok_or_else(
            self.last_line.as_ref(),
            "Could not change the status of a non previously logged task",
        )?;
        map_err(
            self.term.write_line(&format!("{}{}", last_line, status)),
            "Could not log in the terminal",
        )
    }

    pub fn log(&mut self, msg: &str) -> Result<(), Error> {
        self.last_line = Some(msg.to_string());
        map_err(self.term.write_line(msg), "Could not log in the terminal")
    }

    pub fn log_warning(&mut self, msg: &str) -> Result<(), Error> {
        let yellow = Style::new().yellow();
        self.log(&yellow.apply_to(format!("WARNING: {}", msg)).to_string())
    }

    /// Logs the seed used to sample the corpus.
    ///
    /// # Arguments
    /// * `seed` - The random seed to log.
    pub fn log_seed(&mut self, seed: u64) -> Result<(), Error> {
        self.log(&format!("Your random seed is {}, don't forget it!", seed))
    }

    /// Logs a part of a whole with its percentage, e.g., "Documents with counts: 3 / 75.00 %".
    ///
    /// # Arguments
    /// * `label` - What the part counts.
    /// * `part` - The size of the part.
    /// * `whole` - The size of the whole. If zero, the percentage is omitted.
    pub fn log_ratio(&mut self, label: &str, part: usize, whole: usize) -> Result<(), Error> {
        if whole == 0 {
            self.log(&format!("{}: {}", label, part))
        } else {
            self.log(&format!(
                "{}: {} / {:.2} %",
                label,
                part,
                (part as f64 / whole as f64) * 100.0
            ))
        }
    }

    pub fn start_task(&mut self, msg: &str) -> Result<(), Error> {
        self.log(msg)?;
        self.change_status(TaskStatus::InProgress)
    }

    pub fn log_completion<T, F>(&mut self, msg: &str, task: F) -> Result<T, Error>
    where
        F: FnOnce() -> Result<T, Error>,
    {
        self.start_task(msg)?;
        let res: Result<T, Error> = task();
        if res.is_ok() {
            self.change_status(TaskStatus::Success)
        } else {
            self.change_status(TaskStatus::Failure)
        }?;
        res
    }
}

/// Installs the subscriber printing the diagnostic events of the pipeline.
/// Debug events are only shown in debug mode.
/// Does nothing if a subscriber is already installed.
///
/// # Arguments
/// * `debug` - Whether the program runs in debug mode.
pub fn init_tracing(debug: bool) {
    let _ = tracing_subscriber::fmt()
        .with_max_level(if debug { Level::DEBUG } else { Level::WARN })
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Logs if the program will create an output file or overwrite an existing one.
/// In the latter case, it will also check if the user explicitly asked for it.
///
/// # Arguments
/// * `logger` - A mutable reference to the logger.
/// * `output_path` - The path to the output file.
/// * `force` - Flag the user must set to override an existing file.
pub fn log_output_file(logger: &mut Logger, output_path: &str, force: bool) -> Result<(), Error> {
    match crate::utils::fs::check_path(output_path) {
        Ok(_) => {
            if force {
                logger.log(&format!("Overriding existing file: {}", output_path))
            } else {
                Error::new(&format!(
                    "File {} already exists. Use --force to override it.",
                    output_path
                ))
                .to_res()
            }
        }
        Err(_) => logger.log(&format!("Creating new file: {}", output_path)),
    }
}

pub fn log_write_output(
    logger: &mut Logger,
    output_path: &str,
    data: &mut DataFrame,
) -> Result<(), Error> {
    logger.log_completion(&format!("Writing to {}", output_path), || {
        write_csv(output_path, data)
    })
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::utils::fs::delete_file;

    #[test]
    fn test_log_output_file() {
        let mut logger = Logger::new();
        assert!(log_output_file(&mut logger, "tests/data/corpus.csv", false).is_err());
        assert!(log_output_file(&mut logger, "tests/data/corpus.csv", true).is_ok());
        assert!(log_output_file(&mut logger, "tests/data/non_existent_file.csv", false).is_ok());
    }

    #[test]
    fn test_log_completion() {
        let mut logger = Logger::new();
        let ok: Result<usize, Error> = logger.log_completion("Counting", || Ok(3));
        assert_eq!(ok.unwrap(), 3);
        let err: Result<usize, Error> =
            logger.log_completion("Counting", || Error::new("Nothing to count").to_res());
        assert!(err.is_err());
        assert!(logger.log_ratio("Documents", 3, 4).is_ok());
        assert!(logger.log_ratio("Documents", 0, 0).is_ok());
    }

    #[test]
    fn test_log_write_output() {
        let path = "tests/data/tmp/logger/output.csv";
        let mut df = crate::utils::fs::open_csv("tests/data/counts.csv", &[]).unwrap();
        assert!(log_write_output(&mut Logger::new(), path, &mut df).is_ok());
        assert!(delete_file(path, false).is_ok());
    }
}
