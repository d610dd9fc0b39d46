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

//! Error type of the command line phases.
//! Messages are chained from the innermost cause to the outermost context.
//! The backtrace of the error is captured when it is created.

use snafu::Snafu;
use std::fmt::Display;

use crate::grouping::GroupingError;

/// Error type for the program.
#[derive(Debug, Snafu)]
#[snafu(display("{}", msg))]
pub struct Error {
    /// Error message.
    msg: String,

    /// Backtrace of the error.
    backtrace: snafu::Backtrace,
}

impl Error {
    /// Create a new error with a custom message.
    ///
    /// # Arguments
    ///
    /// * `msg` - Error message.
    pub fn new(msg: &str) -> Self {
        Error {
            msg: msg.to_string(),
            backtrace: snafu::Backtrace::capture(),
        }
    }

    /// Return a string representation of the error.
    ///
    /// # Arguments
    ///
    /// * `debug` - Whether to include the backtrace in the string.
    pub fn to_string(self, debug: bool) -> String {
        if debug {
            format!(">> {}\n\nBacktrace:\n{}", self.msg, self.backtrace)
        } else {
            self.msg
        }
    }

    /// Chain a new error message on top of the current one.
    ///
    /// # Arguments
    ///
    /// * `msg` - Additional error message.
    pub fn chain(self, msg: &str) -> Self {
        Error {
            msg: format!("{}\n>> {}", msg, self.msg),
            backtrace: self.backtrace,
        }
    }

    /// Return a result with the error as the value.
    pub fn to_res<T>(self) -> Result<T, Self> {
        Err(self)
    }
}

impl From<GroupingError> for Error {
    fn from(err: GroupingError) -> Self {
        Error::new(&err.to_string())
    }
}

/// Map a different error type to the program's error type.
///
/// # Arguments
///
/// * `err` - Error to map.
/// * `msg` - Additional error message to chain.
pub fn map<S>(err: S, msg: &str) -> Error
where
    S: Display,
{
    Error::new(&err.to_string()).chain(msg)
}

/// Map a result with a different error type to a result with the program's error type.
/// The message is only chained if the result is an error.
///
/// # Arguments
///
/// * `res` - Result to map.
/// * `msg` - Additional error message to chain.
pub fn map_err<T, S>(res: Result<T, S>, msg: &str) -> Result<T, Error>
where
    S: Display,
{
    res.map_err(|s| map(s, msg))
}

/// Map an option to a result with the program's error type.
///
/// # Arguments
///
/// * `opt` - The optional value to map.
/// * `msg` - Error message to return if the option is None.
pub fn ok_or_else<T>(opt: Option<T>, msg: &str) -> Result<T, Error> {
    opt.ok_or_else(|| Error::new(msg))
}

/// Return a string representation of the outcome of a phase.
///
/// # Arguments
///
/// * `res` - Result of the program.
/// * `debug` - Whether to include the backtrace in the string.
pub fn res_to_string<T>(res: Result<T, Error>, debug: bool) -> String {
    match res {
        Ok(_) => "Program finished successfully.".to_string(),
        Err(e) => format!("Program terminated with an error:\n{}", e.to_string(debug)),
    }
}
