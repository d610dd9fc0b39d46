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

//! Parsing of the word lists typed by users.

/// Tokens used when the user only asks for the comma.
pub const PUNCTUATION: [&str; 5] = [".", ",", "!", "?", ";"];

/// Parses a comma-separated list of words.
///
/// Words are trimmed and empty items are dropped. Since the comma is the separator,
/// an empty item (e.g., a trailing comma) stands for the comma itself.
/// A list made of the comma only stands for the common punctuation marks.
/// Duplicates are removed, keeping the first occurrence.
///
/// # Arguments
///
/// * `input` - The list, e.g., "hav, fisk, båt".
///
/// # Returns
///
/// The words, in order.
pub fn parse_words(input: &str) -> Vec<String> {
    let items: Vec<&str> = input.split(',').map(str::trim).collect();
    let mut words: Vec<&str> = items.iter().copied().filter(|w| !w.is_empty()).collect();
    if items.contains(&"") {
        words.push(",");
    }
    if words == [","] {
        words = PUNCTUATION.to_vec();
    }

    let mut unique: Vec<String> = Vec::with_capacity(words.len());
    for word in words {
        if !unique.iter().any(|w| w == word) {
            unique.push(word.to_string());
        }
    }
    unique
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn test_parse_words() {
        assert_eq!(parse_words("hav, fisk ,båt"), vec!["hav", "fisk", "båt"]);
        assert_eq!(parse_words("hav,hav, fisk"), vec!["hav", "fisk"]);
        assert_eq!(parse_words("world war"), vec!["world war"]);
    }

    #[test]
    fn test_parse_comma() {
        assert_eq!(parse_words("hav, fisk,"), vec!["hav", "fisk", ","]);
        assert_eq!(parse_words(","), vec![".", ",", "!", "?", ";"]);
        assert_eq!(parse_words(""), vec![".", ",", "!", "?", ";"]);
    }
}
