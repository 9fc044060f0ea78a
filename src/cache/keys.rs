//! Cache key construction.
//!
//! A key is the operation id followed by each parameter, joined with `_`.
//! `_` and `\` are reserved: inside a parameter they are written as `\_` and
//! `\\`, everything else passes through untouched. Free text is not
//! normalized, so `"Alien"` and `"alien"` are different keys.

use std::fmt;

/// Separator between the operation id and each parameter.
pub const KEY_SEPARATOR: char = '_';

const ESCAPE: char = '\\';

/// Catalog reads whose responses are cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    UpcomingMovies,
    LatestMovie,
    PopularMovies,
    TopRatedMovies,
    SearchMovies,
    MovieDetails,
    SimilarMovies,
}

impl Operation {
    pub const ALL: [Operation; 7] = [
        Operation::UpcomingMovies,
        Operation::LatestMovie,
        Operation::PopularMovies,
        Operation::TopRatedMovies,
        Operation::SearchMovies,
        Operation::MovieDetails,
        Operation::SimilarMovies,
    ];

    /// Stable identifier used as the key prefix.
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::UpcomingMovies => "upcoming_movies",
            Operation::LatestMovie => "latest_movie",
            Operation::PopularMovies => "popular_movies",
            Operation::TopRatedMovies => "top_rated_movies",
            Operation::SearchMovies => "search_movies",
            Operation::MovieDetails => "movie_details",
            Operation::SimilarMovies => "similar_movies",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One significant request parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPart<'a> {
    /// Rendered in base 10
    Int(u64),
    /// Rendered verbatim apart from escaping reserved characters
    Text(&'a str),
}

impl From<u32> for KeyPart<'_> {
    fn from(n: u32) -> Self {
        KeyPart::Int(u64::from(n))
    }
}

impl From<u64> for KeyPart<'_> {
    fn from(n: u64) -> Self {
        KeyPart::Int(n)
    }
}

impl<'a> From<&'a str> for KeyPart<'a> {
    fn from(s: &'a str) -> Self {
        KeyPart::Text(s)
    }
}

impl<'a> From<&'a String> for KeyPart<'a> {
    fn from(s: &'a String) -> Self {
        KeyPart::Text(s.as_str())
    }
}

/// Builds the cache key for `operation` with `parts` in order.
pub fn build_key(operation: Operation, parts: &[KeyPart<'_>]) -> String {
    let mut key = String::from(operation.as_str());
    for part in parts {
        key.push(KEY_SEPARATOR);
        match part {
            KeyPart::Int(n) => key.push_str(&n.to_string()),
            KeyPart::Text(text) => push_escaped(&mut key, text),
        }
    }
    key
}

fn push_escaped(key: &mut String, text: &str) {
    for c in text.chars() {
        if c == KEY_SEPARATOR || c == ESCAPE {
            key.push(ESCAPE);
        }
        key.push(c);
    }
}
