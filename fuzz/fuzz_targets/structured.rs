//! Structured statement fuzzer.
//!
//! Generates well-formed statements over a random table, then checks exact
//! rendering, the camel/snake round trip and SQLite acceptance.

use honggfuzz::fuzz;
use sql_reshape::testing::{FuzzQuery, assert_structured_roundtrip};

fn main() {
    loop {
        fuzz!(|query: FuzzQuery| {
            assert_structured_roundtrip(&query);
        });
    }
}
