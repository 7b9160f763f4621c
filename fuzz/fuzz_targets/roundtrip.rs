//! Render idempotence fuzzer.
//!
//! Feeds arbitrary text to the parser and checks that rendering a parsed
//! statement and parsing it again yields the same statement.

use honggfuzz::fuzz;
use sql_reshape::testing::test_roundtrip;

fn main() {
    loop {
        fuzz!(|data: &[u8]| {
            test_roundtrip(data);
        });
    }
}
