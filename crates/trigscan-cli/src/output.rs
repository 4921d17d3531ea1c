//! JSON output formatting

use trigscan_core::{ScanResponse, TriggerTag};

/// Print the scan response as JSON
pub fn print_json_response(response: &ScanResponse) {
    match serde_json::to_string_pretty(response) {
        Ok(json) => println!("{}", json),
        Err(err) => eprintln!("Error serializing response: {}", err),
    }
}

/// Print a single tag as JSON
pub fn print_json_tag(tag: &TriggerTag) {
    match serde_json::to_string_pretty(tag) {
        Ok(json) => println!("{}", json),
        Err(err) => eprintln!("Error serializing tag: {}", err),
    }
}
