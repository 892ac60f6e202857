#![no_main]

use evatr::wire::{WireStatusMessage, map_status_message};
use evatr::{StatusTable, TableSource};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Errors are fine, panics are bugs.
    if let Ok(wire) = serde_json::from_slice::<Vec<WireStatusMessage>>(data) {
        let table = StatusTable::from_messages(
            wire.into_iter().map(map_status_message).collect(),
            TableSource::Static,
        );
        for msg in table.messages() {
            assert!(table.get(&msg.status).is_some());
        }
    }
});
