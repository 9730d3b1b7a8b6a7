#![no_main]

use libfuzzer_sys::fuzz_target;
use std::sync::Arc;

use stepwise_core::observers::RecordingObserver;
use stepwise_core::sink::RecordingSink;
use stepwise_core::{CancellationToken, InputSequence, ProcessOptions, SequentialProcessor};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(input) = InputSequence::parse(text) else {
        return;
    };

    let recorder = Arc::new(RecordingObserver::new());
    let sink = Arc::new(RecordingSink::new());
    let processor = SequentialProcessor::new(ProcessOptions::immediate())
        .with_observer(recorder.clone())
        .with_sink(sink.clone());

    // Should not panic, and every consumed element is reported exactly once
    let _ = processor.run(&input, &CancellationToken::new());
    assert_eq!(recorder.len(), sink.values().len());
    assert!(recorder.len() <= input.len());
});
