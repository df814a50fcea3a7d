//! `phoenix classify` – show how an error string is classified.

use phoenix_core::retry::{classify, user_facing_message, ClassifiedError, RawFailure};

pub fn classification_lines(err: &ClassifiedError) -> Vec<String> {
    let mut lines = vec![
        format!("kind:         {}", err.kind().as_str()),
        format!("retryable:    {}", err.is_retryable()),
        format!("message:      {}", err.message()),
        format!("user message: {}", user_facing_message(err)),
    ];
    if let Some(secs) = err.retry_after_secs() {
        lines.push(format!("retry after:  {}s", secs));
    }
    lines
}

pub fn run_classify(text: &str) {
    let err = classify(&RawFailure::Payload(text.to_string()));
    for line in classification_lines(&err) {
        println!("{}", line);
    }
}
