//! Notifier that prints to stderr, keeping stdout for the function result.

use phoenix_core::notify::{Notification, Notifier, Severity};

#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, n: Notification) {
        eprintln!("{}", render(&n));
    }
}

pub fn render(n: &Notification) -> String {
    match n.severity {
        Severity::Default => format!("[{}] {}", n.title, n.description),
        Severity::Destructive => format!("[{}!] {}", n.title, n.description),
    }
}
