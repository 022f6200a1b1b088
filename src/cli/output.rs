use colored::Colorize;
use std::fmt;

/// Message categories used by the CLI output helpers.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Success,
    Warning,
    Error,
    Section,
}

fn build_label(kind: MessageKind) -> &'static str {
    match kind {
        MessageKind::Success => "[✓]",
        MessageKind::Warning => "[!]",
        MessageKind::Error => "[x]",
        MessageKind::Info | MessageKind::Section => "",
    }
}

pub(crate) fn format_message(kind: MessageKind, message: impl fmt::Display) -> String {
    let text = message.to_string();
    let label = build_label(kind);
    match kind {
        MessageKind::Section => format!("=== {} ===", text.trim().to_uppercase())
            .yellow()
            .bold()
            .to_string(),
        MessageKind::Info => text,
        MessageKind::Success => format!("{} {}", label.green(), text),
        MessageKind::Warning => format!("{} {}", label.yellow(), text),
        MessageKind::Error => format!("{} {}", label.red().bold(), text),
    }
}

fn emit(kind: MessageKind, message: impl fmt::Display) {
    println!("{}", format_message(kind, message));
}

pub fn info(message: impl fmt::Display) {
    emit(MessageKind::Info, message);
}

pub fn success(message: impl fmt::Display) {
    emit(MessageKind::Success, message);
}

pub fn warning(message: impl fmt::Display) {
    emit(MessageKind::Warning, message);
}

pub fn error(message: impl fmt::Display) {
    emit(MessageKind::Error, message);
}

pub fn section(title: impl fmt::Display) {
    emit(MessageKind::Section, title);
}

/// Two-column `label   value` line.
pub fn field(label: &str, value: impl fmt::Display) {
    println!("  {:<14}{}", label.dimmed(), value);
}
