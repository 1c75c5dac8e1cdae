use colored::{ColoredString, Colorize};
use serde_json::Value;

use verifier::conversation::{Content, ConversationEntry, Role};

pub fn print_entries(entries: &[ConversationEntry]) {
    for entry in entries {
        println!("{}", render(entry));
    }
}

fn render(entry: &ConversationEntry) -> String {
    let time = entry.timestamp.format("%H:%M:%S").to_string().dimmed();
    let body = match &entry.content {
        Content::Text(text) => text.clone(),
        Content::Structured(value) => summary(value),
    };

    format!("{time} {} {body}", speaker(entry.role))
}

fn speaker(role: Role) -> ColoredString {
    match role {
        Role::User => "you ›".cyan().bold(),
        Role::Bot => "bot ›".magenta().bold(),
    }
}

fn field<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value.get(key).and_then(Value::as_str).filter(|s| !s.is_empty())
}

/// One-block view of an explorer answer.
fn summary(value: &Value) -> String {
    let success = value.get("success").and_then(Value::as_bool).unwrap_or(false);
    let status = match value.get("status") {
        Some(Value::String(status)) => status.clone(),
        Some(Value::Null) | None => "?".to_owned(),
        Some(other) => other.to_string(),
    };

    let mut lines = vec![if success {
        format!("✅ {}", "Verification succeeded".green().bold())
    } else {
        format!("❌ {} (status {status})", "Verification failed".red().bold())
    }];

    if let Some(message) = field(value, "message") {
        lines.push(format!("   Message: {message}"));
    }
    match value.get("result") {
        None | Some(Value::Null) => {}
        Some(Value::String(result)) if result.is_empty() => {}
        Some(Value::String(result)) => lines.push(format!("   Result: {result}")),
        Some(other) => lines.push(format!("   Result: {other}")),
    }
    if let Some(url) = field(value, "explorer_url") {
        lines.push(format!("   Explorer: {}", url.underline()));
    }

    lines.join("\n")
}
