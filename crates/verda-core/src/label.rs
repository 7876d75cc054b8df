use std::collections::HashMap;
use std::sync::LazyLock;

/// Normalize a free-text label to a canonical lookup key.
///
/// Steps:
/// 1. Lowercase
/// 2. Replace every maximal run of characters outside `[a-z0-9]` with a
///    single space
/// 3. Trim and collapse internal whitespace
///
/// Idempotent: `normalize(normalize(s)) == normalize(s)`.
pub fn normalize(label: &str) -> String {
    let mut result = String::with_capacity(label.len());
    let mut pending_space = false;
    for c in label.chars() {
        let c = c.to_ascii_lowercase();
        if c.is_ascii_alphanumeric() {
            if pending_space && !result.is_empty() {
                result.push(' ');
            }
            pending_space = false;
            result.push(c);
        } else {
            pending_space = true;
        }
    }
    result
}

/// Map a normalized label to its canonical phrase via the alias table.
/// Unmapped input passes through unchanged.
pub fn canonicalize(normalized: &str) -> String {
    if normalized.is_empty() {
        return String::new();
    }
    match LABEL_ALIASES.get(normalized) {
        Some(canonical) => (*canonical).to_string(),
        None => normalized.to_string(),
    }
}

/// Title-case a normalized label for display and persistence
/// ("plastic bottle" -> "Plastic Bottle"). Blank input falls back to
/// "Unknown Product".
pub fn to_display_label(normalized: &str) -> String {
    if normalized.trim().is_empty() {
        return "Unknown Product".to_string();
    }
    let mut display = String::with_capacity(normalized.len());
    for part in normalized.split_whitespace() {
        if !display.is_empty() {
            display.push(' ');
        }
        let mut chars = part.chars();
        if let Some(first) = chars.next() {
            display.push(first.to_ascii_uppercase());
            display.extend(chars);
        }
    }
    display
}

/// "Missing" for a text field: blank after normalization, or one of the
/// placeholder spellings a catalog record may carry.
pub fn is_missing_text(value: &str) -> bool {
    matches!(normalize(value).as_str(), "" | "unknown" | "n a" | "na" | "none")
}

/// Substring test against a normalized haystack for any of the given phrases
/// (each phrase is normalized before testing).
pub fn contains_any(value: &str, phrases: &[&str]) -> bool {
    if value.is_empty() {
        return false;
    }
    phrases.iter().any(|phrase| {
        let normalized = normalize(phrase);
        !normalized.is_empty() && value.contains(&normalized)
    })
}

static LABEL_ALIASES: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        ("paper coffee cup", "paper cup"),
        ("disposable coffee cup", "paper cup"),
        ("single use plastic bottle", "plastic bottle"),
        ("plastic water bottle", "plastic bottle"),
        ("water bottle", "plastic bottle"),
        ("metal water bottle", "reusable bottle"),
        ("steel bottle", "reusable bottle"),
        ("coffee mug", "coffee cup"),
        ("reusable coffee cup", "coffee cup"),
        ("takeaway container", "food packaging"),
        ("food container", "food packaging"),
        ("running shoe", "footwear"),
        ("sneaker", "footwear"),
    ])
});
