//! Word splitting and kebab-case conversion for action names.
//!
//! Apostrophes are removed first (`don'tStop` is two words). Word boundaries:
//! - any other non-alphanumeric character (dropped)
//! - lowercase followed by uppercase (`doThing`)
//! - the last capital of an acronym before a lowercase letter (`HTTPServer`)
//! - letter/digit transitions (`v2Thing`)

/// Convert an identifier to kebab-case.
pub fn kebab_case(input: &str) -> String {
    words(input)
        .iter()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join("-")
}

fn words(input: &str) -> Vec<String> {
    let chars: Vec<char> = input
        .chars()
        .filter(|c| !matches!(c, '\'' | '\u{2019}'))
        .collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_alphanumeric() {
            flush(&mut current, &mut words);
            continue;
        }

        if !current.is_empty() {
            let prev = chars[i - 1];
            let next = chars.get(i + 1).copied();
            let camel = prev.is_lowercase() && c.is_uppercase();
            let acronym_end = prev.is_uppercase()
                && c.is_uppercase()
                && next.is_some_and(char::is_lowercase);
            let digit_edge = prev.is_numeric() != c.is_numeric();
            if camel || acronym_end || digit_edge {
                flush(&mut current, &mut words);
            }
        }
        current.push(c);
    }
    flush(&mut current, &mut words);
    words
}

fn flush(current: &mut String, words: &mut Vec<String>) {
    if !current.is_empty() {
        words.push(std::mem::take(current));
    }
}
