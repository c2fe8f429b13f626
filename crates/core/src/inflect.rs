//! Identifier inflection
//!
//! Maps raw names (file names, CSV headers, JSON keys) to TypeScript
//! identifiers. Words are split on any non-alphanumeric character and on
//! lower-to-upper case boundaries, so `first_name`, `First Name` and
//! `firstName` all inflect the same way.

/// Split a raw name into words
pub fn words(input: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut previous: Option<char> = None;

    for ch in input.chars() {
        if !ch.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            previous = None;
            continue;
        }
        if let Some(prev) = previous
            && prev.is_lowercase()
            && ch.is_uppercase()
            && !current.is_empty()
        {
            words.push(std::mem::take(&mut current));
        }
        current.push(ch);
        previous = Some(ch);
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// `order lines` -> `OrderLines`
pub fn pascal_case(input: &str) -> String {
    words(input).iter().map(|word| capitalize(word)).collect()
}

/// `Order Lines` -> `orderLines`
pub fn camel_case(input: &str) -> String {
    let mut out = String::new();
    for (index, word) in words(input).iter().enumerate() {
        if index == 0 {
            out.extend(word.chars().flat_map(char::to_lowercase));
        } else {
            out.push_str(&capitalize(word));
        }
    }
    out
}

/// `people.csv` -> `people`; names without an extension are returned as-is
pub fn strip_extension(name: &str) -> &str {
    match name.rfind('.') {
        Some(index) if index > 0 => &name[..index],
        _ => name,
    }
}

/// Whether `input` can be used unquoted as a TypeScript identifier
pub fn is_valid_identifier(input: &str) -> bool {
    let mut chars = input.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !(first.is_alphabetic() || first == '_' || first == '$') {
        return false;
    }
    chars.all(|ch| ch.is_alphanumeric() || ch == '_' || ch == '$')
}

// Words that cannot name a `const` binding
fn is_reserved(name: &str) -> bool {
    matches!(
        name,
        "break"
            | "case"
            | "catch"
            | "class"
            | "const"
            | "continue"
            | "debugger"
            | "default"
            | "delete"
            | "do"
            | "else"
            | "enum"
            | "export"
            | "extends"
            | "false"
            | "finally"
            | "for"
            | "function"
            | "if"
            | "import"
            | "in"
            | "instanceof"
            | "let"
            | "new"
            | "null"
            | "return"
            | "super"
            | "switch"
            | "this"
            | "throw"
            | "true"
            | "try"
            | "typeof"
            | "var"
            | "void"
            | "while"
            | "with"
            | "yield"
    )
}

fn starts_with_digit(input: &str) -> bool {
    input.chars().next().is_some_and(|ch| ch.is_ascii_digit())
}

/// Interface name for a source identity: `order-lines.csv` -> `OrderLines`
pub fn interface_identifier(identity: &str) -> String {
    let base = pascal_case(strip_extension(identity));
    if base.is_empty() {
        "Content".to_string()
    } else if starts_with_digit(&base) {
        format!("Type{}", base)
    } else {
        base
    }
}

/// Constant name for a source identity: `order-lines.csv` -> `orderLines`
pub fn constant_identifier(identity: &str) -> String {
    let base = camel_case(strip_extension(identity));
    if base.is_empty() {
        "content".to_string()
    } else if starts_with_digit(&base) {
        format!("_{}", base)
    } else if is_reserved(&base) {
        format!("{}_", base)
    } else {
        base
    }
}
