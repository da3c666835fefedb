//! English pluralization for resource names.
//!
//! The rule set is deliberately small and fixed:
//!
//! * uncountable words are returned unchanged,
//! * a short table of irregular pairs (`person`/`people`, `child`/`children`, ...),
//! * `ss`, `x`, `z`, `ch`, `sh` and `us` endings take `es`,
//! * a consonant followed by `y` becomes `ies`,
//! * any other word ending in `s` is treated as already plural,
//! * everything else takes `s`.
//!
//! `singularize` reverses exactly these rules. Irregular plurals outside the
//! table (`wolves`, `criteria`, ...) are not recognised.

const UNCOUNTABLE: [&str; 10] = [
    "sheep",
    "fish",
    "deer",
    "series",
    "species",
    "news",
    "information",
    "equipment",
    "rice",
    "money",
];

const IRREGULAR: [(&str, &str); 10] = [
    ("person", "people"),
    ("man", "men"),
    ("woman", "women"),
    ("child", "children"),
    ("tooth", "teeth"),
    ("foot", "feet"),
    ("mouse", "mice"),
    ("goose", "geese"),
    ("ox", "oxen"),
    ("movie", "movies"),
];

const ES_ENDINGS: [&str; 6] = ["ss", "x", "z", "ch", "sh", "us"];

fn is_vowel(c: char) -> bool {
    matches!(c.to_ascii_lowercase(), 'a' | 'e' | 'i' | 'o' | 'u')
}

/// Copy the case of the first letter of `like` onto `word`.
fn restore_case(like: &str, word: &str) -> String {
    match like.chars().next() {
        Some(first) if first.is_uppercase() => {
            let mut chars = word.chars();
            match chars.next() {
                Some(c) => c.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        }
        _ => word.to_string(),
    }
}

/// `post` -> `posts`, `category` -> `categories`, `person` -> `people`.
/// Words that already look plural are returned unchanged.
pub fn pluralize(word: &str) -> String {
    let lower = word.to_lowercase();
    if word.is_empty() || UNCOUNTABLE.contains(&lower.as_str()) {
        return word.to_string();
    }
    for (singular, plural) in IRREGULAR {
        if lower == singular {
            return restore_case(word, plural);
        }
        if lower == plural {
            return word.to_string();
        }
    }
    if ES_ENDINGS.iter().any(|ending| lower.ends_with(ending)) {
        return format!("{word}es");
    }
    if lower.ends_with('s') {
        return word.to_string();
    }
    if let Some(stem) = word.strip_suffix(['y', 'Y']) {
        if stem.chars().last().is_some_and(|c| !is_vowel(c)) {
            return format!("{stem}ies");
        }
    }
    format!("{word}s")
}

/// `posts` -> `post`, `categories` -> `category`, `people` -> `person`.
/// Words that already look singular are returned unchanged.
pub fn singularize(word: &str) -> String {
    let lower = word.to_lowercase();
    if word.is_empty() || UNCOUNTABLE.contains(&lower.as_str()) {
        return word.to_string();
    }
    for (singular, plural) in IRREGULAR {
        if lower == plural {
            return restore_case(word, singular);
        }
        if lower == singular {
            return word.to_string();
        }
    }
    if lower.len() > 3 && lower.ends_with("ies") {
        return format!("{}y", &word[..word.len() - 3]);
    }
    if let Some(stem) = lower.strip_suffix("es") {
        if ES_ENDINGS.iter().any(|ending| stem.ends_with(ending)) {
            return word[..word.len() - 2].to_string();
        }
    }
    if ["ss", "us", "is"].iter().any(|ending| lower.ends_with(ending)) {
        return word.to_string();
    }
    match word.strip_suffix(['s', 'S']) {
        Some(stem) => stem.to_string(),
        None => word.to_string(),
    }
}
