use std::sync::LazyLock;

use regex::Regex;

use super::{Finding, FindingCategory};

/// Category-tagged prohibited phrases. Compiled once, case-insensitively.
struct PatternSet {
    category: FindingCategory,
    regexes: &'static LazyLock<Vec<Regex>>,
}

macro_rules! pattern_set {
    ($name:ident, [$($pattern:expr),+ $(,)?]) => {
        static $name: LazyLock<Vec<Regex>> = LazyLock::new(|| {
            [$($pattern),+]
                .iter()
                .filter_map(|pattern| Regex::new(&format!("(?i){pattern}")).ok())
                .collect()
        });
    };
}

pattern_set!(
    THREATS,
    [
        r"приед[её]м\s+к\s+вам",
        r"знаем\s+где\s+вы\s+жив[её]те",
        r"найд[её]м\s+вас",
        r"будет\s+хуже",
        r"пожалеете",
        r"накажем",
        r"посадим",
        r"тюрьм",
        r"уголовн",
        r"\bарест",
        r"опишем\s+имущество",
    ]
);

pattern_set!(
    PRESSURE,
    [
        r"обязаны\s+платить\s+сейчас",
        r"немедленно",
        r"в\s+течение\s+часа",
        r"последний\s+шанс",
        r"иначе\s+будет\s+поздно",
        r"не\s+отвертитесь",
        r"никуда\s+не\s+денетесь",
    ]
);

pattern_set!(
    DISCLOSURE,
    [
        r"расскажем\s+(?:родственникам|соседям|работодателю)",
        r"позвоним\s+(?:родителям|жене|мужу|на\s+работу)",
        r"сообщим\s+всем",
        r"опубликуем",
    ]
);

// Insults are anchored at a word start so that words like "договор" stay clean.
pattern_set!(
    RUDENESS,
    [
        r"\bидиот",
        r"\bдурак",
        r"\bмошенник",
        r"\bвор\b",
        r"\bжулик",
        r"\bбестолков",
        r"\bтуп(?:ой|ая|ые)\b",
        r"\bдебил",
    ]
);

static PATTERN_SETS: [PatternSet; 4] = [
    PatternSet {
        category: FindingCategory::Threats,
        regexes: &THREATS,
    },
    PatternSet {
        category: FindingCategory::Pressure,
        regexes: &PRESSURE,
    },
    PatternSet {
        category: FindingCategory::Disclosure,
        regexes: &DISCLOSURE,
    },
    PatternSet {
        category: FindingCategory::Rudeness,
        regexes: &RUDENESS,
    },
];

const CONTEXT_CHARS: usize = 30;

/// Up to 30 characters either side of the byte range `start..end`.
pub(crate) fn context_window(text: &str, start: usize, end: usize) -> &str {
    let from = text[..start]
        .char_indices()
        .rev()
        .nth(CONTEXT_CHARS - 1)
        .map(|(index, _)| index)
        .unwrap_or(0);
    let to = text[end..]
        .char_indices()
        .nth(CONTEXT_CHARS)
        .map(|(index, _)| end + index)
        .unwrap_or(text.len());
    &text[from..to]
}

/// Every prohibited-phrase match in `text`, in category then pattern order.
pub(crate) fn scan(text: &str) -> Vec<Finding> {
    let mut findings = Vec::new();
    for set in &PATTERN_SETS {
        for regex in set.regexes.iter() {
            for found in regex.find_iter(text) {
                findings.push(Finding {
                    category: set.category,
                    message: format!("Prohibited {} phrase", set.category.label()),
                    matched: Some(found.as_str().to_string()),
                    context: Some(context_window(text, found.start(), found.end()).to_string()),
                });
            }
        }
    }
    findings
}
