use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Parts of the collection call script an operator is expected to cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptElement {
    Greeting,
    Purpose,
    Amount,
    Deadline,
    PaymentMethods,
    Closing,
}

pub const DEFAULT_REQUIRED_ELEMENTS: [ScriptElement; 3] = [
    ScriptElement::Greeting,
    ScriptElement::Purpose,
    ScriptElement::Closing,
];

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .filter_map(|pattern| Regex::new(&format!("(?i){pattern}")).ok())
        .collect()
}

static GREETING: LazyLock<Vec<Regex>> =
    LazyLock::new(|| compile(&[r"меня\s+зовут", r"мо[её]\s+имя", r"компания", r"банк"]));
static PURPOSE: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"звоню\s+по\s+поводу",
        r"хотел[аи]?\s+бы\s+обсудить",
        r"напоминаю\s+о",
    ])
});
static AMOUNT: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[r"сумма\s+(?:долга|задолженности)", r"\d+\s*(?:руб|₽)"])
});
static DEADLINE: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"срок\s+(?:оплаты|погашения)",
        r"до\s+\d+\s+(?:числа|января|февраля)",
    ])
});
static PAYMENT_METHODS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"оплатить\s+можно",
        r"способы?\s+оплаты",
        r"через\s+(?:банк|приложение)",
    ])
});
static CLOSING: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[r"всего\s+доброго", r"до\s+свидания", r"хорошего\s+дня"])
});

impl ScriptElement {
    pub fn label(self) -> &'static str {
        match self {
            Self::Greeting => "greeting",
            Self::Purpose => "purpose",
            Self::Amount => "amount",
            Self::Deadline => "deadline",
            Self::PaymentMethods => "payment_methods",
            Self::Closing => "closing",
        }
    }

    fn patterns(self) -> &'static [Regex] {
        match self {
            Self::Greeting => GREETING.as_slice(),
            Self::Purpose => PURPOSE.as_slice(),
            Self::Amount => AMOUNT.as_slice(),
            Self::Deadline => DEADLINE.as_slice(),
            Self::PaymentMethods => PAYMENT_METHODS.as_slice(),
            Self::Closing => CLOSING.as_slice(),
        }
    }

    pub fn is_present_in(self, text: &str) -> bool {
        self.patterns().iter().any(|regex| regex.is_match(text))
    }
}

/// Required elements absent from `text`, in the order they were requested.
pub(crate) fn missing_elements(text: &str, required: &[ScriptElement]) -> Vec<ScriptElement> {
    let mut missing: Vec<ScriptElement> = Vec::new();
    for element in required {
        if !element.is_present_in(text) && !missing.contains(element) {
            missing.push(*element);
        }
    }
    missing
}
