use serde::{Deserialize, Serialize};

/// Only the tail of a transcript is searched for a fresh objection.
const RECENT_CHARS: usize = 200;

/// Common debtor objections, each recognised by a marker phrase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Objection {
    NoMoney,
    NotMyLoan,
    AlreadyPaid,
    CannotTalk,
    WillComplain,
    CallLater,
}

impl Objection {
    /// Declaration order is the match order.
    pub const ALL: [Objection; 6] = [
        Self::NoMoney,
        Self::NotMyLoan,
        Self::AlreadyPaid,
        Self::CannotTalk,
        Self::WillComplain,
        Self::CallLater,
    ];

    pub const fn marker(self) -> &'static str {
        match self {
            Self::NoMoney => "нет денег",
            Self::NotMyLoan => "не брал кредит",
            Self::AlreadyPaid => "уже оплатил",
            Self::CannotTalk => "не могу говорить",
            Self::WillComplain => "буду жаловаться",
            Self::CallLater => "перезвоните позже",
        }
    }

    pub(crate) const fn responses(self) -> &'static [&'static str] {
        match self {
            Self::NoMoney => &[
                "Понимаю. Какую сумму вы смогли бы внести сейчас? Даже частичная оплата поможет.",
                "Когда ожидаете поступление средств? Можем договориться на эту дату.",
                "Рассмотрим вариант реструктуризации, это снизит ежемесячный платёж.",
            ],
            Self::NotMyLoan => &[
                "Давайте уточним данные. Ваше имя {client_name}?",
                "Возможно, кредит оформлен на другого члена семьи?",
                "Если считаете, что произошла ошибка, подайте заявление, мы разберёмся.",
            ],
            Self::AlreadyPaid => &[
                "Когда и каким способом производили оплату?",
                "Возможно, платёж ещё не поступил. Обычно это занимает 1-3 дня.",
                "Можете прислать подтверждение оплаты на нашу почту?",
            ],
            Self::CannotTalk => &[
                "Когда вам будет удобно? Перезвоню в удобное время.",
                "Хорошо, могу отправить информацию СМС или на почту.",
                "Понял, какое время завтра будет удобным?",
            ],
            Self::WillComplain => &[
                "Ваше право. Номер для жалоб: {complaint_phone}. Но давайте сначала попробуем решить вопрос.",
                "Готов выслушать ваши претензии и передать руководству.",
                "Понимаю ваше недовольство. Чем именно вы недовольны?",
            ],
            Self::CallLater => &[
                "Конечно. Какое время будет удобным?",
                "Хорошо. Но напоминаю, что задолженность {amount} рублей, и важно решить вопрос скорее.",
                "Договорились. Позвоню {date} в {time}.",
            ],
        }
    }
}

pub(crate) const FALLBACK_RESPONSES: [&str; 2] = [
    "Понимаю вашу позицию. Давайте обсудим, как можем помочь.",
    "Хорошо, что вы это сказали. Какой вариант решения вы видите?",
];

/// First objection whose marker occurs anywhere in `text`.
pub fn find_objection(text: &str) -> Option<Objection> {
    let lowered = text.to_lowercase();
    Objection::ALL
        .into_iter()
        .find(|objection| lowered.contains(objection.marker()))
}

/// Objection raised in the last few sentences of a running transcript.
pub fn detect_objection(transcript: &str) -> Option<Objection> {
    find_objection(recent_tail(transcript))
}

fn recent_tail(text: &str) -> &str {
    match text.char_indices().rev().nth(RECENT_CHARS - 1) {
        Some((start, _)) => &text[start..],
        None => text,
    }
}
