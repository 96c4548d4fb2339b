use serde::{Deserialize, Serialize};

use crate::workflows::casework::domain::{Psychotype, Scenario};

/// Call script phrases for one scenario and psychotype. Phrases may carry
/// `{placeholder}` variables filled from a [`super::ScriptContext`].
#[derive(Debug)]
pub(crate) struct ScriptTemplate {
    pub scenario: Scenario,
    pub psychotype: Psychotype,
    pub opening: &'static [&'static str],
    pub key_phrases: &'static [&'static str],
    pub closing: &'static [&'static str],
}

pub(crate) static TEMPLATES: [ScriptTemplate; 7] = [
    ScriptTemplate {
        scenario: Scenario::SoftReminder,
        psychotype: Psychotype::Forgetful,
        opening: &[
            "Добрый день, {client_name}! Это {operator_name} из {bank_name}. Звоню напомнить о платеже по вашему кредиту.",
            "Здравствуйте, {client_name}! Беспокоит {bank_name}. У вас образовалась небольшая задолженность, хотел уточнить, возможно, просто забыли?",
        ],
        key_phrases: &[
            "Уверен, это просто упущение",
            "Давайте вместе посмотрим, как удобнее оплатить",
            "Могу прямо сейчас отправить ссылку для оплаты",
        ],
        closing: &[
            "Отлично, тогда жду оплату до {date}. Хорошего дня!",
            "Спасибо за понимание! Если будут вопросы, звоните.",
        ],
    },
    ScriptTemplate {
        scenario: Scenario::SoftReminder,
        psychotype: Psychotype::Cooperative,
        opening: &[
            "Добрый день, {client_name}! Это {operator_name}. Звоню по поводу вашего кредита, есть небольшая просрочка.",
        ],
        key_phrases: &[
            "Ценю, что вы всегда на связи",
            "Понимаю, что ситуации бывают разные",
            "Давайте найдём удобное решение",
        ],
        closing: &["Договорились! Спасибо за сотрудничество."],
    },
    ScriptTemplate {
        scenario: Scenario::FirmDemand,
        psychotype: Psychotype::Unwilling,
        opening: &[
            "Добрый день, {client_name}. {operator_name}, {bank_name}. Обращаюсь по поводу вашей задолженности, которая уже {overdue_days} дней просрочена.",
        ],
        key_phrases: &[
            "Сумма задолженности составляет {amount} рублей",
            "При дальнейшей просрочке будут начисляться пени",
            "Информация может быть передана в бюро кредитных историй",
            "Предлагаю решить вопрос сейчас, пока условия ещё выгодные",
        ],
        closing: &[
            "Жду оплату до {date}. В противном случае будем вынуждены принять дополнительные меры.",
        ],
    },
    ScriptTemplate {
        scenario: Scenario::FirmDemand,
        psychotype: Psychotype::Toxic,
        opening: &["Добрый день. {operator_name}, {bank_name}. Звоню по вопросу задолженности."],
        key_phrases: &[
            "Прошу отнестись к вопросу серьёзно",
            "Это официальное уведомление",
            "Готов выслушать вашу позицию",
        ],
        closing: &["Понял вас. Зафиксировал информацию. До свидания."],
    },
    ScriptTemplate {
        scenario: Scenario::RestructureOffer,
        psychotype: Psychotype::Unable,
        opening: &[
            "Добрый день, {client_name}! Это {operator_name} из {bank_name}. Понимаю, что сейчас непростая ситуация с платежами.",
        ],
        key_phrases: &[
            "У нас есть программа реструктуризации",
            "Можем снизить ежемесячный платёж",
            "Давайте подберём комфортный график",
            "Главное не накапливать задолженность",
        ],
        closing: &[
            "Отлично! Оформлю заявку на реструктуризацию. Позвоню, когда будет решение.",
            "Рад, что нашли решение. Берегите себя!",
        ],
    },
    ScriptTemplate {
        scenario: Scenario::Empathy,
        psychotype: Psychotype::Unable,
        opening: &[
            "Добрый день, {client_name}. {operator_name}, {bank_name}. Как у вас дела? Звоню по поводу платежа.",
        ],
        key_phrases: &[
            "Понимаю, что сейчас сложно",
            "Многие оказываются в подобной ситуации",
            "Давайте вместе найдём выход",
            "Что мы можем сделать, чтобы помочь?",
        ],
        closing: &["Держитесь! Мы всегда готовы помочь найти решение."],
    },
    ScriptTemplate {
        scenario: Scenario::Empathy,
        psychotype: Psychotype::Forgetful,
        opening: &[
            "Добрый день, {client_name}. {operator_name}, {bank_name}. Звоню по поводу платежа, всё ли у вас в порядке?",
        ],
        key_phrases: &[
            "Понимаю, что такое бывает",
            "Давайте вместе посмотрим, как удобнее оплатить",
        ],
        closing: &["Спасибо, что нашли время. Хорошего дня!"],
    },
];

/// Template for the pair, else the scenario's forgetful template, else the
/// soft reminder for a forgetful client.
pub(crate) fn template_for(psychotype: Psychotype, scenario: Scenario) -> &'static ScriptTemplate {
    let find = |scenario: Scenario, psychotype: Psychotype| {
        TEMPLATES
            .iter()
            .find(|template| template.scenario == scenario && template.psychotype == psychotype)
    };

    find(scenario, psychotype)
        .or_else(|| find(scenario, Psychotype::Forgetful))
        .unwrap_or(&TEMPLATES[0])
}

/// Points of a call, in the order an operator normally reaches them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallStep {
    Greeting,
    Identification,
    Purpose,
    PromiseRequest,
    Confirmation,
    Farewell,
}

impl CallStep {
    pub(crate) const fn phrases(self) -> &'static [&'static str] {
        match self {
            Self::Greeting => &["Добрый день", "Здравствуйте", "Доброе утро", "Добрый вечер"],
            Self::Identification => &[
                "Я разговариваю с {client_name}?",
                "Это {client_name}?",
                "Скажите, пожалуйста, это {client_name}?",
            ],
            Self::Purpose => &[
                "Звоню по поводу вашего кредитного договора",
                "Обращаюсь по вопросу задолженности",
                "Хотел уточнить по поводу платежа",
            ],
            Self::PromiseRequest => &[
                "Когда сможете произвести оплату?",
                "На какую дату можем рассчитывать?",
                "Какую сумму и когда готовы внести?",
            ],
            Self::Confirmation => &[
                "Правильно ли я понял, что оплата поступит {date}?",
                "Договорились на {amount} до {date}, верно?",
                "Фиксирую: {amount} рублей до {date}.",
            ],
            Self::Farewell => &[
                "Спасибо за разговор. Всего доброго!",
                "Хорошего дня!",
                "До свидания, ждём оплату.",
            ],
        }
    }
}
