//! Seed content for the collections that start from fixed values.

use crate::structures::{Authority, SliderItem};

pub const DEFAULT_LOGO_PATH: &str = "/zxczxc.jpg";

struct AuthoritySeed {
    id: &'static str,
    name: &'static str,
    short_name: &'static str,
    description: &'static str,
    website: &'static str,
    phone: &'static str,
    email: &'static str,
    address: &'static str,
    functions: [&'static str; 4],
}

const AUTHORITY_SEEDS: [AuthoritySeed; 6] = [
    AuthoritySeed {
        id: "1",
        name: "Федеральная налоговая служба России",
        short_name: "ФНС России",
        description: "Контроль за соблюдением налогового законодательства, правильностью исчисления, полнотой и своевременностью уплаты налогов",
        website: "https://nalog.gov.ru",
        phone: "8-800-222-22-22",
        email: "info@nalog.ru",
        address: "г. Москва, ул. Неглинная, д. 23",
        functions: [
            "Налоговый контроль",
            "Камеральные и выездные проверки",
            "Взыскание недоимок",
            "Регистрация налогоплательщиков",
        ],
    },
    AuthoritySeed {
        id: "2",
        name: "Федеральная служба государственной регистрации, кадастра и картографии",
        short_name: "Росреестр",
        description: "Государственная регистрация прав на недвижимое имущество, ведение государственного кадастра недвижимости",
        website: "https://rosreestr.gov.ru",
        phone: "8-800-100-34-34",
        email: "info@rosreestr.ru",
        address: "г. Москва, ул. Мясницкая, д. 39",
        functions: [
            "Государственная регистрация прав",
            "Ведение кадастра недвижимости",
            "Кадастровая оценка",
            "Государственный земельный надзор",
        ],
    },
    AuthoritySeed {
        id: "3",
        name: "Федеральная служба по надзору в сфере природопользования",
        short_name: "Росприроднадзор",
        description: "Контроль и надзор в сфере природопользования, охраны окружающей среды",
        website: "https://rpn.gov.ru",
        phone: "8-800-100-94-00",
        email: "info@rpn.gov.ru",
        address: "г. Москва, ул. Большая Грузинская, д. 4/6",
        functions: [
            "Экологический контроль",
            "Контроль использования земель",
            "Надзор за соблюдением земельного законодательства",
            "Выдача разрешений на природопользование",
        ],
    },
    AuthoritySeed {
        id: "4",
        name: "Федеральная служба государственного строительного надзора",
        short_name: "Госстройнадзор",
        description: "Контроль и надзор в области градостроительной деятельности",
        website: "https://gosstroynadzor.gov.ru",
        phone: "8-495-625-35-50",
        email: "info@gosstroynadzor.ru",
        address: "г. Москва, Садовая-Самотечная ул., д. 10/14",
        functions: [
            "Строительный надзор",
            "Контроль соблюдения градостроительного законодательства",
            "Выдача разрешений на строительство",
            "Контроль самовольного строительства",
        ],
    },
    AuthoritySeed {
        id: "5",
        name: "Прокуратура Российской Федерации",
        short_name: "Генпрокуратура РФ",
        description: "Надзор за соблюдением Конституции РФ и исполнением законов",
        website: "https://genproc.gov.ru",
        phone: "8-495-987-56-56",
        email: "info@genproc.gov.ru",
        address: "г. Москва, ул. Большая Дмитровка, д. 15а",
        functions: [
            "Прокурорский надзор",
            "Надзор за исполнением законов",
            "Координация правоохранительной деятельности",
            "Участие в рассмотрении дел судами",
        ],
    },
    AuthoritySeed {
        id: "6",
        name: "Министерство внутренних дел России",
        short_name: "МВД России",
        description: "Обеспечение безопасности личности, общества и государства",
        website: "https://mvd.gov.ru",
        phone: "8-495-667-74-47",
        email: "info@mvd.ru",
        address: "г. Москва, ул. Житная, д. 16",
        functions: [
            "Охрана общественного порядка",
            "Борьба с преступностью",
            "Административный надзор",
            "Миграционный учет",
        ],
    },
];

pub fn authorities() -> Vec<Authority> {
    AUTHORITY_SEEDS
        .iter()
        .map(|seed| Authority {
            id: seed.id.to_string(),
            name: seed.name.to_string(),
            short_name: Some(seed.short_name.to_string()),
            contact: seed.phone.to_string(),
            phone: Some(seed.phone.to_string()),
            email: Some(seed.email.to_string()),
            description: Some(seed.description.to_string()),
            website: Some(seed.website.to_string()),
            address: Some(seed.address.to_string()),
            functions: seed.functions.iter().map(|f| f.to_string()).collect(),
        })
        .collect()
}

pub fn slider_items() -> Vec<SliderItem> {
    (1..=5)
        .map(|n| SliderItem {
            id: n.to_string(),
            image_path: format!("/namber{}.png", n),
            caption: format!("Слайд {}", n),
        })
        .collect()
}
