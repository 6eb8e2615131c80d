//! Editable UI strings.
//!
//! `SiteTexts` is one flat record of named strings. `SiteTextsPatch` mirrors
//! it with every field optional; applying a patch overwrites only the fields
//! it carries.

use serde::{Deserialize, Serialize};

macro_rules! site_texts {
    ($($field:ident => $default:expr,)*) => {
        #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(rename_all = "camelCase", default)]
        pub struct SiteTexts {
            $(pub $field: String,)*
        }

        #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(rename_all = "camelCase", deny_unknown_fields)]
        pub struct SiteTextsPatch {
            $(
                #[serde(default, skip_serializing_if = "Option::is_none")]
                pub $field: Option<String>,
            )*
        }

        impl Default for SiteTexts {
            fn default() -> Self {
                Self {
                    $($field: $default.to_string(),)*
                }
            }
        }

        impl SiteTexts {
            pub const FIELD_COUNT: usize = [$(stringify!($field)),*].len();

            pub fn apply(&mut self, patch: SiteTextsPatch) {
                $(
                    if let Some(value) = patch.$field {
                        self.$field = value;
                    }
                )*
            }
        }

        impl SiteTextsPatch {
            pub fn is_empty(&self) -> bool {
                true $(&& self.$field.is_none())*
            }
        }
    };
}

site_texts! {
    site_name => "Портал обращений граждан",
    header_slogan => "Ваш голос важен для нас",

    nav_home => "Главная",
    nav_news => "Новости",
    nav_about => "О нас",
    nav_contacts => "Контакты",
    nav_admin => "Админ",

    slider_title => "Актуальные проблемы",
    slider_description => "Заниженная кадастровая стоимость (заниженные налоги) — это потери бюджета. Сообщите нам, и мы направим информацию в государственные органы!",
    slider_button_prev => "Назад",
    slider_button_next => "Далее",

    slider_text1_title => "Заниженная кадастровая стоимость (занижены налоги) – потери бюджета",
    slider_text1_content => "Сообщи, направим информацию в госорганы!",
    slider_text2_title => "Недостоверные сведения об объекте и его характеристиках.",
    slider_text2_content => "Сообщи, направим информацию в госорганы!",
    slider_text3_title => "Объект не включен в перечень налогоплательщиков от кадастровой стоимости – потери бюджета.",
    slider_text3_content => "Сообщи, направим информацию в госорганы!",
    slider_text4_title => "Нецелевое использование земельного участка.",
    slider_text4_content => "Сообщи, направим информацию в госорганы!",
    slider_text5_title => "Самовольное строительство, неоформленный объект недвижимости!",
    slider_text5_content => "Сообщи, направим информацию в госорганы!",

    putin_name => "Путин В.В.",
    putin_position => "Позиция главы государства",
    putin_main_quote => "По мнению главы государства, налоговая система должна обеспечивать поступление ресурсов для решения общенациональных задач, а также для реализации региональных программ. Она призвана сокращать неравенство, причём не только в обществе, но и в социально-экономическом развитии регионов, учитывать уровень доходов граждан и компаний.",
    putin_quote1 => "При этом нужно, безусловно, закрыть все лазейки, которые используются некоторыми компаниями для уклонения от уплаты налогов или занижения налоговых платежей",
    putin_quote2 => "Налоговая политика должна быть не только эффективной, но и справедливой",
    putin_quote3 => "Коррупция — это недополучение государственных доходов, в том числе налоговых",
    putin_quote4 => "Все хитрят. Нужно просто найти оптимальный вариант, чтобы и потребитель получал выгоду, и государство не страдало, а отрасль развивалась",
    source_text => "Источник",

    check_form_title => "Форма проверки объекта",
    check_form_description => "Сообщайте о нарушениях, которые, по вашему мнению, имеют место. Мы не собираем данные о пользователях. Если вы считаете, что нарушено законодательство, сообщите об этом анонимно. Наши специалисты проверят информацию и, если она подтвердится, направят данные в государственные органы.",
    check_form_submit => "Отправить сообщение",

    home_title => "Добро пожаловать на портал обращений граждан",
    home_subtitle => "Здесь вы можете подать жалобу или обращение",
    home_description => "Наша система обеспечивает быстрое и качественное рассмотрение ваших обращений",
    complaints_form_title => "Форма подачи обращения",
    complaints_form_description => "Заполните все поля для подачи обращения",
    complaints_form_submit => "Отправить обращение",

    form_field_name => "Имя",
    form_field_email => "Email",
    form_field_phone => "Телефон",
    form_field_subject => "Тема обращения",
    form_field_message => "Текст обращения",
    form_field_captcha => "Введите код с картинки",

    news_section => "Новости",
    documents_section => "Документы",
    authorities_section => "Контролирующие органы",

    btn_read_more => "Читать далее",
    btn_back => "Назад",
    btn_next => "Далее",
    btn_save => "Сохранить",
    btn_cancel => "Отменить",
    btn_edit => "Редактировать",
    btn_delete => "Удалить",
    btn_add => "Добавить",

    footer_text => "Все права защищены",
    footer_contacts => "Контакты для связи",
    footer_working_hours => "Режим работы: Пн-Пт 9:00-18:00",

    success_message => "Операция выполнена успешно",
    error_message => "Произошла ошибка",
    loading_text => "Загрузка...",
    no_data_text => "Нет данных для отображения",
}
