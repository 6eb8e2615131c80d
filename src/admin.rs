//! Admin form handling. Everything here is checked before the store is
//! touched, so a rejected form leaves state as it was.

use thiserror::Error;

use crate::relay::is_valid_address;
use crate::store::today;
use crate::structures::{
    Authority, AuthorityDraft, DocumentDraft, DocumentItem, NewsDraft, NewsItem, SliderDraft,
    SliderItem,
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AdminError {
    #[error("a link to the document or an uploaded file is required")]
    MissingDocumentLink,
    #[error("field {0} is required")]
    MissingField(&'static str),
    #[error("invalid email address: {0}")]
    InvalidEmail(String),
}

fn required(value: &str, field: &'static str) -> Result<String, AdminError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(AdminError::MissingField(field))
    } else {
        Ok(trimmed.to_string())
    }
}

fn optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewsForm {
    pub title: String,
    pub content: String,
    pub preview: String,
    pub image: String,
}

impl NewsForm {
    pub fn validate(&self) -> Result<NewsDraft, AdminError> {
        Ok(NewsDraft {
            title: required(&self.title, "title")?,
            content: required(&self.content, "content")?,
            preview: self.preview.trim().to_string(),
            image: optional(&self.image),
        })
    }

    /// The edited record for `existing`. Id, date and visibility carry over.
    pub fn apply_to(&self, existing: &NewsItem) -> Result<NewsItem, AdminError> {
        let edited = self
            .validate()?
            .into_item(existing.id.clone(), existing.date);
        Ok(NewsItem {
            is_published: existing.is_published,
            ..edited
        })
    }
}

impl From<&NewsItem> for NewsForm {
    fn from(item: &NewsItem) -> Self {
        NewsForm {
            title: item.title.clone(),
            content: item.content.clone(),
            preview: item.preview.clone(),
            image: item.image.clone().unwrap_or_default(),
        }
    }
}

/// A file picked in the upload field. Nothing is stored; the document gets
/// a reference that only lives as long as the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub name: String,
    pub size: u64,
}

impl UploadedFile {
    pub fn ephemeral_link(&self) -> String {
        format!("blob:{}", self.name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentForm {
    pub title: String,
    pub description: String,
    pub category: String,
    pub url: String,
    pub file: Option<UploadedFile>,
}

impl DocumentForm {
    /// A non-empty upload takes precedence over the typed url.
    pub fn validate(&self) -> Result<DocumentDraft, AdminError> {
        let title = required(&self.title, "title")?;
        let link = match &self.file {
            Some(file) if file.size > 0 => file.ephemeral_link(),
            _ => optional(&self.url).ok_or(AdminError::MissingDocumentLink)?,
        };
        Ok(DocumentDraft {
            name: title.clone(),
            title: Some(title),
            link: link.clone(),
            url: Some(link),
            description: optional(&self.description),
            category: optional(&self.category),
            date: Some(today()),
        })
    }

    pub fn apply_to(&self, existing: &DocumentItem) -> Result<DocumentItem, AdminError> {
        let edited = self.validate()?.into_item(existing.id.clone());
        Ok(DocumentItem {
            date: existing.date,
            ..edited
        })
    }
}

impl From<&DocumentItem> for DocumentForm {
    fn from(item: &DocumentItem) -> Self {
        DocumentForm {
            title: item.display_title().to_string(),
            description: item.description.clone().unwrap_or_default(),
            category: item.category.clone().unwrap_or_default(),
            url: item.href().to_string(),
            file: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorityForm {
    pub name: String,
    pub short_name: String,
    pub description: String,
    pub website: String,
    pub contact: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    /// One function per line.
    pub functions: String,
}

impl AuthorityForm {
    fn functions(&self) -> Vec<String> {
        self.functions
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn validate(&self) -> Result<AuthorityDraft, AdminError> {
        let name = required(&self.name, "name")?;
        let email = optional(&self.email);
        if let Some(email) = &email {
            if !is_valid_address(email) {
                return Err(AdminError::InvalidEmail(email.clone()));
            }
        }
        let phone = optional(&self.phone);
        let contact = optional(&self.contact)
            .or_else(|| phone.clone())
            .unwrap_or_default();
        Ok(AuthorityDraft {
            name,
            short_name: optional(&self.short_name),
            contact,
            phone,
            email,
            description: optional(&self.description),
            website: optional(&self.website),
            address: optional(&self.address),
            functions: self.functions(),
        })
    }

    /// The edited record for `existing`, keeping its id.
    pub fn apply_to(&self, existing: &Authority) -> Result<Authority, AdminError> {
        Ok(self.validate()?.into_item(existing.id.clone()))
    }
}

impl From<&Authority> for AuthorityForm {
    fn from(item: &Authority) -> Self {
        let text = |value: &Option<String>| value.clone().unwrap_or_default();
        AuthorityForm {
            name: item.name.clone(),
            short_name: text(&item.short_name),
            description: text(&item.description),
            website: text(&item.website),
            contact: item.contact.clone(),
            phone: text(&item.phone),
            email: text(&item.email),
            address: text(&item.address),
            functions: item.functions.join("\n"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SliderForm {
    pub image_path: String,
    pub caption: String,
}

impl SliderForm {
    pub fn validate(&self) -> Result<SliderDraft, AdminError> {
        Ok(SliderDraft {
            image_path: required(&self.image_path, "image")?,
            caption: self.caption.trim().to_string(),
        })
    }

    pub fn apply_to(&self, existing: &SliderItem) -> Result<SliderItem, AdminError> {
        Ok(self.validate()?.into_item(existing.id.clone()))
    }
}

impl From<&SliderItem> for SliderForm {
    fn from(item: &SliderItem) -> Self {
        SliderForm {
            image_path: item.image_path.clone(),
            caption: item.caption.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_needs_a_link_or_a_file() {
        let form = DocumentForm {
            title: "Положение".into(),
            ..Default::default()
        };
        assert_eq!(form.validate(), Err(AdminError::MissingDocumentLink));

        let empty_upload = DocumentForm {
            file: Some(UploadedFile {
                name: "empty.pdf".into(),
                size: 0,
            }),
            ..form.clone()
        };
        assert_eq!(empty_upload.validate(), Err(AdminError::MissingDocumentLink));
    }

    #[test]
    fn upload_wins_over_url_and_fills_both_link_fields() {
        let draft = DocumentForm {
            title: " Регламент ".into(),
            url: "https://example.org/r.pdf".into(),
            file: Some(UploadedFile {
                name: "r.pdf".into(),
                size: 1024,
            }),
            category: "Нормативные акты".into(),
            ..Default::default()
        }
        .validate()
        .unwrap();
        assert_eq!(draft.name, "Регламент");
        assert_eq!(draft.title.as_deref(), Some("Регламент"));
        assert_eq!(draft.link, "blob:r.pdf");
        assert_eq!(draft.url.as_deref(), Some("blob:r.pdf"));
        assert_eq!(draft.date, Some(today()));
    }

    #[test]
    fn authority_functions_split_per_line_and_contact_falls_back_to_phone() {
        let draft = AuthorityForm {
            name: "Роструд".into(),
            phone: "8-800-707-88-41".into(),
            functions: "Надзор за трудом\n\n  Проверки  \n".into(),
            ..Default::default()
        }
        .validate()
        .unwrap();
        assert_eq!(draft.functions, vec!["Надзор за трудом", "Проверки"]);
        assert_eq!(draft.contact, "8-800-707-88-41");
    }

    #[test]
    fn authority_rejects_bad_email() {
        let form = AuthorityForm {
            name: "Роструд".into(),
            email: "not-an-email".into(),
            ..Default::default()
        };
        assert_eq!(
            form.validate(),
            Err(AdminError::InvalidEmail("not-an-email".into()))
        );
    }

    #[test]
    fn news_requires_title_and_content() {
        let form = NewsForm {
            title: "   ".into(),
            content: "текст".into(),
            ..Default::default()
        };
        assert_eq!(form.validate(), Err(AdminError::MissingField("title")));
    }

    #[test]
    fn edited_news_keeps_id_date_and_visibility() {
        let existing = NewsDraft {
            title: "Старый".into(),
            content: "текст".into(),
            preview: String::new(),
            image: Some("/a.png".into()),
        }
        .into_item("42".into(), chrono::NaiveDate::from_ymd_opt(2024, 1, 9).unwrap());
        let existing = NewsItem {
            is_published: false,
            ..existing
        };
        let mut form = NewsForm::from(&existing);
        assert_eq!(form.image, "/a.png");
        form.title = "Новый".into();
        form.image = String::new();

        let edited = form.apply_to(&existing).unwrap();
        assert_eq!(edited.id, "42");
        assert_eq!(edited.date, existing.date);
        assert!(!edited.is_published);
        assert_eq!(edited.title, "Новый");
        assert_eq!(edited.image, None);
    }

    #[test]
    fn edited_document_keeps_its_original_date() {
        let existing = DocumentItem {
            id: "7".into(),
            name: "Устав".into(),
            title: None,
            link: "/ustav.pdf".into(),
            url: None,
            description: None,
            category: None,
            date: None,
        };
        let form = DocumentForm {
            category: "Уставы".into(),
            ..DocumentForm::from(&existing)
        };
        let edited = form.apply_to(&existing).unwrap();
        assert_eq!(edited.id, "7");
        assert_eq!(edited.date, None);
        assert_eq!(edited.href(), "/ustav.pdf");
        assert_eq!(edited.category.as_deref(), Some("Уставы"));
    }

    #[test]
    fn authority_round_trips_through_its_form() {
        let existing = AuthorityForm {
            name: "Прокуратура".into(),
            contact: "112".into(),
            email: "info@prok.example.ru".into(),
            functions: "Надзор\nПроверки".into(),
            ..Default::default()
        }
        .validate()
        .unwrap()
        .into_item("3".into());
        let form = AuthorityForm::from(&existing);
        assert_eq!(form.apply_to(&existing).unwrap(), existing);
    }

    #[test]
    fn slide_needs_an_image() {
        let form = SliderForm {
            image_path: " ".into(),
            caption: "Слайд".into(),
        };
        assert_eq!(form.validate(), Err(AdminError::MissingField("image")));

        let existing = SliderItem {
            id: "1".into(),
            image_path: "/namber1.png".into(),
            caption: "Слайд 1".into(),
        };
        let edited = SliderForm {
            caption: " Новый ".into(),
            ..SliderForm::from(&existing)
        }
        .apply_to(&existing)
        .unwrap();
        assert_eq!(edited.id, "1");
        assert_eq!(edited.caption, "Новый");
        assert_eq!(edited.image_path, "/namber1.png");
    }
}
