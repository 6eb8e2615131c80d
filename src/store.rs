use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde::Serialize;
use tokio::sync::watch;

use crate::defaults;
use crate::ids::IdGenerator;
use crate::settings::PersistencePolicy;
use crate::storage::{keys, Storage};
use crate::structures::{
    Authority, AuthorityDraft, DocumentDraft, DocumentItem, Identified, NewsDraft, NewsItem,
    Report, ReportStatus, SliderDraft, SliderItem,
};
use crate::texts::{SiteTexts, SiteTextsPatch};

pub const PREVIEW_CHARS: usize = 150;
const ELLIPSIS: &str = "...";

/// Everything the portal shows, as one value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    pub reports: Vec<Report>,
    pub news: Vec<NewsItem>,
    pub documents: Vec<DocumentItem>,
    pub authorities: Vec<Authority>,
    pub slider_items: Vec<SliderItem>,
    pub logo_path: String,
    pub site_texts: SiteTexts,
}

impl Default for AppState {
    fn default() -> Self {
        AppState {
            reports: Vec::new(),
            news: Vec::new(),
            documents: Vec::new(),
            authorities: defaults::authorities(),
            slider_items: defaults::slider_items(),
            logo_path: defaults::DEFAULT_LOGO_PATH.to_string(),
            site_texts: SiteTexts::default(),
        }
    }
}

/// Today's calendar date, UTC.
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// First [`PREVIEW_CHARS`] characters of `content`, with `...` appended when
/// anything was cut.
pub fn make_preview(content: &str) -> String {
    match content.char_indices().nth(PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}{}", &content[..cut], ELLIPSIS),
        None => content.to_string(),
    }
}

/// Copy of `items` with the entry sharing `record`'s id swapped for
/// `merge(stored, record)`. `None` when no entry has that id.
fn replace_by_id<T, F>(items: &[T], record: T, merge: F) -> Option<Vec<T>>
where
    T: Identified + Clone,
    F: FnOnce(&T, T) -> T,
{
    let index = items.iter().position(|item| item.id() == record.id())?;
    let mut next = items.to_vec();
    next[index] = merge(&items[index], record);
    Some(next)
}

fn remove_by_id<T: Identified + Clone>(items: &[T], id: &str) -> Option<Vec<T>> {
    let index = items.iter().position(|item| item.id() == id)?;
    let mut next = items.to_vec();
    next.remove(index);
    Some(next)
}

fn unknown_id(kind: &str, id: &str) {
    log::debug!("no {} with id {}, nothing changed", kind, id);
}

fn find_by_id<'a, T: Identified>(items: &'a [T], id: &str) -> Option<&'a T> {
    items.iter().find(|item| item.id() == id)
}

fn appended<T: Clone>(items: &[T], item: T) -> Vec<T> {
    let mut next = Vec::with_capacity(items.len() + 1);
    next.extend_from_slice(items);
    next.push(item);
    next
}

/// Owner of the portal's state.
///
/// Each mutation builds a new [`AppState`] from the current one, swaps it in
/// and publishes it to subscribers. Reports, news and documents are written
/// to storage after every change to them; the site-content collections only
/// when the store runs under [`PersistencePolicy::All`]. Mutations aimed at
/// an id that is not present change nothing.
pub struct PortalStore {
    storage: Storage,
    policy: PersistencePolicy,
    ids: IdGenerator,
    state: Arc<AppState>,
    notifier: watch::Sender<Arc<AppState>>,
}

impl PortalStore {
    pub fn new(storage: Storage, policy: PersistencePolicy) -> Self {
        let seeded = AppState::default();
        let mut state = AppState {
            reports: storage.load(keys::REPORTS, Vec::new()),
            news: storage.load(keys::NEWS, Vec::new()),
            documents: storage.load(keys::DOCUMENTS, Vec::new()),
            ..seeded
        };
        if policy == PersistencePolicy::All {
            state.authorities = storage.load(keys::AUTHORITIES, state.authorities);
            state.slider_items = storage.load(keys::SLIDER_ITEMS, state.slider_items);
            state.logo_path = storage.load(keys::LOGO_PATH, state.logo_path);
            state.site_texts = storage.load(keys::SITE_TEXTS, state.site_texts);
        }

        let ids = IdGenerator::new();
        state.reports.iter().for_each(|r| ids.observe(&r.id));
        state.news.iter().for_each(|n| ids.observe(&n.id));
        state.documents.iter().for_each(|d| ids.observe(&d.id));
        state.authorities.iter().for_each(|a| ids.observe(&a.id));
        state.slider_items.iter().for_each(|s| ids.observe(&s.id));

        log::info!(
            "Store loaded: {} reports, {} news, {} documents ({:?} persistence)",
            state.reports.len(),
            state.news.len(),
            state.documents.len(),
            policy
        );

        let state = Arc::new(state);
        let (notifier, _) = watch::channel(Arc::clone(&state));
        PortalStore {
            storage,
            policy,
            ids,
            state,
            notifier,
        }
    }

    /// A store over a throwaway database with the default policy.
    pub fn in_memory() -> Result<Self, sled::Error> {
        Ok(Self::new(Storage::temporary()?, PersistencePolicy::Core))
    }

    pub fn policy(&self) -> PersistencePolicy {
        self.policy
    }

    /// The current snapshot. Later mutations do not affect it.
    pub fn state(&self) -> Arc<AppState> {
        Arc::clone(&self.state)
    }

    /// Receiver that sees every snapshot published after this call.
    pub fn subscribe(&self) -> watch::Receiver<Arc<AppState>> {
        self.notifier.subscribe()
    }

    pub fn report(&self, id: &str) -> Option<&Report> {
        find_by_id(&self.state.reports, id)
    }

    pub fn news_item(&self, id: &str) -> Option<&NewsItem> {
        find_by_id(&self.state.news, id)
    }

    pub fn document(&self, id: &str) -> Option<&DocumentItem> {
        find_by_id(&self.state.documents, id)
    }

    pub fn authority(&self, id: &str) -> Option<&Authority> {
        find_by_id(&self.state.authorities, id)
    }

    pub fn slider_item(&self, id: &str) -> Option<&SliderItem> {
        find_by_id(&self.state.slider_items, id)
    }

    fn commit(&mut self, next: AppState) {
        self.state = Arc::new(next);
        self.notifier.send_replace(Arc::clone(&self.state));
    }

    fn persist_site_content<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        if self.policy == PersistencePolicy::All {
            self.storage.save(key, value);
        }
    }

    // Reports

    pub fn add_report(&mut self, content: impl Into<String>) -> String {
        let report = Report {
            id: self.ids.next_id(),
            content: content.into(),
            status: ReportStatus::Pending,
            date: today(),
        };
        let id = report.id.clone();
        let reports = appended(&self.state.reports, report);
        self.storage.save(keys::REPORTS, &reports);
        log::info!("Report {} recorded", id);
        self.commit(AppState {
            reports,
            ..(*self.state).clone()
        });
        id
    }

    pub fn update_report_status(&mut self, id: &str, status: ReportStatus) {
        let Some(index) = self.state.reports.iter().position(|r| r.id == id) else {
            return unknown_id("report", id);
        };
        let mut reports = self.state.reports.clone();
        reports[index].status = status;
        self.storage.save(keys::REPORTS, &reports);
        self.commit(AppState {
            reports,
            ..(*self.state).clone()
        });
    }

    pub fn delete_report(&mut self, id: &str) {
        let Some(reports) = remove_by_id(&self.state.reports, id) else {
            return unknown_id("report", id);
        };
        self.storage.save(keys::REPORTS, &reports);
        self.commit(AppState {
            reports,
            ..(*self.state).clone()
        });
    }

    /// Turn a report into a published news item. The report itself is left
    /// as it is. Returns the news id, or `None` when no such report exists.
    pub fn publish_report_as_news(&mut self, report_id: &str) -> Option<String> {
        let report = match self.report(report_id) {
            Some(report) => report.clone(),
            None => {
                log::debug!("publish skipped, no report {}", report_id);
                return None;
            }
        };
        let item = NewsItem {
            id: self.ids.next_id(),
            title: format!("Обращение {}", report.id),
            preview: make_preview(&report.content),
            content: report.content,
            date: today(),
            is_published: true,
            image: None,
        };
        let id = item.id.clone();
        let news = appended(&self.state.news, item);
        self.storage.save(keys::NEWS, &news);
        log::info!("Report {} published as news {}", report_id, id);
        self.commit(AppState {
            news,
            ..(*self.state).clone()
        });
        Some(id)
    }

    // News

    pub fn add_news(&mut self, draft: NewsDraft) -> String {
        let item = draft.into_item(self.ids.next_id(), today());
        let id = item.id.clone();
        let news = appended(&self.state.news, item);
        self.storage.save(keys::NEWS, &news);
        self.commit(AppState {
            news,
            ..(*self.state).clone()
        });
        id
    }

    /// Replace a news item by id. The stored creation date is kept whatever
    /// the caller sends.
    pub fn update_news(&mut self, item: NewsItem) {
        let id = item.id.clone();
        let Some(news) = replace_by_id(&self.state.news, item, |stored, item| NewsItem {
            date: stored.date,
            ..item
        }) else {
            return unknown_id("news item", &id);
        };
        self.storage.save(keys::NEWS, &news);
        self.commit(AppState {
            news,
            ..(*self.state).clone()
        });
    }

    pub fn delete_news(&mut self, id: &str) {
        let Some(news) = remove_by_id(&self.state.news, id) else {
            return unknown_id("news item", id);
        };
        self.storage.save(keys::NEWS, &news);
        self.commit(AppState {
            news,
            ..(*self.state).clone()
        });
    }

    // Documents

    pub fn add_document(&mut self, draft: DocumentDraft) -> String {
        let item = draft.into_item(self.ids.next_id());
        let id = item.id.clone();
        let documents = appended(&self.state.documents, item);
        self.storage.save(keys::DOCUMENTS, &documents);
        self.commit(AppState {
            documents,
            ..(*self.state).clone()
        });
        id
    }

    /// Replace a document by id, keeping its stored date.
    pub fn update_document(&mut self, item: DocumentItem) {
        let id = item.id.clone();
        let Some(documents) = replace_by_id(&self.state.documents, item, |stored, item| DocumentItem {
            date: stored.date,
            ..item
        }) else {
            return unknown_id("document", &id);
        };
        self.storage.save(keys::DOCUMENTS, &documents);
        self.commit(AppState {
            documents,
            ..(*self.state).clone()
        });
    }

    pub fn delete_document(&mut self, id: &str) {
        let Some(documents) = remove_by_id(&self.state.documents, id) else {
            return unknown_id("document", id);
        };
        self.storage.save(keys::DOCUMENTS, &documents);
        self.commit(AppState {
            documents,
            ..(*self.state).clone()
        });
    }

    // Authorities

    pub fn add_authority(&mut self, draft: AuthorityDraft) -> String {
        let item = draft.into_item(self.ids.next_id());
        let id = item.id.clone();
        let authorities = appended(&self.state.authorities, item);
        self.persist_site_content(keys::AUTHORITIES, &authorities);
        self.commit(AppState {
            authorities,
            ..(*self.state).clone()
        });
        id
    }

    pub fn update_authority(&mut self, item: Authority) {
        let id = item.id.clone();
        let Some(authorities) = replace_by_id(&self.state.authorities, item, |_, item| item) else {
            return unknown_id("authority", &id);
        };
        self.persist_site_content(keys::AUTHORITIES, &authorities);
        self.commit(AppState {
            authorities,
            ..(*self.state).clone()
        });
    }

    pub fn delete_authority(&mut self, id: &str) {
        let Some(authorities) = remove_by_id(&self.state.authorities, id) else {
            return unknown_id("authority", id);
        };
        self.persist_site_content(keys::AUTHORITIES, &authorities);
        self.commit(AppState {
            authorities,
            ..(*self.state).clone()
        });
    }

    // Slider

    pub fn add_slider_item(&mut self, draft: SliderDraft) -> String {
        let item = draft.into_item(self.ids.next_id());
        let id = item.id.clone();
        let slider_items = appended(&self.state.slider_items, item);
        self.persist_site_content(keys::SLIDER_ITEMS, &slider_items);
        self.commit(AppState {
            slider_items,
            ..(*self.state).clone()
        });
        id
    }

    pub fn update_slider_item(&mut self, item: SliderItem) {
        let id = item.id.clone();
        let Some(slider_items) = replace_by_id(&self.state.slider_items, item, |_, item| item) else {
            return unknown_id("slider item", &id);
        };
        self.persist_site_content(keys::SLIDER_ITEMS, &slider_items);
        self.commit(AppState {
            slider_items,
            ..(*self.state).clone()
        });
    }

    pub fn delete_slider_item(&mut self, id: &str) {
        let Some(slider_items) = remove_by_id(&self.state.slider_items, id) else {
            return unknown_id("slider item", id);
        };
        self.persist_site_content(keys::SLIDER_ITEMS, &slider_items);
        self.commit(AppState {
            slider_items,
            ..(*self.state).clone()
        });
    }

    // Logo and texts

    pub fn update_logo(&mut self, path: impl Into<String>) {
        let logo_path = path.into();
        self.persist_site_content(keys::LOGO_PATH, &logo_path);
        self.commit(AppState {
            logo_path,
            ..(*self.state).clone()
        });
    }

    pub fn update_site_texts(&mut self, patch: SiteTextsPatch) {
        let mut site_texts = self.state.site_texts.clone();
        site_texts.apply(patch);
        self.persist_site_content(keys::SITE_TEXTS, &site_texts);
        self.commit(AppState {
            site_texts,
            ..(*self.state).clone()
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> PortalStore {
        PortalStore::in_memory().unwrap()
    }

    fn news_draft(title: &str) -> NewsDraft {
        NewsDraft {
            title: title.to_string(),
            content: "Текст новости".to_string(),
            preview: "Кратко".to_string(),
            image: None,
        }
    }

    #[test]
    fn preview_cuts_at_150_characters() {
        let long = "ж".repeat(300);
        let preview = make_preview(&long);
        assert_eq!(preview.chars().count(), PREVIEW_CHARS + ELLIPSIS.len());
        assert!(preview.starts_with(&"ж".repeat(150)));
        assert!(preview.ends_with("..."));

        let exact = "a".repeat(150);
        assert_eq!(make_preview(&exact), exact);
    }

    #[test]
    fn added_report_is_pending_and_dated_today() {
        let mut store = store();
        let id = store.add_report("Незаконная постройка");
        let report = store.report(&id).unwrap();
        assert_eq!(report.content, "Незаконная постройка");
        assert_eq!(report.status, ReportStatus::Pending);
        assert_eq!(report.date, today());
    }

    #[test]
    fn status_update_on_unknown_id_is_a_no_op() {
        let mut store = store();
        let id = store.add_report("x");
        let before = store.state();
        store.update_report_status("missing", ReportStatus::Reviewed);
        assert_eq!(*store.state(), *before);

        store.update_report_status(&id, ReportStatus::Forwarded);
        assert_eq!(store.report(&id).unwrap().status, ReportStatus::Forwarded);
    }

    #[test]
    fn publishing_unknown_report_leaves_news_alone() {
        let mut store = store();
        store.add_news(news_draft("Существующая"));
        let before = store.state().news.clone();
        assert_eq!(store.publish_report_as_news("nope"), None);
        assert_eq!(store.state().news, before);
    }

    #[test]
    fn published_report_keeps_content_and_stays_in_reports() {
        let mut store = store();
        let content = "д".repeat(300);
        let report_id = store.add_report(content.clone());
        let news_id = store.publish_report_as_news(&report_id).unwrap();

        let item = store.news_item(&news_id).unwrap();
        assert_eq!(item.title, format!("Обращение {}", report_id));
        assert_eq!(item.content, content);
        assert_eq!(item.preview.chars().count(), 153);
        assert!(item.is_published);
        assert_eq!(store.report(&report_id).unwrap().status, ReportStatus::Pending);
    }

    #[test]
    fn news_is_published_on_creation() {
        let mut store = store();
        let id = store.add_news(news_draft("Заголовок"));
        let item = store.news_item(&id).unwrap();
        assert!(item.is_published);
        assert_eq!(item.title, "Заголовок");
        assert_eq!(item.date, today());
    }

    #[test]
    fn update_is_idempotent() {
        let mut store = store();
        let id = store.add_news(news_draft("Старый"));
        let mut edited = store.news_item(&id).unwrap().clone();
        edited.title = "Новый".to_string();
        edited.is_published = false;

        store.update_news(edited.clone());
        let once = store.state();
        store.update_news(edited);
        assert_eq!(*store.state(), *once);
        assert_eq!(store.news_item(&id).unwrap().title, "Новый");
    }

    #[test]
    fn delete_shrinks_by_one_only_when_present() {
        let mut store = store();
        let first = store.add_document(DocumentDraft {
            name: "Устав".into(),
            link: "/ustav.pdf".into(),
            ..Default::default()
        });
        store.add_document(DocumentDraft {
            name: "Положение".into(),
            link: "/polozhenie.pdf".into(),
            ..Default::default()
        });

        store.delete_document("missing");
        assert_eq!(store.state().documents.len(), 2);
        store.delete_document(&first);
        assert_eq!(store.state().documents.len(), 1);
        assert!(store.document(&first).is_none());
    }

    #[test]
    fn deleted_report_does_not_cascade_to_news() {
        let mut store = store();
        let report_id = store.add_report("жалоба");
        let news_id = store.publish_report_as_news(&report_id).unwrap();
        store.delete_report(&report_id);
        assert!(store.report(&report_id).is_none());
        assert!(store.news_item(&news_id).is_some());
    }

    #[test]
    fn authorities_and_slider_follow_the_same_shape() {
        let mut store = store();
        assert_eq!(store.state().authorities.len(), 6);
        let id = store.add_authority(AuthorityDraft {
            name: "Роспотребнадзор".into(),
            contact: "8-800-555-49-43".into(),
            ..Default::default()
        });
        assert_eq!(store.state().authorities.len(), 7);
        let mut edited = store.authority(&id).unwrap().clone();
        edited.short_name = Some("РПН".into());
        store.update_authority(edited);
        assert_eq!(store.authority(&id).unwrap().short_name.as_deref(), Some("РПН"));
        store.delete_authority("1");
        assert!(store.authority("1").is_none());

        let slide = store.add_slider_item(SliderDraft {
            image_path: "/namber6.png".into(),
            caption: "Слайд 6".into(),
        });
        assert_ne!(slide, "6");
        store.delete_slider_item("2");
        assert_eq!(store.state().slider_items.len(), 5);
    }

    #[test]
    fn site_texts_patch_changes_one_field() {
        let mut store = store();
        let before = store.state().site_texts.clone();
        store.update_site_texts(SiteTextsPatch {
            slider_title: Some("X".into()),
            ..Default::default()
        });
        let after = store.state().site_texts.clone();
        assert_eq!(after.slider_title, "X");
        assert_eq!(
            SiteTexts {
                slider_title: before.slider_title.clone(),
                ..after
            },
            before
        );
    }

    #[test]
    fn old_snapshots_are_untouched_by_mutation() {
        let mut store = store();
        let snapshot = store.state();
        store.add_report("новая");
        store.update_logo("/logo.png");
        assert!(snapshot.reports.is_empty());
        assert_eq!(snapshot.logo_path, defaults::DEFAULT_LOGO_PATH);
        assert_eq!(store.state().logo_path, "/logo.png");
    }

    #[test]
    fn subscribers_see_each_commit() {
        let mut store = store();
        let mut rx = store.subscribe();
        assert!(!rx.has_changed().unwrap());
        store.add_report("первая");
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().reports.len(), 1);
        store.delete_report("missing");
        store.update_report_status("missing", ReportStatus::Reviewed);
        store.delete_authority("missing");
        store.delete_slider_item("missing");
        assert!(!rx.has_changed().unwrap());
        let id = store.state().reports[0].id.clone();
        store.delete_report(&id);
        assert!(rx.has_changed().unwrap());
    }

    #[test]
    fn edits_cannot_move_the_stored_date() {
        let mut store = store();
        let news_id = store.add_news(news_draft("Дата"));
        let mut edited = store.news_item(&news_id).unwrap().clone();
        edited.date = NaiveDate::from_ymd_opt(1999, 1, 1).unwrap();
        edited.title = "Дата изменена".to_string();
        store.update_news(edited);
        let item = store.news_item(&news_id).unwrap();
        assert_eq!(item.date, today());
        assert_eq!(item.title, "Дата изменена");

        let dated = NaiveDate::from_ymd_opt(2023, 5, 17).unwrap();
        let doc_id = store.add_document(DocumentDraft {
            name: "Регламент".into(),
            link: "/reglament.pdf".into(),
            date: Some(dated),
            ..Default::default()
        });
        let mut edited = store.document(&doc_id).unwrap().clone();
        edited.date = None;
        edited.category = Some("Приказы".into());
        store.update_document(edited);
        let doc = store.document(&doc_id).unwrap();
        assert_eq!(doc.date, Some(dated));
        assert_eq!(doc.category.as_deref(), Some("Приказы"));
    }

    #[test]
    fn unknown_id_mutations_leave_storage_alone() {
        let mut store = store();
        store.add_news(news_draft("Одна"));
        for key in [keys::REPORTS, keys::NEWS, keys::DOCUMENTS] {
            store.storage.put_raw(key, b"untouched").unwrap();
        }

        store.update_report_status("missing", ReportStatus::Forwarded);
        store.delete_report("missing");
        let mut ghost = store.state().news[0].clone();
        ghost.id = "missing".into();
        store.update_news(ghost);
        store.delete_news("missing");
        store.update_document(DocumentItem {
            id: "missing".into(),
            name: "Нет".into(),
            title: None,
            link: "/net.pdf".into(),
            url: None,
            description: None,
            category: None,
            date: None,
        });
        store.delete_document("missing");

        for key in [keys::REPORTS, keys::NEWS, keys::DOCUMENTS] {
            assert!(matches!(
                store.storage.try_load::<serde_json::Value>(key),
                Err(crate::storage::StorageError::Decode { .. })
            ));
        }
        assert_eq!(store.state().news.len(), 1);
    }
}
