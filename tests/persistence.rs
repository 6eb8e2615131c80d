use std::path::Path;

use portal::defaults;
use portal::store::today;
use portal::structures::{AuthorityDraft, DocumentDraft, NewsDraft, ReportStatus, SliderDraft};
use portal::texts::{SiteTexts, SiteTextsPatch};
use portal::{PersistencePolicy, PortalStore, Storage};
use tempfile::TempDir;

fn open(dir: &Path, policy: PersistencePolicy) -> PortalStore {
    let storage = Storage::open_path(dir.join("portal_db"), false).unwrap();
    PortalStore::new(storage, policy)
}

fn touch_site_content(store: &mut PortalStore) {
    store.add_authority(AuthorityDraft {
        name: "Роструд".into(),
        contact: "8-800-707-88-41".into(),
        ..Default::default()
    });
    store.delete_slider_item("3");
    store.add_slider_item(SliderDraft {
        image_path: "/namber6.png".into(),
        caption: "Слайд 6".into(),
    });
    store.update_logo("/logo-new.png");
    store.update_site_texts(SiteTextsPatch {
        site_name: Some("Новое имя".into()),
        ..Default::default()
    });
}

#[test]
fn restart_keeps_core_collections_and_reseeds_the_rest() {
    let dir = TempDir::new().unwrap();
    let before = {
        let mut store = open(dir.path(), PersistencePolicy::Core);
        let kept = store.add_report("Самовольная постройка во дворе");
        let dropped = store.add_report("Дубликат");
        store.update_report_status(&kept, ReportStatus::Forwarded);
        store.delete_report(&dropped);
        store.publish_report_as_news(&kept).unwrap();
        store.add_news(NewsDraft {
            title: "Итоги квартала".into(),
            content: "Рассмотрено 40 обращений".into(),
            preview: "Рассмотрено 40".into(),
            image: Some("/q1.png".into()),
        });
        store.add_document(DocumentDraft {
            name: "Регламент".into(),
            link: "/reglament.pdf".into(),
            category: Some("Нормативные акты".into()),
            date: Some(today()),
            ..Default::default()
        });
        touch_site_content(&mut store);
        store.state()
    };

    let after = open(dir.path(), PersistencePolicy::Core).state();
    assert_eq!(after.reports, before.reports);
    assert_eq!(after.reports.len(), 1);
    assert_eq!(after.reports[0].status, ReportStatus::Forwarded);
    assert_eq!(after.news, before.news);
    assert_eq!(after.documents, before.documents);

    assert_eq!(after.authorities, defaults::authorities());
    assert_eq!(after.slider_items, defaults::slider_items());
    assert_eq!(after.logo_path, defaults::DEFAULT_LOGO_PATH);
    assert_eq!(after.site_texts, SiteTexts::default());
}

#[test]
fn full_persistence_keeps_site_content() {
    let dir = TempDir::new().unwrap();
    let before = {
        let mut store = open(dir.path(), PersistencePolicy::All);
        touch_site_content(&mut store);
        store.state()
    };

    let after = open(dir.path(), PersistencePolicy::All).state();
    assert_eq!(after.authorities, before.authorities);
    assert_eq!(after.authorities.len(), 7);
    assert_eq!(after.slider_items, before.slider_items);
    assert_eq!(after.logo_path, "/logo-new.png");
    assert_eq!(after.site_texts.site_name, "Новое имя");
}

#[test]
fn ids_issued_after_restart_exceed_loaded_ids() {
    let dir = TempDir::new().unwrap();
    let last: u64 = {
        let mut store = open(dir.path(), PersistencePolicy::Core);
        (0..50).map(|i| store.add_report(format!("жалоба {}", i))).last().unwrap().parse().unwrap()
    };

    let mut store = open(dir.path(), PersistencePolicy::Core);
    let next: u64 = store.add_report("после перезапуска").parse().unwrap();
    assert!(next > last);

    let state = store.state();
    let mut ids: Vec<&str> = state.reports.iter().map(|r| r.id.as_str()).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 51);
}

#[test]
fn complaint_to_news_scenario_survives_restart() {
    let dir = TempDir::new().unwrap();
    let (report_id, news_id) = {
        let mut store = open(dir.path(), PersistencePolicy::Core);
        let report_id = store.add_report("Незаконная постройка");
        let report = store.report(&report_id).unwrap();
        assert_eq!(report.status, ReportStatus::Pending);
        assert_eq!(report.date, today());

        let news_id = store.publish_report_as_news(&report_id).unwrap();
        (report_id, news_id)
    };

    let store = open(dir.path(), PersistencePolicy::Core);
    let item = store.news_item(&news_id).unwrap();
    assert!(item.is_published);
    assert_eq!(item.preview, "Незаконная постройка");
    assert_eq!(item.title, format!("Обращение {}", report_id));
}
