//! End-to-end page flows through the public API: a gallery page backed by an
//! in-memory listing, a hero lightbox over static figures, and a project
//! index, each rendered back out to HTML.

use std::cell::{Cell, RefCell};

use folio_gal::config::StorageConfig;
use folio_gal::dom::{Document, Key};
use folio_gal::gallery::{BOTTOM_BUTTON_ID, STATUS_ERROR, STATUS_ID, TOP_BUTTON_ID};
use folio_gal::lightbox::{CAPTION_ID, IMAGE_ID, ViewerState};
use folio_gal::listing::{ListObjects, ListRequest, ListingError, ObjectEntry};
use folio_gal::page::{Page, PageContext};
use folio_gal::projects::{self, CONTAINER_ID};
use folio_gal::scaffold::{self, LoadControls};

struct Folder {
    names: Vec<String>,
    calls: RefCell<Vec<ListRequest>>,
    fail: Cell<bool>,
}

impl Folder {
    fn new(names: &[&str]) -> Self {
        Self {
            names: names.iter().map(|n| n.to_string()).collect(),
            calls: RefCell::new(Vec::new()),
            fail: Cell::new(false),
        }
    }
}

impl ListObjects for &Folder {
    async fn list(&self, request: &ListRequest) -> Result<Vec<ObjectEntry>, ListingError> {
        self.calls.borrow_mut().push(request.clone());
        if self.fail.take() {
            return Err(ListingError::Status {
                status: 503,
                body: "unavailable".to_string(),
            });
        }
        Ok(self
            .names
            .iter()
            .skip(request.offset as usize)
            .take(request.limit as usize)
            .map(|name| ObjectEntry::named(name.as_str()))
            .collect())
    }
}

fn storage() -> StorageConfig {
    StorageConfig {
        url: "https://cdn.example".to_string(),
        bucket: "photos".to_string(),
        anon_key: "anon".to_string(),
    }
}

fn gallery_page(folder: &Folder) -> Page<&Folder> {
    let mut doc = Document::new("/projects/camaro/");
    scaffold::gallery_page(
        &mut doc,
        &[("project", "camaro"), ("folder", "build"), ("page-size", "2")],
        LoadControls::Both,
    );
    Page::new(
        doc,
        Some(folder),
        PageContext {
            storage: Some(storage()),
            projects: None,
        },
    )
}

#[tokio::test]
async fn gallery_pages_through_folder_and_skips_non_images() {
    let folder = Folder::new(&["a.jpg", "b.txt", "c.PNG", "d.webp", "e.gif"]);
    let mut page = gallery_page(&folder);
    page.boot().await;

    let top = page.document().get_element_by_id(TOP_BUTTON_ID).unwrap();
    page.click(top).await;
    page.click(top).await;
    // Listing is exhausted; further clicks issue nothing
    page.click(top).await;

    let offsets: Vec<u32> = folder.calls.borrow().iter().map(|r| r.offset).collect();
    assert_eq!(offsets, vec![0, 2, 4]);
    assert!(folder.calls.borrow().iter().all(|r| r.prefix == "camaro/build"));

    let urls: Vec<&str> = page.gallery().lightbox().urls().iter().collect();
    assert_eq!(
        urls,
        vec![
            "https://cdn.example/storage/v1/object/public/photos/camaro/build/a.jpg",
            "https://cdn.example/storage/v1/object/public/photos/camaro/build/c.PNG",
            "https://cdn.example/storage/v1/object/public/photos/camaro/build/d.webp",
            "https://cdn.example/storage/v1/object/public/photos/camaro/build/e.gif",
        ]
    );
    assert!(page.gallery().state().done);

    let bottom = page.document().get_element_by_id(BOTTOM_BUTTON_ID).unwrap();
    assert!(page.document().is_disabled(bottom));
    assert_eq!(page.document().text(bottom), Some("No more photos"));
}

#[tokio::test]
async fn failed_page_is_retried_from_same_offset() {
    let folder = Folder::new(&["a.jpg", "b.jpg", "c.jpg"]);
    let mut page = gallery_page(&folder);
    page.boot().await;

    folder.fail.set(true);
    let bottom = page.document().get_element_by_id(BOTTOM_BUTTON_ID).unwrap();
    page.click(bottom).await;

    let status = page.document().get_element_by_id(STATUS_ID).unwrap();
    assert_eq!(page.document().text(status), Some(STATUS_ERROR));
    assert_eq!(page.gallery().state().offset, 2);
    assert!(!page.document().is_disabled(bottom));

    page.click(bottom).await;
    let offsets: Vec<u32> = folder.calls.borrow().iter().map(|r| r.offset).collect();
    assert_eq!(offsets, vec![0, 2, 2]);
    assert_eq!(page.gallery().tiles().len(), 3);
    assert_eq!(page.document().text(status), Some("Loaded 3 photos"));
}

#[tokio::test]
async fn lightbox_walks_across_pages() {
    let folder = Folder::new(&["a.jpg", "b.jpg", "c.jpg"]);
    let mut page = gallery_page(&folder);
    page.boot().await;
    page.load_next_page().await;

    let last = page.gallery().tiles()[2].node;
    page.click(last).await;
    assert_eq!(page.gallery().lightbox().state(), ViewerState::Open(2));

    page.key_down(None, Key::ArrowRight);
    assert_eq!(page.gallery().lightbox().state(), ViewerState::Open(0));
    let image = page.document().get_element_by_id(IMAGE_ID).unwrap();
    assert!(
        page.document()
            .attribute(image, "src")
            .unwrap()
            .ends_with("/camaro/build/a.jpg")
    );

    page.key_down(None, Key::Escape);
    assert_eq!(page.gallery().lightbox().state(), ViewerState::Closed);
}

#[tokio::test]
async fn hero_lightbox_cycles_static_figures() {
    let mut doc = Document::new("/about.html");
    let body = doc.body();
    let first = scaffold::hero_trigger(&mut doc, body, "/img/one.jpg", Some("One"));
    scaffold::hero_trigger(&mut doc, body, "/img/two.jpg", None);
    let mut page: Page<&Folder> = Page::new(doc, None, PageContext::default());
    page.boot().await;

    page.click(first).await;
    assert!(page.hero().is_open(page.document()));
    assert_eq!(page.hero().index(), 0);

    page.key_down(None, Key::ArrowLeft);
    assert_eq!(page.hero().index(), 1);

    page.key_down(None, Key::Escape);
    assert!(!page.hero().is_open(page.document()));
    // The gallery lightbox does not exist on this page
    assert_eq!(page.document().get_element_by_id(CAPTION_ID), None);
}

#[test]
fn projects_index_renders_sorted_cards() {
    let records = projects::load_records(
        r#"[
            {"title": "bronco", "page": "bronco.html"},
            {"title": "Camaro", "page": "camaro.html", "featured": true},
            {"title": "Apache", "blurb": "Step-side", "meta": "1958"}
        ]"#,
    )
    .unwrap();

    let mut doc = Document::new("/projects/index.html");
    scaffold::projects_grid(&mut doc);
    let page: Page<&Folder> = Page::new(
        doc,
        None,
        PageContext {
            storage: None,
            projects: records,
        },
    );

    let container = page.document().get_element_by_id(CONTAINER_ID).unwrap();
    let html = page.document().inner_html(container).unwrap();
    let camaro = html.find("Camaro").unwrap();
    let apache = html.find("Apache").unwrap();
    let bronco = html.find("bronco").unwrap();
    assert!(camaro < apache && apache < bronco);
    assert!(html.contains(r#"href="camaro.html""#));
    assert!(html.contains(r#"<div class="meta">1958</div>"#));
}
