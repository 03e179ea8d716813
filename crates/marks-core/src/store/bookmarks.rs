//! Bookmark store
//!
//! Mirrors the user's bookmarks from `/bookmarks`. New bookmarks go to the
//! front of the collection; imported ones are appended in input order.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::info;

use super::{append, prepend, remove_by_id, replace_by_id, StateCell, StoreState};
use crate::api::ApiClient;
use crate::models::{
    Bookmark, CreateBookmarkData, ExportedBookmark, ImportSummary, UpdateBookmarkData,
};

const FETCH_ERROR: &str = "Failed to fetch bookmarks";
const SEARCH_ERROR: &str = "Failed to search bookmarks";
const CREATE_ERROR: &str = "Failed to create bookmark";
const UPDATE_ERROR: &str = "Failed to update bookmark";
const DELETE_ERROR: &str = "Failed to delete bookmark";
const IMPORT_ERROR: &str = "Failed to import bookmark";

/// Store over the bookmark collection
pub struct BookmarkStore {
    api: ApiClient,
    state: StateCell<Bookmark>,
}

impl BookmarkStore {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            state: StateCell::new(),
        }
    }

    /// Current collection
    pub fn bookmarks(&self) -> Arc<[Bookmark]> {
        self.state.items()
    }

    /// Look up a bookmark in the local collection
    pub fn get(&self, id: &str) -> Option<Bookmark> {
        self.state.find(id)
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    pub fn error(&self) -> Option<String> {
        self.state.error()
    }

    pub fn snapshot(&self) -> StoreState<Bookmark> {
        self.state.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<StoreState<Bookmark>> {
        self.state.subscribe()
    }

    /// Replace the collection with the server's full listing
    pub async fn fetch(&mut self) {
        self.load(None, FETCH_ERROR).await;
    }

    /// Replace the collection with the bookmarks matching `query`
    ///
    /// An empty query is a plain `fetch`.
    pub async fn search(&mut self, query: &str) {
        if query.is_empty() {
            return self.fetch().await;
        }
        self.load(Some(query), SEARCH_ERROR).await;
    }

    async fn load(&mut self, query: Option<&str>, fallback: &str) {
        self.state.begin(true);

        let params: Vec<(&str, &str)> = query.map(|q| vec![("search", q)]).unwrap_or_default();
        match self.api.get_json::<Vec<Bookmark>>("/bookmarks", &params).await {
            Ok(bookmarks) => self.state.replace(bookmarks),
            Err(e) => self.state.fail(&e, fallback),
        }

        self.state.finish();
    }

    /// Create a bookmark and put the server's copy at the front
    ///
    /// Returns `None` on failure, leaving the collection untouched.
    pub async fn create(&mut self, data: &CreateBookmarkData) -> Option<Bookmark> {
        self.state.begin(false);

        match self.api.post_json::<_, Bookmark>("/bookmarks", data).await {
            Ok(bookmark) => {
                let created = bookmark.clone();
                self.state.rebuild(|items| Some(prepend(items, created)));
                Some(bookmark)
            }
            Err(e) => {
                self.state.fail(&e, CREATE_ERROR);
                None
            }
        }
    }

    /// Apply a partial update and swap the server's copy in place
    ///
    /// When no local entry has `id` the collection is left as is, but the
    /// updated bookmark is still returned.
    pub async fn update(&mut self, id: &str, data: &UpdateBookmarkData) -> Option<Bookmark> {
        self.state.begin(false);

        let path = format!("/bookmarks/{}", id);
        match self.api.put_json::<_, Bookmark>(&path, data).await {
            Ok(bookmark) => {
                let updated = bookmark.clone();
                self.state.rebuild(|items| replace_by_id(items, id, updated));
                Some(bookmark)
            }
            Err(e) => {
                self.state.fail(&e, UPDATE_ERROR);
                None
            }
        }
    }

    /// Delete a bookmark; `true` when the server accepted it
    pub async fn delete(&mut self, id: &str) -> bool {
        self.state.begin(false);

        let path = format!("/bookmarks/{}", id);
        match self.api.delete(&path).await {
            Ok(()) => {
                self.state.rebuild(|items| Some(remove_by_id(items, id)));
                true
            }
            Err(e) => {
                self.state.fail(&e, DELETE_ERROR);
                false
            }
        }
    }

    /// Create bookmarks one after another, in input order
    ///
    /// A failed item is counted and skipped; the batch never aborts and
    /// nothing is rolled back. Each created bookmark is appended as soon as
    /// the server confirms it. `error` holds the last failure, if any.
    pub async fn import<I, T>(&mut self, items: I) -> ImportSummary
    where
        I: IntoIterator<Item = T>,
        T: Into<CreateBookmarkData>,
    {
        self.state.begin(true);
        let mut summary = ImportSummary::default();

        for item in items {
            let data: CreateBookmarkData = item.into();
            match self.api.post_json::<_, Bookmark>("/bookmarks", &data).await {
                Ok(bookmark) => {
                    summary.success_count += 1;
                    self.state.rebuild(|items| Some(append(items, bookmark)));
                }
                Err(e) => {
                    summary.fail_count += 1;
                    self.state.fail(&e, IMPORT_ERROR);
                }
            }
        }

        self.state.finish();
        info!(
            "Imported {} bookmark(s), {} failed",
            summary.success_count, summary.fail_count
        );
        summary
    }

    /// Plain records for every bookmark in the local collection
    pub fn export(&self) -> Vec<ExportedBookmark> {
        self.state.items().iter().map(ExportedBookmark::from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use serde_json::json;

    use crate::api::fake::{client, FakeTransport};
    use crate::api::{ApiRequest, ApiResponse, HttpTransport, Method};
    use crate::error::ApiResult;
    use crate::session::Session;
    use crate::storage::MemoryStore;
    use crate::store::fixtures::{bookmark, bookmark_json};

    fn store() -> (BookmarkStore, Arc<FakeTransport>) {
        let (api, transport, _) = client();
        (BookmarkStore::new(api), transport)
    }

    fn ids(store: &BookmarkStore) -> Vec<String> {
        store.bookmarks().iter().map(|b| b.id.clone()).collect()
    }

    /// Seed the local collection through a fetch
    async fn seeded(items: &[(&str, &str)]) -> (BookmarkStore, Arc<FakeTransport>) {
        let (mut store, transport) = store();
        let listing: Vec<_> = items
            .iter()
            .map(|(id, title)| bookmark_json(id, title, &format!("http://{}", title)))
            .collect();
        transport.reply(200, json!(listing));
        store.fetch().await;
        (store, transport)
    }

    #[tokio::test]
    async fn test_fetch_replaces_collection() {
        let (mut store, transport) = seeded(&[("1", "A"), ("2", "B")]).await;
        assert_eq!(ids(&store), vec!["1", "2"]);

        transport.reply(200, json!([bookmark_json("3", "C", "http://c")]));
        store.fetch().await;

        assert_eq!(ids(&store), vec!["3"]);
        assert!(!store.is_loading());
        assert!(store.error().is_none());

        let request = transport.last_request();
        assert_eq!(request.method, Method::Get);
        assert_eq!(request.url, "http://api.test/api/bookmarks");
        assert!(request.query.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_failure_keeps_collection() {
        let (mut store, transport) = seeded(&[("1", "A")]).await;

        transport.reply(500, json!({"error": "database unavailable"}));
        store.fetch().await;

        assert_eq!(ids(&store), vec!["1"]);
        assert_eq!(store.error().as_deref(), Some("database unavailable"));
        assert!(!store.is_loading());
    }

    #[tokio::test]
    async fn test_fetch_failure_default_message() {
        let (mut store, transport) = store();
        transport.fail("connection refused");

        store.fetch().await;

        assert_eq!(store.error().as_deref(), Some("Failed to fetch bookmarks"));
    }

    /// Transport that records the store's `loading` flag while a request is in flight
    #[derive(Default)]
    struct LoadingProbe {
        state: Mutex<Option<watch::Receiver<StoreState<Bookmark>>>>,
        seen: Mutex<Vec<bool>>,
    }

    #[async_trait]
    impl HttpTransport for LoadingProbe {
        async fn execute(&self, _request: ApiRequest) -> ApiResult<ApiResponse> {
            let loading = self
                .state
                .lock()
                .unwrap()
                .as_ref()
                .map(|rx| rx.borrow().loading)
                .unwrap_or(false);
            self.seen.lock().unwrap().push(loading);
            Ok(ApiResponse::new(200, "[]"))
        }
    }

    #[tokio::test]
    async fn test_loading_held_for_the_call() {
        let probe = Arc::new(LoadingProbe::default());
        let session = Session::new(Arc::new(MemoryStore::new()));
        let api = ApiClient::with_transport("http://api.test/api", session, probe.clone());
        let mut store = BookmarkStore::new(api);
        *probe.state.lock().unwrap() = Some(store.subscribe());

        store.fetch().await;
        store.search("rust").await;
        store.create(&CreateBookmarkData::new("A", "http://a")).await;

        // fetch and search raise loading; create leaves it alone
        assert_eq!(*probe.seen.lock().unwrap(), vec![true, true, false]);
        assert!(!store.is_loading());
    }

    #[tokio::test]
    async fn test_search_sends_query() {
        let (mut store, transport) = seeded(&[("1", "A"), ("2", "B")]).await;

        transport.reply(200, json!([bookmark_json("2", "B", "http://b")]));
        store.search("rust").await;

        assert_eq!(ids(&store), vec!["2"]);
        assert_eq!(transport.last_request().query_param("search"), Some("rust"));
    }

    #[tokio::test]
    async fn test_empty_search_is_fetch() {
        let (mut store, transport) = store();
        transport.fail("offline");

        store.search("").await;

        let request = transport.last_request();
        assert!(request.query.is_empty());
        assert_eq!(store.error().as_deref(), Some("Failed to fetch bookmarks"));
    }

    #[tokio::test]
    async fn test_search_failure_default_message() {
        let (mut store, transport) = store();
        transport.reply_raw(503, "");

        store.search("rust").await;

        assert_eq!(store.error().as_deref(), Some("Failed to search bookmarks"));
    }

    #[tokio::test]
    async fn test_create_inserts_server_copy_at_front() {
        let (mut store, transport) = seeded(&[("0", "Existing")]).await;
        transport.reply(
            201,
            json!({"_id": "1", "title": "A", "url": "http://a", "tags": [], "user": "u1",
                   "createdAt": "2024-05-01T10:00:00Z"}),
        );

        let created = store
            .create(&CreateBookmarkData::new("A", "http://a"))
            .await
            .unwrap();

        assert_eq!(created.id, "1");
        assert_eq!(ids(&store), vec!["1", "0"]);
        assert_eq!(store.bookmarks()[0], created);
        assert!(store.error().is_none());
        assert!(!store.is_loading());

        let request = transport.last_request();
        assert_eq!(request.method, Method::Post);
        assert_eq!(request.body, Some(json!({"title": "A", "url": "http://a"})));
    }

    #[tokio::test]
    async fn test_create_into_empty_collection() {
        let (mut store, transport) = store();
        transport.reply(201, json!({"_id": "1", "title": "A", "url": "http://a", "tags": []}));

        let created = store.create(&CreateBookmarkData::new("A", "http://a")).await;

        let expected = Bookmark {
            id: "1".to_string(),
            title: "A".to_string(),
            url: "http://a".to_string(),
            description: None,
            tags: Vec::new(),
            folder: None,
            user: String::new(),
            created_at: None,
        };
        assert_eq!(created.as_ref(), Some(&expected));
        assert_eq!(store.bookmarks().to_vec(), vec![expected]);
        assert!(store.error().is_none());
        assert!(!store.is_loading());
    }

    #[tokio::test]
    async fn test_fetch_accepts_items_without_timestamps() {
        let (mut store, transport) = store();
        transport.reply(
            200,
            json!([
                {"_id": "1", "title": "A", "url": "http://a"},
                bookmark_json("2", "B", "http://b")
            ]),
        );

        store.fetch().await;

        assert_eq!(ids(&store), vec!["1", "2"]);
        assert!(store.bookmarks()[0].created_at.is_none());
        assert!(store.bookmarks()[1].created_at.is_some());
        assert!(store.error().is_none());
    }

    #[tokio::test]
    async fn test_create_failure_reports_server_error() {
        let (mut store, transport) = seeded(&[("0", "Existing")]).await;
        let before = store.bookmarks();
        transport.reply(400, json!({"error": "bad url"}));

        let result = store
            .create(&CreateBookmarkData::new("A", "not a url"))
            .await;

        assert!(result.is_none());
        assert_eq!(store.bookmarks(), before);
        assert_eq!(store.error().as_deref(), Some("bad url"));
    }

    #[tokio::test]
    async fn test_create_failure_default_message() {
        let (mut store, transport) = store();
        transport.reply_raw(500, "Internal Server Error");

        assert!(store.create(&CreateBookmarkData::new("A", "http://a")).await.is_none());
        assert_eq!(store.error().as_deref(), Some("Failed to create bookmark"));
    }

    #[tokio::test]
    async fn test_error_cleared_by_next_success() {
        let (mut store, transport) = store();
        transport.fail("offline");
        store.fetch().await;
        assert!(store.error().is_some());

        transport.reply(201, bookmark_json("1", "A", "http://a"));
        store.create(&CreateBookmarkData::new("A", "http://a")).await;
        assert!(store.error().is_none());
    }

    #[tokio::test]
    async fn test_update_replaces_in_place() {
        let (mut store, transport) = seeded(&[("1", "A"), ("2", "B"), ("3", "C")]).await;
        transport.reply(200, bookmark_json("2", "B2", "http://b2"));

        let data = UpdateBookmarkData {
            title: Some("B2".to_string()),
            ..Default::default()
        };
        let updated = store.update("2", &data).await.unwrap();

        assert_eq!(updated.title, "B2");
        assert_eq!(ids(&store), vec!["1", "2", "3"]);
        assert_eq!(store.bookmarks()[1].title, "B2");

        let request = transport.last_request();
        assert_eq!(request.method, Method::Put);
        assert_eq!(request.url, "http://api.test/api/bookmarks/2");
        assert_eq!(request.body, Some(json!({"title": "B2"})));
    }

    #[tokio::test]
    async fn test_update_unknown_local_id_is_local_noop() {
        let (mut store, transport) = seeded(&[("1", "A")]).await;
        let before = store.bookmarks();
        transport.reply(200, bookmark_json("9", "Z", "http://z"));

        let result = store
            .update("9", &UpdateBookmarkData::default())
            .await;

        assert_eq!(result.map(|b| b.id), Some("9".to_string()));
        assert_eq!(store.bookmarks(), before);
        assert!(store.error().is_none());
    }

    #[tokio::test]
    async fn test_update_failure() {
        let (mut store, transport) = seeded(&[("1", "A")]).await;
        transport.reply(404, json!({"error": "Bookmark not found"}));

        let result = store.update("1", &UpdateBookmarkData::default()).await;

        assert!(result.is_none());
        assert_eq!(store.error().as_deref(), Some("Bookmark not found"));
        assert_eq!(store.bookmarks()[0].title, "A");
    }

    #[tokio::test]
    async fn test_delete_removes_entry() {
        let (mut store, transport) = seeded(&[("1", "A"), ("2", "B")]).await;
        transport.reply(200, json!({"message": "deleted"}));

        assert!(store.delete("1").await);
        assert_eq!(ids(&store), vec!["2"]);

        let request = transport.last_request();
        assert_eq!(request.method, Method::Delete);
        assert_eq!(request.url, "http://api.test/api/bookmarks/1");
    }

    #[tokio::test]
    async fn test_delete_failure_keeps_entry() {
        let (mut store, transport) = seeded(&[("1", "A")]).await;
        transport.fail("offline");

        assert!(!store.delete("1").await);
        assert_eq!(ids(&store), vec!["1"]);
        assert_eq!(store.error().as_deref(), Some("Failed to delete bookmark"));
    }

    #[tokio::test]
    async fn test_import_continues_past_failures() {
        let (mut store, transport) = seeded(&[("0", "Existing")]).await;
        transport.reply(201, bookmark_json("a", "A", "http://a"));
        transport.reply(400, json!({"error": "bad url"}));
        transport.reply(201, bookmark_json("c", "C", "http://c"));

        let items = vec![
            CreateBookmarkData::new("A", "http://a"),
            CreateBookmarkData::new("B", "bad"),
            CreateBookmarkData::new("C", "http://c"),
        ];
        let summary = store.import(items).await;

        assert_eq!(
            summary,
            ImportSummary {
                success_count: 2,
                fail_count: 1
            }
        );
        assert_eq!(ids(&store), vec!["0", "a", "c"]);
        assert!(!store.is_loading());
        assert_eq!(store.error().as_deref(), Some("bad url"));

        // One request per item, in input order
        let titles: Vec<_> = transport
            .requests()
            .iter()
            .skip(1)
            .map(|r| r.body.as_ref().unwrap()["title"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(titles, vec!["A", "B", "C"]);
    }

    #[tokio::test]
    async fn test_import_accepts_exported_records() {
        let (mut store, transport) = store();
        transport.reply(201, bookmark_json("a", "A", "http://a"));

        let summary = store
            .import(vec![ExportedBookmark {
                title: "A".to_string(),
                url: "http://a".to_string(),
                description: String::new(),
                tags: vec!["x".to_string()],
            }])
            .await;

        assert_eq!(summary.success_count, 1);
        assert_eq!(
            transport.last_request().body,
            Some(json!({"title": "A", "url": "http://a", "tags": ["x"]}))
        );
    }

    #[tokio::test]
    async fn test_import_empty_batch() {
        let (mut store, transport) = store();

        let summary = store.import(Vec::<CreateBookmarkData>::new()).await;

        assert_eq!(summary, ImportSummary::default());
        assert!(transport.requests().is_empty());
        assert!(store.error().is_none());
    }

    #[tokio::test]
    async fn test_export_defaults_missing_fields() {
        let (mut store, transport) = store();
        transport.reply(
            200,
            json!([{"_id": "1", "title": "A", "url": "http://a", "user": "u1",
                    "createdAt": "2024-01-01T00:00:00Z"}]),
        );
        store.fetch().await;

        let exported = store.export();

        assert_eq!(
            exported,
            vec![ExportedBookmark {
                title: "A".to_string(),
                url: "http://a".to_string(),
                description: String::new(),
                tags: Vec::new(),
            }]
        );
    }

    #[tokio::test]
    async fn test_export_reproduces_created_bookmarks() {
        let (mut store, transport) = store();
        let inputs = vec![
            CreateBookmarkData::new("Rust", "https://rust-lang.org")
                .with_description("Systems language")
                .with_tags(vec!["lang".to_string(), "systems".to_string()]),
            CreateBookmarkData::new("Tokio", "https://tokio.rs")
                .with_description("Async runtime")
                .with_tags(vec!["async".to_string()]),
        ];

        for (i, input) in inputs.iter().enumerate() {
            // Server echoes what it was sent
            let mut echoed = bookmark(&i.to_string(), &input.title);
            echoed.url = input.url.clone();
            echoed.description = input.description.clone();
            echoed.tags = input.tags.clone().unwrap_or_default();
            transport.reply(201, serde_json::to_value(&echoed).unwrap());
            store.create(input).await.unwrap();
        }

        let exported = store.export();

        // Newest first
        for (record, input) in exported.iter().rev().zip(&inputs) {
            assert_eq!(record.title, input.title);
            assert_eq!(record.url, input.url);
            assert_eq!(Some(&record.description), input.description.as_ref());
            assert_eq!(Some(&record.tags), input.tags.as_ref());
        }
        assert_eq!(transport.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_get_and_snapshot() {
        let (store, _) = seeded(&[("1", "A")]).await;

        assert_eq!(store.get("1").map(|b| b.title), Some("A".to_string()));
        assert!(store.get("2").is_none());

        let snapshot = store.snapshot();
        assert_eq!(snapshot.items.len(), 1);
        assert!(!snapshot.loading);
        assert!(snapshot.error.is_none());
    }
}
