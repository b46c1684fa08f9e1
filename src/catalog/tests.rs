#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use tempfile::TempDir;
    use tokio_test::{assert_err, assert_ok};

    use crate::catalog::{
        IdGenerator, NewStory, QueryEngine, SequentialIdGenerator, StoryQuery, SubmissionHandler,
        TimestampIdGenerator,
    };
    use crate::error_handling::types::{CatalogError, UploadError};
    use crate::storage::{JsonFileStore, MemoryStore, RecordStore};
    use crate::uploads::{Attachment, AttachmentStore, DiskAttachmentStore};

    struct NoUploads;

    impl AttachmentStore for NoUploads {
        fn store(&self, _attachment: &Attachment) -> Result<String, UploadError> {
            Err(UploadError::WriteFailed)
        }

        fn remove(&self, _reference: &str) -> Result<(), UploadError> {
            Ok(())
        }
    }

    // Helper wiring both catalog halves to one store
    fn wire(store: Arc<dyn RecordStore>, ids: Arc<dyn IdGenerator>) -> (QueryEngine, SubmissionHandler) {
        let engine = QueryEngine::new(store.clone());
        let handler = SubmissionHandler::new(store, Arc::new(NoUploads), ids);
        (engine, handler)
    }

    fn memory_catalog() -> (QueryEngine, SubmissionHandler) {
        wire(Arc::new(MemoryStore::new()), Arc::new(SequentialIdGenerator::new()))
    }

    fn seed(handler: &SubmissionHandler, n: usize) {
        for i in 0..n {
            let generation = if i % 3 == 0 { "1960s" } else { "1990s" };
            let payload = NewStory::new(format!("Author {}", i), format!("Title {}", i), format!("Body {}", i))
                .with_generation(generation);
            assert_ok!(handler.submit(payload, None));
        }
    }

    #[test]
    fn test_empty_catalog_first_page() {
        let (engine, _) = memory_catalog();
        let page = engine.query(&StoryQuery::default()).unwrap();
        assert_eq!(page.total, 0);
        assert_eq!(page.page, 1);
        assert_eq!(page.total_pages, 0);
        assert!(page.data.is_empty());
    }

    #[test]
    fn test_submitted_story_is_found_by_id() {
        let (engine, handler) = memory_catalog();
        let created = handler
            .submit(NewStory::new("A", "T", "C").with_contact("a@example.org"), None)
            .unwrap();
        assert_eq!(engine.get_by_id(&created.id).unwrap(), created);
    }

    #[test]
    fn test_submitted_story_round_trips_through_file() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(JsonFileStore::new(dir.path().join("stories.json")).unwrap());
        let (engine, handler) = wire(store, Arc::new(TimestampIdGenerator::new()));

        let created = handler.submit(NewStory::new("A", "T", "C").with_generation("1970s"), None).unwrap();
        assert_eq!(engine.get_by_id(&created.id).unwrap(), created);
    }

    #[test]
    fn test_unknown_id_is_not_found() {
        let (engine, handler) = memory_catalog();
        seed(&handler, 2);
        assert_eq!(
            engine.get_by_id("nonexistent").unwrap_err(),
            CatalogError::NotFound("nonexistent".into())
        );
    }

    #[test]
    fn test_pages_partition_the_catalog() {
        let (engine, handler) = memory_catalog();
        seed(&handler, 23);

        for limit in 1..=25 {
            let first = engine.query(&StoryQuery::new(1, limit)).unwrap();
            assert_eq!(first.total_pages, 23usize.div_ceil(limit));

            let mut ids = Vec::new();
            for page in 1..=first.total_pages {
                let p = engine.query(&StoryQuery::new(page, limit)).unwrap();
                assert!(p.data.len() <= limit);
                ids.extend(p.data.into_iter().map(|s| s.id));
            }
            let expected: Vec<String> = (1..=23).rev().map(|i: usize| i.to_string()).collect();
            assert_eq!(ids, expected);
        }
    }

    #[test]
    fn test_filtered_query_is_repeatable() {
        let (engine, handler) = memory_catalog();
        seed(&handler, 10);
        let query = StoryQuery::new(1, 3).with_generation("1990s").with_search("title");

        let a = engine.query(&query).unwrap();
        let b = engine.query(&query).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.total, 6);
        assert_eq!(a.total_pages, 2);
    }

    #[test]
    fn test_newest_first() {
        let (engine, handler) = memory_catalog();
        let a = handler.submit(NewStory::new("A", "first", "C"), None).unwrap();
        let b = handler.submit(NewStory::new("B", "second", "C"), None).unwrap();

        let page = engine.query(&StoryQuery::new(1, 2)).unwrap();
        assert_eq!(page.data, vec![b, a]);
    }

    #[test]
    fn test_missing_title_is_validation_error() {
        let (engine, handler) = memory_catalog();
        let mut payload = NewStory::new("A", "T", "C");
        payload.title = Some(String::new());

        let err = handler.submit(payload.clone(), None).unwrap_err();
        assert!(matches!(err, CatalogError::Validation(_)));

        payload.title = None;
        assert_err!(handler.submit(payload, None));
        assert_eq!(engine.query(&StoryQuery::default()).unwrap().total, 0);
    }

    #[test]
    fn test_upload_failure_creates_no_story() {
        let (engine, handler) = memory_catalog();
        let photo = Attachment { filename: Some("a.jpg".into()), content_type: None, data: vec![1] };

        let err = handler.submit(NewStory::new("A", "T", "C"), Some(&photo)).unwrap_err();
        assert_eq!(err, CatalogError::Upload(UploadError::WriteFailed));
        assert_eq!(engine.query(&StoryQuery::default()).unwrap().total, 0);
    }

    #[test]
    fn test_concurrent_submissions_are_not_lost() {
        let dir = TempDir::new().unwrap();
        let store: Arc<dyn RecordStore> = Arc::new(JsonFileStore::new(dir.path().join("stories.json")).unwrap());
        let uploads: Arc<dyn AttachmentStore> = Arc::new(DiskAttachmentStore::new(dir.path().join("uploads")).unwrap());
        let handler = Arc::new(SubmissionHandler::new(
            store.clone(),
            uploads,
            Arc::new(TimestampIdGenerator::new()),
        ));

        let workers: Vec<_> = (0..8)
            .map(|w| {
                let handler = handler.clone();
                thread::spawn(move || {
                    for i in 0..5 {
                        handler
                            .submit(NewStory::new(format!("w{}", w), format!("t{}", i), "c"), None)
                            .unwrap();
                    }
                })
            })
            .collect();
        for worker in workers {
            worker.join().unwrap();
        }

        let stories = store.load().unwrap();
        assert_eq!(stories.len(), 40);
        let ids: Vec<u64> = stories.iter().map(|s| s.id.parse().unwrap()).collect();
        assert!(ids.windows(2).all(|w| w[0] > w[1]));
    }
}
