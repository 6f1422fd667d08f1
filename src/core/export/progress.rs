//! Progress tracking over the page stream
//!
//! The tracker is a pure observer: pages pass through unchanged while a
//! running record count is kept and reported to [`ExportHooks::on_progress`].

use crate::core::hooks::ExportHooks;
use crate::domain::{CollectionId, Cursor, Page, Result};
use futures::future;
use futures::stream::{BoxStream, StreamExt, TryStreamExt};
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Progress notification emitted after every page
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressEvent {
    /// Collection being exported
    pub collection: CollectionId,

    /// Records in the page just fetched
    pub page_records: usize,

    /// Records fetched so far, this page included
    pub total: usize,

    /// Cursor of the next page, if any
    pub after: Option<Cursor>,
}

impl fmt::Display for ProgressEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.collection, self.total)?;
        if let Some(after) = &self.after {
            write!(f, " after: {after}")?;
        }
        Ok(())
    }
}

/// Running counters for one collection
#[derive(Debug)]
pub struct ProgressTracker {
    collection: CollectionId,
    records: AtomicUsize,
    pages: AtomicUsize,
}

impl ProgressTracker {
    /// Create a tracker starting at zero
    pub fn new(collection: CollectionId) -> Self {
        Self {
            collection,
            records: AtomicUsize::new(0),
            pages: AtomicUsize::new(0),
        }
    }

    /// Records seen so far
    pub fn records(&self) -> usize {
        self.records.load(Ordering::Relaxed)
    }

    /// Pages seen so far
    pub fn pages(&self) -> usize {
        self.pages.load(Ordering::Relaxed)
    }

    /// Count one page and notify the hook
    ///
    /// # Errors
    ///
    /// Propagates the error returned by [`ExportHooks::on_progress`].
    pub fn observe(&self, page: &Page, hooks: &dyn ExportHooks) -> Result<()> {
        let total = self.records.fetch_add(page.len(), Ordering::Relaxed) + page.len();
        self.pages.fetch_add(1, Ordering::Relaxed);

        let event = ProgressEvent {
            collection: self.collection.clone(),
            page_records: page.len(),
            total,
            after: page.after.clone(),
        };
        hooks.on_progress(&event)
    }

    /// Wrap a page stream so every page is observed on its way through
    pub fn track<'a>(
        &'a self,
        pages: BoxStream<'a, Result<Page>>,
        hooks: &'a dyn ExportHooks,
    ) -> BoxStream<'a, Result<Page>> {
        pages
            .and_then(move |page| future::ready(self.observe(&page, hooks).map(|_| page)))
            .boxed()
    }
}
