//! Export coordinator - main orchestrator for the export process
//!
//! For every selected collection the coordinator wires
//! fetch -> track -> serialize -> file sink and drives the stream to the end
//! before moving on. Collections are exported one after the other.

use crate::adapters::fauna::FaunaClient;
use crate::adapters::service::{PageRequest, QueryService, ReadMode};
use crate::config::DumpConfig;
use crate::core::export::enumerator::{list_collections, select_collections};
use crate::core::export::fetcher::fetch_pages;
use crate::core::export::options::ExportOptions;
use crate::core::export::progress::ProgressTracker;
use crate::core::export::serializer::{serialize_pages, RowSerializer};
use crate::core::export::sink;
use crate::core::export::summary::{CollectionSummary, ExportSummary};
use crate::core::hooks::{ConfigHooks, ExportHooks};
use crate::domain::{Collection, DumpError, Result};
use std::sync::Arc;
use std::time::Instant;

/// Export coordinator
pub struct ExportCoordinator {
    service: Arc<dyn QueryService>,
    options: ExportOptions,
    hooks: Arc<dyn ExportHooks>,
}

impl ExportCoordinator {
    /// Create a coordinator over any query service
    pub fn new(
        service: Arc<dyn QueryService>,
        options: ExportOptions,
        hooks: Arc<dyn ExportHooks>,
    ) -> Self {
        Self {
            service,
            options,
            hooks,
        }
    }

    /// Create a coordinator talking to Fauna, with hooks from the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_config(config: &DumpConfig) -> Result<Self> {
        let client = FaunaClient::new(&config.database)?;
        Ok(Self::new(
            Arc::new(client),
            ExportOptions::from_config(config),
            Arc::new(ConfigHooks::from_config(config)),
        ))
    }

    /// Run options in effect
    pub fn options(&self) -> &ExportOptions {
        &self.options
    }

    /// List the collections this run would export, in enumeration order
    ///
    /// # Errors
    ///
    /// Propagates the enumeration error.
    pub async fn selected_collections(&self) -> Result<Vec<Collection>> {
        let all = list_collections(self.service.as_ref()).await?;
        Ok(select_collections(all, &self.options.collections))
    }

    /// Execute the export
    ///
    /// 1. Validates the run options
    /// 2. Enumerates and filters collections
    /// 3. Creates the output directory
    /// 4. Exports each collection to `<output_dir>/<file_name>.csv`
    ///
    /// The first error aborts the run; files already written stay in place.
    ///
    /// # Errors
    ///
    /// Returns the first configuration, query, hook or output error.
    pub async fn execute_export(&self) -> Result<ExportSummary> {
        let start_time = Instant::now();
        let mut summary = ExportSummary::new();

        self.options.validate()?;

        tracing::info!(
            endpoint = %self.service.endpoint(),
            incremental = self.options.start_time.is_some(),
            end_time = %self.options.end_time.to_rfc3339(),
            "Starting export process"
        );

        let collections = self.selected_collections().await?;
        if collections.is_empty() {
            tracing::warn!("No collections selected for export");
        }

        sink::ensure_output_dir(&self.options.output_dir).await?;

        for collection in collections {
            let id = collection.id.clone();
            tracing::info!(collection = %id, "Exporting collection");

            match self.export_collection(collection).await {
                Ok(result) => summary.add_collection(result),
                Err(e) => {
                    tracing::error!(collection = %id, error = %e, "Failed to export collection");
                    return Err(e);
                }
            }
        }

        summary = summary.with_duration(start_time.elapsed());
        summary.log_summary();

        Ok(summary)
    }

    /// Export a single collection to its CSV file
    async fn export_collection(&self, collection: Collection) -> Result<CollectionSummary> {
        let started = Instant::now();
        let hooks = self.hooks.as_ref();
        let id = collection.id.clone();

        let mode = ReadMode::select(
            self.options.start_time,
            self.options.end_time,
            hooks.collection_index(&id),
        )
        .map_err(|e| DumpError::Configuration(format!("collection {id}: {e}")))?;

        let shape = hooks.record_shape(&id);
        shape
            .validate()
            .map_err(|e| DumpError::Configuration(format!("collection {id}: {e}")))?;

        let request = PageRequest {
            collection,
            mode,
            page_size: self.options.page_size,
            after: None,
            shape,
        };

        let file = sink::csv_path(&self.options.output_dir, &hooks.file_name(&id));
        let tracker = ProgressTracker::new(id.clone());

        let pages = fetch_pages(self.service.as_ref(), request, &self.options.retry, hooks);
        let pages = tracker.track(pages, hooks);
        let chunks = serialize_pages(pages, RowSerializer::new(id.clone(), hooks));
        sink::write_chunks(&file, chunks).await?;

        Ok(CollectionSummary {
            collection: id,
            records: tracker.records(),
            pages: tracker.pages(),
            file,
            duration: started.elapsed(),
        })
    }
}
