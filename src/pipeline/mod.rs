//! Pipeline components: context, stages, orchestration, error reporting.

pub mod context;
pub mod copier;
pub mod error_handler;
pub mod orchestrator;
pub mod scouter;
pub mod searcher;

pub use context::{
    CopyContext, PipelineHandles, PipelineQueues, PipelineTuning, ScoutContext, SearchContext,
    create_pipeline_queues,
};
pub use copier::spawn_copiers;
pub use error_handler::check_for_failed_copies;
pub use orchestrator::{
    join_pipeline, run_pipeline, run_search, setup_pipeline_paths, setup_pipeline_tuning,
};
pub use scouter::{run_scouter, spawn_scouter};
pub use searcher::{search_directory, spawn_searchers};
