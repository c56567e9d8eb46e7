mod memory_repository;
mod pg_analysis_repository;
mod pg_evaluation_repository;
mod pg_pool;
mod row_mapping;

pub use memory_repository::{
    in_memory_repositories, InMemoryAnalysisResultRepository, InMemoryEvaluationRepository,
};
pub use pg_analysis_repository::PgAnalysisResultRepository;
pub use pg_evaluation_repository::PgEvaluationRepository;
pub use pg_pool::create_pool;
