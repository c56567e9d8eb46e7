pub mod llm;
pub mod notify;
pub mod observability;
pub mod persistence;
pub mod queue;
pub mod speech;
pub mod storage;
