mod gemini_scorer;
mod scorer_factory;
mod stub_scorer;

pub use gemini_scorer::GeminiScorer;
pub use scorer_factory::CallScorerFactory;
pub use stub_scorer::StubScorer;
