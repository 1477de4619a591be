use calo_types::AnalysisResult;

/// Optional prose rewriter for the engineer-facing logic trace.
///
/// A narrator sees the finished result and may return a replacement trace.
/// It cannot alter status, risks or actions; returning `None` (or an empty
/// string) keeps the deterministic trace.
pub trait TraceNarrator: Send + Sync {
    fn narrate(&self, result: &AnalysisResult) -> Option<String>;
}

impl<F> TraceNarrator for F
where
    F: Fn(&AnalysisResult) -> Option<String> + Send + Sync,
{
    fn narrate(&self, result: &AnalysisResult) -> Option<String> {
        self(result)
    }
}
