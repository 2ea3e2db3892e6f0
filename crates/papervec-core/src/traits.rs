pub trait Embedder: Send + Sync {
    /// Embedding dimensionality (D), fixed by the underlying model.
    fn dim(&self) -> usize;
    /// Maximum token length accepted per input text.
    fn max_len(&self) -> usize;
    /// Compute one vector per input text, in input order.
    ///
    /// When `normalize` is set, every returned vector has unit Euclidean
    /// norm. All vectors in one call have length `dim()`.
    fn embed_batch(&self, texts: &[String], normalize: bool) -> anyhow::Result<Vec<Vec<f32>>>;
}
