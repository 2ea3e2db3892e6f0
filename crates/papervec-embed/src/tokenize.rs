use anyhow::{anyhow, Result};
use candle_core::{Device, Tensor};
use tokenizers::Tokenizer;

/// Encode a batch of texts into `[B,L]` id and attention-mask tensors,
/// padded with `pad_id` to the longest sequence in the batch (capped at
/// `max_len`).
pub fn tokenize_batch(
    tokenizer: &Tokenizer,
    texts: &[String],
    max_len: usize,
    pad_id: u32,
    device: &Device,
) -> Result<(Tensor, Tensor)> {
    let encodings = tokenizer
        .encode_batch(texts.to_vec(), true)
        .map_err(|e| anyhow!("Tokenization failed: {}", e))?;

    let batch_len = encodings
        .iter()
        .map(|e| e.get_ids().len().min(max_len))
        .max()
        .unwrap_or(1)
        .max(1);

    let mut all_ids = Vec::with_capacity(encodings.len() * batch_len);
    let mut all_mask = Vec::with_capacity(encodings.len() * batch_len);
    for enc in &encodings {
        let mut ids = enc.get_ids().to_vec();
        let mut mask = enc.get_attention_mask().to_vec();
        if ids.len() > batch_len {
            ids.truncate(batch_len);
            mask.truncate(batch_len);
        }
        while ids.len() < batch_len {
            ids.push(pad_id);
            mask.push(0);
        }
        all_ids.extend(ids);
        all_mask.extend(mask);
    }

    let shape = (encodings.len(), batch_len);
    let input_ids = Tensor::from_vec(all_ids, shape, device)?;
    let attention_mask = Tensor::from_vec(all_mask, shape, device)?;
    Ok((input_ids, attention_mask))
}
