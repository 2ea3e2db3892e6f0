use anyhow::{anyhow, Result};
use std::path::{Path, PathBuf};

use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config as BertConfig};
use tokenizers::Tokenizer;

use papervec_core::traits::Embedder;

mod pool;
mod tokenize;

pub use pool::{l2_normalize, masked_mean};
pub use tokenize::tokenize_batch;

/// Model identifier baked into both tools (not user-configurable).
pub const MODEL_NAME: &str = "all-MiniLM-L6-v2";
/// Hidden size of all-MiniLM-L6-v2.
pub const EMBEDDING_DIM: usize = 384;

const MAX_LEN: usize = 256;
const PAD_ID: u32 = 0;
// Forward passes are chunked to bound peak memory on large collections.
const FORWARD_BATCH: usize = 32;

pub fn select_device() -> Device {
    #[cfg(feature = "metal")]
    {
        if let Ok(dev) = Device::new_metal(0) {
            eprintln!("🚀 Device: Metal (MPS)");
            return dev;
        }
    }
    eprintln!("🖥️  Device: CPU");
    Device::Cpu
}

/// all-MiniLM-L6-v2 sentence embedder (BERT backbone, masked mean pooling).
pub struct MiniLmEmbedder {
    model: BertModel,
    tokenizer: Tokenizer,
    device: Device,
}

impl MiniLmEmbedder {
    pub fn new() -> Result<Self> {
        let device = select_device();
        eprintln!("🔄 Loading {} model from local files...", MODEL_NAME);
        let model_dir = resolve_model_dir()?;

        eprintln!("📥 Loading tokenizer...");
        let tokenizer_path = model_dir.join("tokenizer.json");
        let tokenizer = Tokenizer::from_file(&tokenizer_path).map_err(|e| {
            anyhow!("Failed to load tokenizer from {}: {}", tokenizer_path.display(), e)
        })?;

        eprintln!("📥 Loading model config...");
        let config_path = model_dir.join("config.json");
        let config: BertConfig = serde_json::from_str(&std::fs::read_to_string(&config_path)?)?;

        eprintln!("📥 Loading model weights...");
        let vb = load_weights(&model_dir, &device)?;

        eprintln!("🔧 Building model...");
        let model = BertModel::load(vb, &config)?;

        eprintln!("✅ {} model loaded successfully!", MODEL_NAME);
        Ok(Self { model, tokenizer, device })
    }

    fn forward_chunk(&self, texts: &[String], normalize: bool) -> Result<Vec<Vec<f32>>> {
        let (input_ids, attention_mask) =
            tokenize_batch(&self.tokenizer, texts, MAX_LEN, PAD_ID, &self.device)?;
        // BERT ignores token types for single-segment input, pass zeros.
        let token_type_ids = input_ids.zeros_like()?;
        let hidden = self
            .model
            .forward(&input_ids, &token_type_ids, Some(&attention_mask))?;
        let mut pooled = masked_mean(&hidden, &attention_mask)?;
        if normalize {
            pooled = l2_normalize(&pooled)?;
        }
        let rows: Vec<Vec<f32>> = pooled.to_device(&Device::Cpu)?.to_vec2()?;
        Ok(rows)
    }
}

impl Embedder for MiniLmEmbedder {
    fn dim(&self) -> usize {
        EMBEDDING_DIM
    }

    fn max_len(&self) -> usize {
        MAX_LEN
    }

    fn embed_batch(&self, texts: &[String], normalize: bool) -> Result<Vec<Vec<f32>>> {
        let mut out = Vec::with_capacity(texts.len());
        for chunk in texts.chunks(FORWARD_BATCH) {
            out.extend(self.forward_chunk(chunk, normalize)?);
        }
        Ok(out)
    }
}

fn load_weights(model_dir: &Path, device: &Device) -> Result<VarBuilder<'static>> {
    let safetensors_path = model_dir.join("model.safetensors");
    if safetensors_path.exists() {
        let tensors = candle_core::safetensors::load(&safetensors_path, device)?;
        return Ok(VarBuilder::from_tensors(tensors, DType::F32, device));
    }
    let weights_path = model_dir.join("pytorch_model.bin");
    let weights = candle_core::pickle::read_all(&weights_path)?;
    let weights_map: std::collections::HashMap<String, Tensor> = weights.into_iter().collect();
    Ok(VarBuilder::from_tensors(weights_map, DType::F32, device))
}

fn resolve_model_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("APP_MODEL_DIR") {
        let p = PathBuf::from(&dir);
        if p.exists() {
            eprintln!("📦 Using APP_MODEL_DIR: {}", p.display());
            return Ok(p);
        }
    }
    if let Ok(dir) = std::env::var("MODEL_DIR") {
        let p = PathBuf::from(&dir);
        if p.exists() {
            eprintln!("📦 Using MODEL_DIR: {}", p.display());
            return Ok(p);
        }
    }
    let root = Path::new("models/all-MiniLM-L6-v2");
    if root.exists() {
        eprintln!("📦 Using model dir: {}", root.display());
        return Ok(root.to_path_buf());
    }
    Err(anyhow!(
        "Could not locate the {} model directory (set APP_MODEL_DIR)",
        MODEL_NAME
    ))
}

/// Deterministic hashed bag-of-words stand-in so tests and development
/// never need model weights on disk.
struct FakeEmbedder {
    dim: usize,
}

impl FakeEmbedder {
    fn new(dim: usize) -> Self {
        Self { dim }
    }

    fn embed_one(&self, text: &str, normalize: bool) -> Vec<f32> {
        use std::hash::{Hash, Hasher};
        use twox_hash::XxHash64;
        let mut v = vec![0f32; self.dim];
        for (i, token) in text.split_whitespace().enumerate() {
            let mut hasher = XxHash64::with_seed(0);
            token.hash(&mut hasher);
            let h = hasher.finish();
            let idx = (h as usize) % self.dim;
            let val = (((h >> 32) as u32) as f32) / (u32::MAX as f32);
            v[idx] += val + (i as f32 % 3.0) * 0.01;
        }
        if normalize {
            let norm = (v.iter().map(|x| x * x).sum::<f32>()).sqrt().max(1e-6);
            for x in &mut v {
                *x /= norm;
            }
        }
        v
    }
}

impl Embedder for FakeEmbedder {
    fn dim(&self) -> usize {
        self.dim
    }

    fn max_len(&self) -> usize {
        MAX_LEN
    }

    fn embed_batch(&self, texts: &[String], normalize: bool) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.embed_one(t, normalize)).collect())
    }
}

/// The embedder both binaries use. Honors `APP_USE_FAKE_EMBEDDINGS=1`.
pub fn get_default_embedder() -> Result<Box<dyn Embedder>> {
    let use_fake = std::env::var("APP_USE_FAKE_EMBEDDINGS")
        .ok()
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);
    if use_fake {
        eprintln!("🧪 Using FakeEmbedder");
        return Ok(Box::new(FakeEmbedder::new(EMBEDDING_DIM)));
    }
    Ok(Box::new(MiniLmEmbedder::new()?))
}
