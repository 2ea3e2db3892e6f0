use std::env;
use std::process;

use papervec_core::traits::Embedder as _;
use papervec_embed::get_default_embedder;

fn main() -> anyhow::Result<()> {
    let Some(query) = env::args().nth(1) else {
        eprintln!("Error: No query provided. Please pass the query as an argument.");
        process::exit(1);
    };

    // Model chatter goes to stderr; stdout carries exactly one line of
    // JSON so callers can parse it directly.
    let embedder = get_default_embedder()?;
    let embeddings = embedder.embed_batch(&[query], true)?;
    let embedding = embeddings
        .into_iter()
        .next()
        .ok_or_else(|| anyhow::anyhow!("embedder returned no vector"))?;

    println!("{}", serde_json::to_string(&embedding)?);
    Ok(())
}
