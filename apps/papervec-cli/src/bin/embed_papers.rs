use std::process;
use std::time::Duration;

use indicatif::ProgressBar;
use papervec_core::config::{expand_path, Config};
use papervec_core::error::Error;
use papervec_core::papers;
use papervec_core::traits::Embedder as _;
use papervec_embed::{get_default_embedder, MODEL_NAME};

const FALLBACK_INPUT: &str = "data/processed/papers.json";
const FALLBACK_OUTPUT: &str = "data/processed/papers_with_embeddings.json";

fn main() -> anyhow::Result<()> {
    let config = Config::load().map_err(|e| {
        eprintln!("Error loading config: {}", e);
        e
    })?;
    let input = expand_path(
        config
            .get::<String>("data.papers_path")
            .unwrap_or_else(|_| FALLBACK_INPUT.to_string()),
    );
    let output = expand_path(
        config
            .get::<String>("data.output_path")
            .unwrap_or_else(|_| FALLBACK_OUTPUT.to_string()),
    );

    // Missing input and an empty collection are reported and exit
    // non-zero without ever touching the output path. Anything else
    // (malformed JSON, model failures) propagates as a fatal error.
    let mut collection = match papers::load_collection(&input) {
        Ok(c) => c,
        Err(e @ (Error::NotFound(_) | Error::EmptyCollection)) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
        Err(e) => return Err(e.into()),
    };

    println!("Initializing sentence embedding model: {}", MODEL_NAME);
    let embedder = get_default_embedder()?;

    let texts = papers::select_texts(&collection.papers);
    println!("Generating embeddings for {} abstracts", texts.len());

    let spinner = ProgressBar::new_spinner();
    spinner.set_message("embedding...");
    spinner.enable_steady_tick(Duration::from_millis(120));
    let embeddings = embedder.embed_batch(&texts, true)?;
    spinner.finish_and_clear();
    println!("Embeddings generated successfully.");

    papers::attach_embeddings(&mut collection.papers, embeddings)?;

    println!("Saving augmented data with embeddings to: {}", output.display());
    papers::write_collection(&output, &collection)?;
    Ok(())
}
