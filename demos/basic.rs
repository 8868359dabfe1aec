//! Example of ranking completions by how often words were seen
use freq_trie::Trie;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let text = "the cat sat on the mat while the other cat watched the catalog \
                and the cat thought about the mat then the theory of cats";

    // Record every word occurrence
    let mut trie = Trie::new();
    for word in text.split_whitespace() {
        trie.insert(word)?;
    }

    println!("{} distinct words", trie.len());
    for prefix in &["th", "ca", "cat", "m", "o", "x"] {
        let completion = trie.autocomplete(prefix)?;
        println!(
            "  {:>4} -> {}",
            prefix,
            String::from_utf8_lossy(&completion)
        );
    }

    // The completion for "the" is "the" itself: it is seen far more than "theory"
    assert_eq!(trie.autocomplete("the")?, b"the".to_vec());
    assert_eq!(trie.count("cat"), 3);

    println!("\nAll words:");
    trie.dump(&mut std::io::stdout())?;

    Ok(())
}
