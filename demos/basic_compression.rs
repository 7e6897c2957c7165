use huffman_toolkit::report::{CodeReport, TreeDiagram};
use huffman_toolkit::HuffmanCodec;
use std::fs::File;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Create a sample file
    let sample_text = "Hello, world! This is a sample text for Huffman compression. \
                      The quick brown fox jumps over the lazy dog. \
                      Huffman encoding is a greedy algorithm that builds optimal prefix codes.";

    std::fs::write("sample.txt", sample_text)?;

    println!("📝 Created sample file: {} bytes", sample_text.len());

    // Compress the file
    let input = File::open("sample.txt")?;
    let output = File::create("sample.huff")?;
    let stats = HuffmanCodec::encode_from_file(input, output)?;

    println!(
        "🗜️  Compressed to: {} bytes ({} payload, {:.1}% of original bits)",
        stats.artifact_bytes,
        stats.payload_bytes,
        stats.ratio().unwrap_or(0.0)
    );

    // Show what the encoder built
    let codec = HuffmanCodec::from_bytes(sample_text.as_bytes())?;
    println!("\n{}", CodeReport(codec.code_table()));
    println!("{}", TreeDiagram(codec.tree()));

    // Decompress the file
    let compressed = File::open("sample.huff")?;
    let decompressed = File::create("decompressed.txt")?;
    HuffmanCodec::decode_from_file(compressed, decompressed)?;

    // Verify the result
    let decompressed_text = std::fs::read_to_string("decompressed.txt")?;

    if sample_text == decompressed_text {
        println!("✅ Decompression successful! Data matches exactly.");
    } else {
        println!("❌ Decompression failed! Data mismatch.");
        return Err("Decompression verification failed".into());
    }

    // Cleanup
    std::fs::remove_file("sample.txt")?;
    std::fs::remove_file("sample.huff")?;
    std::fs::remove_file("decompressed.txt")?;

    println!("🧹 Cleaned up temporary files");

    Ok(())
}
