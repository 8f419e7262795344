use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use huffpack::analytics::CompressionReport;
use huffpack::config::{CodecConfig, DEFAULT_CONFIG_FILE};
use huffpack::engine::frequency::FrequencyTable;
use huffpack::engine::huffman::{format_code, CodeTable, HuffmanTree};
use huffpack::utils::crc::{crc32, verify_roundtrip};
use huffpack::utils::io::{read_input, write_output};
use huffpack::{compress_with, decompress, CompressedContainer};

#[derive(Parser)]
#[command(name = "huffpack")]
#[command(about = "Static Huffman compression for single files")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, help = "Config file path")]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, help = "Output as JSON")]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compress a file into a container
    Compress {
        input: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Restore the original bytes from a container
    Decompress {
        input: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Show the header and tree of a container
    Inspect { input: PathBuf },
    /// Print the code assigned to every byte of a file
    Codes { input: PathBuf },
    /// Show compression statistics for a file
    Stats { input: PathBuf },
    /// Compress and decompress in memory, then compare checksums
    Verify { input: PathBuf },
    /// Write the default configuration
    GenerateConfig {
        #[arg(long, default_value = DEFAULT_CONFIG_FILE, help = "Config file path")]
        output: PathBuf,
    },
}

pub fn run(cli: Cli, config: &CodecConfig) -> Result<()> {
    match cli.command {
        Commands::Compress { input, output } => {
            let output = output.unwrap_or_else(|| config.compressed_path(&input));
            compress_file(&input, &output, config, cli.json)
        }
        Commands::Decompress { input, output } => {
            let output = output.unwrap_or_else(|| config.decompressed_path(&input));
            decompress_file(&input, &output, config, cli.json)
        }
        Commands::Inspect { input } => inspect(&input, config, cli.json),
        Commands::Codes { input } => show_codes(&input, config, cli.json),
        Commands::Stats { input } => show_stats(&input, config, cli.json),
        Commands::Verify { input } => verify(&input, config, cli.json),
        Commands::GenerateConfig { output } => generate_config(&output, cli.json),
    }
}

fn load(path: &Path, config: &CodecConfig) -> Result<Vec<u8>> {
    read_input(path, config.engine.max_input_size)
        .with_context(|| format!("reading {}", path.display()))
}

fn load_container(path: &Path, config: &CodecConfig) -> Result<CompressedContainer> {
    let raw = read_input(path, config.max_container_size())
        .with_context(|| format!("reading {}", path.display()))?;
    CompressedContainer::from_bytes(&raw).with_context(|| format!("parsing {}", path.display()))
}

fn compress_file(input: &Path, output: &Path, config: &CodecConfig, json: bool) -> Result<()> {
    let data = load(input, config)?;
    let container = compress_with(&data, &config.engine)
        .with_context(|| format!("compressing {}", input.display()))?;

    if config.verify_after_compress {
        let restored = decompress(&container)?;
        if !verify_roundtrip(&data, &restored) {
            bail!("round trip check failed for {}", input.display());
        }
        info!("round trip verified");
    }

    let bytes = container.to_bytes();
    write_output(output, &bytes).with_context(|| format!("writing {}", output.display()))?;
    info!(input = %input.display(), output = %output.display(), "compressed file");

    if json {
        println!(
            "{}",
            serde_json::json!({
                "input": input.display().to_string(),
                "output": output.display().to_string(),
                "original_bytes": data.len(),
                "compressed_bytes": bytes.len(),
            })
        );
    } else {
        println!("✅ {} -> {}", input.display(), output.display());
        println!("   {} bytes -> {} bytes", data.len(), bytes.len());
    }
    Ok(())
}

fn decompress_file(input: &Path, output: &Path, config: &CodecConfig, json: bool) -> Result<()> {
    let container = load_container(input, config)?;
    let data = decompress(&container).with_context(|| format!("decoding {}", input.display()))?;

    write_output(output, &data).with_context(|| format!("writing {}", output.display()))?;
    info!(input = %input.display(), output = %output.display(), "decompressed file");

    if json {
        println!(
            "{}",
            serde_json::json!({
                "input": input.display().to_string(),
                "output": output.display().to_string(),
                "restored_bytes": data.len(),
            })
        );
    } else {
        println!("✅ {} -> {}", input.display(), output.display());
        println!("   {} bytes restored", data.len());
    }
    Ok(())
}

fn inspect(input: &Path, config: &CodecConfig, json: bool) -> Result<()> {
    let container = load_container(input, config)?;
    let tree = &container.tree;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "original_bytes": container.original_len,
                "total_bits": container.total_bits,
                "padding_bits": container.padding_bits(),
                "packed_bytes": container.packed.len(),
                "tree_nodes": tree.len(),
                "tree_leaves": tree.leaf_count(),
                "tree_depth": tree.depth(),
            }))?
        );
    } else {
        println!("🔍 Container {}", input.display());
        println!("=====================");
        println!("   Original bytes: {}", container.original_len);
        println!("   Encoded bits:   {}", container.total_bits);
        println!("   Padding bits:   {}", container.padding_bits());
        println!("   Packed bytes:   {}", container.packed.len());
        println!(
            "   Tree:           {} nodes, {} leaves, depth {}",
            tree.len(),
            tree.leaf_count(),
            tree.depth()
        );
    }
    Ok(())
}

fn show_codes(input: &Path, config: &CodecConfig, json: bool) -> Result<()> {
    let data = load(input, config)?;
    let freq = FrequencyTable::from_bytes(&data);
    let tree = HuffmanTree::build(&freq)?;
    let table = CodeTable::from_tree(&tree);

    if json {
        let codes: Vec<_> = table
            .iter()
            .map(|(symbol, code)| {
                serde_json::json!({
                    "symbol": symbol,
                    "count": freq.get(symbol),
                    "code": format_code(code),
                })
            })
            .collect();
        println!(
            "{}",
            serde_json::json!({
                "max_code_length": table.max_code_length(),
                "codes": codes,
            })
        );
    } else {
        println!("📋 Code Table");
        println!("=============");
        for (symbol, code) in table.iter() {
            println!("{:>5} {:>10}  {}", symbol, freq.get(symbol), format_code(code));
        }
        println!("   Max code length: {}", table.max_code_length());
    }
    Ok(())
}

fn show_stats(input: &Path, config: &CodecConfig, json: bool) -> Result<()> {
    let data = load(input, config)?;
    let container = compress_with(&data, &config.engine)?;
    let report = CompressionReport::analyze(&data, &container);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("📈 Compression Statistics");
        println!("=========================");
        println!("   Original:  {} bytes", report.original_bytes);
        println!(
            "   Container: {} bytes (tree {}, packed {})",
            report.container_bytes, report.tree_bytes, report.packed_bytes
        );
        println!("   Symbols:   {} distinct, max code {}", report.distinct_symbols, report.max_code_length);
        println!("   SHA-256:   {}", report.sha256);
        for insight in report.get_insights() {
            println!("   {}", insight);
        }
    }
    Ok(())
}

fn verify(input: &Path, config: &CodecConfig, json: bool) -> Result<()> {
    let data = load(input, config)?;
    let container = compress_with(&data, &config.engine)?;
    let wire = container.to_bytes();
    let restored = decompress(&CompressedContainer::from_bytes(&wire)?)?;

    let passed = verify_roundtrip(&data, &restored);
    if json {
        println!(
            "{}",
            serde_json::json!({
                "status": if passed { "passed" } else { "failed" },
                "original_crc32": format!("{:08x}", crc32(&data)),
                "restored_crc32": format!("{:08x}", crc32(&restored)),
            })
        );
    } else {
        println!("🔍 Verifying {}", input.display());
        println!("=============================");
        println!("   CRC32 original: {:08x}", crc32(&data));
        println!("   CRC32 restored: {:08x}", crc32(&restored));
    }

    if !passed {
        warn!(input = %input.display(), "round trip mismatch");
        bail!("round trip verification FAILED for {}", input.display());
    }
    if !json {
        println!("✅ Round trip verification PASSED");
    }
    Ok(())
}

fn generate_config(output: &Path, json: bool) -> Result<()> {
    CodecConfig::default().save(output)?;
    if json {
        println!(
            "{}",
            serde_json::json!({
                "success": true,
                "config_file": output.display().to_string(),
            })
        );
    } else {
        println!("⚙️  Generate Configuration");
        println!("========================");
        println!("✅ Default configuration saved to: {}", output.display());
    }
    Ok(())
}
