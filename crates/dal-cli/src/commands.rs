use std::path::Path;

use anyhow::{bail, Context};
use colored::Colorize;
use dal_node::NodeConfig;
use dal_shares::{locate, parse_sequences, split_blobs, Blob, Share, ShareSequence};
use serde::Deserialize;
use serde_json::json;

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let format = cli.format;
    match cli.command {
        Command::Split(args) => cmd_split(args, format),
        Command::Parse(args) => cmd_parse(args, format),
        Command::Locate(args) => cmd_locate(args, format),
        Command::Config(args) => cmd_config(args, format),
    }
}

/// One entry of the `split` input file.
#[derive(Debug, Deserialize)]
struct BlobInput {
    namespace: String,
    #[serde(default)]
    data: Option<String>,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    share_version: u8,
}

impl BlobInput {
    fn into_blob(self) -> anyhow::Result<Blob> {
        let namespace = decode_hex(&self.namespace).context("namespace is not valid hex")?;
        let data = match (self.data, self.text) {
            (Some(data), None) => decode_hex(&data).context("data is not valid hex")?,
            (None, Some(text)) => text.into_bytes(),
            (Some(_), Some(_)) => bail!("set only one of `data` and `text`"),
            (None, None) => bail!("missing `data` or `text`"),
        };
        Ok(Blob::from_raw_parts(&namespace, data, self.share_version)?)
    }
}

fn decode_hex(s: &str) -> Result<Vec<u8>, hex::FromHexError> {
    hex::decode(s.trim().trim_start_matches("0x"))
}

fn load_blobs(json: &str) -> anyhow::Result<Vec<Blob>> {
    let inputs: Vec<BlobInput> = serde_json::from_str(json).context("invalid blob list")?;
    inputs
        .into_iter()
        .enumerate()
        .map(|(i, input)| input.into_blob().with_context(|| format!("blob #{i}")))
        .collect()
}

/// Read one hex share per line. Blank lines and `#` comments are ignored.
fn read_shares(text: &str) -> anyhow::Result<Vec<Vec<u8>>> {
    text.lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(lineno, line)| decode_hex(line).with_context(|| format!("line {lineno}")))
        .collect()
}

/// BLAKE3 digest over the concatenated share bytes.
fn fingerprint(shares: &[Share]) -> String {
    let mut hasher = blake3::Hasher::new();
    for share in shares {
        hasher.update(share.as_bytes());
    }
    hasher.finalize().to_hex().to_string()
}

fn cmd_split(args: SplitArgs, format: OutputFormat) -> anyhow::Result<()> {
    let json = std::fs::read_to_string(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;
    let blobs = load_blobs(&json)?;
    let shares = split_blobs(&blobs)?;
    let lines: Vec<String> = shares.iter().map(|s| hex::encode(s.as_bytes())).collect();
    let digest = fingerprint(&shares);

    if let Some(output) = &args.output {
        write_lines(output, &lines)?;
    }

    match format {
        OutputFormat::Json => {
            let mut report = json!({
                "blobs": blobs.len(),
                "shares": shares.len(),
                "fingerprint": digest,
            });
            match &args.output {
                Some(output) => report["output"] = json!(output.display().to_string()),
                None => report["data"] = json!(lines),
            }
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Text => {
            if args.output.is_none() {
                for line in &lines {
                    println!("{line}");
                }
            }
            eprintln!(
                "{} Split {} blobs into {} shares",
                "✓".green().bold(),
                blobs.len().to_string().bold(),
                shares.len().to_string().bold()
            );
            eprintln!("  Fingerprint: {}", digest.cyan());
            if let Some(output) = &args.output {
                eprintln!("  Written to {}", output.display().to_string().yellow());
            }
        }
    }
    Ok(())
}

fn write_lines(path: &Path, lines: &[String]) -> anyhow::Result<()> {
    let mut contents = lines.join("\n");
    contents.push('\n');
    std::fs::write(path, contents).with_context(|| format!("writing {}", path.display()))
}

fn sequence_report(
    sequence: &ShareSequence,
    row_width: Option<usize>,
) -> anyhow::Result<serde_json::Value> {
    let mut report = json!({
        "namespace": sequence.namespace().to_hex(),
        "share_version": sequence.share_version(),
        "sequence_len": sequence.sequence_len(),
        "shares": sequence.shares().len(),
        "start_index": sequence.start_index(),
        "data": hex::encode(sequence.data()),
    });
    if let Some(width) = row_width {
        let (row, col) = sequence.position(width)?;
        report["row"] = json!(row);
        report["col"] = json!(col);
    }
    Ok(report)
}

fn cmd_parse(args: ParseArgs, format: OutputFormat) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;
    let raw = read_shares(&text)?;
    let sequences = parse_sequences(&raw)?;

    match format {
        OutputFormat::Json => {
            let reports = sequences
                .iter()
                .map(|s| sequence_report(s, args.row_width))
                .collect::<anyhow::Result<Vec<_>>>()?;
            println!("{}", serde_json::to_string_pretty(&reports)?);
        }
        OutputFormat::Text => {
            println!(
                "{} {} shares, {} sequences",
                "✓".green().bold(),
                raw.len(),
                sequences.len().to_string().bold()
            );
            for sequence in &sequences {
                print!(
                    "  {}  {} bytes in {} shares @{}",
                    sequence.namespace().short_hex().cyan(),
                    sequence.sequence_len(),
                    sequence.shares().len(),
                    sequence.start_index()
                );
                if let Some(width) = args.row_width {
                    let (row, col) = sequence.position(width)?;
                    print!("  (row {row}, col {col})");
                }
                println!();
            }
        }
    }
    Ok(())
}

fn cmd_locate(args: LocateArgs, format: OutputFormat) -> anyhow::Result<()> {
    let (row, col) = locate(args.row_width, args.index)?;
    match format {
        OutputFormat::Json => println!("{}", json!({ "index": args.index, "row": row, "col": col })),
        OutputFormat::Text => println!("Share {} → row {}, col {}", args.index, row.to_string().bold(), col.to_string().bold()),
    }
    Ok(())
}

fn cmd_config(args: ConfigArgs, format: OutputFormat) -> anyhow::Result<()> {
    match args.action {
        ConfigAction::Init { path, node_type, force } => {
            if path.exists() && !force {
                bail!("{} already exists (use --force to overwrite)", path.display());
            }
            NodeConfig::for_node_type(node_type).save(&path)?;
            println!("{} Wrote {} config to {}", "✓".green().bold(), node_type.to_string().yellow(), path.display().to_string().bold());
        }
        ConfigAction::Show { path } => {
            let config = match &path {
                Some(path) => NodeConfig::load(path)
                    .with_context(|| format!("loading {}", path.display()))?,
                None => NodeConfig::default(),
            };
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&config)?),
                OutputFormat::Text => print!("{}", config.to_toml_string()?),
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dal_node::NodeType;
    use dal_types::Namespace;

    fn ns_hex(sub_id: &[u8]) -> String {
        Namespace::new_v0(sub_id).unwrap().to_hex()
    }

    #[test]
    fn load_text_and_hex_blobs() {
        let json = format!(
            r#"[{{"namespace": "{}", "text": "hello"}},
                {{"namespace": "0x{}", "data": "deadbeef", "share_version": 0}}]"#,
            ns_hex(&[2]),
            ns_hex(&[1])
        );
        let blobs = load_blobs(&json).unwrap();
        assert_eq!(blobs.len(), 2);
        assert_eq!(&blobs[0].data()[..], b"hello");
        assert_eq!(blobs[1].data().to_vec(), vec![0xDE_u8, 0xAD, 0xBE, 0xEF]);
    }

    #[test]
    fn blob_with_both_payloads_rejected() {
        let json = format!(r#"[{{"namespace": "{}", "text": "a", "data": "00"}}]"#, ns_hex(&[1]));
        let err = load_blobs(&json).unwrap_err();
        assert!(format!("{err:#}").contains("only one"));
    }

    #[test]
    fn short_namespace_rejected() {
        let err = load_blobs(r#"[{"namespace": "0001", "text": "a"}]"#).unwrap_err();
        assert!(format!("{err:#}").contains("blob #0"));
    }

    #[test]
    fn read_shares_skips_blank_and_comments() {
        let raw = read_shares("# header\n\n00ff\n  aa  \n").unwrap();
        assert_eq!(raw, vec![vec![0x00, 0xFF], vec![0xAA]]);
    }

    #[test]
    fn read_shares_reports_line() {
        let err = read_shares("00\nzz\n").unwrap_err();
        assert!(format!("{err:#}").contains("line 2"));
    }

    #[test]
    fn fingerprint_is_order_sensitive() {
        let a = Blob::new(Namespace::new_v0(&[1]).unwrap(), &b"a"[..], 0);
        let b = Blob::new(Namespace::new_v0(&[2]).unwrap(), &b"b"[..], 0);
        let shares = split_blobs(&[a.clone(), b.clone()]).unwrap();
        let swapped = split_blobs(&[b, a]).unwrap();
        assert_eq!(fingerprint(&shares), fingerprint(&swapped));

        let mut reversed = shares.clone();
        reversed.reverse();
        assert_ne!(fingerprint(&shares), fingerprint(&reversed));
    }

    #[test]
    fn split_then_parse_files() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("blobs.json");
        let output = dir.path().join("shares.hex");
        let long_text = "x".repeat(1_000);
        std::fs::write(
            &input,
            format!(
                r#"[{{"namespace": "{}", "text": "{long_text}"}}, {{"namespace": "{}", "text": "hi"}}]"#,
                ns_hex(&[9]),
                ns_hex(&[3])
            ),
        )
        .unwrap();

        cmd_split(
            SplitArgs { input, output: Some(output.clone()) },
            OutputFormat::Json,
        )
        .unwrap();

        let raw = read_shares(&std::fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(raw.len(), 4);
        let sequences = parse_sequences(&raw).unwrap();
        assert_eq!(sequences.len(), 2);
        assert_eq!(sequences[0].data(), b"hi");
        assert_eq!(sequences[1].data(), long_text.as_bytes());

        let report = sequence_report(&sequences[1], Some(2)).unwrap();
        assert_eq!(report["start_index"], 1);
        assert_eq!(report["row"], 0);
        assert_eq!(report["col"], 1);

        cmd_parse(ParseArgs { input: output, row_width: Some(2) }, OutputFormat::Text).unwrap();
    }

    #[test]
    fn locate_zero_width_fails() {
        assert!(cmd_locate(LocateArgs { row_width: 0, index: 3 }, OutputFormat::Text).is_err());
    }

    #[test]
    fn config_init_refuses_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dal.toml");
        let init = |force| ConfigArgs {
            action: ConfigAction::Init { path: path.clone(), node_type: NodeType::Full, force },
        };

        cmd_config(init(false), OutputFormat::Text).unwrap();
        assert!(cmd_config(init(false), OutputFormat::Text).is_err());
        cmd_config(init(true), OutputFormat::Text).unwrap();

        assert_eq!(NodeConfig::load(&path).unwrap().node_type, NodeType::Full);
        cmd_config(ConfigArgs { action: ConfigAction::Show { path: Some(path) } }, OutputFormat::Json).unwrap();
    }
}
