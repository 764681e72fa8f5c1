use std::env;
use std::path::Path;
use std::process::ExitCode;

use region_summary::{
    run_command, Command, CommandReport, LayoutNode, MemoryDocument, MemoryHost, PlacedSummary,
    Point, SummaryConfig,
};
use region_summary_preview::{render, OutputFormat};

const DEFAULT_DOCUMENT_PATH: &str = "crates/region-summary-preview/fixtures/sample.json";

#[derive(Clone, Debug)]
struct Args {
    document_path: String,
    config_path: Option<String>,
    out_path: Option<String>,
    format: OutputFormat,
    current_page: bool,
    page_index: Option<usize>,
    update: bool,
    viewport_width: f64,
    viewport_height: f64,
}

fn main() -> ExitCode {
    match run(env::args().collect()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(msg) => {
            eprintln!("error: {}", msg);
            eprintln!("{}", help_text());
            ExitCode::FAILURE
        }
    }
}

fn run(args: Vec<String>) -> Result<(), String> {
    let cli = parse_args(args)?;

    let json = std::fs::read_to_string(&cli.document_path)
        .map_err(|e| format!("cannot read {}: {}", cli.document_path, e))?;
    let document = MemoryDocument::from_json_str(&json)
        .map_err(|e| format!("invalid document {}: {}", cli.document_path, e))?;
    let config = match &cli.config_path {
        Some(path) => SummaryConfig::from_json_file(path).map_err(|e| e.to_string())?,
        None => SummaryConfig::default(),
    };

    let page_count = document.pages.len();
    let mut host = MemoryHost::new(document).with_viewport_center(Point::new(
        cli.viewport_width / 2.0,
        cli.viewport_height / 2.0,
    ));
    if let Some(index) = cli.page_index {
        if index >= page_count {
            return Err(format!(
                "--page {} is out of range (document has {} pages)",
                index, page_count
            ));
        }
        host.set_current_page(index);
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| e.to_string())?;
    let reports = runtime.block_on(async {
        let mut reports = vec![
            run_command(
                &mut host,
                &config,
                Command::Generate {
                    current_page_only: cli.current_page,
                },
            )
            .await,
        ];
        if cli.update {
            reports.push(run_command(&mut host, &config, Command::Update).await);
        }
        reports
    });

    let last = finish(&reports)?;
    let Some(LayoutNode::Container(summary)) = host.snapshot(last.node) else {
        return Err("summary node vanished after the last command".to_string());
    };
    let rendered = render(&summary, cli.format)?;

    match &cli.out_path {
        Some(out_path) => {
            if let Some(parent) = Path::new(out_path).parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent).map_err(|e| e.to_string())?;
                }
            }
            std::fs::write(out_path, rendered).map_err(|e| e.to_string())?;
            println!(
                "wrote {} summary to {} (scope={}, entries={}, fingerprint={:08x})",
                cli.format,
                out_path,
                last.scope,
                summary.outline().len(),
                last.fingerprint,
            );
        }
        None => print!("{}", rendered),
    }
    Ok(())
}

/// Fail on the first failed command, otherwise return the last placement.
fn finish(reports: &[CommandReport]) -> Result<PlacedSummary, String> {
    let mut last = None;
    for report in reports {
        match &report.result {
            Ok(placed) => last = Some(placed.clone()),
            Err(err) => return Err(format!("{} failed: {}", report.command, err)),
        }
    }
    last.ok_or_else(|| "no command was run".to_string())
}

fn parse_args(args: Vec<String>) -> Result<Args, String> {
    if args.len() >= 2 && (args[1] == "--help" || args[1] == "-h") {
        return Err("help requested".to_string());
    }

    let has_positional_document = args.get(1).is_some_and(|v| !v.starts_with("--"));

    let mut cfg = Args {
        document_path: if has_positional_document {
            args[1].clone()
        } else {
            DEFAULT_DOCUMENT_PATH.to_string()
        },
        config_path: None,
        out_path: None,
        format: OutputFormat::default(),
        current_page: false,
        page_index: None,
        update: false,
        viewport_width: 1440.0,
        viewport_height: 900.0,
    };

    let mut i = if has_positional_document { 2usize } else { 1usize };
    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                let v = args
                    .get(i + 1)
                    .ok_or_else(|| "--config requires a value".to_string())?;
                cfg.config_path = Some(v.clone());
                i += 2;
            }
            "--out" => {
                let v = args
                    .get(i + 1)
                    .ok_or_else(|| "--out requires a value".to_string())?;
                if v.is_empty() {
                    return Err("--out must not be empty".to_string());
                }
                cfg.out_path = Some(v.clone());
                i += 2;
            }
            "--format" => {
                let v = args
                    .get(i + 1)
                    .ok_or_else(|| "--format requires a value".to_string())?;
                cfg.format = OutputFormat::parse(v)?;
                i += 2;
            }
            "--current-page" => {
                cfg.current_page = true;
                i += 1;
            }
            "--page" => {
                let v = args
                    .get(i + 1)
                    .ok_or_else(|| "--page requires a value".to_string())?;
                cfg.page_index = Some(
                    v.parse::<usize>()
                        .map_err(|_| format!("invalid --page value '{}'", v))?,
                );
                i += 2;
            }
            "--update" => {
                cfg.update = true;
                i += 1;
            }
            "--width" => {
                let v = args
                    .get(i + 1)
                    .ok_or_else(|| "--width requires a value".to_string())?;
                cfg.viewport_width = parse_extent(v, "--width")?;
                i += 2;
            }
            "--height" => {
                let v = args
                    .get(i + 1)
                    .ok_or_else(|| "--height requires a value".to_string())?;
                cfg.viewport_height = parse_extent(v, "--height")?;
                i += 2;
            }
            other => return Err(format!("unknown argument '{}'", other)),
        }
    }

    Ok(cfg)
}

fn parse_extent(value: &str, flag: &str) -> Result<f64, String> {
    match value.parse::<f64>() {
        Ok(v) if v.is_finite() && v > 0.0 => Ok(v),
        _ => Err(format!("invalid {} value '{}'", flag, value)),
    }
}

fn help_text() -> &'static str {
    r#"summary-preview - generate a region summary for a document JSON file

USAGE:
  cargo run -p region-summary-preview --bin summary-preview -- [document.json] [options]

OPTIONS:
  --config <file>         summary config JSON (partial, overrides defaults)
  --out <file>            write output to a file instead of stdout
  --format <fmt>          text|json|html (default: text)
  --current-page          summarize only the current page
  --page <n>              0-based index of the current page (default: from document)
  --update                run update after generate
  --width <px>            viewport width (default: 1440)
  --height <px>           viewport height (default: 900)
  -h, --help              show this help
"#
}
