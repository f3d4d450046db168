// Command-line interface for markweave
//
// This binary converts rich-text documents between the nested-mark model
// (what Markdown parsers produce) and the flat-mark model (what structured
// editors consume).
//
// The conversion needs a source format and a destination model. The source
// format is auto-detected from the file extension (and, for JSON, from the
// document's root tag), while being overridable with an explicit --from
// flag.
//
// Usage:
//  markweave <input> [--to flat|nested] [--from markdown|nested|flat] [--output <file>]
//  markweave inspect <input> [--from <format>]   - Print the document as an indented tree
//
// The node/mark catalogue the CLI wires up lives in src/catalogue.rs; the
// flat-model schema (root tag, text tag, canonical mark order) comes from
// the layered configuration in markweave-config and can be adjusted with
// --config.

mod catalogue;
mod inspect;

use clap::{Arg, Command, ValueHint};
use markweave::{flatten, markdown, nest, FlatNode, FlattenOptions, NestOptions, Node, Schema};
use markweave_config::{Loader, MarkweaveConfig};
use serde_json::Value;
use std::error::Error;
use std::fs;
use std::path::Path;
use std::process::ExitCode;

#[derive(Debug, Clone, Copy, PartialEq)]
enum SourceFormat {
    Markdown,
    Nested,
    Flat,
}

fn build_cli() -> Command {
    Command::new("markweave")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A tool for converting rich-text documents between tree models")
        .long_about(
            "markweave converts rich-text documents between the nested-mark model\n\
            (wrapper nodes, as produced by Markdown parsers) and the flat-mark model\n\
            (mark lists on leaves, as consumed by structured editors).\n\n\
            Examples:\n  \
            markweave doc.md                        # Markdown to flat-model JSON\n  \
            markweave doc.md --to nested            # Markdown to nested-model JSON\n  \
            markweave doc.json --to nested          # Flat-model JSON back to nested\n  \
            markweave inspect doc.md                # Indented tree view",
        )
        .arg_required_else_help(true)
        .subcommand_required(false)
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Path to a markweave.toml configuration file")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .arg(
            Arg::new("input")
                .help("Path to the input document (.md or .json)")
                .index(1)
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("from")
                .long("from")
                .value_name("FORMAT")
                .help("Input format (default: detected from the file)")
                .value_parser(["markdown", "nested", "flat"]),
        )
        .arg(
            Arg::new("to")
                .long("to")
                .value_name("MODEL")
                .help("Destination model")
                .value_parser(["flat", "nested"])
                .default_value("flat"),
        )
        .arg(
            Arg::new("output")
                .long("output")
                .short('o')
                .value_name("FILE")
                .help("Write output to a file instead of stdout")
                .value_hint(ValueHint::FilePath),
        )
        .subcommand(
            Command::new("inspect")
                .about("Print a document as an indented tree")
                .arg(
                    Arg::new("input")
                        .help("Path to the input document (.md or .json)")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("from")
                        .long("from")
                        .value_name("FORMAT")
                        .help("Input format (default: detected from the file)")
                        .value_parser(["markdown", "nested", "flat"]),
                ),
        )
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let matches = build_cli().get_matches();
    let config = load_config(matches.get_one::<String>("config"))?;
    let schema: Schema = (&config.schema).into();

    if let Some(("inspect", sub)) = matches.subcommand() {
        let input = sub.get_one::<String>("input").ok_or("missing input path")?;
        return run_inspect(input, sub.get_one::<String>("from").map(String::as_str), &schema);
    }

    let input = matches
        .get_one::<String>("input")
        .ok_or("missing input path")?;
    let to = matches
        .get_one::<String>("to")
        .map(String::as_str)
        .unwrap_or("flat");

    let source = fs::read_to_string(input)?;
    let format = detect_format(
        input,
        matches.get_one::<String>("from").map(String::as_str),
        &source,
        &schema,
    )?;

    let value = convert(&source, format, to, &schema)?;
    let rendered = if config.output.pretty {
        serde_json::to_string_pretty(&value)?
    } else {
        serde_json::to_string(&value)?
    };

    match matches.get_one::<String>("output") {
        Some(path) => fs::write(path, rendered + "\n")?,
        None => println!("{rendered}"),
    }
    Ok(())
}

fn load_config(path: Option<&String>) -> Result<MarkweaveConfig, Box<dyn Error>> {
    let loader = match path {
        Some(path) => Loader::new().with_file(path),
        None => Loader::new().with_optional_file("markweave.toml"),
    };
    Ok(loader.build()?)
}

fn detect_format(
    path: &str,
    explicit: Option<&str>,
    source: &str,
    schema: &Schema,
) -> Result<SourceFormat, Box<dyn Error>> {
    match explicit {
        Some("markdown") => return Ok(SourceFormat::Markdown),
        Some("nested") => return Ok(SourceFormat::Nested),
        Some("flat") => return Ok(SourceFormat::Flat),
        _ => {}
    }

    let extension = Path::new(path)
        .extension()
        .and_then(|extension| extension.to_str())
        .unwrap_or_default();
    match extension {
        "md" | "markdown" => Ok(SourceFormat::Markdown),
        "json" => {
            let value: Value = serde_json::from_str(source)?;
            if value.get("type").and_then(Value::as_str) == Some(schema.top_node()) {
                Ok(SourceFormat::Flat)
            } else {
                Ok(SourceFormat::Nested)
            }
        }
        other => Err(format!("cannot detect a format from extension '{other}'; pass --from").into()),
    }
}

fn convert(
    source: &str,
    format: SourceFormat,
    to: &str,
    schema: &Schema,
) -> Result<Value, Box<dyn Error>> {
    match (format, to) {
        (SourceFormat::Markdown, "flat") => {
            let tree = markdown::parse(source);
            Ok(flatten_tree(&tree, schema)?.to_value())
        }
        (SourceFormat::Markdown, "nested") => Ok(markdown::parse(source).to_value()),
        (SourceFormat::Nested, "flat") => {
            let tree = Node::from_value(&serde_json::from_str(source)?)?;
            Ok(flatten_tree(&tree, schema)?.to_value())
        }
        (SourceFormat::Flat, "nested") => {
            let tree = FlatNode::from_value(&serde_json::from_str(source)?)?;
            let handlers = catalogue::nest_handlers();
            Ok(nest(
                &tree,
                NestOptions {
                    schema,
                    handlers: &handlers,
                },
            )?
            .to_value())
        }
        (SourceFormat::Flat, "flat") => Err("input is already in the flat model".into()),
        (SourceFormat::Nested, "nested") => Err("input is already in the nested model".into()),
        _ => Err(format!("unsupported destination model '{to}'").into()),
    }
}

fn flatten_tree(tree: &Node, schema: &Schema) -> Result<FlatNode, Box<dyn Error>> {
    let handlers = catalogue::flatten_handlers();
    Ok(flatten(
        tree,
        FlattenOptions {
            schema,
            handlers: &handlers,
            raw_handlers: None,
        },
    )?)
}

fn run_inspect(
    input: &str,
    explicit: Option<&str>,
    schema: &Schema,
) -> Result<(), Box<dyn Error>> {
    let source = fs::read_to_string(input)?;
    let format = detect_format(input, explicit, &source, schema)?;

    let rendered = match format {
        SourceFormat::Markdown => inspect::render_nested(&markdown::parse(&source)),
        SourceFormat::Nested => {
            inspect::render_nested(&Node::from_value(&serde_json::from_str(&source)?)?)
        }
        SourceFormat::Flat => {
            inspect::render_flat(&FlatNode::from_value(&serde_json::from_str(&source)?)?)
        }
    };
    print!("{rendered}");
    Ok(())
}
