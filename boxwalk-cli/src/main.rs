//! boxwalk - generate, transform and print the CSS box tree of an XHTML
//! document.

mod step;

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use owo_colors::OwoColorize;

use boxwalk_common::warning::clear_warnings;
use boxwalk_css::{LoadOptions, cascade_document};
use boxwalk_dom::load_xhtml;
use boxwalk_transform::Transformer;
use boxwalk_tree::{RenderOptions, build_box_tree, render, serialize_json, serialize_xml};

use step::Step;

/// Debug forms of the box tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Serialization {
    /// Markup showing every box, anonymous ones included
    Xml,
    /// The same tree as JSON
    Json,
}

/// Generate the CSS box tree of an XHTML document, restructure it, and
/// write it back out as XHTML.
#[derive(Parser, Debug)]
#[allow(clippy::struct_excessive_bools)]
#[command(name = "boxwalk")]
#[command(version, about, long_about = None)]
#[command(after_help = r#"STEPS:
    table START SIZE single|rows       Flatten a table into divs
    heading START SIZE ELEMENT         Turn blocks into a heading
    image BLOCK.INLINE 1               Leave out an image
    list START SIZE LIST [ITEM]        Turn blocks into a list
    poem START SIZE                    Turn blocks into a poem
    nav START SIZE                     Shape an ol as a navigation list
    wrap-list START SIZE PRE WRAPPER   Wrap a list and what precedes it
    wrap-list-in-previous START SIZE   Move a list into the block before it
    figure START SIZE CAPTION before|after
                                       Wrap blocks in a figure
    hidden START SIZE                  Leave out a hidden block
    page-break START SIZE              Mark a block as a page break

EXAMPLES:
    boxwalk chapter.xhtml
    boxwalk chapter.xhtml --op 'table 0 3 single' --op 'heading 3 1 h1'
    boxwalk chapter.xhtml --serialize json --pretty"#)]
struct Cli {
    /// XHTML file to read
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Transformation step, applied in order (repeatable)
    #[arg(long = "op", value_name = "STEP")]
    steps: Vec<Step>,

    /// Stop at the first step that can not be performed
    #[arg(long)]
    strict: bool,

    /// Write each box's style as a style attribute
    #[arg(long)]
    preserve_style: bool,

    /// Stylesheet to link from the output
    #[arg(long, value_name = "HREF")]
    stylesheet: Option<String>,

    /// Ignore <style> elements in the document
    #[arg(long)]
    no_style_elements: bool,

    /// Print the box tree in a debug form instead of XHTML
    #[arg(long, value_enum, value_name = "FORMAT")]
    serialize: Option<Serialization>,

    /// Indent JSON output
    #[arg(long)]
    pretty: bool,

    /// Report every step applied
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    clear_warnings();

    let source =
        fs::read_to_string(&cli.file).with_context(|| format!("failed to read {}", cli.file.display()))?;
    let tree = load_xhtml(&source).with_context(|| format!("failed to load {}", cli.file.display()))?;
    let load_options = LoadOptions {
        style_elements: !cli.no_style_elements,
        ..LoadOptions::default()
    };
    let styles = cascade_document(&tree, &load_options);
    let root = build_box_tree(&tree, &styles)
        .context("failed to generate the box tree")?
        .context("the document element generates no box")?;

    let mut transformer = Transformer::new(root);
    let mut skipped = 0;
    for step in &cli.steps {
        match step.apply(&mut transformer) {
            Ok(()) => {
                if cli.verbose {
                    eprintln!("{} {step}", "applied".green().bold());
                }
            }
            Err(error) if cli.strict => bail!("step '{step}' failed: {error}"),
            Err(error) => {
                skipped += 1;
                eprintln!("{} {step}: {error}", "skipped".yellow().bold());
            }
        }
    }
    if cli.verbose && !cli.steps.is_empty() {
        eprintln!(
            "{} of {} steps applied",
            cli.steps.len() - skipped,
            cli.steps.len()
        );
    }

    let root = transformer.get();
    let output = match cli.serialize {
        Some(Serialization::Xml) => serialize_xml(&root),
        Some(Serialization::Json) => serialize_json(&root, cli.pretty).context("failed to write JSON")?,
        None => render(
            &root,
            &RenderOptions {
                preserve_style: cli.preserve_style,
                stylesheet_href: cli.stylesheet,
            },
        ),
    };
    println!("{output}");
    Ok(())
}
