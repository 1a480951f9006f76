use anyhow::{Context, Result};

use tabmerge_cli::overrides::ColumnOverride;
use tabmerge_cli::pipeline::{AppendRequest, AppendResult, append, suggest};

use crate::cli::{AppendArgs, SuggestArgs};
use crate::summary::print_mapping;

pub fn run_suggest(args: &SuggestArgs) -> Result<()> {
    let mapping = suggest(&args.source, &args.target, args.matching.options())?;
    if args.json {
        let json = serde_json::to_string_pretty(&mapping).context("serialize mapping")?;
        println!("{json}");
    } else {
        print_mapping(&mapping);
    }
    Ok(())
}

pub fn run_append(args: &AppendArgs) -> Result<AppendResult> {
    let mut overrides = args.map.clone();
    overrides.extend(args.unmap.iter().map(ColumnOverride::clear));

    let request = AppendRequest {
        source: args.source.clone(),
        target: args.target.clone(),
        output: args.output.clone(),
        options: args.matching.options(),
        mapping_file: args.mapping_file.clone(),
        accept_suggestions: args.accept_suggestions,
        overrides,
        dry_run: args.dry_run,
    };
    append(&request)
}
