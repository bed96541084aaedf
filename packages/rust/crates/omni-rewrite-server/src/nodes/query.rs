use anyhow::{Context, bail};
use omni_rewrite::{
    Query, QueryResult, RewriteEngine, apply_line_diffs, generate_unified_diff, parse_suffixes,
    validate_query,
};
use omni_rewrite_server::RewriteSettings;

use super::build_engine;
use crate::cli::{EngineArgs, OutputFormat};

pub(crate) struct QueryCommandRequest {
    pub(crate) dir: String,
    pub(crate) suffixes: String,
    pub(crate) pattern: String,
    pub(crate) replace: String,
    pub(crate) commit: bool,
    pub(crate) format: OutputFormat,
    pub(crate) engine: EngineArgs,
}

pub(crate) async fn run_query_mode(
    request: QueryCommandRequest,
    settings: &RewriteSettings,
) -> anyhow::Result<()> {
    let engine = build_engine(&request.engine, settings)?;
    let query = Query {
        directory: request.dir,
        file_suffixes: parse_suffixes(&request.suffixes),
        match_content: request.pattern,
        replace_content: request.replace,
        commit: request.commit,
    };

    let (output, result) = tokio::task::spawn_blocking(move || render(&engine, &query, request.format))
        .await
        .context("query worker failed")??;

    print!("{output}");
    if !result.is_ok() {
        bail!(result.error);
    }
    Ok(())
}

fn render(
    engine: &RewriteEngine,
    query: &Query,
    format: OutputFormat,
) -> anyhow::Result<(String, QueryResult)> {
    match format {
        OutputFormat::Json => {
            let result = engine.run(query);
            let mut output = serde_json::to_string_pretty(&result)?;
            output.push('\n');
            Ok((output, result))
        }
        OutputFormat::Diff => {
            // Diffs come from a dry run so the originals are still on disk.
            let preview = engine.run(&Query {
                commit: false,
                ..query.clone()
            });
            let output = render_diffs(engine, query, &preview);
            let result = if query.commit && preview.is_ok() {
                engine.run(query)
            } else {
                preview
            };
            Ok((output, result))
        }
    }
}

fn render_diffs(engine: &RewriteEngine, query: &Query, preview: &QueryResult) -> String {
    let config = engine.config();
    let Ok(validated) = validate_query(query, config) else {
        return String::new();
    };
    let root = validated.root;
    let mut output = String::new();
    for file in preview.files.iter().filter(|f| f.has_changes()) {
        let original = match omni_io::read_text_safe(root.join(&file.path), config.max_file_size) {
            Ok(content) => content,
            Err(error) => {
                tracing::warn!(path = %file.path, %error, "file changed before diff rendering");
                continue;
            }
        };
        let modified = apply_line_diffs(&original, &file.lines);
        output.push_str(&generate_unified_diff(&file.path, &original, &modified));
    }
    output
}
