//! Render command implementation

use crate::cli::RenderArgs;
use anyhow::{Context, Result};
use layerfont::export::OutputFormat;
use layerfont::{LayoutRequest, RequestParams};
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;

pub fn run(args: &RenderArgs, quiet: bool) -> Result<()> {
    let text = input_text(args)?;
    let request = build_request(args, text.as_deref());

    let mut settings = super::settings(&args.resources);
    if let Some(converter) = &args.converter {
        settings.converter = Some(converter.clone());
    }
    if args.no_cache {
        settings.document_cache = false;
    }

    let format = args
        .format
        .or_else(|| args.output_file.as_deref().and_then(OutputFormat::from_path))
        .unwrap_or_default();
    let exporter = settings.exporter(format, request.debug)?;
    log::debug!("Rendering {:?} at {}px as {}", request.text, request.size, format);

    let pipeline = settings.pipeline();
    let document = pipeline
        .render(&request)
        .with_context(|| format!("Failed to render {:?}", request.text))?;
    let bytes = exporter.export(&document)?;
    write_output(args.output_file.as_deref(), &bytes)?;

    if !quiet {
        match &args.output_file {
            Some(path) => eprintln!("Rendered to {}", path.display()),
            None => eprintln!("Rendered to stdout"),
        }
        eprintln!("  Format: {}", format.extension().to_uppercase());
        eprintln!("  Size: {}x{} px, {} bytes", document.width, document.height, bytes.len());
    }
    Ok(())
}

/// The text argument, or stdin when neither it nor the query names any
fn input_text(args: &RenderArgs) -> Result<Option<String>> {
    if let Some(text) = &args.text {
        return Ok(Some(decode_unicode_escapes(text)));
    }
    let query_has_text = args
        .query
        .as_deref()
        .is_some_and(|query| RequestParams::parse_query(query).get("text").is_some());
    if query_has_text {
        return Ok(None);
    }

    let mut text = String::new();
    io::stdin()
        .read_to_string(&mut text)
        .context("Failed to read text from stdin")?;
    Ok(Some(text.trim_end_matches(['\n', '\r']).to_string()))
}

/// Merge the query and the flags into request parameters; flags come last and win
fn build_request(args: &RenderArgs, text: Option<&str>) -> LayoutRequest {
    let mut params: Vec<(String, String)> = args
        .query
        .as_deref()
        .map(|query| {
            RequestParams::parse_query(query)
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect()
        })
        .unwrap_or_default();
    let mut push = |key: &str, value: String| params.push((key.to_string(), value));

    if let Some(text) = text {
        push("text", text.to_string());
    }
    if let Some(size) = args.size {
        push("size", size.to_string());
    }
    if args.vertical {
        push("orientation", "vertical".to_string());
    }
    for layer in &args.layers {
        let (style, color) = layer.split_once('=').unwrap_or((layer.as_str(), ""));
        push(&format!("layers[{}]", style.trim()), color.to_string());
    }
    if let Some(background) = &args.background {
        push("background", background.clone());
    }
    if !args.stylistic_sets.is_empty() {
        push("ss", args.stylistic_sets.join(","));
    }
    for (key, value) in [("block", &args.block), ("begin", &args.begin), ("end", &args.end)] {
        if let Some(value) = value {
            push(key, value.clone());
        }
    }
    if args.uppercase {
        push("uppercase", "1".to_string());
    }
    if args.debug {
        push("debug", "1".to_string());
    }

    LayoutRequest::from_params(params)
}

/// Decode `\u{XXXX}` and `\uXXXX` escapes; anything malformed is kept verbatim
fn decode_unicode_escapes(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(pos) = rest.find("\\u") {
        result.push_str(&rest[..pos]);
        let after = &rest[pos + 2..];
        let (hex, consumed) = match after.strip_prefix('{') {
            Some(inner) => match inner.find('}') {
                Some(end) => (&inner[..end], end + 2),
                None => ("", 0),
            },
            None => {
                let digits = after.bytes().take(4).take_while(u8::is_ascii_hexdigit).count();
                if digits == 4 {
                    (&after[..4], 4)
                } else {
                    ("", 0)
                }
            },
        };

        match u32::from_str_radix(hex, 16).ok().and_then(char::from_u32) {
            Some(ch) if consumed > 0 => {
                result.push(ch);
                rest = &after[consumed..];
            },
            _ => {
                result.push_str("\\u");
                rest = after;
            },
        }
    }
    result.push_str(rest);
    result
}

fn write_output(path: Option<&Path>, data: &[u8]) -> Result<()> {
    match path {
        Some(path) => {
            let mut file =
                File::create(path).with_context(|| format!("Cannot create {}", path.display()))?;
            file.write_all(data)?;
        },
        None => io::stdout().write_all(data)?,
    }
    Ok(())
}
