//! # Forme Fonts CLI
//!
//! Usage:
//!   forme-fonts info Helvetica-Bold
//!   forme-fonts info fonts/Family.ttc --index 1
//!   forme-fonts subset fonts/Inter.ttf --gids 3,36,68 -o inter-subset.ttf
//!   forme-fonts subset fonts/Inter.ttf --gids 3,36 --tables --options subset.json
//!   forme-fonts glyph Aring
//!   forme-fonts glyph U+00C5
//!
//! Set `RUST_LOG=debug` to see cache and subsetting diagnostics.

use std::env;
use std::fs;
use std::path::PathBuf;

use forme_fonts::font::glyph_names;
use forme_fonts::font::{FontLoader, FontSource};
use forme_fonts::{FontError, SubsetOptions};

const USAGE: &str = "usage: forme-fonts <info|subset|glyph> <font-or-glyph> [options]";

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    let result = match args.first().map(String::as_str) {
        Some("info") => info(&args[1..]),
        Some("subset") => subset(&args[1..]),
        Some("glyph") => glyph(&args[1..]),
        _ => Err(USAGE.to_string()),
    };

    if let Err(message) = result {
        eprintln!("✗ {}", message);
        std::process::exit(1);
    }
}

fn info(args: &[String]) -> Result<(), String> {
    let font = positional(args)?;
    let name = match flag_value(args, "--index") {
        Some(index) => format!("{},{}", font, index),
        None => font.to_string(),
    };

    let names = forme_fonts::resolve_font(Some(&name), None)
        .map_err(|e| e.to_string())?
        .ok_or_else(|| format!("No font known by the name {}", name))?;
    let json = serde_json::to_string_pretty(&names).map_err(|e| e.to_string())?;
    println!("{}", json);
    Ok(())
}

fn subset(args: &[String]) -> Result<(), String> {
    let font = positional(args)?;
    let gids = parse_gids(flag_value(args, "--gids").ok_or("--gids is required")?)?;
    let index = flag_value(args, "--index")
        .map(|i| i.parse::<u32>().map_err(|e| format!("bad --index {}: {}", i, e)))
        .transpose()?;

    let mut options = match flag_value(args, "--options") {
        Some(path) => {
            let json = fs::read_to_string(path).map_err(|e| format!("{}: {}", path, e))?;
            SubsetOptions::from_json(&json).map_err(|e| e.to_string())?
        }
        None => SubsetOptions::default(),
    };
    if has_flag(args, "--tables") {
        options.subset_tables = true;
    }
    if has_flag(args, "--no-notdef") {
        options.keep_notdef = false;
    }

    let source = FontSource::Path(PathBuf::from(font));
    let program = FontLoader::new()
        .load_true_type(&source, index, true)
        .map_err(|e| e.to_string())?;
    let true_type = program
        .as_true_type()
        .ok_or_else(|| FontError::Unsupported(format!("{} is not a TrueType font", font)).to_string())?;

    let result = forme_fonts::font::subset(true_type, gids, &options).map_err(|e| e.to_string())?;
    let output_path = flag_value(args, "-o").unwrap_or("subset.ttf");
    fs::write(output_path, &result.data).map_err(|e| format!("{}: {}", output_path, e))?;
    eprintln!(
        "✓ Kept {} glyphs, written {} bytes to {}",
        result.glyphs.len(),
        result.data.len(),
        output_path
    );
    Ok(())
}

fn glyph(args: &[String]) -> Result<(), String> {
    let query = positional(args)?;
    if let Some(hex) = query.strip_prefix("U+").or_else(|| query.strip_prefix("u+")) {
        let code = u32::from_str_radix(hex, 16).map_err(|e| format!("bad code point {}: {}", query, e))?;
        let name = glyph_names::unicode_to_name(code).ok_or_else(|| format!("No glyph name for {}", query))?;
        println!("{}", name);
    } else {
        let code = glyph_names::name_to_unicode(query).ok_or_else(|| format!("Unknown glyph name {}", query))?;
        println!("U+{:04X}", code);
    }
    Ok(())
}

// ─── Argument Helpers ───────────────────────────────────────────

/// The first argument that is neither a flag nor a flag's value.
fn positional(args: &[String]) -> Result<&str, String> {
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--tables" | "--no-notdef" => {}
            a if a.starts_with('-') => {
                iter.next();
            }
            a => return Ok(a),
        }
    }
    Err(USAGE.to_string())
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2).find(|w| w[0] == flag).map(|w| w[1].as_str())
}

fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|a| a == flag)
}

fn parse_gids(list: &str) -> Result<Vec<u16>, String> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<u16>().map_err(|e| format!("bad glyph id {}: {}", s, e)))
        .collect()
}
