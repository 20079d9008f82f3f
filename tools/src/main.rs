// Score the monochromatic scales of a palette written in Hjson (or
// JSON), for example:
//
//     {
//       name: radix
//       stepNames: [1, 2, 3, 4, 5]
//       colors: {
//         gray: ["#fcfcfc", "#e8e8e8", "#bbbbbb", "#646464", "#202020"]
//         blue: ["#fbfdff", "#e6f4fe", "#acd8fc", "#0d74ce", "#113264"]
//       }
//     }
//
// `stepNames` may be omitted.  Scales keep the order of the file.

use std::{fs::File, path::PathBuf};
use anyhow::{anyhow, bail, Result};
use clap::Parser;
use log::info;
use serde_hjson::Value::{self, Array, Object, F64, I64, U64};
use chromametry::{analyze_monochromatic_palette_with, AnalysisOptions,
                  ContrastName, PaletteAnalysis, PaletteData, StepName};

/// Score the monochromatic scales of a palette
#[derive(Parser, Debug)]
#[command(name = "chromametry-tools", version, long_about = None)]
struct Args {
    /// Palette file (Hjson or JSON)
    palette: PathBuf,

    /// Print the full analysis as JSON instead of a table
    #[arg(long)]
    json: bool,

    /// Contrast whose span is shown in the table
    #[arg(short, long, default_value = "wcag45")]
    contrast: ContrastName,

    /// Also accumulate ΔE00 under protanopia and deuteranopia
    #[arg(long)]
    simulate_color_blindness: bool,

    /// Log level: error, warn, info, debug, trace
    #[arg(short, long, default_value = "warn")]
    log_level: String,
}

fn step_name(v: &Value) -> Result<StepName> {
    match v {
        Value::String(s) => Ok(StepName::Label(s.clone())),
        I64(i) => Ok(StepName::Number(*i as f64)),
        U64(u) => Ok(StepName::Number(*u as f64)),
        F64(f) if f.is_finite() => Ok(StepName::Number(*f)),
        _ => bail!("step name {v:?} is neither a string nor a number"),
    }
}

fn scale(name: &str, v: &Value) -> Result<Vec<String>> {
    let Array(colors) = v else { bail!("scale “{name}” is not an array") };
    colors.iter().map(|c| match c {
        Value::String(c) => Ok(c.clone()),
        _ => Err(anyhow!("scale “{name}”: {c:?} is not a color")),
    }).collect()
}

fn palette_of_hjson(json: Value) -> Result<PaletteData> {
    let Object(m) = json else { bail!("a palette must be an object") };
    let name = match m.get("name") {
        Some(Value::String(s)) => s.clone(),
        None => "palette".to_string(),
        Some(v) => bail!("palette name {v:?} is not a string"),
    };
    let colors = match m.get("colors") {
        Some(Object(c)) => c.iter()
            .map(|(n, v)| Ok((n.clone(), scale(n, v)?)))
            .collect::<Result<Vec<_>>>()?,
        _ => bail!("“colors” must map scale names to lists of colors"),
    };
    let mut palette = PaletteData::new(name, colors);
    match m.get("stepNames") {
        Some(Array(a)) => {
            palette.step_names = a.iter().map(step_name)
                .collect::<Result<_>>()?
        }
        None => (),
        Some(v) => bail!("stepNames {v:?} is not an array"),
    }
    Ok(palette)
}

fn print_table(a: &PaletteAnalysis, contrast: ContrastName) {
    println!("{} ({} steps, {:?})", a.name, a.steps, a.direction);
    println!("{:<16} {:>8} {:>7} {:>7} {:>7} {:>7} {:>7} {:>7} {:>5}",
             "scale", "base", "light", "chroma", "spacing", "hue",
             "contr.", "score", contrast.as_str());
    for s in &a.scales {
        let m = &s.metrics;
        let span = s.contrasts.get(&contrast)
            .map_or_else(|| "-".to_string(), |c| c.span.to_string());
        println!("{:<16} {:>8} {:>7.3} {:>7.3} {:>7.3} {:>7.3} {:>7.3} \
                  {:>7.2} {:>5}",
                 s.name, s.base_color, m.lightness_linearity,
                 m.chroma_smoothness, m.spacing_uniformity, m.hue_stability,
                 m.contrast_efficiency, s.score, span);
    }
    let m = &a.metrics;
    let span = a.contrasts.get(&contrast)
        .map_or_else(|| "-".to_string(), |c| c.span.to_string());
    println!("{:<16} {:>8} {:>7.3} {:>7.3} {:>7.3} {:>7.3} {:>7.3} \
              {:>7.2} {:>5}",
             "(palette)", "", m.lightness_linearity, m.chroma_smoothness,
             m.spacing_uniformity, m.hue_stability, m.contrast_efficiency,
             a.score, span);
}

fn main() -> Result<()> {
    let args = Args::parse();
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(&args.log_level))
        .init();

    let fh = File::open(&args.palette)?;
    let json: Value = serde_hjson::from_reader(fh)
        .map_err(|e| anyhow!("{}: {e}", args.palette.display()))?;
    let palette = palette_of_hjson(json)?;
    info!("{}: {} scales", args.palette.display(), palette.colors.len());

    let options = AnalysisOptions::new()
        .simulate_color_blindness(args.simulate_color_blindness);
    let analysis = analyze_monochromatic_palette_with(&palette, &options)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
    } else {
        print_table(&analysis, args.contrast);
    }
    Ok(())
}
