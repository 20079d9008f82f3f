use std::{env, error::Error};
use chromametry::{analyze_monochromatic, ContrastName};

type Err = Box<dyn Error>;

// Tailwind CSS blue.
const BLUE: [&str; 11] = [
    "#eff6ff", "#dbeafe", "#bfdbfe", "#93c5fd", "#60a5fa", "#3b82f6",
    "#2563eb", "#1d4ed8", "#1e40af", "#1e3a8a", "#172554"];

fn main() -> Result<(), Err> {
    // Colors given on the command line replace the default scale.
    let args: Vec<String> = env::args().skip(1).collect();
    let a = if args.is_empty() {
        analyze_monochromatic(&BLUE, Some("blue"), None)?
    } else {
        analyze_monochromatic(&args, None, None)?
    };

    println!("{}: base {} (step {})", a.name, a.base_color, a.base_index);
    println!("{:>8} {:>7} {:>7} {:>8} {:>7} {:>6}",
             "hex", "L_EAL", "chroma", "hue", "ΔE00", "wcag");
    for s in &a.shades {
        println!("{:>8} {:>7.2} {:>7.2} {:>8.2} {:>7.2} {:>6.2}",
                 s.hex, s.lightness, s.chroma, s.hue, s.cum_delta_e00, s.wcag);
    }
    let m = &a.metrics;
    println!("lightness linearity {:.3}\nchroma smoothness   {:.3}\n\
              spacing uniformity  {:.3}\nhue stability       {:.3}\n\
              contrast efficiency {:.3}",
             m.lightness_linearity, m.chroma_smoothness,
             m.spacing_uniformity, m.hue_stability, m.contrast_efficiency);
    for (name, c) in &a.contrasts {
        let mark = if *name == ContrastName::Wcag45 { "*" } else { "" };
        println!("{name}{mark}: span {} (value {:.2})", c.span, c.value);
    }
    println!("score {:.2}", a.score);
    Ok(())
}
