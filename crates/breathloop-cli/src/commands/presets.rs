use breathloop_core::{format_clock, presets};

pub fn run(json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let presets = presets();
    if json {
        println!("{}", serde_json::to_string_pretty(&presets)?);
        return Ok(());
    }

    for preset in presets {
        let phases: Vec<String> = preset
            .pattern
            .phases()
            .iter()
            .map(|p| format!("{} {}s", p.name, p.duration_secs))
            .collect();
        println!(
            "{:<26} {:<26} cycle {}  [{}]",
            preset.id,
            preset.name,
            format_clock(u32::try_from(preset.pattern.cycle_secs()).unwrap_or(u32::MAX)),
            phases.join(", ")
        );
    }
    Ok(())
}
