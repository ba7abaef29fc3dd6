/// Example program to print the loaded configuration
///
/// Run with: cargo run -p rune-config --example print_config

fn main() {
    // Load configuration from rune.toml, then apply RUNE_* overrides
    let config = rune_config::RuneConfig::load();
    let transitions = &config.transitions;

    println!("=== Rune Transition Configuration ===\n");

    println!("Transitions:");
    println!("  Enabled: {}", transitions.enabled);
    println!("  Default Animator: {:?}", transitions.animator);
    println!();

    println!("Spring Settings:");
    println!("  Stiffness: {}", transitions.spring.stiffness);
    println!("  Damping Ratio: {}", transitions.spring.damping_ratio);
    println!("  Rest Threshold: {}", transitions.spring.rest_threshold);
    println!();

    println!("Timing Settings:");
    println!("  Duration (ms): {}", transitions.timing.duration_ms);
    println!();

    match toml::to_string_pretty(&config) {
        Ok(toml_str) => {
            println!("=== Serialized Configuration ===");
            println!("{}", toml_str);
        }
        Err(e) => {
            eprintln!("Failed to serialize config: {}", e);
        }
    }
}
