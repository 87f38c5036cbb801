use colored::*;

use crate::pipeline_debug::AnalysisResults;
use crate::Cli;

pub fn output_text(results: &AnalysisResults, cli: &Cli) {
    // Input Information
    println!("{}", "=== Input Analysis ===".bright_blue().bold());
    println!("Original: {}", results.input_info.original_string.bright_white());
    println!("Hex: {}", results.input_info.hex_representation.bright_cyan());
    println!("Length: {} bytes", results.input_info.length);
    println!();

    if cli.show_normalized {
        println!("{}", "=== Entity Normalization ===".bright_blue().bold());
        println!("{}", results.normalized.bright_white());
        println!();
    }

    if !results.tags.is_empty() {
        println!("{}", "=== Tag Spans ===".bright_blue().bold());
        for tag in &results.tags {
            let verdict = if tag.dropped {
                "DROPPED".bright_red().bold()
            } else {
                "KEPT".bright_green().bold()
            };
            println!("{} {} -> {}", verdict, tag.span.bright_white(), tag.emitted.bright_cyan());

            if cli.show_tokens {
                for token in &tag.tokens {
                    let clean = if token.scheme_clean {
                        "clean".bright_green()
                    } else {
                        "scheme-filtered".bright_yellow()
                    };
                    println!(
                        "    {} = {:?} ({}) whole: {}",
                        token.name.bright_magenta(),
                        token.value,
                        clean,
                        token.whole.bright_white()
                    );
                }
            }
        }
        println!();
    }

    // Final Results
    println!("{}", "=== Sanitized Output ===".bright_blue().bold());
    println!("{}", results.output.bright_green());
}
