use colored::*;
use tagsieve::sanitize;

use crate::policy_file::builtin_policy;

pub struct TestCase {
    pub input: &'static str,
    pub expected: &'static str,
    pub description: &'static str,
}

pub fn get_builtin_test_cases() -> Vec<(&'static str, TestCase)> {
    vec![
        (
            "script_tag",
            TestCase {
                input: "<script>alert(1)</script>",
                expected: "alert(1)",
                description: "unknown elements are removed, text survives",
            },
        ),
        (
            "event_handler",
            TestCase {
                input: "<b onclick=\"alert(1)\">bold</b>",
                expected: "<b>bold</b>",
                description: "elements with no allowed attributes lose everything",
            },
        ),
        (
            "javascript_url",
            TestCase {
                input: "<a href=\"javascript:alert(1)\">x</a>",
                expected: "<a href=\"alert(1)\">x</a>",
                description: "disallowed scheme prefix is stripped",
            },
        ),
        (
            "stacked_schemes",
            TestCase {
                input: "<a href=\"javascript:javascript:alert(1)\">x</a>",
                expected: "<a href=\"alert(1)\">x</a>",
                description: "stacked schemes converge to a clean value",
            },
        ),
        (
            "entity_colon",
            TestCase {
                input: "<a href=\"javascript&#58;alert(1)\">x</a>",
                expected: "<a href=\"alert(1)\">x</a>",
                description: "entity-encoded colon cannot hide a scheme",
            },
        ),
        (
            "stray_bracket",
            TestCase {
                input: "1 > 0",
                expected: "1 &gt; 0",
                description: "stray close brackets are escaped",
            },
        ),
        (
            "entity_overflow",
            TestCase {
                input: "&#1000000;",
                expected: "&amp;#1000000;",
                description: "oversized numeric references stay inert",
            },
        ),
        (
            "self_closing",
            TestCase {
                input: "line<br / >break",
                expected: "line<br />break",
                description: "self-closing marker is preserved",
            },
        ),
        (
            "oversized_width",
            TestCase {
                input: "<img src=\"/p.png\" width=\"4000\">",
                expected: "<img src=\"/p.png\">",
                description: "maxval rejects the attribute, keeps the element",
            },
        ),
    ]
}

pub fn run_all_tests(specific_case: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let test_cases = get_builtin_test_cases();

    let cases_to_run: Vec<_> = if let Some(case_name) = specific_case {
        test_cases
            .into_iter()
            .filter(|(name, _)| name.contains(case_name))
            .collect()
    } else {
        test_cases
    };

    if cases_to_run.is_empty() {
        println!("{}", "No matching test cases found".bright_yellow());
        return Ok(());
    }

    println!("Running {} test case(s):", cases_to_run.len());
    println!();

    let policy = builtin_policy();
    let mut passed = 0;
    let mut failed = 0;

    for (name, case) in cases_to_run {
        println!("{}: {}", "Test".bright_blue().bold(), name.bright_white());
        println!("Input: {}", case.input.bright_cyan());
        println!("Note: {}", case.description);

        let output = sanitize(case.input, &policy);
        if output == case.expected {
            println!("{}", "PASS".bright_green().bold());
            passed += 1;
        } else {
            println!("{}", "FAIL".bright_red().bold());
            println!("Expected: {}", case.expected.bright_green());
            println!("Got:      {}", output.bright_red());
            failed += 1;
        }
        println!();
    }

    println!("{}", "=== Test Summary ===".bright_blue().bold());
    println!("Passed: {}", passed.to_string().bright_green());
    println!("Failed: {}", failed.to_string().bright_red());
    println!("Total:  {}", (passed + failed).to_string().bright_white());

    if failed > 0 {
        std::process::exit(1);
    }
    Ok(())
}
