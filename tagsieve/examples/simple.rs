use tagsieve::{sanitize, AttrRule, Constraint, Policy};

fn main() {
    println!("Testing tagsieve functionality...");

    let policy = match Policy::builder()
        .element("a", [("href", AttrRule::Unconstrained)])
        .element("b", [])
        .element("i", [])
        .element("br", [])
        .element(
            "img",
            [
                ("src", AttrRule::Unconstrained),
                ("width", AttrRule::Constrained(vec![Constraint::MaxVal(800)])),
            ],
        )
        .build()
    {
        Ok(policy) => policy,
        Err(err) => {
            eprintln!("policy error: {err}");
            return;
        }
    };

    let tests = [
        ("Hello <b>world</b>", "Safe HTML"),
        ("<script>alert('xss')</script>", "Script tag"),
        ("<img src=x onerror=alert(1)>", "Event handler"),
        ("<a href=\"javascript:alert(1)\">click</a>", "Javascript protocol"),
        ("<a href=\"javascript:javascript:alert(1)\">x</a>", "Stacked schemes"),
        ("<img src=\"/pic.png\" width=\"4000\">", "Oversized width"),
        ("AT&T says hello & goodbye", "Entity normalization"),
    ];

    println!("\n=== Sanitization ===");
    for (input, description) in &tests {
        println!("{}: {} -> {}", description, input, sanitize(input, &policy));
    }
}
