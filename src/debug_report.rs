use quarry::{CompiledSelector, ParseError, Suggestion};

mod ansi {
    pub const RESET: &str = "\x1b[0m";
    pub const DIM: &str = "\x1b[2m";
    pub const BOLD: &str = "\x1b[1m";

    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
    pub const CYAN: &str = "\x1b[36m";
    pub const RED: &str = "\x1b[31m";
    pub const GRAY: &str = "\x1b[90m";

    pub struct Palette {
        enabled: bool,
    }

    impl Palette {
        pub fn new(enabled: bool) -> Self {
            Self { enabled }
        }

        pub fn paint(&self, s: impl AsRef<str>, color: &str) -> String {
            if self.enabled { format!("{}{}{}", color, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn bold(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", BOLD, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn dim(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", DIM, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }
    }
}

pub fn print_run(
    input: &str,
    result: &Result<CompiledSelector, ParseError>,
    suggestions: &[Suggestion],
    color: bool,
) {
    let palette = ansi::Palette::new(color);
    println!("\n{}", palette.bold(palette.paint(format!("⚙  Parsing: \"{}\"", input), ansi::CYAN)));

    println!("\n{}", palette.paint("━━━ Selector ━━━", ansi::GRAY));
    match result {
        Ok(selector) => print_selector(selector, &palette),
        Err(err) => print_error(input, err, &palette),
    }

    if !suggestions.is_empty() {
        println!("\n{}", palette.paint("━━━ Suggestions ━━━", ansi::GRAY));
        print_suggestions(suggestions, &palette);
    }
    println!();
}

fn print_selector(selector: &CompiledSelector, palette: &ansi::Palette) {
    println!(
        "  {} {}  {} {}",
        palette.dim("limit:"),
        palette.paint(fmt_limit(selector.limit()), ansi::GREEN),
        palette.dim("sort:"),
        palette.paint(selector.sorter().name(), ansi::BLUE),
    );

    let mut traits: Vec<&str> = Vec::new();
    if selector.includes_non_players() {
        traits.push("non-players");
    }
    if selector.sender_only() {
        traits.push("sender-only");
    }
    if selector.local_world_only() {
        traits.push("local-world");
    }
    if selector.uses_shorthand() {
        traits.push("shorthand");
    }
    if !traits.is_empty() {
        println!("  {} {}", palette.dim("traits:"), palette.paint(traits.join(", "), ansi::YELLOW));
    }

    if let Some(entity_type) = selector.entity_type() {
        println!("  {} {}", palette.dim("type:"), palette.paint(entity_type, ansi::CYAN));
    }
    if let Some(name) = selector.player_name() {
        println!("  {} {}", palette.dim("name:"), palette.paint(name, ansi::CYAN));
    }
    if let Some(uuid) = selector.uuid() {
        println!("  {} {}", palette.dim("uuid:"), palette.paint(uuid.to_string(), ansi::CYAN));
    }
    if !selector.distance().is_any() {
        println!("  {} {}", palette.dim("distance:"), palette.paint(fmt_range(selector.distance().min(), selector.distance().max()), ansi::YELLOW));
    }
    if !selector.level().is_any() {
        let (min, max) = (selector.level().min().map(f64::from), selector.level().max().map(f64::from));
        println!("  {} {}", palette.dim("level:"), palette.paint(fmt_range(min, max), ansi::YELLOW));
    }
}

fn print_error(input: &str, err: &ParseError, palette: &ansi::Palette) {
    println!("  {}", palette.paint(format!("✗ {}", err.kind()), ansi::RED));
    println!("  {}", input);
    let caret_pad: String = input
        .char_indices()
        .take_while(|(i, _)| *i < err.cursor())
        .map(|_| ' ')
        .collect();
    println!("  {}{}", caret_pad, palette.bold(palette.paint("^", ansi::RED)));
    println!("  {}", palette.dim(format!("key: {}", err.kind().translation_key())));
}

fn print_suggestions(suggestions: &[Suggestion], palette: &ansi::Palette) {
    for (idx, suggestion) in suggestions.iter().enumerate() {
        match &suggestion.tooltip {
            Some(tooltip) => println!(
                "  {} {} {} {}",
                palette.paint(format!("[{}]", idx), ansi::GRAY),
                palette.bold(palette.paint(&suggestion.text, ansi::GREEN)),
                palette.dim("│"),
                palette.dim(tooltip.to_string()),
            ),
            None => println!(
                "  {} {}",
                palette.paint(format!("[{}]", idx), ansi::GRAY),
                palette.bold(palette.paint(&suggestion.text, ansi::GREEN)),
            ),
        }
    }
}

fn fmt_limit(limit: i32) -> String {
    if limit == i32::MAX { "unlimited".to_string() } else { limit.to_string() }
}

fn fmt_range(min: Option<f64>, max: Option<f64>) -> String {
    match (min, max) {
        (Some(min), Some(max)) if min == max => format!("{min}"),
        (Some(min), Some(max)) => format!("{min}..{max}"),
        (Some(min), None) => format!("{min}.."),
        (None, Some(max)) => format!("..{max}"),
        (None, None) => "any".to_string(),
    }
}
