mod debug_report;

use quarry::{SelectorParser, Suggestion};
use std::io::{self, IsTerminal, Read};

fn main() {
    let config = match parse_args() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    let parse_input = match config.cursor {
        Some(offset) => {
            let mut end = offset.min(config.input.len());
            while !config.input.is_char_boundary(end) {
                end -= 1;
            }
            &config.input[..end]
        }
        None => config.input.as_str(),
    };
    let mut parser = SelectorParser::with_at_allowed(parse_input, config.at_allowed);
    let result = parser.parse();
    let suggestions: Vec<Suggestion> = if config.cursor.is_some() { parser.suggest() } else { Vec::new() };
    let failed = result.is_err();
    debug_report::print_run(parse_input, &result, &suggestions, config.color);
    if failed && config.cursor.is_none() {
        std::process::exit(1);
    }
}

struct CliConfig {
    input: String,
    cursor: Option<usize>,
    at_allowed: bool,
    color: bool,
}

fn parse_args() -> Result<CliConfig, String> {
    let mut input: Option<String> = None;
    let mut cursor: Option<usize> = None;
    let mut at_allowed = true;
    let mut color = io::stdout().is_terminal();
    let mut args = std::env::args().skip(1).peekable();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-V" | "--version" => {
                println!("quarry {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "--color" => color = true,
            "--no-color" => color = false,
            "--no-at" => at_allowed = false,
            "--cursor" => {
                let value = args.next().ok_or_else(|| "error: --cursor expects a value".to_string())?;
                cursor = Some(parse_cursor(&value)?);
            }
            "--input" | "-i" => {
                let value = args.next().ok_or_else(|| "error: --input expects a value".to_string())?;
                if input.is_some() {
                    return Err("error: input provided multiple times".to_string());
                }
                input = Some(value);
            }
            "--" => {
                let rest = args.collect::<Vec<_>>().join(" ");
                if !rest.trim().is_empty() {
                    if input.is_some() {
                        return Err("error: input provided multiple times".to_string());
                    }
                    input = Some(rest);
                }
                break;
            }
            _ if arg.starts_with("--cursor=") => {
                let value = arg.trim_start_matches("--cursor=");
                cursor = Some(parse_cursor(value)?);
            }
            _ if arg.starts_with("--input=") => {
                let value = arg.trim_start_matches("--input=");
                if input.is_some() {
                    return Err("error: input provided multiple times".to_string());
                }
                input = Some(value.to_string());
            }
            _ if arg.starts_with('-') && arg.len() > 1 => {
                return Err(format!("error: unknown option '{arg}'"));
            }
            _ => {
                let rest = std::iter::once(arg).chain(args).collect::<Vec<_>>().join(" ");
                if input.is_some() {
                    return Err("error: input provided multiple times".to_string());
                }
                input = Some(rest);
                break;
            }
        }
    }

    let input = match input {
        Some(value) => value,
        None => read_stdin_input()?,
    };
    let input = input.trim().to_string();

    if input.is_empty() {
        return Err(format!("error: no input provided\n\n{}", help_text()));
    }

    Ok(CliConfig { input, cursor, at_allowed, color })
}

fn read_stdin_input() -> Result<String, String> {
    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer).map_err(|err| format!("error: failed to read stdin: {err}"))?;
    Ok(buffer)
}

fn parse_cursor(value: &str) -> Result<usize, String> {
    value.parse().map_err(|_| format!("error: invalid --cursor '{value}' (expected a byte offset)"))
}

fn print_help() {
    println!("{}", help_text());
}

fn help_text() -> String {
    format!(
        "quarry {version}

Target-selector expression parser CLI.

Usage:
  quarry [OPTIONS] [--] <selector...>
  quarry [OPTIONS] --input <text>

Options:
  -i, --input <text>   Selector expression to parse. If omitted, reads
                       remaining args or stdin when no args are provided.
  --cursor <offset>    Truncate the input at the byte offset and print
                       completion suggestions for that position.
  --no-at              Forbid '@' selectors (bare names and UUIDs only).
  --color              Force ANSI color output.
  --no-color           Disable ANSI color output.
  -h, --help           Show this help message.
  -V, --version        Print version information.

Exit codes:
  0  Success.
  1  Parse error.
  2  Invalid arguments or missing input.
",
        version = env!("CARGO_PKG_VERSION")
    )
}
