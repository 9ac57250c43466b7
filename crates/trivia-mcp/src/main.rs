use anyhow::Result;
use clap::{Parser, Subcommand};
use std::collections::BTreeMap;
use tracing_subscriber::EnvFilter;
use trivia::{TriviaTools, TOOL_NAMES};

#[cfg(feature = "stdio")]
mod mcp;

#[derive(Parser, Debug)]
#[command(name = "trivia")]
#[command(about = "Bar-trivia research tools (MCP stdio server)", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run as an MCP stdio server.
    #[cfg(feature = "stdio")]
    McpStdio,
    /// Invoke one tool and print its text report.
    Run(RunCmd),
    /// Print version info.
    Version(VersionCmd),
}

#[derive(clap::Args, Debug)]
struct RunCmd {
    /// Tool name, e.g. trivia_for_today.
    tool: String,
    /// Tool argument as key=value (repeatable).
    #[arg(long = "arg", value_parser = parse_key_val)]
    args: Vec<(String, String)>,
}

#[derive(clap::Args, Debug)]
struct VersionCmd {
    /// Output format: json|text
    #[arg(long = "output", alias = "format", default_value = "json")]
    output: String,
}

fn parse_key_val(s: &str) -> std::result::Result<(String, String), String> {
    let (k, v) = s
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{s}'"))?;
    let k = k.trim();
    if k.is_empty() {
        return Err(format!("empty key in '{s}'"));
    }
    Ok((k.to_string(), v.to_string()))
}

/// Optional KEY=VALUE file named by `TRIVIA_ENV_FILE`. Never overrides the
/// process environment and never logs values.
fn load_env_file() {
    let Ok(p) = std::env::var("TRIVIA_ENV_FILE") else {
        return;
    };
    let p = p.trim();
    if p.is_empty() {
        return;
    }
    let Ok(txt) = std::fs::read_to_string(p) else {
        return;
    };
    for raw in txt.lines() {
        let s = raw.trim();
        if s.is_empty() || s.starts_with('#') {
            continue;
        }
        let Some((k, v)) = s.split_once('=') else {
            continue;
        };
        let k = k.trim();
        if k.is_empty() {
            continue;
        }
        if std::env::var_os(k).is_none() {
            std::env::set_var(k, v.trim());
        }
    }
}

fn init_logging() {
    // stdout belongs to the MCP transport.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("TRIVIA_LOG").unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    load_env_file();
    init_logging();

    let cli = Cli::parse();

    match cli.command {
        #[cfg(feature = "stdio")]
        Commands::McpStdio => {
            let tools = TriviaTools::from_env()?;
            tracing::info!(version = env!("CARGO_PKG_VERSION"), "serving MCP over stdio");
            mcp::serve_stdio(tools)
                .await
                .map_err(|e| anyhow::anyhow!(e.to_string()))?;
        }
        Commands::Run(cmd) => {
            if !TOOL_NAMES.contains(&cmd.tool.as_str()) {
                anyhow::bail!(
                    "unknown tool '{}'; expected one of: {}",
                    cmd.tool,
                    TOOL_NAMES.join(", ")
                );
            }
            let tools = TriviaTools::from_env()?;
            let args: BTreeMap<String, String> = cmd.args.into_iter().collect();
            let out = tools
                .call(&cmd.tool, &args)
                .await
                .ok_or_else(|| anyhow::anyhow!("unknown tool '{}'", cmd.tool))?;
            println!("{out}");
        }
        Commands::Version(args) => {
            let v = serde_json::json!({
                "schema_version": 1,
                "kind": "version",
                "ok": true,
                "name": "trivia",
                "version": env!("CARGO_PKG_VERSION"),
                "tools": TOOL_NAMES,
            });
            match args.output.to_ascii_lowercase().as_str() {
                "text" => println!("trivia {}", env!("CARGO_PKG_VERSION")),
                _ => println!("{v}"),
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_val_parsing() {
        assert_eq!(
            parse_key_val("date_override=12-25").unwrap(),
            ("date_override".to_string(), "12-25".to_string())
        );
        assert_eq!(
            parse_key_val("url=https://x.test/?a=b").unwrap().1,
            "https://x.test/?a=b"
        );
        assert!(parse_key_val("novalue").is_err());
        assert!(parse_key_val("=x").is_err());
    }

    #[test]
    fn cli_parses_run_with_args() {
        let cli = Cli::try_parse_from([
            "trivia",
            "run",
            "search_sports_trivia",
            "--arg",
            "sport=nfl",
            "--arg",
            "query=Tom Brady",
        ])
        .unwrap();
        match cli.command {
            Commands::Run(cmd) => {
                assert_eq!(cmd.tool, "search_sports_trivia");
                assert_eq!(cmd.args.len(), 2);
                assert_eq!(cmd.args[1], ("query".to_string(), "Tom Brady".to_string()));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
