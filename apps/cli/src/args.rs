use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Serve { port: Option<u16> },
    Dashboard { refresh: bool },
    Contributions { user: Option<String> },
    GfgCount { user: Option<String> },
    CacheList,
    CacheClear { source: Option<String> },
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliArgs {
    pub config: Option<PathBuf>,
    pub command: Command,
}

pub fn parse_args() -> Result<CliArgs, String> {
    parse_from(std::env::args().skip(1))
}

pub fn parse_from(args: impl IntoIterator<Item = String>) -> Result<CliArgs, String> {
    let mut config = None;
    let mut positional = Vec::new();
    let mut port = None;
    let mut refresh = false;

    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                let value = args
                    .next()
                    .ok_or_else(|| "missing value for --config".to_string())?;
                config = Some(PathBuf::from(value));
            }
            "--port" => {
                let value = args
                    .next()
                    .ok_or_else(|| "missing value for --port".to_string())?;
                let parsed = value
                    .parse::<u16>()
                    .map_err(|_| format!("invalid port value: {value}"))?;
                port = Some(parsed);
            }
            "--refresh" => refresh = true,
            "--help" | "-h" => {
                return Ok(CliArgs {
                    config,
                    command: Command::Help,
                });
            }
            flag if flag.starts_with("--") => {
                return Err(format!("unknown argument: {flag}"));
            }
            _ => positional.push(arg),
        }
    }

    let mut positional = positional.into_iter();
    let command = match positional.next().as_deref() {
        None | Some("serve") => Command::Serve { port },
        Some("dashboard") => Command::Dashboard { refresh },
        Some("contributions") => Command::Contributions {
            user: positional.next(),
        },
        Some("gfg-count") => Command::GfgCount {
            user: positional.next(),
        },
        Some("cache") => match positional.next().as_deref() {
            Some("list") => Command::CacheList,
            Some("clear") => Command::CacheClear {
                source: positional.next(),
            },
            Some(other) => return Err(format!("unknown cache command: {other}")),
            None => return Err("missing cache command (list or clear)".to_string()),
        },
        Some("help") => Command::Help,
        Some(other) => return Err(format!("unknown command: {other}")),
    };
    if let Some(extra) = positional.next() {
        return Err(format!("unexpected argument: {extra}"));
    }
    if port.is_some() && !matches!(command, Command::Serve { .. }) {
        return Err("--port only applies to serve".to_string());
    }
    if refresh && !matches!(command, Command::Dashboard { .. }) {
        return Err("--refresh only applies to dashboard".to_string());
    }

    Ok(CliArgs { config, command })
}

pub fn print_help() {
    println!(
        "codestats\n\n\
Usage:\n  codestats [--config <path>] [serve] [--port <port>]\n  codestats dashboard [--refresh]\n  codestats contributions [<github-user>]\n  codestats gfg-count [<gfg-user>]\n  codestats cache list\n  codestats cache clear [<source>]\n\n\
Options:\n  --config <path>  Use this config file instead of the default\n  --port <port>    Override the configured port for this run only\n  --refresh        Drop cached entries before aggregating\n  -h, --help       Show this help message\n"
    );
}
