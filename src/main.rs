use std::io::{self, Write};

use aex_cgi::{CgiRequest, is_active_env};
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "cgi-dump", about = "Decode the current CGI request and print every field")]
struct Opt {
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// 不输出 Content-type 响应头
    #[arg(long)]
    no_header: bool,
}

fn main() -> anyhow::Result<()> {
    // stdout 是 CGI 响应，日志只能写 stderr
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let opt = Opt::parse();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if !is_active_env() {
        writeln!(out, "cgi-dump: not running in a CGI context")?;
        return Ok(());
    }

    let decoded = CgiRequest::default().decode_env();
    tracing::debug!(get = %decoded.get, post = %decoded.post, "request decoded");

    match opt.format {
        Format::Text => {
            if !opt.no_header {
                write!(out, "Content-type: text/plain\r\n\r\n")?;
            }
            decoded.params.dump(&mut out)?;
        }
        Format::Json => {
            if !opt.no_header {
                write!(out, "Content-type: application/json\r\n\r\n")?;
            }
            serde_json::to_writer_pretty(&mut out, &decoded.params)?;
            writeln!(out)?;
        }
    }

    out.flush()?;
    Ok(())
}
