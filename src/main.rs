// SPDX-FileCopyrightText: 2026 Galatea Authors
// SPDX-License-Identifier: MIT

//! Galatea CLI entrypoint.
//!
//! By default this loads a markdown file into the interactive TUI explorer.
//! `--remote <url>` routes parsing through a processing API with local
//! fallback; `--serve` runs that API instead of the TUI.

use std::error::Error;

use galatea::remote::RemoteParseClient;
use galatea::render::CanvasBackendFactory;
use galatea::server;
use galatea::session::SessionController;

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} <file.md> [--remote <url>]\n  {program} --demo [--remote <url>]\n  {program} --serve [--port <port>]\n\nLoads a markdown document (`.md`/`.markdown`) into the graph explorer.\n--demo uses a built-in sample document and cannot be combined with a file.\n--remote parses through a processing API at <url>, falling back to the\nlocal builder when it is unreachable.\n--serve runs the processing API instead (default port {}; 0 = ephemeral).",
        server::DEFAULT_PORT
    );
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct CliOptions {
    file: Option<String>,
    demo: bool,
    remote: Option<String>,
    serve: bool,
    port: Option<u16>,
}

fn parse_options(mut args: impl Iterator<Item = String>) -> Result<CliOptions, ()> {
    let mut options = CliOptions::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--demo" => {
                if options.demo {
                    return Err(());
                }
                options.demo = true;
            }
            "--remote" => {
                if options.remote.is_some() {
                    return Err(());
                }
                let url = args.next().ok_or(())?;
                options.remote = Some(url);
            }
            "--serve" => {
                if options.serve {
                    return Err(());
                }
                options.serve = true;
            }
            "--port" => {
                if options.port.is_some() {
                    return Err(());
                }
                let raw = args.next().ok_or(())?;
                let port: u16 = raw.parse().map_err(|_| ())?;
                options.port = Some(port);
            }
            _ if arg.starts_with('-') => return Err(()),
            _ => {
                if options.file.is_some() {
                    return Err(());
                }
                options.file = Some(arg);
            }
        }
    }

    if options.demo && options.file.is_some() {
        return Err(());
    }

    if options.serve && (options.demo || options.file.is_some() || options.remote.is_some()) {
        return Err(());
    }

    if options.port.is_some() && !options.serve {
        return Err(());
    }

    // Something has to provide content: a file, the demo document, or serve
    // mode. Bare `galatea` (or `galatea --remote <url>` alone) is a usage
    // error.
    if !options.serve && !options.demo && options.file.is_none() {
        return Err(());
    }

    if let Some(file) = &options.file {
        if !has_markdown_extension(file) {
            return Err(());
        }
    }

    Ok(options)
}

fn has_markdown_extension(path: &str) -> bool {
    let lower = path.to_lowercase();
    lower.ends_with(".md") || lower.ends_with(".markdown")
}

fn document_name(path: &str) -> String {
    std::path::Path::new(path)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_owned())
}

fn main() {
    let result = (|| -> Result<(), Box<dyn Error>> {
        let mut args = std::env::args();
        let program = args.next().unwrap_or_else(|| "galatea".to_owned());

        let options = match parse_options(args) {
            Ok(options) => options,
            Err(()) => {
                print_usage(&program);
                std::process::exit(2);
            }
        };

        let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;

        if options.serve {
            let port = options.port.unwrap_or(server::DEFAULT_PORT);
            runtime.block_on(async {
                let listener = tokio::net::TcpListener::bind(("127.0.0.1", port)).await?;
                eprintln!("galatea: serving on http://{}", listener.local_addr()?);
                server::serve(listener).await?;
                Ok::<(), Box<dyn Error>>(())
            })?;
            return Ok(());
        }

        let (content, filename) = match &options.file {
            Some(path) => (std::fs::read_to_string(path)?, Some(document_name(path))),
            None => (
                galatea::tui::demo_document().to_owned(),
                Some("sample.md".to_owned()),
            ),
        };

        let remote = options.remote.map(RemoteParseClient::new);
        let controller = SessionController::new(Box::new(CanvasBackendFactory), remote)?;
        galatea::tui::run(controller, content, filename, &runtime)?;

        Ok(())
    })();

    if let Err(err) = result {
        eprintln!("galatea: {err}");
        std::process::exit(1);
    }
}
