// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Classhelp and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Classhelp CLI entrypoint.
//!
//! By default this runs the interactive TUI over a form with one field per catalog class.
//!
//! Use `--mcp` to serve the same form over MCP stdio instead, or `--mcp-http-port <port>` to
//! serve it over streamable HTTP at `http://127.0.0.1:<port>/mcp`.

use std::error::Error;
use std::fs::File;
use std::sync::{Arc, Mutex};

use axum::Router;
use classhelp::config::Labels;
use classhelp::model::{FieldName, SelectionMode};
use classhelp::opener::{OpenRequest, ParentForm};
use classhelp::source::{CandidateSource, CatalogFolder};
use rmcp::transport::{
    streamable_http_server::session::local::LocalSessionManager, StreamableHttpServerConfig,
    StreamableHttpService,
};
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "CLASSHELP_LOG";

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} [<catalog-dir>] [--labels <file>] [--log-file <path>]\n  {program} [--catalog <dir>] [--labels <file>] [--log-file <path>]\n  {program} --demo [--labels <file>] [--log-file <path>]\n  {program} [<catalog-dir> | --demo] --mcp [--log-file <path>]\n  {program} [<catalog-dir> | --demo] --mcp-http-port <port> [--log-file <path>]\n\nA catalog dir holds one `<class>.json` file per entity kind; each becomes a multi-select field.\nIf catalog-dir/--catalog is omitted, the current working directory is used.\n--demo uses the built-in keyword/user/issue/role catalogs and cannot be combined with a catalog dir.\n\n--labels loads button captions from a JSON translation file.\nLogs follow {LOG_ENV} (default `info`) and go to --log-file, or to stderr in MCP modes."
    );
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct CliOptions {
    mcp: bool,
    demo: bool,
    catalog_dir: Option<String>,
    labels: Option<String>,
    mcp_http_port: Option<u16>,
    log_file: Option<String>,
}

impl CliOptions {
    fn interactive(&self) -> bool {
        !self.mcp && self.mcp_http_port.is_none()
    }
}

fn parse_options(mut args: impl Iterator<Item = String>) -> Result<CliOptions, ()> {
    let mut options = CliOptions::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--mcp" => {
                if options.mcp {
                    return Err(());
                }
                options.mcp = true;
            }
            "--demo" => {
                if options.demo {
                    return Err(());
                }
                options.demo = true;
            }
            "--catalog" => {
                if options.catalog_dir.is_some() {
                    return Err(());
                }
                options.catalog_dir = Some(args.next().ok_or(())?);
            }
            "--labels" => {
                if options.labels.is_some() {
                    return Err(());
                }
                options.labels = Some(args.next().ok_or(())?);
            }
            "--log-file" => {
                if options.log_file.is_some() {
                    return Err(());
                }
                options.log_file = Some(args.next().ok_or(())?);
            }
            "--mcp-http-port" => {
                if options.mcp_http_port.is_some() {
                    return Err(());
                }
                let raw = args.next().ok_or(())?;
                let port: u16 = raw.parse().map_err(|_| ())?;
                options.mcp_http_port = Some(port);
            }
            _ if arg.starts_with('-') => return Err(()),
            _ => {
                if options.catalog_dir.is_some() {
                    return Err(());
                }
                options.catalog_dir = Some(arg);
            }
        }
    }

    if options.demo && options.catalog_dir.is_some() {
        return Err(());
    }

    if options.mcp && options.mcp_http_port.is_some() {
        return Err(());
    }

    Ok(options)
}

fn init_logging(options: &CliOptions) -> Result<(), Box<dyn Error>> {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

    // The TUI owns the terminal, so it only logs when given a file.
    if let Some(path) = options.log_file.as_deref() {
        let file = File::create(path)?;
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init();
    } else if !options.interactive() {
        tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
    }
    Ok(())
}

/// One empty multi-select field per catalog class.
fn catalog_form(folder: &CatalogFolder) -> Result<(ParentForm, Vec<OpenRequest>), Box<dyn Error>> {
    let mut form = ParentForm::new();
    let mut fields = Vec::new();
    for class in folder.class_names()? {
        let field = FieldName::new(class.as_str())?;
        form = form.with_field(field.clone(), "");
        fields.push(OpenRequest::new(field, class, SelectionMode::Multi));
    }
    Ok((form, fields))
}

fn main() {
    let result = (|| -> Result<(), Box<dyn Error>> {
        let mut args = std::env::args();
        let program = args.next().unwrap_or_else(|| "classhelp".to_owned());

        let options = match parse_options(args) {
            Ok(options) => options,
            Err(()) => {
                print_usage(&program);
                std::process::exit(2);
            }
        };

        init_logging(&options)?;

        let (source, form, fields) = if options.demo {
            let (form, fields) = classhelp::tui::demo_form();
            let source: Arc<dyn CandidateSource> = Arc::new(classhelp::source::demo_source());
            (source, form, fields)
        } else {
            let dir = options.catalog_dir.clone().unwrap_or_else(|| ".".to_owned());
            let folder = CatalogFolder::new(dir);
            let (form, fields) = catalog_form(&folder)?;
            let source: Arc<dyn CandidateSource> = Arc::new(folder);
            (source, form, fields)
        };
        tracing::info!(fields = fields.len(), demo = options.demo, "classhelp starting");

        if options.interactive() {
            let labels = match options.labels.as_deref() {
                Some(path) => Labels::load(path)?,
                None => Labels::default(),
            };
            return classhelp::tui::run(source, form, fields, labels);
        }

        let mcp = classhelp::mcp::ClasshelpMcp::new(source, form, fields);
        let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;

        let Some(mcp_http_port) = options.mcp_http_port else {
            runtime.block_on(mcp.serve_stdio())?;
            return Ok(());
        };

        runtime.block_on(async move {
            let listener = tokio::net::TcpListener::bind(("127.0.0.1", mcp_http_port)).await?;
            tracing::info!(addr = %listener.local_addr()?, "serving MCP over streamable HTTP at /mcp");

            let config = StreamableHttpServerConfig {
                stateful_mode: true,
                ..StreamableHttpServerConfig::default()
            };
            let shutdown_token = config.cancellation_token.clone();

            let session_manager = Arc::new(LocalSessionManager::default());
            let mcp_service =
                StreamableHttpService::new(move || Ok(mcp.clone()), session_manager, config);

            let router = Router::new().nest_service("/mcp", mcp_service);
            axum::serve(listener, router)
                .with_graceful_shutdown(async move {
                    if tokio::signal::ctrl_c().await.is_err() {
                        tracing::warn!("cannot listen for ctrl-c; stopping");
                    }
                    shutdown_token.cancel();
                })
                .await?;
            Ok::<(), Box<dyn Error>>(())
        })?;

        Ok(())
    })();

    if let Err(err) = result {
        eprintln!("classhelp: {err}");
        std::process::exit(1);
    }
}
