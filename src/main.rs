#![forbid(unsafe_code)]

use anyhow::{Context, Result};
use clap::Parser;
use foldview::cli::Args;
use foldview::event_loop::{self, WatchTarget};
use foldview::render::RenderConfig;
use foldview::{confine, watcher, FolderViewer};
use std::io::Write;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() {
    let args = Args::parse().validated();
    init_tracing(&args);

    if let Err(e) = run_app(&args) {
        eprintln!("foldview: {e:#}");
        std::process::exit(1);
    }
}

/// Log to stderr so stdout carries only markup. `RUST_LOG` wins over -v/-q.
fn init_tracing(args: &Args) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(args.log_level()));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn run_app(args: &Args) -> Result<()> {
    let document_root = confine::canonical_document_root(&args.document_root())?;
    anyhow::ensure!(
        document_root.is_dir(),
        "{}: Not a directory",
        document_root.display()
    );

    let viewer = FolderViewer::new(document_root.clone())
        .show_hidden(args.show_hidden)
        .render_config(RenderConfig {
            show_icons: !args.no_icons,
            icon_root: args.icon_root.clone(),
        });
    let root_path = args.root_path();
    let expanded_text = args.expanded.as_deref().unwrap_or("");

    if !args.watch {
        let view = viewer
            .update_render(root_path, expanded_text)
            .with_context(|| format!("failed to render {root_path:?}"))?;
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{view}")?;
        stdout.flush()?;
        return Ok(());
    }

    let start = confine::resolve_within(&document_root, root_path)?;
    info!(
        root = %root_path,
        debounce_ms = args.debounce_ms,
        "watching for changes"
    );

    // The debouncer must stay alive for the duration of the loop.
    let (_debouncer, fs_rx) = watcher::start_watcher(&document_root, &start, args.debounce_ms)
        .context("failed to start watcher")?;

    let (shutdown_tx, shutdown_rx) = crossbeam_channel::bounded(1);
    ctrlc::set_handler(move || {
        let _ = shutdown_tx.try_send(());
    })
    .context("failed to install Ctrl-C handler")?;

    let target = WatchTarget {
        root_path,
        expanded_text,
    };
    let mut stdout = std::io::stdout().lock();
    let renders = event_loop::run(&viewer, &target, &fs_rx, &shutdown_rx, &mut stdout)?;
    info!(renders, "watch finished");
    Ok(())
}
