//! Forge asset tool
//!
//! Checks, canonically re-writes and preloads editor asset documents from
//! the command line.
//!
//! Run with: cargo run -p forge_tool -- check content/wood.mat

mod args;

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use forge_assets::{open_asset, Asset, AssetIndex, AssetPaths, ConfigError, EditorConfig, Preloader};
use forge_doc::Node;

use args::{Args, Command, USAGE};

fn main() -> ExitCode {
    let args = match Args::parse(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{}\n\n{}", e, USAGE);
            return ExitCode::from(2);
        }
    };

    let config = match load_config(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::from(2);
        }
    };

    // Initialize logging
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.log_filter.as_str()),
    )
    .init();

    let ok = match args.command {
        Command::Check => check(&args.paths, &config),
        Command::Fmt => format(&args.paths, &config),
        Command::Preload => preload(&args.paths, &config),
        Command::Dump => dump(&args.paths),
    };

    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn load_config(path: Option<&Path>) -> Result<EditorConfig, ConfigError> {
    match path {
        Some(path) => EditorConfig::load(path),
        None => match EditorConfig::default_path() {
            Some(path) => EditorConfig::load_or_default(&path),
            None => Ok(EditorConfig::default()),
        },
    }
}

fn asset_paths(path: &Path, config: &EditorConfig) -> AssetPaths {
    AssetPaths::new(path, &config.info_extension)
}

fn check(paths: &[PathBuf], config: &EditorConfig) -> bool {
    let mut ok = true;
    for path in paths {
        let asset = open_asset(asset_paths(path, config));
        let result = asset.lock().load();
        match result {
            Ok(()) => println!("ok    {}", path.display()),
            Err(e) => {
                println!("FAIL  {}: {}", path.display(), e);
                ok = false;
            }
        }
    }
    ok
}

fn format(paths: &[PathBuf], config: &EditorConfig) -> bool {
    let mut ok = true;
    for path in paths {
        let asset = open_asset(asset_paths(path, config));
        let mut asset = asset.lock();
        match asset.load().and_then(|()| asset.save()) {
            Ok(()) => println!("formatted {}", path.display()),
            Err(e) => {
                println!("FAIL  {}: {}", path.display(), e);
                ok = false;
            }
        }
    }
    ok
}

fn preload(paths: &[PathBuf], config: &EditorConfig) -> bool {
    let index = Arc::new(AssetIndex::new());

    let mut root = None;
    for path in paths {
        match index.open(asset_paths(path, config)) {
            Ok(asset) => {
                root.get_or_insert(asset);
            }
            Err(e) => {
                println!("FAIL  {}: {}", path.display(), e);
                return false;
            }
        }
    }
    let Some(root) = root else {
        return false;
    };

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            log::error!("Failed to start runtime: {}", e);
            return false;
        }
    };

    let preloader = Preloader::from_config(index, config);
    let report = runtime.block_on(preloader.preload(root, true));

    for id in &report.resolved {
        println!("resolved  {}", id);
    }
    for id in &report.missing {
        println!("missing   {}", id);
    }
    for error in &report.failed {
        println!("failed    {}", error);
    }
    report.succeeded()
}

fn dump(paths: &[PathBuf]) -> bool {
    let mut ok = true;
    for path in paths {
        let parsed = fs::read_to_string(path)
            .map_err(|e| e.to_string())
            .and_then(|text| forge_doc::from_str::<Node>(&text).map_err(|e| e.to_string()));
        match parsed {
            Ok(node) => print!("{}", forge_doc::to_string(&node)),
            Err(e) => {
                eprintln!("{}: {}", path.display(), e);
                ok = false;
            }
        }
    }
    ok
}
