//! # CLI Layer
//!
//! One possible binding for the todoz API. Every invocation is a fresh
//! session: build the API, resolve the starting list (persisted copy, else
//! the seed), apply the requested operation, render the returned snapshot.
//!
//! This is the only module that writes to stdout or decides exit codes.

use super::render::{print_messages, render_list};
use super::setup::{status_filter, Cli, Commands};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use todoz::api::{CmdMessage, CmdResult, StatusFilter, TodozApi};
use todoz::config::{self, TodozConfig, CONFIG_KEYS};
use todoz::error::Result;
use todoz::logging;
use todoz::persistence::PersistenceAdapter;
use todoz::seed::HttpSeedSource;
use todoz::store::fs::FsBackend;

struct AppContext {
    api: TodozApi<FsBackend>,
    config: TodozConfig,
    data_dir: PathBuf,
    offline: bool,
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let mut ctx = init_context(&cli)?;

    match cli.command {
        Some(Commands::List { active, completed }) => {
            handle_list(&mut ctx, status_filter(active, completed)).await
        }
        Some(Commands::Add { title }) => handle_add(&mut ctx, title.join(" ")).await,
        Some(Commands::Toggle { ids }) => handle_toggle(&mut ctx, ids).await,
        Some(Commands::Delete { ids }) => handle_delete(&mut ctx, ids).await,
        Some(Commands::Reset) => handle_reset(&mut ctx),
        Some(Commands::Watch { interval_ms }) => handle_watch(&mut ctx, interval_ms).await,
        Some(Commands::Path) => handle_path(&ctx),
        Some(Commands::Config { key, value }) => handle_config(&ctx, key, value),
        None => handle_list(&mut ctx, StatusFilter::All).await,
    }
}

fn init_context(cli: &Cli) -> Result<AppContext> {
    let data_dir = config::data_dir()?;
    let config = TodozConfig::load(&data_dir)?.with_env_overrides();

    let backend = FsBackend::new(data_dir.clone());
    let persistence = PersistenceAdapter::new(backend, config.storage_key.clone());

    Ok(AppContext {
        api: TodozApi::new(persistence),
        config,
        data_dir,
        offline: cli.offline,
    })
}

/// Resolves the starting list. A seed client that cannot even be built is
/// treated like a failed fetch.
async fn initialize(ctx: &mut AppContext) -> CmdResult {
    if ctx.offline {
        return ctx.api.initialize_offline();
    }
    match HttpSeedSource::from_config(&ctx.config) {
        Ok(source) => ctx.api.initialize(&source).await,
        Err(e) => {
            tracing::warn!(error = %e, "could not build seed client");
            ctx.api.initialize_offline()
        }
    }
}

async fn handle_list(ctx: &mut AppContext, filter: StatusFilter) -> Result<()> {
    let init = initialize(ctx).await;
    print_messages(&init.messages);

    let result = ctx.api.view(filter);
    print!("{}", render_list(&result.list));
    Ok(())
}

async fn handle_add(ctx: &mut AppContext, title: String) -> Result<()> {
    let init = initialize(ctx).await;
    print_messages(&init.messages);

    let result = ctx.api.add(&title);
    finish(result);
    Ok(())
}

async fn handle_toggle(ctx: &mut AppContext, ids: Vec<i64>) -> Result<()> {
    let init = initialize(ctx).await;
    print_messages(&init.messages);

    let mut last = None;
    for id in ids {
        let result = ctx.api.toggle(id);
        print_messages(&result.messages);
        last = Some(result.list);
    }
    if let Some(list) = last {
        print!("{}", render_list(&list));
    }
    Ok(())
}

async fn handle_delete(ctx: &mut AppContext, ids: Vec<i64>) -> Result<()> {
    let init = initialize(ctx).await;
    print_messages(&init.messages);

    let mut last = None;
    for id in ids {
        let result = ctx.api.delete(id);
        print_messages(&result.messages);
        last = Some(result.list);
    }
    if let Some(list) = last {
        print!("{}", render_list(&list));
    }
    Ok(())
}

fn handle_reset(ctx: &mut AppContext) -> Result<()> {
    let result = ctx.api.reset();
    print_messages(&result.messages);
    Ok(())
}

async fn handle_watch(ctx: &mut AppContext, interval_ms: u64) -> Result<()> {
    let init = initialize(ctx).await;
    print_messages(&init.messages);
    print!("{}", render_list(ctx.api.list()));

    let mut last_seen = ctx.api.persistence().modified_at();
    let mut ticker = tokio::time::interval(Duration::from_millis(interval_ms.max(50)));

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => return Ok(()),
            _ = ticker.tick() => {
                let seen = ctx.api.persistence().modified_at();
                if seen == last_seen {
                    continue;
                }
                last_seen = seen;

                let result = ctx.api.refresh();
                if result.changed {
                    println!();
                    print!("{}", render_list(&result.list));
                }
            }
        }
    }
}

fn handle_path(ctx: &AppContext) -> Result<()> {
    let path = ctx.api.persistence().path()?;
    println!("{}", path.display());
    Ok(())
}

fn handle_config(ctx: &AppContext, key: Option<String>, value: Option<String>) -> Result<()> {
    match (key, value) {
        (None, _) => {
            for key in CONFIG_KEYS {
                println!("{} = {}", key, ctx.config.get(key)?);
            }
        }
        (Some(key), None) => println!("{} = {}", key, ctx.config.get(&key)?),
        (Some(key), Some(value)) => {
            // Start from the file, not the env-overridden view, so overrides never get saved.
            let mut stored = TodozConfig::load(&ctx.data_dir)?;
            stored.set(&key, &value)?;
            stored.save(&ctx.data_dir)?;
            print_messages(&[CmdMessage::success(format!("{} = {}", key, value))]);
        }
    }
    Ok(())
}

fn finish(result: CmdResult) {
    print_messages(&result.messages);
    print!("{}", render_list(&result.list));
}
