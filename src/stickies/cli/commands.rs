use super::logging;
use super::print::{print_config, print_messages, print_notes, print_paths};
use super::setup::{Cli, Commands};
use clap::Parser;
use directories::ProjectDirs;
use stickies::api::StickiesApi;
use stickies::commands::config::ConfigAction;
use stickies::config::{StickiesConfig, CONFIG_FILENAME};
use stickies::error::{Result, StickiesError};
use stickies::query::{NoteQuery, SortMode};
use stickies::store::file::FileBackend;
use stickies::store::NoteStore;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const DATA_DIR_ENV: &str = "STICKIES_HOME";

struct AppContext {
    api: StickiesApi<FileBackend>,
    query: NoteQuery,
    data_dir: PathBuf,
    log_file: Option<PathBuf>,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let data_dir = resolve_data_dir(&cli)?;
    let (config, config_error) = match StickiesConfig::load(&data_dir) {
        Ok(config) => (config, None),
        Err(e) => (StickiesConfig::default(), Some(e)),
    };

    let log_file = config.log_path(&data_dir);
    let _log_guard = logging::init(&config.log_level, log_file.as_deref(), cli.verbose);
    if let Some(e) = config_error {
        warn!("ignoring unreadable {}: {}", CONFIG_FILENAME, e);
    }
    debug!(data_dir = %data_dir.display(), format = %config.format, "starting");

    let mut ctx = init_context(&cli, config, data_dir, log_file)?;

    match cli.command {
        Some(Commands::Add { text }) => handle_add(&mut ctx, text),
        Some(Commands::List) | None => handle_list(&ctx),
        Some(Commands::Search { term }) => handle_search(&ctx, term),
        Some(Commands::Edit { index, text }) => handle_edit(&mut ctx, index, text),
        Some(Commands::Delete { indexes }) => handle_delete(&mut ctx, indexes),
        Some(Commands::Export { path, listed }) => handle_export(&ctx, path, listed),
        Some(Commands::Import { path }) => handle_import(&mut ctx, path),
        Some(Commands::Raw) => handle_raw(&ctx),
        Some(Commands::Replace { file }) => handle_replace(&mut ctx, file),
        Some(Commands::Clear) => handle_clear(&mut ctx),
        Some(Commands::Config { key, value }) => handle_config(&ctx, key, value),
        Some(Commands::Paths) => handle_paths(&ctx),
    }
}

fn resolve_data_dir(cli: &Cli) -> Result<PathBuf> {
    if let Some(dir) = &cli.data_dir {
        return Ok(dir.clone());
    }
    if let Some(dir) = std::env::var_os(DATA_DIR_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    ProjectDirs::from("com", "stickies", "stickies")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| {
            StickiesError::Config(format!(
                "Could not determine a data directory; pass --data-dir or set {}",
                DATA_DIR_ENV
            ))
        })
}

fn init_context(
    cli: &Cli,
    config: StickiesConfig,
    data_dir: PathBuf,
    log_file: Option<PathBuf>,
) -> Result<AppContext> {
    let backend = FileBackend::in_dir(&data_dir, config.data_file(), config.backup_file());
    let store =
        NoteStore::new(backend, config.format).with_timestamp_format(config.timestamp_format());
    let mut api = StickiesApi::new(store, &data_dir);

    let loaded = api.load()?;
    print_messages(&loaded.messages);

    let sort = cli.sort.map(SortMode::from).unwrap_or(config.default_sort);
    let query = NoteQuery::new(cli.search.clone().unwrap_or_default(), sort);

    Ok(AppContext {
        api,
        query,
        data_dir,
        log_file,
    })
}

fn handle_add(ctx: &mut AppContext, text: Vec<String>) -> Result<()> {
    let result = ctx.api.add_note(&text.join(" "))?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_list(ctx: &AppContext) -> Result<()> {
    let result = ctx.api.list_notes(&ctx.query)?;
    print_notes(&result.listed_notes, &ctx.query.term);
    print_messages(&result.messages);
    Ok(())
}

fn handle_search(ctx: &AppContext, term: String) -> Result<()> {
    let result = ctx.api.search_notes(&ctx.query, &term)?;
    print_notes(&result.listed_notes, &term);
    print_messages(&result.messages);
    Ok(())
}

fn handle_edit(ctx: &mut AppContext, index: String, text: Vec<String>) -> Result<()> {
    let result = ctx.api.edit_note(&ctx.query, &index, &text.join(" "))?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_delete(ctx: &mut AppContext, indexes: Vec<String>) -> Result<()> {
    let result = ctx.api.delete_notes(&ctx.query, &indexes)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_export(ctx: &AppContext, path: PathBuf, listed: bool) -> Result<()> {
    let result = if listed {
        ctx.api.export_listed_notes(&ctx.query, &path)?
    } else {
        ctx.api.export_notes(&path)?
    };
    print_messages(&result.messages);
    Ok(())
}

fn handle_import(ctx: &mut AppContext, path: PathBuf) -> Result<()> {
    let result = ctx.api.import_notes(&path)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_raw(ctx: &AppContext) -> Result<()> {
    let result = ctx.api.raw()?;
    if let Some(raw) = &result.raw {
        print!("{}", raw);
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_replace(ctx: &mut AppContext, file: Option<PathBuf>) -> Result<()> {
    let raw = match file {
        Some(path) => read_file(&path)?,
        None => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };

    let result = ctx.api.replace_raw(&raw)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_clear(ctx: &mut AppContext) -> Result<()> {
    let result = ctx.api.clear_notes()?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_config(ctx: &AppContext, key: Option<String>, value: Option<String>) -> Result<()> {
    let action = match (key, value) {
        (None, _) => ConfigAction::ShowAll,
        (Some(key), None) => ConfigAction::ShowKey(key),
        (Some(key), Some(value)) => ConfigAction::Set(key, value),
    };

    let is_show_all = matches!(action, ConfigAction::ShowAll);
    let result = ctx.api.config(action)?;
    if is_show_all {
        if let Some(config) = &result.config {
            print_config(config);
        }
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_paths(ctx: &AppContext) -> Result<()> {
    let result = ctx.api.paths()?;
    if let Some(paths) = &result.paths {
        print_paths(
            paths,
            &ctx.data_dir.join(CONFIG_FILENAME),
            ctx.log_file.as_deref(),
        );
    }
    print_messages(&result.messages);
    Ok(())
}

fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| {
        StickiesError::Io(std::io::Error::new(
            e.kind(),
            format!("{}: {}", path.display(), e),
        ))
    })
}
