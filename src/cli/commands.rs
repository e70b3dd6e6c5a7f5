//! CLI command implementations.
//!
//! List and spot commands drive the view-models the same way a front end
//! would: each command is a short sequence of user intents.

use crate::cli::output::{
    OutputFormat, SpotEntry, format_distance_result, format_json, format_lists, format_location,
    format_spot, format_spots, format_status,
};
use crate::cli::parser::{Cli, Commands, ListCommands, SpotCommands};
use crate::config::Config;
use crate::core::{FoodSpot, FoodSpotList};
use crate::error::{CommandError, Error, Result, StorageError};
use crate::location::{
    FixedLocationProvider, GazetteerGeocoder, GeoPoint, distance_km, last_known_location,
    spot_distance,
};
use crate::repository::{
    Database, FoodSpotRepository, ListRepository, SqliteFoodSpotRepository, SqliteListRepository,
};
use crate::storage::{SqliteStorage, Storage};
use crate::viewmodel::{
    FoodSpotViewModel, FoodSpotViewModelApi, ListViewModel, ListViewModelApi, LocationViewModel,
};
use std::path::Path;
use std::sync::Arc;

/// Executes the CLI command.
///
/// # Arguments
///
/// * `cli` - Parsed CLI arguments.
///
/// # Returns
///
/// Result with output string on success.
///
/// # Errors
///
/// Returns an error if the command fails to execute.
pub async fn execute(cli: &Cli) -> Result<String> {
    let format = OutputFormat::parse(&cli.format);
    let config = Config::from_cli(cli)?;
    tracing::debug!(db_path = %config.db_path.display(), owner = %config.owner, "resolved config");

    match &cli.command {
        Commands::Init { force } => cmd_init(&config, *force, format),
        Commands::Status => cmd_status(&config, format).await,
        Commands::Reset { yes } => cmd_reset(&config, *yes, format).await,
        Commands::List(cmd) => {
            let db = open_database(&config)?;
            let result = cmd_list(&db, &config, cmd, format).await;
            db.close().await?;
            result
        }
        Commands::Spot(cmd) => {
            let db = open_database(&config)?;
            let result = cmd_spot(&db, &config, cmd, format).await;
            db.close().await?;
            result
        }
        Commands::Locate => cmd_locate(&config, format).await,
        Commands::Distance {
            lat1,
            lon1,
            lat2,
            lon2,
        } => cmd_distance(*lat1, *lon1, *lat2, *lon2, format),
    }
}

/// Opens the database, requiring a prior `init`, and upgrades its schema.
fn open_database(config: &Config) -> Result<Database> {
    if !config.db_path.exists() {
        return Err(StorageError::NotInitialized.into());
    }

    let mut storage =
        SqliteStorage::open(&config.db_path)?.with_timestamp_policy(config.timestamp_policy);
    if !storage.is_initialized()? {
        return Err(StorageError::NotInitialized.into());
    }
    storage.init()?;

    Ok(Database::new(storage))
}

/// Loads the configured gazetteer, or an empty one.
fn open_geocoder(config: &Config) -> Result<GazetteerGeocoder> {
    config
        .gazetteer
        .as_deref()
        .map_or_else(|| Ok(GazetteerGeocoder::new()), GazetteerGeocoder::from_json_file)
}

fn message(text: String, json: &serde_json::Value, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => text,
        OutputFormat::Json => format_json(json),
    }
}

// ==================== Command Implementations ====================

fn cmd_init(config: &Config, force: bool, format: OutputFormat) -> Result<String> {
    let db_path = config.db_path.as_path();

    if db_path.exists() && !force {
        return Err(CommandError::ExecutionFailed(
            "Database already exists. Use --force to reinitialize.".to_string(),
        )
        .into());
    }

    if force && db_path.exists() {
        remove_database_files(db_path)?;
    }

    let mut storage = SqliteStorage::open(db_path)?;
    storage.init()?;
    storage.close()?;
    tracing::info!(path = %db_path.display(), "initialized database");

    Ok(message(
        format!("Initialized munch database at: {}\n", db_path.display()),
        &serde_json::json!({ "initialized": db_path.display().to_string() }),
        format,
    ))
}

fn remove_database_files(db_path: &Path) -> Result<()> {
    std::fs::remove_file(db_path).map_err(|e| {
        CommandError::ExecutionFailed(format!("Failed to remove existing database: {e}"))
    })?;

    for suffix in ["-wal", "-shm"] {
        let mut side = db_path.as_os_str().to_owned();
        side.push(suffix);
        let side = Path::new(&side);
        if side.exists() {
            std::fs::remove_file(side)?;
        }
    }
    Ok(())
}

async fn cmd_status(config: &Config, format: OutputFormat) -> Result<String> {
    let db = open_database(config)?;
    let stats = db.run(|s| s.stats()).await;
    db.close().await?;
    Ok(format_status(&stats?, format))
}

async fn cmd_reset(config: &Config, yes: bool, format: OutputFormat) -> Result<String> {
    if !yes {
        return Err(CommandError::ExecutionFailed(
            "Use --yes to confirm reset. This will delete all lists and spots.".to_string(),
        )
        .into());
    }

    let db = open_database(config)?;
    let result = db.run(|s| s.reset()).await;
    db.close().await?;
    result?;

    Ok(message(
        "All lists and spots deleted.\n".to_string(),
        &serde_json::json!({ "reset": true }),
        format,
    ))
}

async fn cmd_list(
    db: &Database,
    config: &Config,
    cmd: &ListCommands,
    format: OutputFormat,
) -> Result<String> {
    let repository: Arc<dyn ListRepository> = Arc::new(SqliteListRepository::new(db.clone()));
    let vm = ListViewModel::new(repository, config.owner.clone()).await?;

    match cmd {
        ListCommands::Add { name, icon } => {
            vm.handle_action_button();
            vm.update_list_name(name);
            vm.update_selected_icon(icon);
            vm.confirm_new_list().await?;

            let created = find_list(&vm, name.trim())?;
            Ok(message(
                format!(
                    "Created list '{}' (ID: {})\n",
                    created.name,
                    created.id.unwrap_or(0)
                ),
                &serde_json::to_value(&created)?,
                format,
            ))
        }
        ListCommands::Ls { search } => {
            if let Some(query) = search {
                vm.on_search_query_changed(query);
            }
            Ok(format_lists(&vm.filtered_lists(), format))
        }
        ListCommands::Edit {
            old_name,
            new_name,
            icon,
        } => {
            let existing = find_list(&vm, old_name)?;
            vm.prepare_edit(old_name);
            vm.update_list_name(new_name);
            vm.update_selected_icon(icon.as_deref().unwrap_or(&existing.icon));
            vm.confirm_new_list().await?;

            let updated = find_list(&vm, new_name.trim())?;
            Ok(message(
                format!("Updated list '{old_name}' -> '{}'\n", updated.name),
                &serde_json::to_value(&updated)?,
                format,
            ))
        }
        ListCommands::Rm { name } => {
            let existing = find_list(&vm, name)?;
            vm.delete_list(name).await?;
            Ok(message(
                format!("Deleted list '{name}' and its spots\n"),
                &serde_json::json!({ "deleted": existing.name, "id": existing.id }),
                format,
            ))
        }
    }
}

fn find_list(vm: &ListViewModel, name: &str) -> Result<FoodSpotList> {
    vm.state()
        .lists
        .into_iter()
        .find(|l| l.name == name)
        .ok_or_else(|| {
            StorageError::ListNotFound {
                name: name.to_string(),
            }
            .into()
        })
}

async fn cmd_spot(
    db: &Database,
    config: &Config,
    cmd: &SpotCommands,
    format: OutputFormat,
) -> Result<String> {
    let lists = SqliteListRepository::new(db.clone());
    let repository: Arc<dyn FoodSpotRepository> =
        Arc::new(SqliteFoodSpotRepository::new(db.clone()));

    match cmd {
        SpotCommands::Add {
            list,
            name,
            address,
            rating,
            comment,
            category,
            menu,
        } => {
            let list_id = resolve_list(&lists, list).await?;
            let spot = FoodSpot::new(list_id, name.as_str(), address.as_str())
                .with_rating(*rating)
                .with_comment(comment.as_str())
                .with_category(category.as_str())
                .with_menu(menu.as_str());
            spot.validate()?;

            let vm = FoodSpotViewModel::new(repository, list_id, None).await?;
            let id = vm.add_spot(&spot).await?;
            Ok(message(
                format!("Added spot '{name}' (ID: {id}) to list '{list}'\n"),
                &serde_json::json!({ "id": id, "list_id": list_id, "name": name }),
                format,
            ))
        }
        SpotCommands::Ls { list, search } => {
            let list_id = resolve_list(&lists, list).await?;
            let vm = FoodSpotViewModel::new(repository, list_id, None).await?;
            let spots = vm.filtered_spots(search.as_deref().unwrap_or(""));
            let entries = with_distances(config, spots).await?;
            Ok(format_spots(
                &entries,
                config.device_location.is_some(),
                format,
            ))
        }
        SpotCommands::Show { id } => {
            let (_, spot) = open_spot(repository, *id).await?;
            let mut entries = with_distances(config, vec![spot]).await?;
            let entry = entries.remove(0);
            Ok(format_spot(
                &entry,
                config.device_location.is_some(),
                format,
            ))
        }
        SpotCommands::Edit {
            id,
            name,
            address,
            rating,
            comment,
            category,
            menu,
        } => {
            let (vm, current) = open_spot(repository, *id).await?;
            let updated = FoodSpot {
                name: name.clone().unwrap_or(current.name),
                address: address.clone().unwrap_or(current.address),
                rating: rating.unwrap_or(current.rating),
                comment: comment.clone().unwrap_or(current.comment),
                category: category.clone().unwrap_or(current.category),
                menu: menu.clone().unwrap_or(current.menu),
                ..current
            };
            updated.validate()?;

            vm.update_spot(&updated).await?;
            Ok(message(
                format!("Updated spot '{}' (ID: {id})\n", updated.name),
                &serde_json::to_value(&updated)?,
                format,
            ))
        }
        SpotCommands::Rm { id } => {
            let (vm, spot) = open_spot(repository, *id).await?;
            let removed = vm.delete_spot(&spot).await?;
            Ok(message(
                format!("Deleted spot '{}' (ID: {id})\n", spot.name),
                &serde_json::json!({ "deleted": removed, "id": id }),
                format,
            ))
        }
        SpotCommands::Clear { list } => {
            let list_id = resolve_list(&lists, list).await?;
            let vm = FoodSpotViewModel::new(repository, list_id, None).await?;
            let removed = vm.delete_all_spots().await?;
            Ok(message(
                format!("Deleted {removed} spots from list '{list}'\n"),
                &serde_json::json!({ "deleted": removed, "list_id": list_id }),
                format,
            ))
        }
    }
}

async fn resolve_list(lists: &SqliteListRepository, name: &str) -> Result<i64> {
    lists.id_for(name).await?.ok_or_else(|| {
        StorageError::ListNotFound {
            name: name.to_string(),
        }
        .into()
    })
}

/// Opens the view-model of the spot's list with the spot selected.
async fn open_spot(
    repository: Arc<dyn FoodSpotRepository>,
    id: i64,
) -> Result<(FoodSpotViewModel, FoodSpot)> {
    let not_found = || Error::from(StorageError::SpotNotFound { id });

    let list_id = repository.by_id(id).await?.ok_or_else(not_found)?.list_id;
    let vm = FoodSpotViewModel::new(repository, list_id, Some(id)).await?;
    let spot = vm.state().spot.ok_or_else(not_found)?;
    Ok((vm, spot))
}

async fn with_distances(config: &Config, spots: Vec<FoodSpot>) -> Result<Vec<SpotEntry>> {
    let provider = FixedLocationProvider::new(config.device_location);
    let device = last_known_location(&provider).await;
    let geocoder = if device.is_some() {
        open_geocoder(config)?
    } else {
        GazetteerGeocoder::new()
    };

    let mut entries = Vec::with_capacity(spots.len());
    for spot in spots {
        let distance_km = spot_distance(&geocoder, device, &spot, config.geocode_timeout).await;
        entries.push(SpotEntry { spot, distance_km });
    }
    Ok(entries)
}

async fn cmd_locate(config: &Config, format: OutputFormat) -> Result<String> {
    let provider = Arc::new(FixedLocationProvider::new(config.device_location));
    let vm = LocationViewModel::new(provider);
    let point = vm.request_single_location_update().await;
    Ok(format_location(point, format))
}

fn cmd_distance(
    lat1: f64,
    lon1: f64,
    lat2: f64,
    lon2: f64,
    format: OutputFormat,
) -> Result<String> {
    let from = GeoPoint::new(lat1, lon1)?;
    let to = GeoPoint::new(lat2, lon2)?;
    Ok(format_distance_result(distance_km(from, to), format))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use clap::Parser;
    use tempfile::TempDir;

    fn setup() -> (TempDir, String) {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db").display().to_string();
        (temp_dir, db_path)
    }

    async fn run(db_path: &str, args: &[&str]) -> Result<String> {
        let mut argv = vec!["munch", "--db-path", db_path, "--owner", "Tester"];
        argv.extend_from_slice(args);
        execute(&Cli::parse_from(argv)).await
    }

    #[tokio::test]
    async fn test_cmd_init() {
        let (_temp_dir, db_path) = setup();
        let output = run(&db_path, &["init"]).await.unwrap();
        assert!(output.contains("Initialized"));
        assert!(Path::new(&db_path).exists());
    }

    #[tokio::test]
    async fn test_cmd_init_already_exists() {
        let (_temp_dir, db_path) = setup();
        run(&db_path, &["init"]).await.unwrap();
        assert!(run(&db_path, &["init"]).await.is_err());
        assert!(run(&db_path, &["init", "--force"]).await.is_ok());
    }

    #[tokio::test]
    async fn test_requires_init() {
        let (_temp_dir, db_path) = setup();
        let err = run(&db_path, &["list", "ls"]).await.unwrap_err();
        assert!(matches!(err, Error::Storage(StorageError::NotInitialized)));
        assert!(!Path::new(&db_path).exists());
    }

    #[tokio::test]
    async fn test_cmd_status() {
        let (_temp_dir, db_path) = setup();
        run(&db_path, &["init"]).await.unwrap();
        let output = run(&db_path, &["status"]).await.unwrap();
        assert!(output.contains("Lists:         0"));
        assert!(output.contains("lists v9, foodspots v5"));
    }

    #[tokio::test]
    async fn test_cmd_reset() {
        let (_temp_dir, db_path) = setup();
        run(&db_path, &["init"]).await.unwrap();
        run(&db_path, &["list", "add", "Pizza"]).await.unwrap();

        assert!(run(&db_path, &["reset"]).await.is_err());
        run(&db_path, &["reset", "--yes"]).await.unwrap();
        let output = run(&db_path, &["list", "ls"]).await.unwrap();
        assert!(output.contains("No lists found"));
    }

    #[tokio::test]
    async fn test_list_lifecycle() {
        let (_temp_dir, db_path) = setup();
        run(&db_path, &["init"]).await.unwrap();

        let output = run(&db_path, &["list", "add", "  Pizza  ", "--icon", "Star"])
            .await
            .unwrap();
        assert!(output.contains("Created list 'Pizza'"));

        let err = run(&db_path, &["list", "add", "Pizza"]).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::DuplicateName)
        ));

        let err = run(&db_path, &["list", "add", "   "]).await.unwrap_err();
        assert!(matches!(err, Error::Validation(ValidationError::BlankName)));

        run(&db_path, &["list", "edit", "Pizza", "Beste Pizza"])
            .await
            .unwrap();
        let output = run(&db_path, &["list", "ls", "--search", "beste"])
            .await
            .unwrap();
        assert!(output.contains("Beste Pizza"));
        assert!(output.contains("Star"));
        assert!(output.contains("Tester"));

        run(&db_path, &["list", "rm", "Beste Pizza"]).await.unwrap();
        let err = run(&db_path, &["list", "rm", "Beste Pizza"])
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Storage(StorageError::ListNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_spot_lifecycle() {
        let (_temp_dir, db_path) = setup();
        run(&db_path, &["init"]).await.unwrap();
        run(&db_path, &["list", "add", "Asia"]).await.unwrap();

        let output = run(
            &db_path,
            &[
                "spot", "add", "Asia", "Pho Bar", "-a", "Kantstr. 1", "-r", "4", "--category",
                "Vietnamesisch",
            ],
        )
        .await
        .unwrap();
        assert!(output.contains("(ID: 1)"));

        let output = run(&db_path, &["spot", "ls", "Asia"]).await.unwrap();
        assert!(output.contains("Pho Bar"));
        assert!(output.contains("****"));
        assert!(!output.contains("Distance"));

        run(&db_path, &["spot", "edit", "1", "--comment", "sehr gut"])
            .await
            .unwrap();
        let output = run(&db_path, &["spot", "show", "1"]).await.unwrap();
        assert!(output.contains("sehr gut"));
        assert!(output.contains("Kantstr. 1"));

        run(&db_path, &["spot", "rm", "1"]).await.unwrap();
        let err = run(&db_path, &["spot", "show", "1"]).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Storage(StorageError::SpotNotFound { id: 1 })
        ));
    }

    #[tokio::test]
    async fn test_spot_rating_validated() {
        let (_temp_dir, db_path) = setup();
        run(&db_path, &["init"]).await.unwrap();
        run(&db_path, &["list", "add", "Asia"]).await.unwrap();

        let err = run(&db_path, &["spot", "add", "Asia", "X", "-a", "Y", "-r", "9"])
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::RatingOutOfRange(9))
        ));
    }

    #[tokio::test]
    async fn test_spot_clear_and_unknown_list() {
        let (_temp_dir, db_path) = setup();
        run(&db_path, &["init"]).await.unwrap();
        run(&db_path, &["list", "add", "Asia"]).await.unwrap();
        run(&db_path, &["spot", "add", "Asia", "A", "-a", "x"])
            .await
            .unwrap();
        run(&db_path, &["spot", "add", "Asia", "B", "-a", "y"])
            .await
            .unwrap();

        let output = run(&db_path, &["spot", "clear", "Asia"]).await.unwrap();
        assert!(output.contains("Deleted 2 spots"));

        let err = run(&db_path, &["spot", "ls", "Nirgendwo"]).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Storage(StorageError::ListNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_cmd_locate() {
        let (_temp_dir, db_path) = setup();
        let output = run(&db_path, &["locate"]).await.unwrap();
        assert_eq!(output, "location unavailable\n");

        let output = run(
            &db_path,
            &["--device-lat", "52.52", "--device-lon", "13.405", "locate"],
        )
        .await
        .unwrap();
        assert_eq!(output, "52.5200, 13.4050\n");
    }

    #[test]
    fn test_cmd_distance() {
        let output = cmd_distance(52.52, 13.405, 53.5511, 9.9937, OutputFormat::Text).unwrap();
        assert!(output.ends_with(" km\n"));
        assert!(cmd_distance(100.0, 0.0, 0.0, 0.0, OutputFormat::Text).is_err());
    }
}
