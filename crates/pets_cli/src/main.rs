//! CLI smoke entry point.
//!
//! # Responsibility
//! - Start core logging, open the pet store once, insert the sample pet and
//!   print the catalog.
//! - Keep output deterministic for quick local sanity checks.
//!
//! Usage: `pets_cli [DB_PATH] [LOG_DIR]`. Without a path the store is
//! in-memory; without a log dir logs go to `<temp>/pets-logs`.

use pets_core::{
    default_log_level, init_logging, Address, Gender, LoggingError, NewPet, PetProvider,
    PetQuery, PetStore, SqlitePetRepository,
};
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::ExitCode;

const DEFAULT_LOG_DIR_NAME: &str = "pets-logs";

#[derive(Debug, PartialEq, Eq)]
struct CliArgs {
    db_path: Option<PathBuf>,
    log_dir: PathBuf,
}

fn main() -> ExitCode {
    println!("pets_core version={}", pets_core::core_version());

    let args = match parse_args(std::env::args_os().skip(1)) {
        Ok(args) => args,
        Err(err) => {
            eprintln!("error: cannot resolve working directory: {err}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(err) = start_logging(&args) {
        eprintln!("error: {err}");
        return ExitCode::FAILURE;
    }

    let store = match args.db_path {
        Some(path) => PetStore::file(path),
        None => PetStore::in_memory(),
    };

    match run(&store) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn parse_args(mut args: impl Iterator<Item = OsString>) -> std::io::Result<CliArgs> {
    let db_path = args.next().map(PathBuf::from);
    let log_dir = match args.next().map(PathBuf::from) {
        Some(dir) if dir.is_absolute() => dir,
        Some(dir) => std::env::current_dir()?.join(dir),
        None => std::env::temp_dir().join(DEFAULT_LOG_DIR_NAME),
    };
    Ok(CliArgs { db_path, log_dir })
}

fn start_logging(args: &CliArgs) -> Result<(), LoggingError> {
    let log_dir = args.log_dir.to_string_lossy();
    init_logging(default_log_level(), &log_dir)
}

fn run(store: &PetStore) -> Result<(), Box<dyn std::error::Error>> {
    let provider = PetProvider::new(SqlitePetRepository::new(store));
    let catalog = Address::collection();

    let sample = NewPet::new("Toto", 7)
        .with_breed("Terrier")
        .with_gender(Gender::Male);
    let created = provider.insert(&catalog, &sample)?;
    println!("inserted {created}");

    for row in provider.query(&catalog, &PetQuery::default())? {
        println!("{}", serde_json::to_string(&row)?);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{parse_args, run, start_logging, CliArgs, DEFAULT_LOG_DIR_NAME};
    use pets_core::{default_log_level, logging_status, PetStore};
    use std::ffi::OsString;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn unique_temp_dir(suffix: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!(
            "pets-cli-{suffix}-{}-{nanos}",
            std::process::id()
        ))
    }

    #[test]
    fn parse_args_defaults_to_memory_store_and_temp_log_dir() {
        let args = parse_args(std::iter::empty()).unwrap();
        assert_eq!(
            args,
            CliArgs {
                db_path: None,
                log_dir: std::env::temp_dir().join(DEFAULT_LOG_DIR_NAME),
            }
        );
    }

    #[test]
    fn parse_args_resolves_relative_log_dir() {
        let args = parse_args(
            [OsString::from("pets.db"), OsString::from("logs")].into_iter(),
        )
        .unwrap();
        assert_eq!(args.db_path, Some(PathBuf::from("pets.db")));
        assert!(args.log_dir.is_absolute());
        assert!(args.log_dir.ends_with("logs"));
    }

    #[test]
    fn start_logging_installs_core_logger_before_store_use() {
        let log_dir = unique_temp_dir("logs");
        let args = CliArgs {
            db_path: None,
            log_dir: log_dir.clone(),
        };

        start_logging(&args).unwrap();
        start_logging(&args).unwrap();

        let (level, dir) = logging_status().unwrap();
        assert_eq!(level, default_log_level());
        assert_eq!(dir, log_dir);

        run(&PetStore::in_memory()).unwrap();
    }
}
