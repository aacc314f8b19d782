//! `menu-loader` - 菜单批量导入工具
//!
//! 读取目录下的 `menu_<lang>.json` 文件，清空菜单存储后逐个写入。
//! 服务器运行时 redb 文件被占用，导入前需要先停止服务器。

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use menu_server::menu::loader;
use menu_server::utils::time::now_millis;
use menu_server::{Config, RedbMenuStore, init_logger};

#[derive(Parser, Debug)]
#[command(name = "menu-loader", version, about = "Menu bulk loader and admin tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Replace every stored menu with the files of a directory (destructive)
    Load {
        /// Directory holding menu_<lang>.json files
        #[arg(long, env = "MENU_DATA_DIR", default_value = "data")]
        data_dir: PathBuf,
        /// redb file (default: WORK_DIR/DATABASE_FILE)
        #[arg(long, env = "MENU_DATABASE")]
        database: Option<PathBuf>,
    },

    /// Print the argon2 hash of a password, for ADMIN_PASSWORD_HASH
    HashPassword {
        password: String,
    },
}

fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    init_logger();

    let cli = Cli::parse();
    match cli.command {
        Commands::Load { data_dir, database } => {
            let database = database.unwrap_or_else(|| Config::from_env().database_path());

            let db = menu_server::db::open(&database)
                .with_context(|| format!("Failed to open database {}", database.display()))?;
            let store = RedbMenuStore::new(db).context("Failed to prepare menu store")?;

            let report = loader::bulk_load(&store, &data_dir, now_millis())
                .with_context(|| format!("Failed to load menus from {}", data_dir.display()))?;

            tracing::info!(
                cleared = report.cleared,
                languages = ?report.languages,
                "Bulk load finished"
            );
            println!(
                "Loaded {} languages: {}",
                report.languages.len(),
                report.languages.join(", ")
            );
        }
        Commands::HashPassword { password } => {
            let hash = menu_server::auth::hash_password(&password)
                .map_err(|e| anyhow::anyhow!("Failed to hash password: {e}"))?;
            println!("{hash}");
        }
    }

    Ok(())
}
