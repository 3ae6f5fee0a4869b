//! Command-line and environment configuration

use std::path::PathBuf;

use clap::Parser;

use crate::model::{DEFAULT_API_URL, SAVED_AYAHS_FILE, SURAH_COUNT};

#[derive(Parser, Debug, Clone)]
#[command(name = "quran-tui")]
#[command(about = "Read the Quran and listen to verse recitations in the terminal")]
#[command(version)]
pub struct Args {
    /// Base URL of the alquran.cloud compatible API
    #[arg(long = "api-url", default_value = DEFAULT_API_URL, env = "QURAN_API_URL")]
    pub api_url: String,

    /// Audio edition used for recitation
    #[arg(short, long, default_value = "ar.alafasy", env = "QURAN_RECITER")]
    pub reciter: String,

    /// Translation edition shown under each verse
    #[arg(short, long, default_value = "en.asad", env = "QURAN_TRANSLATION")]
    pub translation: String,

    /// Surah opened at startup
    #[arg(short, long, default_value_t = 1, env = "QURAN_SURAH",
          value_parser = clap::value_parser!(u32).range(1..=SURAH_COUNT as i64))]
    pub surah: u32,

    /// Directory for saved verses
    #[arg(long = "data-dir", default_value = ".cache", env = "QURAN_DATA_DIR")]
    pub data_dir: PathBuf,

    /// Directory for log files
    #[arg(long = "log-dir", default_value = ".logs", env = "QURAN_LOG_DIR")]
    pub log_dir: PathBuf,
}

impl Args {
    pub fn saved_ayahs_path(&self) -> PathBuf {
        self.data_dir.join(SAVED_AYAHS_FILE)
    }
}
