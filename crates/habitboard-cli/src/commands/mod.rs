pub mod cache;
pub mod report;
pub mod run;

use habitboard_core::cache::{FileCache, ResponseCache};
use habitboard_core::{CachedHabitify, Config, HabitifyClient};

/// Wire the Habitify client to the persistent response cache.
pub(crate) fn open_service(
    config: &Config,
) -> Result<CachedHabitify<FileCache>, Box<dyn std::error::Error>> {
    let client = HabitifyClient::new(&config.habitify_api_key)?;
    let cache = ResponseCache::new(FileCache::open_default()?);
    Ok(CachedHabitify::new(client, cache))
}
